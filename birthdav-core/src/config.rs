//! Endpoint configuration.
//!
//! Settings come from an optional TOML file overlaid by `BIRTHDAV_*`
//! environment variables:
//!
//! ```toml
//! [card]
//! url = "https://dav.example.com/addressbooks/me/contacts/"
//! user = "me"
//! pass = "secret"
//!
//! [cal]
//! url = "file:///home/me/calendars/birthdays"
//! ```
//!
//! `BIRTHDAV_CARD_URL`, `BIRTHDAV_CARD_USER`, `BIRTHDAV_CARD_PASS` and their
//! `BIRTHDAV_CAL_*` counterparts take precedence over the file.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

use crate::error::{BirthdavError, BirthdavResult};

const ENV_PREFIX: &str = "BIRTHDAV";
const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// Default config file at ~/.config/birthdav/config.toml
pub fn default_config_path() -> BirthdavResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| BirthdavError::Config("Could not determine config directory".into()))?
        .join("birthdav");

    Ok(config_dir.join("config.toml"))
}

/// Where a collection lives and how to authenticate against it.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    raw: String,
}

impl EndpointConfig {
    /// The URL exactly as configured.
    ///
    /// For the person collection this is the identity written into generated
    /// events, so it must not go through URL normalisation.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Local directory for `file://` endpoints.
    pub fn file_path(&self) -> Option<PathBuf> {
        match self.url.scheme() {
            "file" => self.url.to_file_path().ok(),
            _ => None,
        }
    }

    /// Username and password, when a username is configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref().unwrap_or_default()))
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.raw)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Both collections taking part in a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Person collection (vCards).
    pub card: EndpointConfig,
    /// Event collection (birthday events).
    pub cal: EndpointConfig,
}

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    card: RawEndpoint,
    #[serde(default)]
    cal: RawEndpoint,
}

#[derive(Deserialize, Default)]
struct RawEndpoint {
    url: Option<String>,
    user: Option<String>,
    pass: Option<String>,
}

impl SyncConfig {
    /// Load from `config_file` (or the default location) and the process
    /// environment.
    pub fn load(config_file: Option<&Path>) -> BirthdavResult<Self> {
        Self::from_sources(config_file, std::env::vars())
    }

    /// Load from `config_file` (or the default location) and the given
    /// environment variables instead of the process environment.
    pub fn from_sources(
        config_file: Option<&Path>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> BirthdavResult<Self> {
        let file = match config_file {
            Some(path) if !path.is_file() => {
                return Err(BirthdavError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(default_config_path()?)
                .format(FileFormat::Toml)
                .required(false),
        };

        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("_")
            .ignore_empty(true)
            .source(Some(vars.into_iter().collect()));

        let raw: RawConfig = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .map_err(|e| BirthdavError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| BirthdavError::Config(e.to_string()))?;

        Ok(SyncConfig {
            card: raw.card.resolve("CARD")?,
            cal: raw.cal.resolve("CAL")?,
        })
    }
}

impl RawEndpoint {
    fn resolve(self, section: &str) -> BirthdavResult<EndpointConfig> {
        let var = format!("{}_{}_URL", ENV_PREFIX, section);

        let raw_url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                BirthdavError::Config(format!(
                    "missing setting {} (or url under [{}] in the config file)",
                    var,
                    section.to_lowercase()
                ))
            })?;

        let url = Url::parse(raw_url.trim())
            .map_err(|e| BirthdavError::Config(format!("invalid URL in {}: {}", var, e)))?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(BirthdavError::Config(format!(
                "unsupported URL scheme '{}' in {}",
                url.scheme(),
                var
            )));
        }

        Ok(EndpointConfig {
            url,
            username: self.user.filter(|u| !u.is_empty()),
            password: self.pass,
            raw: raw_url.trim().to_string(),
        })
    }
}
