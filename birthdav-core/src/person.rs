//! Contact records read from the person collection.

use chrono::NaiveDate;

use crate::error::{BirthdavError, BirthdavResult};

/// Structured name parts from a vCard `N` property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub given: String,
    pub additional: String,
    pub family: String,
}

impl NameParts {
    /// Join the non-empty parts with single spaces, each part trimmed.
    pub fn display_name(&self) -> String {
        [&self.given, &self.additional, &self.family]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A contact as fetched from the person collection. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub uid: String,
    /// Raw `BDAY` value, normalised lazily by [`PersonRecord::birthday`].
    pub birth_date: Option<String>,
    pub name: Option<NameParts>,
}

impl PersonRecord {
    pub fn new(uid: impl Into<String>) -> Self {
        PersonRecord {
            uid: uid.into(),
            birth_date: None,
            name: None,
        }
    }

    pub fn with_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }

    pub fn with_name(mut self, given: &str, additional: &str, family: &str) -> Self {
        self.name = Some(NameParts {
            given: given.to_string(),
            additional: additional.to_string(),
            family: family.to_string(),
        });
        self
    }

    pub fn has_birth_date(&self) -> bool {
        self.birth_date.is_some()
    }

    /// The birth date as a calendar date.
    ///
    /// Accepts `YYYY-MM-DD` and the basic `YYYYMMDD` form. Any other value is
    /// an [`BirthdavError::InvalidBirthDate`], which aborts the run.
    pub fn birthday(&self) -> BirthdavResult<NaiveDate> {
        let raw = self
            .birth_date
            .as_deref()
            .ok_or_else(|| self.invalid_birth_date(""))?;
        let value = raw.trim();

        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
            .map_err(|_| self.invalid_birth_date(raw))
    }

    pub fn display_name(&self) -> String {
        self.name
            .as_ref()
            .map(NameParts::display_name)
            .unwrap_or_default()
    }

    fn invalid_birth_date(&self, value: &str) -> BirthdavError {
        BirthdavError::InvalidBirthDate {
            uid: self.uid.clone(),
            value: value.to_string(),
        }
    }
}
