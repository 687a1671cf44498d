//! A collection kept as a local directory, one object per file.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{BirthdavError, BirthdavResult};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct DirStore {
    path: PathBuf,
    identity: String,
}

impl DirStore {
    /// Open a directory collection. The directory must already exist.
    pub fn open(path: impl Into<PathBuf>, identity: impl Into<String>) -> BirthdavResult<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(BirthdavError::Store(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        Ok(DirStore {
            path,
            identity: identity.into(),
        })
    }

    /// Resolve a key to a file inside the collection, refusing anything that
    /// would escape it.
    fn object_path(&self, key: &str) -> BirthdavResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(BirthdavError::Store(format!("Invalid object key: {}", key)));
        }
        Ok(self.path.join(key))
    }
}

impl Store for DirStore {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn list(&self) -> BirthdavResult<Vec<String>> {
        let mut keys = Vec::new();

        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                keys.push(name.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn fetch(&self, key: &str) -> BirthdavResult<Vec<u8>> {
        let path = self.object_path(key)?;
        Ok(std::fs::read(path)?)
    }

    async fn push(&self, key: &str, body: &[u8]) -> BirthdavResult<()> {
        let path = self.object_path(key)?;

        // Stage next to the target so the final rename stays on one filesystem.
        // The temporary file is removed on drop if anything below fails.
        let mut staged = NamedTempFile::new_in(&self.path)?;
        staged.write_all(body)?;
        staged.flush()?;
        staged
            .persist(&path)
            .map_err(|e| BirthdavError::Io(e.error))?;

        debug!(key, "Wrote {}", path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> BirthdavResult<()> {
        let path = self.object_path(key)?;

        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
