//! In-memory collection used by tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::error::{BirthdavError, BirthdavResult};
use crate::store::Store;

#[derive(Debug, Default)]
pub struct MemoryStore {
    identity: String,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    failing: BTreeSet<String>,
    log: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new(identity: &str) -> Self {
        MemoryStore {
            identity: identity.to_string(),
            ..Default::default()
        }
    }

    pub fn with_object(self, key: &str, body: &str) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.as_bytes().to_vec());
        self
    }

    /// Make every push, fetch or delete on `key` fail.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Mutating operations in call order, as `push:<key>` / `delete:<key>`.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn check(&self, key: &str) -> BirthdavResult<()> {
        if self.failing.contains(key) {
            return Err(BirthdavError::Store(format!("Injected failure on {}", key)));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn list(&self) -> BirthdavResult<Vec<String>> {
        Ok(self.keys())
    }

    async fn fetch(&self, key: &str) -> BirthdavResult<Vec<u8>> {
        self.check(key)?;
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| BirthdavError::Store(format!("No such object: {}", key)))
    }

    async fn push(&self, key: &str, body: &[u8]) -> BirthdavResult<()> {
        self.log.lock().unwrap().push(format!("push:{}", key));
        self.check(key)?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> BirthdavResult<()> {
        self.log.lock().unwrap().push(format!("delete:{}", key));
        self.check(key)?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
