//! Opening a configured endpoint as a store, picked by URL scheme.

use anyhow::{Context, Result};
use birthdav_core::config::EndpointConfig;
use birthdav_core::{BirthdavResult, DirStore, Store};
use birthdav_dav::DavStore;

/// A person or event collection, either local or remote.
pub enum Collection {
    Dir(DirStore),
    Dav(DavStore),
}

impl Collection {
    pub fn open(endpoint: &EndpointConfig) -> Result<Self> {
        match endpoint.file_path() {
            Some(path) => {
                let store = DirStore::open(&path, endpoint.as_str())
                    .with_context(|| format!("Failed to open {}", endpoint.as_str()))?;
                Ok(Collection::Dir(store))
            }
            None => {
                let store = DavStore::connect(endpoint.as_str(), endpoint.credentials())
                    .with_context(|| format!("Failed to connect to {}", endpoint.as_str()))?;
                Ok(Collection::Dav(store))
            }
        }
    }
}

impl Store for Collection {
    fn identity(&self) -> &str {
        match self {
            Collection::Dir(store) => store.identity(),
            Collection::Dav(store) => store.identity(),
        }
    }

    async fn list(&self) -> BirthdavResult<Vec<String>> {
        match self {
            Collection::Dir(store) => store.list().await,
            Collection::Dav(store) => store.list().await,
        }
    }

    async fn fetch(&self, key: &str) -> BirthdavResult<Vec<u8>> {
        match self {
            Collection::Dir(store) => store.fetch(key).await,
            Collection::Dav(store) => store.fetch(key).await,
        }
    }

    async fn push(&self, key: &str, body: &[u8]) -> BirthdavResult<()> {
        match self {
            Collection::Dir(store) => store.push(key, body).await,
            Collection::Dav(store) => store.push(key, body).await,
        }
    }

    async fn delete(&self, key: &str) -> BirthdavResult<()> {
        match self {
            Collection::Dir(store) => store.delete(key).await,
            Collection::Dav(store) => store.delete(key).await,
        }
    }
}
