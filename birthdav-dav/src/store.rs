//! Store adapter over a WebDAV collection (CardDAV address book or CalDAV
//! calendar).

use anyhow::{Context, Result};
use birthdav_core::{BirthdavError, BirthdavResult, Store};
use tracing::debug;

use crate::client::{DavClient, create_dav_client, object_href, url_to_href};
use crate::requests::{DeleteObject, GetObject, ListMembers, PutObject};

/// Content type for an object key, by extension.
fn content_type_for(key: &str) -> &'static str {
    if key.ends_with(".vcf") {
        "text/vcard; charset=utf-8"
    } else {
        "text/calendar; charset=utf-8"
    }
}

fn store_error(e: anyhow::Error) -> BirthdavError {
    BirthdavError::Store(format!("{:#}", e))
}

pub struct DavStore {
    client: DavClient,
    collection_href: String,
    identity: String,
}

impl DavStore {
    /// Connect to the collection at `url`. No request is sent until the first
    /// store operation.
    pub fn connect(url: &str, credentials: Option<(&str, &str)>) -> Result<Self> {
        let client = create_dav_client(url, credentials)?;

        Ok(DavStore {
            client,
            collection_href: url_to_href(url),
            identity: url.to_string(),
        })
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .request(ListMembers::new(&self.collection_href))
            .await
            .with_context(|| format!("Failed to list {}", self.identity))?;

        debug!(collection = %self.identity, count = response.keys.len(), "Listed collection");
        Ok(response.keys)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let href = object_href(&self.collection_href, key);
        self.client
            .request(GetObject::new(&href))
            .await
            .with_context(|| format!("Failed to fetch {}", href))
    }

    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        let href = object_href(&self.collection_href, key);
        let body = std::str::from_utf8(body).context("Object body is not UTF-8")?;

        self.client
            .request(PutObject::new(&href, body, content_type_for(key)))
            .await
            .with_context(|| format!("Failed to upload {}", href))?;

        debug!(href = %href, "Uploaded object");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let href = object_href(&self.collection_href, key);
        self.client
            .request(DeleteObject::new(&href))
            .await
            .with_context(|| format!("Failed to delete {}", href))
    }
}

impl Store for DavStore {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn list(&self) -> BirthdavResult<Vec<String>> {
        self.list_keys().await.map_err(store_error)
    }

    async fn fetch(&self, key: &str) -> BirthdavResult<Vec<u8>> {
        self.get(key).await.map_err(store_error)
    }

    async fn push(&self, key: &str, body: &[u8]) -> BirthdavResult<()> {
        self.put(key, body).await.map_err(store_error)
    }

    async fn delete(&self, key: &str) -> BirthdavResult<()> {
        self.remove(key).await.map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for("a.vcf"), "text/vcard; charset=utf-8");
        assert_eq!(content_type_for("e1.ics"), "text/calendar; charset=utf-8");
    }

    #[test]
    fn test_store_error_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Failed to list http://foo");
        let BirthdavError::Store(message) = store_error(err) else {
            panic!("Expected store error");
        };

        assert_eq!(message, "Failed to list http://foo: connection refused");
    }
}
