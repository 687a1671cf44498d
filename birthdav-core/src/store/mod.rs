//! Collection access.
//!
//! A collection is a flat set of named objects (one contact or one event per
//! object). The reconciliation only needs to list, fetch, push and delete
//! them; everything protocol-specific lives behind this trait.

mod dir;
#[cfg(test)]
pub(crate) mod memory;

pub use dir::DirStore;

use crate::error::BirthdavResult;

#[allow(async_fn_in_trait)]
pub trait Store {
    /// Identity of the collection, written into generated events as the
    /// back-reference to their source.
    fn identity(&self) -> &str;

    /// Keys of every object in the collection.
    async fn list(&self) -> BirthdavResult<Vec<String>>;

    async fn fetch(&self, key: &str) -> BirthdavResult<Vec<u8>>;

    /// Create or overwrite an object.
    async fn push(&self, key: &str, body: &[u8]) -> BirthdavResult<()>;

    /// Remove an object. Removing an object that is already gone succeeds.
    async fn delete(&self, key: &str) -> BirthdavResult<()>;
}
