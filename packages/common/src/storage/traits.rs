use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;
use super::key::{Locator, StorageKey};

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Key-addressed storage for uploaded photo bytes.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store bytes under `key` and return where they can be fetched from.
    async fn put(
        &self,
        key: &StorageKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<Locator, StorageError>;

    /// Retrieve an object as a streaming async reader.
    async fn get_stream(&self, key: &StorageKey) -> Result<BoxReader, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError>;

    /// Public URL under which `key` is served.
    fn url_for(&self, key: &StorageKey) -> String;
}

/// Join a base URL and a key with exactly one slash between them.
pub(crate) fn join_url(base: &str, key: &StorageKey) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
