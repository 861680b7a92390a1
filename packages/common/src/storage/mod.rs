mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod object;

use std::sync::Arc;

pub use error::StorageError;
pub use key::{Locator, StorageKey};
pub use traits::{BoxReader, PhotoStore};

use crate::config::{StorageAppConfig, StorageBackend};

/// Build the photo store selected by configuration.
pub async fn open(config: &StorageAppConfig) -> Result<Arc<dyn PhotoStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            tracing::info!(
                "Using filesystem photo store at {}",
                config.filesystem.root.display()
            );
            let store = filesystem::FilesystemPhotoStore::new(
                config.filesystem.root.clone(),
                config.filesystem.public_url.clone(),
                config.max_object_size,
            )
            .await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "object-storage")]
        StorageBackend::Object => {
            let object = config.object.as_ref().ok_or_else(|| {
                StorageError::Backend("storage.object section is required".into())
            })?;
            tracing::info!("Using object photo store bucket '{}'", object.bucket);
            Ok(Arc::new(object::ObjectPhotoStore::new(
                object,
                config.max_object_size,
            )?))
        }
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::Object => Err(StorageError::Backend(
            "built without the object-storage feature".into(),
        )),
    }
}
