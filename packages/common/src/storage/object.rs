use std::io::Cursor;

use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;

use super::error::StorageError;
use super::key::{Locator, StorageKey};
use super::traits::{BoxReader, PhotoStore, join_url};
use crate::config::ObjectStoreConfig;

/// S3-compatible bucket store (AWS S3, MinIO, R2, ...).
///
/// Objects are written with the bucket's default ACL; `public_url` must point
/// at a location that serves the bucket's objects publicly.
pub struct ObjectPhotoStore {
    bucket: Box<Bucket>,
    public_url: String,
    max_size: u64,
}

impl ObjectPhotoStore {
    pub fn new(config: &ObjectStoreConfig, max_size: u64) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_url: config.public_url.clone(),
            max_size,
        })
    }
}

fn check_status(code: u16, key: &StorageKey) -> Result<(), StorageError> {
    match code {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        other => Err(StorageError::Backend(format!(
            "unexpected status {other} for '{key}'"
        ))),
    }
}

#[async_trait]
impl PhotoStore for ObjectPhotoStore {
    async fn put(
        &self,
        key: &StorageKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<Locator, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let response = self
            .bucket
            .put_object_with_content_type(key.as_str(), data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        check_status(response.status_code(), key)?;

        Ok(Locator {
            url: self.url_for(key),
            key: key.clone(),
        })
    }

    async fn get_stream(&self, key: &StorageKey) -> Result<BoxReader, StorageError> {
        let response = self
            .bucket
            .get_object(key.as_str())
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        check_status(response.status_code(), key)?;

        Ok(Box::new(Cursor::new(response.bytes().to_vec())))
    }

    async fn delete(&self, key: &StorageKey) -> Result<bool, StorageError> {
        let response = self
            .bucket
            .delete_object(key.as_str())
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        match check_status(response.status_code(), key) {
            Ok(()) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn url_for(&self, key: &StorageKey) -> String {
        join_url(&self.public_url, key)
    }
}
