use std::path::PathBuf;

use serde::Deserialize;

/// Which backend holds uploaded photo bytes.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    Object,
}

/// App-level storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Default: filesystem.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Hard cap on a single stored object, independent of the contest's
    /// configurable upload limit. Default: 32 MiB.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: u64,
    #[serde(default)]
    pub filesystem: FilesystemStoreConfig,
    /// Required when `backend = "object"`.
    #[serde(default)]
    pub object: Option<ObjectStoreConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStoreConfig {
    /// Directory photos are written under. Default: "./data/photos".
    #[serde(default = "default_fs_root")]
    pub root: PathBuf,
    /// Base URL the files route is reachable at.
    /// Default: "http://127.0.0.1:3000/api/v1/files".
    #[serde(default = "default_fs_public_url")]
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL objects are publicly served from.
    pub public_url: String,
    /// Use path-style addressing (needed by MinIO). Default: true.
    #[serde(default = "default_path_style")]
    pub path_style: bool,
}

fn default_max_object_size() -> u64 {
    32 * 1024 * 1024
}
fn default_fs_root() -> PathBuf {
    PathBuf::from("./data/photos")
}
fn default_fs_public_url() -> String {
    "http://127.0.0.1:3000/api/v1/files".into()
}
fn default_region() -> String {
    "us-east-1".into()
}
fn default_path_style() -> bool {
    true
}

impl Default for FilesystemStoreConfig {
    fn default() -> Self {
        Self {
            root: default_fs_root(),
            public_url: default_fs_public_url(),
        }
    }
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            max_object_size: default_max_object_size(),
            filesystem: FilesystemStoreConfig::default(),
            object: None,
        }
    }
}
