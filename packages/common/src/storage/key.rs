use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

const MAX_KEY_LEN: usize = 512;

/// A validated, backend-neutral object key such as `photos/42/0190f7c2-….jpg`.
///
/// Keys are relative, `/`-separated, and contain only ASCII letters, digits,
/// `.`, `-` and `_`. No segment may be empty or start with a dot, so a key can
/// never escape the filesystem root it is joined onto.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Parse and validate a key.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".into()));
        }
        if s.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey(format!(
                "key exceeds {MAX_KEY_LEN} bytes"
            )));
        }

        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(StorageError::InvalidKey(
                    "key must not contain empty segments".into(),
                ));
            }
            if segment.starts_with('.') {
                return Err(StorageError::InvalidKey(format!(
                    "segment '{segment}' must not start with a dot"
                )));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            {
                return Err(StorageError::InvalidKey(format!(
                    "segment '{segment}' contains unsupported characters"
                )));
            }
        }

        Ok(Self(s.to_string()))
    }

    /// Generate a fresh, unique key for a contestant's photo.
    pub fn for_photo(contestant_id: i32, extension: &str) -> Self {
        Self(format!(
            "photos/{contestant_id}/{}.{extension}",
            Uuid::now_v7()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey({})", self.0)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StorageKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StorageKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Where a stored photo lives: a public URL plus the backend key needed to
/// delete it later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub url: String,
    pub key: StorageKey,
}
