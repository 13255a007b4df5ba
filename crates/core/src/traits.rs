//! ObjectStore trait definition
//!
//! This trait defines the interface the transfer orchestrator needs from an
//! object-storage service. It keeps the core decoupled from any SDK.

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::Result;

/// Readable body of a fetched object
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// A listed object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size: i64,
}

impl ObjectInfo {
    /// Create a new ObjectInfo
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    /// Whether this is a zero-byte directory marker (`prefix/`)
    pub fn is_dir_marker(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// Request metadata sent with each upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Canned ACL
    pub access: String,

    pub content_type: String,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,

    /// Server-side encryption mode
    pub encryption: Option<String>,

    pub storage_class: Option<String>,
}

/// Trait for object-storage operations
///
/// Implemented by the S3 adapter and mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects under `prefix` (a single page)
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>>;

    /// Open the body of an object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader>;

    /// Upload an open local file to `key`
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: tokio::fs::File,
        options: &PutOptions,
    ) -> Result<()>;
}
