//! Run configuration
//!
//! A single immutable record built once from flags and environment before
//! any transfer starts, then shared read-only by every component.

use crate::error::{Error, Result};
use crate::matcher::validate_pattern;
use crate::metadata::MetadataRules;

/// Default region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default object ACL
pub const DEFAULT_ACCESS: &str = "private";

/// Credential settings consumed by the client factory
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Static access key ID
    pub access_key: Option<String>,

    /// Static secret access key
    pub secret_key: Option<String>,

    /// Role to assume when no static keys are given
    pub assume_role: Option<String>,

    /// Session name for the assumed role
    pub assume_role_session_name: Option<String>,

    /// Role assumed on top of the base credentials
    pub user_role_arn: Option<String>,
}

impl Credentials {
    /// Both halves of a static key pair, if set
    pub fn static_keys(&self) -> Option<(&str, &str)> {
        match (self.access_key.as_deref(), self.secret_key.as_deref()) {
            (Some(key), Some(secret)) => Some((key, secret)),
            _ => None,
        }
    }
}

/// Configuration for a single run
#[derive(Debug, Clone)]
pub struct Config {
    /// Custom endpoint for S3-compatible services
    pub endpoint: Option<String>,

    /// Bucket region
    pub region: String,

    /// Bucket name
    pub bucket: String,

    /// Canned ACL applied to uploaded objects
    pub access: String,

    /// Server-side encryption mode (e.g. `AES256`, `aws:kms`)
    pub encryption: Option<String>,

    /// Storage class for uploaded objects
    pub storage_class: Option<String>,

    /// Glob selecting files to upload
    pub source: String,

    /// Key prefix for uploads, listing prefix for downloads
    pub target: String,

    /// Removed from local paths on upload, prepended on download
    pub strip_prefix: String,

    /// Globs removing files from the upload set
    pub exclude: Vec<String>,

    pub content_type: MetadataRules,
    pub content_encoding: MetadataRules,
    pub cache_control: MetadataRules,

    /// Force path-style addressing
    pub path_style: bool,

    /// Download `target` instead of uploading `source`
    pub download: bool,

    /// Match and log without uploading
    pub dry_run: bool,

    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: DEFAULT_REGION.to_string(),
            bucket: String::new(),
            access: DEFAULT_ACCESS.to_string(),
            encryption: None,
            storage_class: None,
            source: String::new(),
            target: String::new(),
            strip_prefix: String::new(),
            exclude: Vec::new(),
            content_type: MetadataRules::default(),
            content_encoding: MetadataRules::default(),
            cache_control: MetadataRules::default(),
            path_style: false,
            download: false,
            dry_run: false,
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    /// Check the configuration before any client is built or file matched
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(Error::Config("bucket is required".into()));
        }

        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| Error::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
        }

        if !self.download {
            if self.source.is_empty() {
                return Err(Error::Config("source is required for uploads".into()));
            }
            validate_pattern(&self.source)?;
            for pattern in &self.exclude {
                validate_pattern(pattern)?;
            }
        }

        Ok(())
    }
}
