//! bucketsync-core: Core library for the bucketsync build step
//!
//! This crate provides everything between configuration and the network:
//! - The run configuration record and its validation
//! - Glob matching of source files with exclusions
//! - Metadata rule tables (content type, encoding, cache control)
//! - Mapping between local paths and object keys
//! - Upload and download orchestration over the ObjectStore trait
//!
//! It does not depend on any S3 SDK; the `bucketsync-s3` crate provides the
//! ObjectStore implementation.

pub mod config;
pub mod error;
pub mod keys;
pub mod matcher;
pub mod metadata;
pub mod traits;
pub mod transfer;

pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use metadata::MetadataRules;
pub use traits::{ObjectInfo, ObjectReader, ObjectStore, PutOptions};
pub use transfer::{Mode, Transfer, TransferReport, UploadItem};
