//! bucketsync-s3: S3 SDK adapter for the bucketsync build step
//!
//! This crate provides the client factory and the implementation of the
//! ObjectStore trait using the aws-sdk-s3 crate. It is the only crate that
//! directly depends on the AWS SDK.

pub mod client;

pub use client::S3Client;
