//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bucketsync-core.

use async_trait::async_trait;
use aws_config::sts::AssumeRoleProvider;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{ObjectCannedAcl, ServerSideEncryption, StorageClass};
use aws_smithy_types::error::display::DisplayErrorContext;
use tracing::{debug, warn};

use bucketsync_core::{Config, Error, ObjectInfo, ObjectReader, ObjectStore, PutOptions, Result};

/// Session name used when assuming the user role
const USER_ROLE_SESSION_NAME: &str = "bucketsync-user-role";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create an authenticated client from the run configuration
    ///
    /// Static keys win over an assumed role; with neither, the SDK default
    /// chain (environment, profile, instance profile) is used. A user role,
    /// when set, is assumed on top of whichever base credentials apply.
    pub async fn new(config: &Config) -> Result<Self> {
        if config.region.trim().is_empty() {
            return Err(Error::Client("region is required".into()));
        }

        let region = aws_config::Region::new(config.region.clone());
        let creds = &config.credentials;

        let mut loader =
            aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region.clone());

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some((access_key, secret_key)) = creds.static_keys() {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiry
                "bucketsync-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        } else if let Some(role_arn) = &creds.assume_role {
            debug!(role = %role_arn, "Assuming role");
            let base = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(region.clone())
                .load()
                .await;
            let mut builder = AssumeRoleProvider::builder(role_arn).configure(&base);
            if let Some(name) = &creds.assume_role_session_name {
                builder = builder.session_name(name);
            }
            loader = loader.credentials_provider(builder.build().await);
        } else {
            warn!("AWS Key and/or Secret not provided (falling back to instance profile)");
        }

        let sdk_config = loader.load().await;

        let mut s3_config =
            aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(config.path_style);

        if let Some(user_role_arn) = &creds.user_role_arn {
            debug!(role = %user_role_arn, "Assuming user role");
            let provider = AssumeRoleProvider::builder(user_role_arn)
                .session_name(USER_ROLE_SESSION_NAME)
                .configure(&sdk_config)
                .build()
                .await;
            s3_config = s3_config.credentials_provider(provider);
        }

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config.build()),
        })
    }
}

/// Key as sent on the wire
///
/// Mapped keys always start with `/`; the stored key does not.
pub(crate) fn wire_key(key: &str) -> &str {
    key.trim_start_matches('/')
}

fn transfer_error(bucket: &str, key: &str, message: impl std::fmt::Display) -> Error {
    Error::Transfer {
        bucket: bucket.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| Error::List {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                message: DisplayErrorContext(e).to_string(),
            })?;

        if response.is_truncated().unwrap_or(false) {
            warn!(
                bucket,
                prefix,
                "Listing was truncated; only the first page of objects will be downloaded"
            );
        }

        let items = response
            .contents()
            .iter()
            .filter_map(|object| {
                object
                    .key()
                    .map(|key| ObjectInfo::new(key, object.size().unwrap_or(0)))
            })
            .collect();

        Ok(items)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(wire_key(key))
            .send()
            .await
            .map_err(|e| transfer_error(bucket, key, DisplayErrorContext(e)))?;

        Ok(Box::pin(response.body.into_async_read()))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: tokio::fs::File,
        options: &PutOptions,
    ) -> Result<()> {
        let body = ByteStream::read_from()
            .file(body)
            .build()
            .await
            .map_err(|e| transfer_error(bucket, key, DisplayErrorContext(e)))?;

        self.inner
            .put_object()
            .bucket(bucket)
            .key(wire_key(key))
            .body(body)
            .acl(ObjectCannedAcl::from(options.access.as_str()))
            .content_type(&options.content_type)
            .set_content_encoding(options.content_encoding.clone())
            .set_cache_control(options.cache_control.clone())
            .set_server_side_encryption(
                options
                    .encryption
                    .as_deref()
                    .map(ServerSideEncryption::from),
            )
            .set_storage_class(options.storage_class.as_deref().map(StorageClass::from))
            .send()
            .await
            .map_err(|e| transfer_error(bucket, key, DisplayErrorContext(e)))?;

        Ok(())
    }
}
