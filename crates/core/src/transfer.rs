//! Transfer orchestration
//!
//! Upload mode walks the matched files one at a time and stops at the first
//! failure. Download mode lists the target prefix once and fetches every
//! object in its own task; a failed object does not cancel the others, and
//! the run reports the first failure in completion order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::keys::{normalize_target, normalize_target_dir, path_to_slash, to_key, to_local_path};
use crate::matcher::find_matches;
use crate::metadata::content_type_for;
use crate::traits::{ObjectStore, PutOptions};

/// Direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Upload,
    Download,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Upload => write!(f, "upload"),
            Mode::Download => write!(f, "download"),
        }
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    pub mode: Mode,
    pub dry_run: bool,
    /// Objects transferred, or that would have been in a dry run
    pub objects: usize,
    /// Directories, unreadable entries and directory marker keys
    pub skipped: usize,
    pub bytes: u64,
}

impl TransferReport {
    fn new(mode: Mode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            objects: 0,
            skipped: 0,
            bytes: 0,
        }
    }

    fn record(&mut self, bytes: u64) {
        self.objects += 1;
        self.bytes += bytes;
    }
}

/// A local file paired with its key and request metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    /// Local path with forward slashes
    pub local: String,
    pub key: String,
    pub options: PutOptions,
}

impl UploadItem {
    /// Resolve the key and metadata for `local` under the normalized `target`
    pub fn resolve(config: &Config, target: &str, local: &str) -> Self {
        let key = to_key(target, local, &config.strip_prefix);

        let options = PutOptions {
            access: config.access.clone(),
            content_type: content_type_for(local, &config.content_type),
            content_encoding: config.content_encoding.resolve(local).map(str::to_string),
            cache_control: config.cache_control.resolve(local).map(str::to_string),
            encryption: config.encryption.clone(),
            storage_class: config.storage_class.clone(),
        };

        Self {
            local: local.to_string(),
            key,
            options,
        }
    }
}

/// Runs one upload or download against an object store
pub struct Transfer {
    config: Arc<Config>,
    store: Arc<dyn ObjectStore>,
}

impl Transfer {
    pub fn new(config: Arc<Config>, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Execute the configured mode
    pub async fn run(&self) -> Result<TransferReport> {
        if self.config.download {
            self.download().await
        } else {
            self.upload().await
        }
    }

    async fn upload(&self) -> Result<TransferReport> {
        let config = self.config.as_ref();
        let target = normalize_target(&config.target);

        info!(
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or_default(),
            bucket = %config.bucket,
            "Attempting to upload"
        );

        let matches = find_matches(&config.source, &config.exclude)
            .inspect_err(|e| error!(error = %e, "Could not match files"))?;

        let mut report = TransferReport::new(Mode::Upload, config.dry_run);

        for path in matches {
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "Skipping unreadable entry");
                    report.skipped += 1;
                    continue;
                }
            };

            if metadata.is_dir() {
                report.skipped += 1;
                continue;
            }

            let item = UploadItem::resolve(config, target, &path_to_slash(&path));

            info!(
                name = %item.local,
                bucket = %config.bucket,
                target = %item.key,
                content_type = %item.options.content_type,
                "Uploading file"
            );

            if config.dry_run {
                report.record(metadata.len());
                continue;
            }

            self.put(&path, &item).await?;
            report.record(metadata.len());
        }

        Ok(report)
    }

    async fn put(&self, path: &Path, item: &UploadItem) -> Result<()> {
        let bucket = &self.config.bucket;

        let file = tokio::fs::File::open(path).await.map_err(|e| {
            error!(error = %e, file = %item.local, "Problem opening file");
            Error::local_io(path, e)
        })?;

        self.store
            .put_object(bucket, &item.key, file, &item.options)
            .await
            .inspect_err(|e| {
                error!(
                    name = %item.local,
                    bucket = %bucket,
                    target = %item.key,
                    error = %e,
                    "Could not upload file"
                )
            })
    }

    async fn download(&self) -> Result<TransferReport> {
        let bucket = self.config.bucket.as_str();
        let target_dir = normalize_target_dir(normalize_target(&self.config.target));

        info!(bucket, dir = %target_dir, "Listing S3 directory");

        let listing = self
            .store
            .list_objects(bucket, &target_dir)
            .await
            .inspect_err(|e| {
                error!(error = %e, bucket, dir = %target_dir, "Cannot list S3 directory")
            })?;

        let mut report = TransferReport::new(Mode::Download, false);
        let target_dir: Arc<str> = Arc::from(target_dir);
        let mut tasks = JoinSet::new();

        for item in listing {
            if item.is_dir_marker() {
                debug!(bucket, key = %item.key, "Skipping directory marker");
                report.skipped += 1;
                continue;
            }

            info!(bucket, key = %item.key, "Getting S3 object");

            let store = Arc::clone(&self.store);
            let config = Arc::clone(&self.config);
            let target_dir = Arc::clone(&target_dir);
            tasks.spawn(async move {
                download_object(store.as_ref(), &config, &target_dir, &item.key).await
            });
        }

        // Completion order; the reduction below takes the first error in it.
        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            results.push(
                joined.unwrap_or_else(|e| Err(Error::General(format!("download task failed: {e}")))),
            );
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            error!(bucket, failed, total = results.len(), "Download finished with errors");
        }

        for written in results.into_iter().collect::<Result<Vec<u64>>>()? {
            report.record(written);
        }

        Ok(report)
    }
}

async fn download_object(
    store: &dyn ObjectStore,
    config: &Config,
    target_dir: &str,
    key: &str,
) -> Result<u64> {
    let bucket = config.bucket.as_str();

    let mut body = store
        .get_object(bucket, key)
        .await
        .inspect_err(|e| error!(error = %e, bucket, key, "Cannot get S3 object"))?;

    let local = PathBuf::from(to_local_path(target_dir, key, &config.strip_prefix));

    if let Some(parent) = local.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            error!(error = %e, dir = %parent.display(), "Problem creating directory");
            Error::local_io(parent, e)
        })?;
    }

    let mut file = tokio::fs::File::create(&local).await.map_err(|e| {
        error!(error = %e, file = %local.display(), "Problem opening file for writing");
        Error::local_io(&local, e)
    })?;

    let write_failed = |e: std::io::Error| {
        error!(error = %e, file = %local.display(), "Failed to write file");
        Error::local_io(&local, e)
    };

    let written = tokio::io::copy(&mut body, &mut file)
        .await
        .map_err(write_failed)?;
    file.flush().await.map_err(write_failed)?;

    debug!(bucket, key, file = %local.display(), bytes = written, "Downloaded object");
    Ok(written)
}
