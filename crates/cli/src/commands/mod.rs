//! CLI definition and execution
//!
//! Every setting can be given as a flag or through the `PLUGIN_*`
//! environment variable a CI runner passes to a plugin step.

use std::sync::Arc;

use bucketsync_core::config::{DEFAULT_ACCESS, DEFAULT_REGION};
use bucketsync_core::{Config, Credentials, MetadataRules, Result, Transfer};
use bucketsync_s3::S3Client;
use clap::Parser;
use clap::builder::FalseyValueParser;
use tracing::error;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// bucketsync - upload build output to, or download a prefix from, an
/// S3-compatible bucket
#[derive(Parser, Debug)]
#[command(name = "bucketsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Custom endpoint for S3-compatible services
    #[arg(long, env = "PLUGIN_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Access key ID
    #[arg(long, env = "PLUGIN_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, env = "PLUGIN_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Role to assume when no access key is given
    #[arg(long, env = "PLUGIN_ASSUME_ROLE")]
    pub assume_role: Option<String>,

    /// Session name for the assumed role
    #[arg(long, env = "PLUGIN_ASSUME_ROLE_SESSION_NAME")]
    pub assume_role_session_name: Option<String>,

    /// Role assumed on top of the base credentials
    #[arg(long, env = "PLUGIN_USER_ROLE_ARN")]
    pub user_role_arn: Option<String>,

    /// Bucket name
    #[arg(long, env = "PLUGIN_BUCKET")]
    pub bucket: String,

    /// Bucket region
    #[arg(long, env = "PLUGIN_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Canned ACL for uploaded objects (private, public-read, ...)
    #[arg(long, env = "PLUGIN_ACL", default_value = DEFAULT_ACCESS)]
    pub acl: String,

    /// Glob selecting files to upload (supports *, ** and ?)
    #[arg(long, env = "PLUGIN_SOURCE", default_value = "")]
    pub source: String,

    /// Key prefix for uploads, prefix to download
    #[arg(long, env = "PLUGIN_TARGET", default_value = "")]
    pub target: String,

    /// Prefix removed from local paths before mapping to keys
    #[arg(long, env = "PLUGIN_STRIP_PREFIX", default_value = "")]
    pub strip_prefix: String,

    /// Globs excluded from the upload, comma separated
    #[arg(long, env = "PLUGIN_EXCLUDE", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Server-side encryption (AES256, aws:kms); empty disables
    #[arg(long, env = "PLUGIN_ENCRYPTION")]
    pub encryption: Option<String>,

    /// Storage class for uploaded objects
    #[arg(long, env = "PLUGIN_STORAGE_CLASS")]
    pub storage_class: Option<String>,

    /// Content type rules as a JSON object of regex to value
    #[arg(long, env = "PLUGIN_CONTENT_TYPE", default_value = "")]
    pub content_type: String,

    /// Content encoding rules as a JSON object of regex to value
    #[arg(long, env = "PLUGIN_CONTENT_ENCODING", default_value = "")]
    pub content_encoding: String,

    /// Cache-Control rules as a JSON object of regex to value
    #[arg(long, env = "PLUGIN_CACHE_CONTROL", default_value = "")]
    pub cache_control: String,

    /// Use path-style addressing (MinIO and other S3-compatible services)
    #[arg(long, env = "PLUGIN_PATH_STYLE", value_parser = FalseyValueParser::new())]
    pub path_style: bool,

    /// Download the target prefix instead of uploading
    #[arg(long, env = "PLUGIN_DOWNLOAD", value_parser = FalseyValueParser::new())]
    pub download: bool,

    /// Match and log files without uploading them
    #[arg(long, env = "PLUGIN_DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Suppress the run summary and informational logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Treat empty strings from the environment as unset
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

impl Cli {
    /// Build and validate the run configuration
    pub fn to_config(&self) -> Result<Config> {
        let config = Config {
            endpoint: non_empty(&self.endpoint),
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            access: self.acl.clone(),
            encryption: non_empty(&self.encryption),
            storage_class: non_empty(&self.storage_class),
            source: self.source.clone(),
            target: self.target.clone(),
            strip_prefix: self.strip_prefix.clone(),
            exclude: self
                .exclude
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
            content_type: MetadataRules::from_json(&self.content_type)?,
            content_encoding: MetadataRules::from_json(&self.content_encoding)?,
            cache_control: MetadataRules::from_json(&self.cache_control)?,
            path_style: self.path_style,
            download: self.download,
            dry_run: self.dry_run,
            credentials: Credentials {
                access_key: non_empty(&self.access_key),
                secret_key: non_empty(&self.secret_key),
                assume_role: non_empty(&self.assume_role),
                assume_role_session_name: non_empty(&self.assume_role_session_name),
                user_role_arn: non_empty(&self.user_role_arn),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Output settings for the formatter
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            json: self.json,
            no_color: self.no_color,
            quiet: self.quiet,
        }
    }
}

/// Execute the run and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(cli.output_config());

    let config = match cli.to_config() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            formatter.error(&e.to_string());
            return ExitCode::from(&e);
        }
    };

    let client = match S3Client::new(&config).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Could not instantiate session");
            formatter.error(&e.to_string());
            return ExitCode::from(&e);
        }
    };

    let transfer = Transfer::new(Arc::new(config), Arc::new(client));
    match transfer.run().await {
        Ok(report) => {
            formatter.report(&report);
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketsync_core::Error;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["bucketsync"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--bucket", "artifacts", "--source", "dist/**/*"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.access, "private");
        assert!(config.endpoint.is_none());
        assert!(config.exclude.is_empty());
        assert!(!config.download);
    }

    #[test]
    fn test_full_flag_set() {
        let cli = parse(&[
            "--bucket",
            "artifacts",
            "--source",
            "dist/**/*",
            "--target",
            "/assets",
            "--strip-prefix",
            "dist/",
            "--exclude",
            "dist/*.map,dist/tmp/*",
            "--encryption",
            "AES256",
            "--storage-class",
            "STANDARD_IA",
            "--content-type",
            r#"{"\\.svg$": "image/svg+xml"}"#,
            "--cache-control",
            r#"{".*": "max-age=60"}"#,
            "--endpoint",
            "http://localhost:9000",
            "--path-style",
            "--dry-run",
        ]);

        let config = cli.to_config().unwrap();
        assert_eq!(config.exclude, vec!["dist/*.map", "dist/tmp/*"]);
        assert_eq!(config.encryption.as_deref(), Some("AES256"));
        assert_eq!(config.storage_class.as_deref(), Some("STANDARD_IA"));
        assert_eq!(config.content_type.resolve("logo.svg"), Some("image/svg+xml"));
        assert_eq!(config.cache_control.resolve("index.html"), Some("max-age=60"));
        assert!(config.content_encoding.is_empty());
        assert!(config.path_style);
        assert!(config.dry_run);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let cli = parse(&[
            "--bucket",
            "artifacts",
            "--download",
            "--encryption",
            "",
            "--access-key",
            "",
        ]);
        let config = cli.to_config().unwrap();
        assert!(config.encryption.is_none());
        assert!(config.credentials.access_key.is_none());
    }

    #[test]
    fn test_invalid_rule_is_config_error() {
        let cli = parse(&[
            "--bucket",
            "artifacts",
            "--source",
            "dist/*",
            "--content-type",
            r#"{"(": "text/plain"}"#,
        ]);
        let err = cli.to_config().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(ExitCode::from(&err), ExitCode::UsageError);
    }

    #[test]
    fn test_upload_requires_source() {
        let cli = parse(&["--bucket", "artifacts"]);
        assert!(cli.to_config().is_err());
    }

    #[test]
    fn test_bucket_is_required() {
        let result = Cli::try_parse_from(["bucketsync", "--source", "dist/*"]);
        if std::env::var_os("PLUGIN_BUCKET").is_none() {
            assert!(result.is_err());
        }
    }
}
