//! Error types for bucketsync-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bucketsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bucketsync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration: missing setting, bad metadata rule, bad endpoint
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid glob pattern or an unreadable entry during expansion
    #[error("Glob error: {0}")]
    Glob(String),

    /// Could not establish an authenticated client
    #[error("Client construction failed: {0}")]
    Client(String),

    /// Bucket listing failed
    #[error("Cannot list s3://{bucket}/{prefix}: {message}")]
    List {
        bucket: String,
        prefix: String,
        message: String,
    },

    /// A single get or put failed
    #[error("Transfer of s3://{bucket}/{key} failed: {message}")]
    Transfer {
        bucket: String,
        key: String,
        message: String,
    },

    /// Local file could not be opened, created or written
    #[error("IO error on {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Wrap an IO error with the local path it happened on
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::Glob(_) => 2,
            Error::List { .. } | Error::Transfer { .. } => 3,
            Error::Client(_) => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Glob("test".into()).exit_code(), 2);
        assert_eq!(Error::Client("test".into()).exit_code(), 4);
        assert_eq!(
            Error::List {
                bucket: "b".into(),
                prefix: "p".into(),
                message: "denied".into(),
            }
            .exit_code(),
            3
        );
        assert_eq!(
            Error::Transfer {
                bucket: "b".into(),
                key: "k".into(),
                message: "reset".into(),
            }
            .exit_code(),
            3
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(Error::local_io("a.txt", io).exit_code(), 1);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::Transfer {
            bucket: "artifacts".into(),
            key: "assets/app.js".into(),
            message: "connection reset".into(),
        };
        assert_eq!(
            err.to_string(),
            "Transfer of s3://artifacts/assets/app.js failed: connection reset"
        );

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::local_io("dist/app.js", io);
        assert_eq!(err.to_string(), "IO error on dist/app.js: denied");
    }
}
