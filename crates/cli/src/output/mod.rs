//! Output formatting utilities
//!
//! The run summary goes to stdout in human-readable or JSON form; errors go
//! to stderr. Logs are handled separately by tracing.

mod formatter;

pub use formatter::Formatter;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Suppress the run summary
    pub quiet: bool,
}
