//! Output formatter for human-readable and JSON output

use bucketsync_core::{Mode, TransferReport};
use serde::Serialize;

use super::OutputConfig;

/// JSON form of a successful run
#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    status: &'static str,
    #[serde(flatten)]
    report: &'a TransferReport,
    bytes_human: String,
}

/// Formatter for CLI output
///
/// When JSON mode is enabled, all output is strict JSON without colors.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Print the summary of a successful run
    pub fn report(&self, report: &TransferReport) {
        if self.config.quiet {
            return;
        }

        if self.config.json {
            let output = ReportOutput {
                status: "success",
                report,
                bytes_human: format_bytes(report.bytes),
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Error serializing output: {e}"),
            }
        } else if self.colors_enabled() {
            println!("\x1b[32m✓\x1b[0m {}", describe(report));
        } else {
            println!("✓ {}", describe(report));
        }
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({
                "status": "error",
                "error": message
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else if self.colors_enabled() {
            eprintln!("\x1b[31m✗\x1b[0m {message}");
        } else {
            eprintln!("✗ {message}");
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// One-line human summary of a run
pub(crate) fn describe(report: &TransferReport) -> String {
    let verb = match (report.mode, report.dry_run) {
        (Mode::Upload, true) => "Would upload",
        (Mode::Upload, false) => "Uploaded",
        (Mode::Download, _) => "Downloaded",
    };

    let mut line = format!(
        "{verb} {} file(s) ({})",
        report.objects,
        format_bytes(report.bytes)
    );
    if report.skipped > 0 {
        line.push_str(&format!(", skipped {}", report.skipped));
    }
    line
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(mode: Mode, dry_run: bool, skipped: usize) -> TransferReport {
        TransferReport {
            mode,
            dry_run,
            objects: 3,
            skipped,
            bytes: 2048,
        }
    }

    #[test]
    fn test_formatter_default() {
        let formatter = Formatter::default();
        assert!(!formatter.is_json());
        assert!(formatter.colors_enabled());
    }

    #[test]
    fn test_formatter_json_mode() {
        let config = OutputConfig {
            json: true,
            ..Default::default()
        };
        let formatter = Formatter::new(config);
        assert!(formatter.is_json());
        assert!(!formatter.colors_enabled()); // Colors disabled in JSON mode
    }

    #[test]
    fn test_formatter_no_color() {
        let config = OutputConfig {
            no_color: true,
            ..Default::default()
        };
        let formatter = Formatter::new(config);
        assert!(!formatter.colors_enabled());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            describe(&report(Mode::Upload, false, 0)),
            "Uploaded 3 file(s) (2 KiB)"
        );
        assert_eq!(
            describe(&report(Mode::Upload, true, 1)),
            "Would upload 3 file(s) (2 KiB), skipped 1"
        );
        assert_eq!(
            describe(&report(Mode::Download, false, 0)),
            "Downloaded 3 file(s) (2 KiB)"
        );
    }

    #[test]
    fn test_report_json_shape() {
        let report = report(Mode::Download, false, 2);
        let output = ReportOutput {
            status: "success",
            report: &report,
            bytes_human: format_bytes(report.bytes),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["mode"], "download");
        assert_eq!(value["objects"], 3);
        assert_eq!(value["skipped"], 2);
        assert_eq!(value["bytes"], 2048);
        assert_eq!(value["bytes_human"], "2 KiB");
    }
}
