//! Output and Reporting
//!
//! Renders batch validation results as human-readable text, JSON, or a
//! one-line summary.

use serde_json::json;
use std::time::Duration;

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::engine::{FileValidationResult, ValidationResults, ValidationStatus};
use crate::error::Result;

/// Output formatter for validation results
pub struct Output {
    format: OutputFormat,
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbosity: VerbosityLevel) -> Self {
        Self {
            format,
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    /// Render `results` in the configured format
    pub fn render(&self, results: &ValidationResults) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(self.format_human(results)),
            OutputFormat::Json => self.format_json(results),
            OutputFormat::Summary => Ok(self.format_summary_line(results)),
        }
    }

    pub fn format_human(&self, results: &ValidationResults) -> String {
        let mut output = String::new();

        if self.verbosity == VerbosityLevel::Quiet {
            if results.has_errors() {
                output.push_str(&format!(
                    "Errors: {} Invalid: {}\n",
                    results.error_files, results.invalid_files
                ));
            }
            return output;
        }

        for file_result in &results.file_results {
            output.push_str(&self.format_file_result(file_result));
            output.push('\n');
        }
        if !results.file_results.is_empty() {
            output.push('\n');
        }
        output.push_str(&self.format_summary(results));

        output
    }

    pub fn format_file_result(&self, result: &FileValidationResult) -> String {
        let path_display = result.path.display();
        let duration_str = format_duration(result.duration);

        let mut output = match (&result.status, &result.outcome) {
            (ValidationStatus::Error { message }, _) => format!(
                "{}  {} ({}) - {}",
                self.colorize("⚠ ERROR", "33"),
                path_display,
                duration_str,
                message
            ),
            (ValidationStatus::Skipped { reason }, _) => format!(
                "{}  {} - {}",
                self.colorize("- SKIPPED", "36"),
                path_display,
                reason
            ),
            (status, Some(outcome)) => {
                let color = match status {
                    ValidationStatus::Valid => "32",
                    ValidationStatus::ValidWithWarnings { .. } => "33",
                    _ => "31",
                };
                format!(
                    "{}  {} ({})",
                    self.colorize(&outcome.summary(), color),
                    path_display,
                    duration_str
                )
            }
            (status, None) => format!("{:?}  {}", status, path_display),
        };

        if let Some(outcome) = &result.outcome {
            for error in outcome.errors() {
                output.push_str(&format!("\n    {} {}", self.colorize("error:", "31"), error));
            }
            if self.verbosity >= VerbosityLevel::Verbose {
                for warning in outcome.warnings() {
                    output.push_str(&format!(
                        "\n    {} {}",
                        self.colorize("warning:", "33"),
                        warning
                    ));
                }
            }
        }

        if self.verbosity == VerbosityLevel::Debug
            && let Some(schema) = &result.schema
        {
            output.push_str(&format!("\n    schema: {}", schema.display()));
        }

        output
    }

    fn format_summary(&self, results: &ValidationResults) -> String {
        let mut output = String::new();
        output.push_str("Validation Summary:\n");
        output.push_str(&format!("  Total files: {}\n", results.total_files));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Valid:", "32"),
            results.valid_files
        ));

        if results.invalid_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Invalid:", "31"),
                results.invalid_files
            ));
        }
        if results.error_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Errors:", "33"),
                results.error_files
            ));
        }
        if results.skipped_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Skipped:", "36"),
                results.skipped_files
            ));
        }
        if results.total_warnings > 0 {
            output.push_str(&format!("  Warnings: {}\n", results.total_warnings));
        }

        output.push_str(&format!("  Success rate: {:.1}%\n", results.success_rate()));
        output.push_str(&format!(
            "  Duration: {}\n",
            format_duration(results.total_duration)
        ));

        output
    }

    pub fn format_json(&self, results: &ValidationResults) -> Result<String> {
        let files: Vec<_> = results
            .file_results
            .iter()
            .map(|result| {
                json!({
                    "path": result.path,
                    "status": result.status,
                    "schema": result.schema,
                    "duration_ms": result.duration.as_millis() as u64,
                    "summary": result.outcome.as_ref().map(|o| o.summary()),
                    "outcome": result.outcome,
                })
            })
            .collect();

        let report = json!({
            "summary": {
                "total_files": results.total_files,
                "valid_files": results.valid_files,
                "invalid_files": results.invalid_files,
                "error_files": results.error_files,
                "skipped_files": results.skipped_files,
                "total_warnings": results.total_warnings,
                "success_rate": results.success_rate(),
                "duration_ms": results.total_duration.as_millis() as u64,
            },
            "files": files,
        });

        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn format_summary_line(&self, results: &ValidationResults) -> String {
        format!(
            "{} files: {} valid, {} invalid, {} errors, {} skipped, {} warnings ({})\n",
            results.total_files,
            results.valid_files,
            results.invalid_files,
            results.error_files,
            results.skipped_files,
            results.total_warnings,
            format_duration(results.total_duration)
        )
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
