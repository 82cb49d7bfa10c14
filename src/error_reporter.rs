use crate::cli::VerbosityLevel;
use crate::config::ConfigError;
use crate::error::ValidationError;
use std::path::Path;

/// Error reporter with configurable verbosity
///
/// Everything goes to stderr so that stdout only carries the rendered results.
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    pub fn with_timestamps(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Report an error with appropriate verbosity
    pub fn report_validation_error(&self, error: &ValidationError) {
        if let Some(formatted) = self.format_validation_error(error) {
            eprintln!("{}", formatted);
        }
    }

    /// Report a configuration error
    pub fn report_config_error(&self, error: &ConfigError) {
        eprintln!("{}", self.format_config_error(error));
    }

    /// Report entries that could not be read during discovery
    pub fn report_discovery_errors(&self, errors: &[String]) {
        if self.verbosity < VerbosityLevel::Verbose {
            return;
        }
        for error in errors {
            eprintln!("Skipped during discovery: {}", error);
        }
    }

    /// Report progress for long-running operations
    pub fn report_progress(&self, current: usize, total: usize, current_file: Option<&Path>) {
        if let Some(line) = self.format_progress(current, total, current_file) {
            eprint!("\r{}", line);
            if current == total {
                eprintln!();
            }
        }
    }

    /// `None` when the error is suppressed at this verbosity
    pub fn format_validation_error(&self, error: &ValidationError) -> Option<String> {
        match self.verbosity {
            VerbosityLevel::Quiet => self
                .is_critical_error(error)
                .then(|| format!("ERROR: {}", error)),
            VerbosityLevel::Normal => Some(self.format_error_normal(error)),
            VerbosityLevel::Verbose => Some(self.format_error_verbose(error)),
            VerbosityLevel::Debug => Some(self.format_error_debug(error)),
        }
    }

    pub fn format_config_error(&self, error: &ConfigError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("Config error: {}", error),
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                format!("Configuration Error: {}\n{}", error, config_help(error))
            }
            VerbosityLevel::Debug => format!(
                "Configuration Error: {}\nDebug: {:?}\n{}",
                error,
                error,
                config_help(error)
            ),
        }
    }

    fn format_progress(
        &self,
        current: usize,
        total: usize,
        current_file: Option<&Path>,
    ) -> Option<String> {
        if self.verbosity == VerbosityLevel::Quiet || total == 0 {
            return None;
        }

        let percentage = (current as f64 / total as f64 * 100.0) as u32;
        let mut line = format!("Progress: {}/{} ({}%)", current, total, percentage);
        if self.verbosity >= VerbosityLevel::Verbose
            && let Some(file) = current_file
        {
            line.push_str(&format!(" - {}", file.display()));
        }
        Some(line)
    }

    fn is_critical_error(&self, error: &ValidationError) -> bool {
        matches!(
            error,
            ValidationError::Config(_)
                | ValidationError::Concurrency { .. }
                | ValidationError::ResourceExhaustion { .. }
        )
    }

    fn format_error_normal(&self, error: &ValidationError) -> String {
        let timestamp = if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        };

        format!("{}{}", timestamp, error)
    }

    fn format_error_verbose(&self, error: &ValidationError) -> String {
        let mut output = self.format_error_normal(error);

        match error {
            ValidationError::SchemaNotFound { path } => {
                output.push_str(&format!(
                    "\nSuggestion: Check that the schema file exists: {}",
                    path.display()
                ));
            }
            ValidationError::SchemaUrlNotFound { .. } => {
                output.push_str(
                    "\nSuggestion: Pass --schema or add xsi:noNamespaceSchemaLocation to the document",
                );
            }
            ValidationError::RemoteSchema { .. } => {
                output.push_str("\nSuggestion: Download the schema and pass it with --schema");
            }
            ValidationError::ResourceExhaustion { .. } => {
                output.push_str("\nSuggestion: Raise max_depth or nodes_limit in the configuration");
            }
            _ => {}
        }

        output
    }

    fn format_error_debug(&self, error: &ValidationError) -> String {
        let mut output = self.format_error_verbose(error);
        output.push_str(&format!("\nDebug Info: {:?}", error));

        output.push_str("\nError Chain:");
        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }
}

fn config_help(error: &ConfigError) -> &'static str {
    match error {
        ConfigError::Io(_) => "Check that the configuration file exists and is readable",
        ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
            "Check the configuration file syntax (TOML/JSON format expected)"
        }
        ConfigError::UnsupportedFormat(_) => "Use a .toml or .json configuration file",
        ConfigError::Environment(_) => "Fix or unset the XML_STRUCTURE_* environment variable",
        ConfigError::Validation(_) => "Fix the offending value in the file, environment, or flags",
    }
}
