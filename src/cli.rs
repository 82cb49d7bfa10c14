use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Output format selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Per-file lines with diagnostics
    #[default]
    Human,
    /// Machine-readable results
    Json,
    /// Totals only
    Summary,
}

/// Structural XML validation against XSD element declarations
#[derive(Parser, Debug, Clone)]
#[command(name = "xml-structure-validator")]
#[command(
    about = "Check XML files for well-formedness and for elements declared in an XSD schema"
)]
#[command(version)]
#[command(after_help = "EXAMPLES:
  xml-structure-validator --schema book.xsd chapters/
  xml-structure-validator --format json --extensions xml,cmdi corpus/
  xml-structure-validator --check --schema book.xsd book.xml")]
pub struct Cli {
    /// Path to scan for XML files (directory or file)
    #[arg(help = "Directory or file to validate")]
    pub path: PathBuf,

    /// Schema applied to every file; without it each file's schema location hint is used
    #[arg(short = 's', long = "schema")]
    pub schema: Option<PathBuf>,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// File extensions to process (comma-separated)
    #[arg(
        short = 'e',
        long = "extensions",
        default_value = "xml",
        help = "File extensions to process (e.g., 'xml,cmdi')"
    )]
    pub extensions: String,

    /// Number of concurrent validations
    #[arg(short = 't', long = "threads", help = "Number of concurrent validations")]
    pub threads: Option<usize>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = clap::ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Show progress indicators
    #[arg(long = "progress")]
    pub progress: bool,

    /// Stop scheduling files after the first invalid one
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Treat file contents as entity-escaped markup (&lt;root&gt;)
    #[arg(long = "unescape")]
    pub unescape: bool,

    /// Deepest element nesting accepted (unlimited by default)
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,

    /// Print nothing; report validity through the exit code only
    #[arg(long = "check", conflicts_with_all = ["verbose", "output_format"])]
    pub check: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.path.exists() {
            return Err(format!("Path does not exist: {}", self.path.display()));
        }
        if let Some(schema) = &self.schema
            && !schema.is_file()
        {
            return Err(format!("Schema file does not exist: {}", schema.display()));
        }
        if let Some(threads) = self.threads
            && threads == 0
        {
            return Err("Number of threads must be greater than 0".to_string());
        }
        Ok(())
    }
}
