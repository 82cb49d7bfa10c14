//! Layered configuration.
//!
//! Each layer starts from the result of the previous one: built-in defaults,
//! then a TOML or JSON file, then `XML_STRUCTURE_*` environment variables,
//! then command-line flags. Every section knows how to take a layer on top of
//! itself and how to check its own values.

use crate::cli::{Cli, OutputFormat};
use crate::document::ParseLimits;
use crate::validator::ValidatorOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const APP_NAME: &str = "xml-structure-validator";
const ENV_PREFIX: &str = "XML_STRUCTURE";
const MAX_THREADS: usize = 1000;

/// Trait for abstracting environment variable access
#[cfg_attr(test, mockall::automock)]
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub output: OutputConfig,
    pub files: FileConfig,
}

/// How documents are validated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Concurrent validations; the number of CPUs when unset
    pub threads: Option<usize>,
    /// Stop scheduling files after the first invalid one
    pub fail_fast: bool,
    pub show_progress: bool,
    /// Deepest element nesting accepted; unlimited when unset
    pub max_depth: Option<usize>,
    /// Maximum number of nodes per parsed document
    pub nodes_limit: u32,
    pub allow_dtd: bool,
    /// Decode entity-escaped markup before parsing
    pub unescape_input: bool,
    /// Per-file validation timeout in seconds
    pub timeout_seconds: u64,
}

/// How results are rendered
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormatConfig,
    pub verbose: bool,
    pub quiet: bool,
}

/// Which files are picked up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub extensions: Vec<String>,
    /// Glob patterns a file must match
    pub include_patterns: Vec<String>,
    /// Glob patterns that drop a file
    pub exclude_patterns: Vec<String>,
}

/// Serializable mirror of [`OutputFormat`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatConfig {
    #[default]
    Human,
    Json,
    Summary,
}

impl FromStr for OutputFormatConfig {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "summary" => Ok(Self::Summary),
            other => Err(format!("unknown output format \"{}\"", other)),
        }
    }
}

impl From<OutputFormat> for OutputFormatConfig {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => Self::Human,
            OutputFormat::Json => Self::Json,
            OutputFormat::Summary => Self::Summary,
        }
    }
}

impl From<OutputFormatConfig> for OutputFormat {
    fn from(format: OutputFormatConfig) -> Self {
        match format {
            OutputFormatConfig::Human => Self::Human,
            OutputFormatConfig::Json => Self::Json,
            OutputFormatConfig::Summary => Self::Summary,
        }
    }
}

/// Typed access to `XML_STRUCTURE_*` variables
struct EnvReader<'a, E: EnvProvider> {
    env: &'a E,
}

fn env_key(name: &str) -> String {
    format!("{ENV_PREFIX}_{name}")
}

impl<E: EnvProvider> EnvReader<'_, E> {
    fn value<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        let key = env_key(name);
        let Some(raw) = self.env.get(&key) else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, raw)))
    }

    fn list(&self, name: &str) -> Option<Vec<String>> {
        self.env.get(&env_key(name)).map(|raw| split_list(&raw))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let core = ValidatorOptions::default();
        Self {
            threads: None,
            fail_fast: false,
            show_progress: false,
            max_depth: core.max_depth,
            nodes_limit: core.parse_limits.nodes_limit,
            allow_dtd: core.parse_limits.allow_dtd,
            unescape_input: core.unescape_input,
            timeout_seconds: 30,
        }
    }
}

impl ValidationConfig {
    /// Options for the validation core
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            max_depth: self.max_depth,
            parse_limits: ParseLimits {
                allow_dtd: self.allow_dtd,
                nodes_limit: self.nodes_limit,
            },
            unescape_input: self.unescape_input,
        }
    }

    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn apply_env<E: EnvProvider>(&mut self, env: &EnvReader<'_, E>) -> Result<()> {
        if let Some(threads) = env.value("THREADS")? {
            self.threads = Some(threads);
        }
        if let Some(depth) = env.value("MAX_DEPTH")? {
            self.max_depth = Some(depth);
        }
        self.fail_fast = env.value("FAIL_FAST")?.unwrap_or(self.fail_fast);
        self.nodes_limit = env.value("NODES_LIMIT")?.unwrap_or(self.nodes_limit);
        self.allow_dtd = env.value("ALLOW_DTD")?.unwrap_or(self.allow_dtd);
        self.unescape_input = env.value("UNESCAPE")?.unwrap_or(self.unescape_input);
        self.timeout_seconds = env.value("TIMEOUT")?.unwrap_or(self.timeout_seconds);
        Ok(())
    }

    /// Flags only switch settings on; an absent flag keeps the earlier layer.
    fn apply_cli(&mut self, cli: &Cli) {
        self.threads = cli.threads.or(self.threads);
        self.max_depth = cli.max_depth.or(self.max_depth);
        self.fail_fast |= cli.fail_fast;
        self.show_progress |= cli.progress;
        self.unescape_input |= cli.unescape;
    }

    fn check(&self) -> Result<()> {
        match self.threads {
            Some(0) => return Err(invalid("Number of threads must be greater than 0")),
            Some(n) if n > MAX_THREADS => {
                return Err(invalid(format!(
                    "Number of threads cannot exceed {}",
                    MAX_THREADS
                )));
            }
            _ => {}
        }
        if self.max_depth == Some(0) {
            return Err(invalid("Maximum depth must be greater than 0"));
        }
        if self.nodes_limit == 0 {
            return Err(invalid("Nodes limit must be greater than 0"));
        }
        if self.timeout_seconds == 0 {
            return Err(invalid("Timeout must be greater than 0"));
        }
        Ok(())
    }
}

impl OutputConfig {
    /// Take verbose/quiet switches from a later layer. Switching one mode on
    /// switches the other off.
    pub fn switch_verbosity(&mut self, verbose: Option<bool>, quiet: Option<bool>) {
        if let Some(verbose) = verbose {
            self.verbose = verbose;
            self.quiet &= !verbose;
        }
        if let Some(quiet) = quiet {
            self.quiet = quiet;
            self.verbose &= !quiet;
        }
    }

    fn apply_env<E: EnvProvider>(&mut self, env: &EnvReader<'_, E>) -> Result<()> {
        let verbose: Option<bool> = env.value("VERBOSE")?;
        let quiet: Option<bool> = env.value("QUIET")?;
        if verbose == Some(true) && quiet == Some(true) {
            return Err(ConfigError::Environment(format!(
                "{} and {} cannot both be true",
                env_key("VERBOSE"),
                env_key("QUIET")
            )));
        }
        self.switch_verbosity(verbose, quiet);

        if let Some(format) = env.value("FORMAT")? {
            self.format = format;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if cli.output_format != OutputFormat::default() {
            self.format = cli.output_format.into();
        }
        self.switch_verbosity(
            cli.verbose.then_some(true),
            (cli.quiet || cli.check).then_some(true),
        );
    }

    fn check(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(invalid("Cannot enable both verbose and quiet modes"));
        }
        Ok(())
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_patterns: vec![],
            exclude_patterns: vec![],
        }
    }
}

impl FileConfig {
    fn apply_env<E: EnvProvider>(&mut self, env: &EnvReader<'_, E>) {
        if let Some(extensions) = env.list("EXTENSIONS") {
            self.extensions = extensions;
        }
        if let Some(include) = env.list("INCLUDE") {
            self.include_patterns = include;
        }
        if let Some(exclude) = env.list("EXCLUDE") {
            self.exclude_patterns = exclude;
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        let extensions = cli.get_extensions();
        if extensions != Self::default().extensions {
            self.extensions = extensions;
        }
        if !cli.include_patterns.is_empty() {
            self.include_patterns.clone_from(&cli.include_patterns);
        }
        if !cli.exclude_patterns.is_empty() {
            self.exclude_patterns.clone_from(&cli.exclude_patterns);
        }
    }

    fn check(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(invalid("At least one file extension must be specified"));
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|ext| ext.contains(['/', '\\', '.']))
        {
            return Err(invalid(format!("Invalid file extension: {}", ext)));
        }
        Ok(())
    }
}

/// Builds the effective [`Config`] from every layer
pub struct ConfigManager;

impl ConfigManager {
    /// Resolve defaults, file, environment, and flags, then check the result
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let config = match &cli.config {
            Some(path) => Self::load_from_file(path).await?,
            None => Self::find_config_file().await?.unwrap_or_default(),
        };

        let config = Self::apply_environment_overrides(config)?;
        let config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Read a TOML or JSON file; keys it leaves out keep their defaults
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => toml::from_str::<Config>(&content)
                .or_else(|_| serde_json::from_str(&content))
                .map_err(ConfigError::from),
        }
    }

    /// First config file found in the working directory, then in the user's
    /// config directory
    pub async fn find_config_file() -> Result<Option<Config>> {
        for path in Self::config_candidates() {
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Self::load_from_file(&path).await.map(Some);
            }
        }
        Ok(None)
    }

    fn config_candidates() -> Vec<PathBuf> {
        let names = [
            format!("{APP_NAME}.toml"),
            format!("{APP_NAME}.json"),
            format!(".{APP_NAME}.toml"),
            format!(".{APP_NAME}.json"),
        ];
        std::iter::once(PathBuf::new())
            .chain(dirs::config_dir().map(|dir| dir.join(APP_NAME)))
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .collect()
    }

    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        let reader = EnvReader { env };
        config.validation.apply_env(&reader)?;
        config.output.apply_env(&reader)?;
        config.files.apply_env(&reader);
        Ok(config)
    }

    /// Command-line flags take precedence over every other layer
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        config.validation.apply_cli(cli);
        config.output.apply_cli(cli);
        config.files.apply_cli(cli);
        config
    }

    pub fn validate_config(config: &Config) -> Result<()> {
        config.validation.check()?;
        config.output.check()?;
        config.files.check()
    }
}
