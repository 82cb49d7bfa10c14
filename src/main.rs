use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use xml_structure_validator::cli::{Cli, OutputFormat, VerbosityLevel};
use xml_structure_validator::config::{Config, ConfigManager};
use xml_structure_validator::engine::{
    EngineConfig, ProgressCallback, ValidationEngine, ValidationPhase, ValidationProgress,
};
use xml_structure_validator::error_reporter::ErrorReporter;
use xml_structure_validator::file_discovery::FileDiscovery;
use xml_structure_validator::output::Output;
use xml_structure_validator::schema_loader::SchemaLoader;

const EXIT_USAGE: u8 = 2;

fn verbosity(config: &Config) -> VerbosityLevel {
    if config.output.quiet {
        VerbosityLevel::Quiet
    } else if config.output.verbose {
        VerbosityLevel::Verbose
    } else {
        VerbosityLevel::Normal
    }
}

fn progress_callback(reporter: Arc<ErrorReporter>) -> ProgressCallback {
    Arc::new(move |progress: ValidationProgress| {
        if progress.phase == ValidationPhase::Validation {
            reporter.report_progress(
                progress.completed,
                progress.total,
                progress.current_file.as_deref(),
            );
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    let config = match ConfigManager::load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            ErrorReporter::new(VerbosityLevel::Normal).report_config_error(&e);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let verbosity = verbosity(&config);
    let reporter = Arc::new(ErrorReporter::new(verbosity));

    let discovery = match FileDiscovery::new()
        .with_extensions(config.files.extensions.clone())
        .with_include_patterns(config.files.include_patterns.clone())
        .and_then(|d| d.with_exclude_patterns(config.files.exclude_patterns.clone()))
    {
        Ok(discovery) => discovery,
        Err(e) => {
            reporter.report_validation_error(&e);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let schema_loader = match &cli.schema {
        Some(schema) => SchemaLoader::with_schema(schema.clone()),
        None => SchemaLoader::from_hints(),
    };

    let engine = ValidationEngine::new(
        schema_loader,
        EngineConfig {
            max_concurrent_validations: config.validation.thread_count(),
            validation_timeout: config.validation.timeout(),
            fail_fast: config.validation.fail_fast,
            validator: config.validation.validator_options(),
        },
    );

    let show_progress =
        config.validation.show_progress && !cli.check && atty::is(atty::Stream::Stderr);
    let callback = show_progress.then(|| progress_callback(Arc::clone(&reporter)));

    let results = engine
        .validate_path(&cli.path, &discovery, callback)
        .await
        .with_context(|| format!("Failed to validate {}", cli.path.display()))?;

    reporter.report_discovery_errors(&results.discovery_errors);

    if !cli.check {
        let format: OutputFormat = config.output.format.into();
        let rendered = Output::new(format, verbosity).render(&results)?;
        print!("{}", rendered);
    }

    if results.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
