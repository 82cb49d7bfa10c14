//! Batch Validation Engine
//!
//! Validates every discovered XML file against its schema:
//! - **Async I/O**: file discovery and reading documents with `tokio::fs`
//! - **Blocking pool**: the structural validator runs under `spawn_blocking`
//! - **Bounded concurrency**: a semaphore caps validations in flight
//!
//! Each file is an independent call into the validation core; nothing learned
//! from one file is reused for another.

use futures::future::join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{Result, ValidationError};
use crate::file_discovery::FileDiscovery;
use crate::outcome::ValidationOutcome;
use crate::schema_loader::SchemaLoader;
use crate::validator::{StructuralValidator, ValidatorOptions};

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Number of concurrent validations
    pub max_concurrent_validations: usize,
    /// Timeout for a single file
    ///
    /// A timeout abandons the file's result but does not cancel the work.
    /// Validation already running on the blocking pool finishes in the
    /// background and holds its concurrency slot until it returns.
    pub validation_timeout: Duration,
    /// Skip files not yet started once one file is invalid
    pub fail_fast: bool,
    /// Options handed to the validation core
    pub validator: ValidatorOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_validations: num_cpus::get(),
            validation_timeout: Duration::from_secs(30),
            fail_fast: false,
            validator: ValidatorOptions::default(),
        }
    }
}

/// Status of a single file validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationStatus {
    /// No errors and no warnings
    Valid,
    /// No errors, some warnings
    ValidWithWarnings { warning_count: usize },
    /// At least one error
    Invalid { error_count: usize },
    /// The file could not be validated at all
    Error { message: String },
    /// The file was not validated (no usable schema, or fail-fast)
    Skipped { reason: String },
}

impl ValidationStatus {
    fn from_outcome(outcome: &ValidationOutcome) -> Self {
        if !outcome.is_valid() {
            ValidationStatus::Invalid {
                error_count: outcome.errors().len(),
            }
        } else if outcome.has_warnings() {
            ValidationStatus::ValidWithWarnings {
                warning_count: outcome.warnings().len(),
            }
        } else {
            ValidationStatus::Valid
        }
    }

    /// Valid, with or without warnings
    pub fn is_valid(&self) -> bool {
        matches!(
            self,
            ValidationStatus::Valid | ValidationStatus::ValidWithWarnings { .. }
        )
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationStatus::Invalid { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationStatus::Error { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ValidationStatus::Skipped { .. })
    }
}

/// Result of validating a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileValidationResult {
    pub path: PathBuf,
    pub status: ValidationStatus,
    /// Schema the file was checked against
    pub schema: Option<PathBuf>,
    pub duration: Duration,
    /// Full diagnostics when the validator ran
    pub outcome: Option<ValidationOutcome>,
}

impl FileValidationResult {
    pub fn validated(
        path: PathBuf,
        schema: PathBuf,
        outcome: ValidationOutcome,
        duration: Duration,
    ) -> Self {
        Self {
            path,
            status: ValidationStatus::from_outcome(&outcome),
            schema: Some(schema),
            duration,
            outcome: Some(outcome),
        }
    }

    pub fn error(path: PathBuf, error: ValidationError, duration: Duration) -> Self {
        Self {
            path,
            status: ValidationStatus::Error {
                message: error.to_string(),
            },
            schema: None,
            duration,
            outcome: None,
        }
    }

    pub fn skipped(path: PathBuf, reason: String, duration: Duration) -> Self {
        Self {
            path,
            status: ValidationStatus::Skipped { reason },
            schema: None,
            duration,
            outcome: None,
        }
    }
}

/// Progress update for validation
#[derive(Debug, Clone)]
pub struct ValidationProgress {
    pub current_file: Option<PathBuf>,
    pub completed: usize,
    pub total: usize,
    pub phase: ValidationPhase,
}

/// Phase of validation process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    Discovery,
    Validation,
    Aggregation,
    Complete,
}

/// Progress callback type for validation updates
pub type ProgressCallback = Arc<dyn Fn(ValidationProgress) + Send + Sync>;

/// Aggregated results of validating multiple files
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResults {
    pub total_files: usize,
    pub valid_files: usize,
    pub invalid_files: usize,
    pub error_files: usize,
    pub skipped_files: usize,
    /// Warnings across all validated files
    pub total_warnings: usize,
    /// Wall-clock duration of the whole run
    pub total_duration: Duration,
    pub file_results: Vec<FileValidationResult>,
    /// Entries that could not be inspected during discovery
    pub discovery_errors: Vec<String>,
}

impl ValidationResults {
    /// Aggregate individual file results into summary
    pub fn aggregate(file_results: Vec<FileValidationResult>, total_duration: Duration) -> Self {
        let mut valid_files = 0;
        let mut invalid_files = 0;
        let mut error_files = 0;
        let mut skipped_files = 0;
        let mut total_warnings = 0;

        for result in &file_results {
            match result.status {
                ValidationStatus::Valid | ValidationStatus::ValidWithWarnings { .. } => {
                    valid_files += 1
                }
                ValidationStatus::Invalid { .. } => invalid_files += 1,
                ValidationStatus::Error { .. } => error_files += 1,
                ValidationStatus::Skipped { .. } => skipped_files += 1,
            }
            if let Some(outcome) = &result.outcome {
                total_warnings += outcome.warnings().len();
            }
        }

        Self {
            total_files: file_results.len(),
            valid_files,
            invalid_files,
            error_files,
            skipped_files,
            total_warnings,
            total_duration,
            file_results,
            discovery_errors: Vec::new(),
        }
    }

    /// Check if all files validated successfully
    pub fn all_valid(&self) -> bool {
        self.valid_files == self.total_files && self.total_files > 0
    }

    /// Check if any files were invalid or failed
    pub fn has_errors(&self) -> bool {
        self.error_files > 0 || self.invalid_files > 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.valid_files as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Concurrent validation of many XML files
pub struct ValidationEngine {
    schema_loader: Arc<SchemaLoader>,
    validator: Arc<StructuralValidator>,
    config: EngineConfig,
}

impl ValidationEngine {
    pub fn new(schema_loader: SchemaLoader, config: EngineConfig) -> Self {
        Self {
            schema_loader: Arc::new(schema_loader),
            validator: Arc::new(StructuralValidator::new(config.validator)),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate XML files at a path (directory or file)
    pub async fn validate_path(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<ValidationResults> {
        let start = Instant::now();

        if let Some(ref callback) = progress_callback {
            callback(ValidationProgress {
                current_file: None,
                completed: 0,
                total: 0,
                phase: ValidationPhase::Discovery,
            });
        }

        let discovery = file_discovery.discover(path).await?;
        let discovery_errors = discovery.errors.iter().map(ToString::to_string).collect();
        let results = self
            .validate_files(discovery.files, progress_callback.clone())
            .await?;

        if let Some(ref callback) = progress_callback {
            callback(ValidationProgress {
                current_file: None,
                completed: results.len(),
                total: results.len(),
                phase: ValidationPhase::Aggregation,
            });
        }

        let mut final_results = ValidationResults::aggregate(results, start.elapsed());
        final_results.discovery_errors = discovery_errors;

        if let Some(ref callback) = progress_callback {
            callback(ValidationProgress {
                current_file: None,
                completed: final_results.total_files,
                total: final_results.total_files,
                phase: ValidationPhase::Complete,
            });
        }

        Ok(final_results)
    }

    /// Validate a list of files concurrently, keeping the input order
    pub async fn validate_files(
        &self,
        files: Vec<PathBuf>,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Vec<FileValidationResult>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let total_files = files.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicBool::new(false));
        let semaphore = Arc::new(Semaphore::new(
            self.config.max_concurrent_validations.max(1),
        ));

        let tasks: Vec<_> = files
            .into_iter()
            .map(|file_path| {
                let schema_loader = Arc::clone(&self.schema_loader);
                let validator = Arc::clone(&self.validator);
                let semaphore = Arc::clone(&semaphore);
                let completed = Arc::clone(&completed);
                let failed = Arc::clone(&failed);
                let progress_callback = progress_callback.clone();
                let timeout = self.config.validation_timeout;
                let fail_fast = self.config.fail_fast;

                tokio::spawn(async move {
                    // Shared with the blocking task; the slot frees once both are done
                    let permit = Arc::new(semaphore.acquire_owned().await.map_err(|_| {
                        ValidationError::Concurrency {
                            details: "validation semaphore closed".to_string(),
                        }
                    })?);

                    let result = if fail_fast && failed.load(Ordering::SeqCst) {
                        FileValidationResult::skipped(
                            file_path.clone(),
                            "Skipped after an earlier file failed (fail-fast)".to_string(),
                            Duration::ZERO,
                        )
                    } else {
                        match tokio::time::timeout(
                            timeout,
                            Self::validate_file_internal(
                                file_path.clone(),
                                schema_loader,
                                validator,
                                Some(Arc::clone(&permit)),
                            ),
                        )
                        .await
                        {
                            Ok(result) => result,
                            Err(_) => FileValidationResult::error(
                                file_path.clone(),
                                ValidationError::ResourceExhaustion {
                                    resource: "time".to_string(),
                                    details: format!("validation timeout after {:?}", timeout),
                                },
                                timeout,
                            ),
                        }
                    };

                    if result.status.is_invalid() || result.status.is_error() {
                        failed.store(true, Ordering::SeqCst);
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = progress_callback {
                        callback(ValidationProgress {
                            current_file: Some(file_path),
                            completed: done,
                            total: total_files,
                            phase: ValidationPhase::Validation,
                        });
                    }

                    Ok::<FileValidationResult, ValidationError>(result)
                })
            })
            .collect();

        let mut file_results = Vec::with_capacity(total_files);
        for joined in join_all(tasks).await {
            let result = joined.map_err(|e| ValidationError::Concurrency {
                details: format!("Task join error: {}", e),
            })?;
            file_results.push(result?);
        }

        Ok(file_results)
    }

    /// Validate a single file
    pub async fn validate_file(&self, file_path: &Path) -> FileValidationResult {
        Self::validate_file_internal(
            file_path.to_path_buf(),
            Arc::clone(&self.schema_loader),
            Arc::clone(&self.validator),
            None,
        )
        .await
    }

    /// A clone of `permit` moves into the blocking task, so the slot stays
    /// taken for as long as validation runs, even after the caller stopped
    /// waiting.
    async fn validate_file_internal(
        file_path: PathBuf,
        schema_loader: Arc<SchemaLoader>,
        validator: Arc<StructuralValidator>,
        permit: Option<Arc<OwnedSemaphorePermit>>,
    ) -> FileValidationResult {
        let start_time = Instant::now();

        let xml = match tokio::fs::read_to_string(&file_path).await {
            Ok(xml) => xml,
            Err(e) => return FileValidationResult::error(file_path, e.into(), start_time.elapsed()),
        };

        let schema_path = match schema_loader.resolve(&file_path, &xml) {
            Ok(path) => path,
            Err(e @ (ValidationError::SchemaUrlNotFound { .. } | ValidationError::RemoteSchema { .. })) => {
                return FileValidationResult::skipped(file_path, e.to_string(), start_time.elapsed());
            }
            Err(e) => return FileValidationResult::error(file_path, e, start_time.elapsed()),
        };

        let schema = match schema_loader.load(&schema_path).await {
            Ok(schema) => schema,
            Err(e) => return FileValidationResult::error(file_path, e, start_time.elapsed()),
        };

        let outcome = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            validator.validate(&xml, &schema)
        })
        .await;

        match outcome {
            Ok(outcome) => FileValidationResult::validated(
                file_path,
                schema_path,
                outcome,
                start_time.elapsed(),
            ),
            Err(e) => FileValidationResult::error(
                file_path,
                ValidationError::Concurrency {
                    details: format!("Join error: {}", e),
                },
                start_time.elapsed(),
            ),
        }
    }
}
