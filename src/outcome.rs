//! Validation outcome and the aggregator that assembles it.

use serde::Serialize;

use crate::error::ValidationError;

const INTERNAL_ERROR_PREFIX: &str = "Validation error:";

/// Result of validating one XML document against one schema
///
/// `is_valid` is false exactly when `errors` is non-empty. Warnings never
/// affect validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationOutcome {
    /// Outcome for a validation that failed for reasons other than the
    /// documents' content: one prefixed error and nothing else.
    pub fn internal_failure(error: ValidationError) -> Self {
        Self {
            is_valid: false,
            errors: vec![format!("{} {}", INTERNAL_ERROR_PREFIX, error)],
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        summarize(self)
    }
}

/// One-line summary of an outcome, suitable for a status line or badge
pub fn summarize(outcome: &ValidationOutcome) -> String {
    if !outcome.is_valid {
        format!("✗ Invalid — {} error(s) found", outcome.errors.len())
    } else if outcome.warnings.is_empty() {
        "✓ Valid — conforms to schema".to_string()
    } else {
        format!("⚠ Valid with {} warning(s)", outcome.warnings.len())
    }
}

/// Collects findings per stage and emits them in a fixed order
///
/// Errors: well-formedness, schema root shape, structural. Warnings:
/// namespace, structural. The order findings arrive in does not matter.
#[derive(Debug, Default)]
pub struct DiagnosticsAggregator {
    well_formedness_errors: Vec<String>,
    schema_shape_errors: Vec<String>,
    structural_errors: Vec<String>,
    namespace_warnings: Vec<String>,
    structural_warnings: Vec<String>,
}

impl DiagnosticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn well_formedness_error(&mut self, message: impl Into<String>) {
        self.well_formedness_errors.push(message.into());
    }

    pub fn schema_shape_error(&mut self, message: impl Into<String>) {
        self.schema_shape_errors.push(message.into());
    }

    pub fn structural_errors(&mut self, messages: impl IntoIterator<Item = String>) {
        self.structural_errors.extend(messages);
    }

    pub fn namespace_warnings(&mut self, messages: impl IntoIterator<Item = String>) {
        self.namespace_warnings.extend(messages);
    }

    pub fn structural_warnings(&mut self, messages: impl IntoIterator<Item = String>) {
        self.structural_warnings.extend(messages);
    }

    pub fn finish(self) -> ValidationOutcome {
        let errors: Vec<String> = self
            .well_formedness_errors
            .into_iter()
            .chain(self.schema_shape_errors)
            .chain(self.structural_errors)
            .collect();
        let warnings: Vec<String> = self
            .namespace_warnings
            .into_iter()
            .chain(self.structural_warnings)
            .collect();

        ValidationOutcome {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
