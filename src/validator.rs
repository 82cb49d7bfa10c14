//! Structural Validator
//!
//! Entry point of the validation core. A call runs every stage to completion
//! on the calling thread:
//!
//! 1. optional entity unescaping of both inputs
//! 2. well-formedness of the XML document, then of the schema document
//! 3. schema root shape
//! 4. element declaration extraction
//! 5. namespace reconciliation and the structural walk
//! 6. aggregation into a [`ValidationOutcome`]
//!
//! A failing well-formedness or shape check ends the run with the errors
//! gathered so far. Failures of the machinery itself (parser limits, walk
//! depth) never escape: they become a single `Validation error:` entry.
//!
//! Nothing is cached between calls. Each call reads its two input strings and
//! returns a fresh outcome, so concurrent calls are independent.

use std::borrow::Cow;

use crate::document::{DocumentRole, ParseLimits};
use crate::error::Result;
use crate::escape::unescape_entities;
use crate::namespace::reconcile_namespaces;
use crate::outcome::{DiagnosticsAggregator, ValidationOutcome};
use crate::schema::{SchemaRoot, extract_element_declarations};
use crate::structure::validate_structure;
use crate::well_formed::{WellFormednessError, check_well_formed};

/// Knobs of the validation core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Deepest element nesting the structural walk accepts; unbounded when `None`
    pub max_depth: Option<usize>,
    /// Limits handed to the document parser
    pub parse_limits: ParseLimits,
    /// Decode `&amp;`-style entities in both inputs before parsing
    pub unescape_input: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            parse_limits: ParseLimits::default(),
            unescape_input: false,
        }
    }
}

/// Validates XML documents against the element declarations of a schema
#[derive(Debug, Clone, Default)]
pub struct StructuralValidator {
    options: ValidatorOptions,
}

impl StructuralValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate `xml` against `schema` and report every finding.
    pub fn validate(&self, xml: &str, schema: &str) -> ValidationOutcome {
        self.run(xml, schema)
            .unwrap_or_else(ValidationOutcome::internal_failure)
    }

    /// Pass/fail only; always equal to `validate(xml, schema).is_valid()`.
    pub fn is_valid(&self, xml: &str, schema: &str) -> bool {
        self.validate(xml, schema).is_valid()
    }

    fn run(&self, xml: &str, schema: &str) -> Result<ValidationOutcome> {
        let xml = self.prepare(xml);
        let schema = self.prepare(schema);
        let limits = self.options.parse_limits;

        let mut diagnostics = DiagnosticsAggregator::new();

        let xml_doc = match check_well_formed(&xml, DocumentRole::Xml, limits) {
            Ok(doc) => Some(doc),
            Err(WellFormednessError::Internal(err)) => return Err(err),
            Err(err) => {
                diagnostics.well_formedness_error(err.to_string());
                None
            }
        };
        let schema_doc = match check_well_formed(&schema, DocumentRole::Xsd, limits) {
            Ok(doc) => Some(doc),
            Err(WellFormednessError::Internal(err)) => return Err(err),
            Err(err) => {
                diagnostics.well_formedness_error(err.to_string());
                None
            }
        };

        let (Some(xml_doc), Some(schema_doc)) = (xml_doc, schema_doc) else {
            return Ok(diagnostics.finish());
        };

        let schema_root = match SchemaRoot::new(schema_doc.root_element()) {
            Ok(root) => root,
            Err(err) => {
                diagnostics.schema_shape_error(err.to_string());
                return Ok(diagnostics.finish());
            }
        };

        let dictionary = extract_element_declarations(&schema_root);
        let xml_root = xml_doc.root_element();

        diagnostics.namespace_warnings(reconcile_namespaces(&schema_root, &xml_root));

        let findings = validate_structure(xml_root, &dictionary, self.options.max_depth)?;
        diagnostics.structural_errors(findings.errors);
        diagnostics.structural_warnings(findings.warnings);

        Ok(diagnostics.finish())
    }

    fn prepare<'a>(&self, content: &'a str) -> Cow<'a, str> {
        if self.options.unescape_input {
            unescape_entities(content)
        } else {
            Cow::Borrowed(content)
        }
    }
}

/// Validate with default options.
pub fn validate(xml: &str, schema: &str) -> ValidationOutcome {
    StructuralValidator::default().validate(xml, schema)
}

/// Quick check with default options.
pub fn is_valid(xml: &str, schema: &str) -> bool {
    StructuralValidator::default().is_valid(xml, schema)
}
