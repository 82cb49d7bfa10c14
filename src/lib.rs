//! # xml-structure-validator Library
//!
//! Structural validation of XML documents against the element declarations of
//! an XSD schema. The core takes two strings and returns a
//! [`ValidationOutcome`] listing errors and warnings; it checks
//! well-formedness, the schema's root shape, namespace agreement, and whether
//! every element of the document is declared somewhere in the schema.
//!
//! Content models, types, and occurrence constraints are not enforced.
//!
//! ```
//! use xml_structure_validator::{is_valid, validate};
//!
//! let schema = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:element name="book"/>
//! </xs:schema>"#;
//!
//! let outcome = validate("<book><preface/></book>", schema);
//! assert!(outcome.is_valid());
//! assert_eq!(outcome.summary(), "⚠ Valid with 1 warning(s)");
//! assert!(!is_valid("<novel/>", schema));
//! ```
//!
//! Around the core, the crate carries a batch engine that discovers files,
//! resolves each file's schema, and validates them concurrently.

pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod error_reporter;
pub mod escape;
pub mod file_discovery;
pub mod namespace;
pub mod outcome;
pub mod output;
pub mod schema;
pub mod schema_loader;
pub mod structure;
pub mod validator;
pub mod well_formed;

pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigError, ConfigManager};
pub use document::{DocumentRole, ParseLimits, XSD_NAMESPACE};
pub use engine::{
    EngineConfig, FileValidationResult, ProgressCallback, ValidationEngine, ValidationPhase,
    ValidationProgress, ValidationResults, ValidationStatus,
};
pub use error::ValidationError;
pub use error_reporter::ErrorReporter;
pub use escape::unescape_entities;
pub use file_discovery::{Discovery, FileDiscovery};
pub use outcome::{ValidationOutcome, summarize};
pub use output::Output;
pub use schema::{ElementDeclaration, SchemaElementDictionary};
pub use schema_loader::{SchemaExtractor, SchemaLoader, SchemaReference, SchemaSourceType};
pub use validator::{StructuralValidator, ValidatorOptions, is_valid, validate};
