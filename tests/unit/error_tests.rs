//! Error type tests

use std::path::PathBuf;
use xml_structure_validator::{ValidationError, ValidationOutcome};

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let validation_error: ValidationError = io_error.into();

    assert!(matches!(validation_error, ValidationError::Io(_)));
    assert_eq!(validation_error.to_string(), "IO error: File not found");
}

#[test]
fn test_validation_error_messages() {
    let missing = ValidationError::SchemaNotFound {
        path: PathBuf::from("schemas/book.xsd"),
    };
    assert_eq!(missing.to_string(), "Schema not found: schemas/book.xsd");

    let no_hint = ValidationError::SchemaUrlNotFound {
        file: PathBuf::from("book.xml"),
    };
    assert!(no_hint.to_string().contains("book.xml"));

    let remote = ValidationError::RemoteSchema {
        url: "https://example.com/book.xsd".to_string(),
    };
    assert!(remote.to_string().contains("https://example.com/book.xsd"));
}

#[test]
fn test_internal_failure_outcome() {
    let outcome = ValidationOutcome::internal_failure(ValidationError::ResourceExhaustion {
        resource: "element depth".to_string(),
        details: "limit of 4 exceeded".to_string(),
    });

    assert!(!outcome.is_valid());
    assert_eq!(
        outcome.errors(),
        &["Validation error: Resource exhaustion: element depth - limit of 4 exceeded"]
    );
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_serialization_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let validation_error: ValidationError = json_error.into();
    assert!(validation_error.to_string().starts_with("Serialization error:"));
}
