//! Unit tests for output rendering

use std::path::PathBuf;
use std::time::Duration;

use xml_structure_validator::{
    FileValidationResult, Output, OutputFormat, ValidationError, ValidationResults,
    VerbosityLevel, validate,
};

use crate::common::test_helpers::BOOK_XSD;

fn create_test_results() -> ValidationResults {
    let file_results = vec![
        FileValidationResult::validated(
            PathBuf::from("test1.xml"),
            PathBuf::from("book.xsd"),
            validate("<book><title/></book>", BOOK_XSD),
            Duration::from_millis(100),
        ),
        FileValidationResult::validated(
            PathBuf::from("test2.xml"),
            PathBuf::from("book.xsd"),
            validate("<atlas><map/></atlas>", BOOK_XSD),
            Duration::from_millis(150),
        ),
        FileValidationResult::error(
            PathBuf::from("test3.xml"),
            ValidationError::SchemaNotFound {
                path: PathBuf::from("missing.xsd"),
            },
            Duration::from_millis(50),
        ),
        FileValidationResult::skipped(
            PathBuf::from("test4.xml"),
            "No schema location hint".to_string(),
            Duration::from_millis(25),
        ),
    ];

    ValidationResults::aggregate(file_results, Duration::from_millis(325))
}

#[test]
fn test_human_output_lists_every_file() {
    let output = Output::new(OutputFormat::Human, VerbosityLevel::Normal).with_colors(false);
    let rendered = output.render(&create_test_results()).unwrap();

    for name in ["test1.xml", "test2.xml", "test3.xml", "test4.xml"] {
        assert!(rendered.contains(name), "missing {name} in {rendered}");
    }
    assert!(rendered.contains("✗ Invalid — 1 error(s) found"));
    assert!(rendered.contains("Schema not found: missing.xsd"));
    assert!(rendered.contains("Total files: 4"));
    assert!(rendered.contains("Invalid: 1"));
    assert!(rendered.contains("Skipped: 1"));
    assert!(rendered.contains("Success rate: 25.0%"));
}

#[test]
fn test_verbose_human_output_includes_warnings() {
    let output = Output::new(OutputFormat::Human, VerbosityLevel::Verbose).with_colors(false);
    let rendered = output.render(&create_test_results()).unwrap();

    assert!(rendered.contains("warning: Element \"atlas\" is not explicitly defined"));
    assert!(rendered.contains("warning: Element \"map\" is not explicitly defined"));
}

#[test]
fn test_json_output_is_parseable() {
    let output = Output::new(OutputFormat::Json, VerbosityLevel::Normal);
    let rendered = output.render(&create_test_results()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(value["summary"]["total_files"], 4);
    assert_eq!(value["summary"]["error_files"], 1);
    assert_eq!(value["summary"]["total_warnings"], 2);
    assert_eq!(value["files"].as_array().unwrap().len(), 4);
    assert_eq!(value["files"][1]["status"]["status"], "invalid");
    assert_eq!(value["files"][1]["status"]["error_count"], 1);
    assert_eq!(value["files"][2]["status"]["status"], "error");
    assert_eq!(value["files"][3]["status"]["reason"], "No schema location hint");
    // JSON never carries terminal colour codes
    assert!(!rendered.contains("\x1b["));
}

#[test]
fn test_summary_output_is_single_line() {
    let output = Output::new(OutputFormat::Summary, VerbosityLevel::Verbose);
    let rendered = output.render(&create_test_results()).unwrap();

    assert_eq!(rendered.lines().count(), 1);
    assert!(rendered.starts_with("4 files: 1 valid, 1 invalid, 1 errors, 1 skipped"));
}

#[test]
fn test_empty_results() {
    let results = ValidationResults::aggregate(Vec::new(), Duration::ZERO);
    let output = Output::new(OutputFormat::Human, VerbosityLevel::Normal).with_colors(false);
    let rendered = output.render(&results).unwrap();

    assert!(rendered.starts_with("Validation Summary:"));
    assert!(rendered.contains("Total files: 0"));
}
