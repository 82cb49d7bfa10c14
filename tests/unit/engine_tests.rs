use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::common::test_helpers::*;
use xml_structure_validator::{
    EngineConfig, FileDiscovery, FileValidationResult, ProgressCallback, SchemaLoader,
    ValidationEngine, ValidationProgress, ValidationResults, ValidationStatus,
};

fn status_of<'a>(results: &'a ValidationResults, name: &str) -> &'a ValidationStatus {
    &results
        .file_results
        .iter()
        .find(|r| r.path.file_name().and_then(|n| n.to_str()) == Some(name))
        .unwrap_or_else(|| panic!("no result for {name}"))
        .status
}

#[tokio::test]
async fn test_corpus_with_schema_hints() {
    let temp_dir = create_corpus().await;
    let engine = ValidationEngine::new(SchemaLoader::from_hints(), EngineConfig::default());

    let results = engine
        .validate_path(temp_dir.path(), &FileDiscovery::new(), None)
        .await
        .unwrap();

    assert_eq!(results.total_files, 6);
    assert_eq!(status_of(&results, "valid.xml"), &ValidationStatus::Valid);
    assert_eq!(
        status_of(&results, "warned.xml"),
        &ValidationStatus::ValidWithWarnings { warning_count: 1 }
    );
    assert_eq!(
        status_of(&results, "invalid.xml"),
        &ValidationStatus::Invalid { error_count: 1 }
    );
    assert_eq!(status_of(&results, "deep.xml"), &ValidationStatus::Valid);
    assert!(status_of(&results, "remote.xml").is_skipped());
    assert!(status_of(&results, "nohint.xml").is_skipped());

    assert_eq!(results.valid_files, 3);
    assert_eq!(results.invalid_files, 1);
    assert_eq!(results.skipped_files, 2);
    assert_eq!(results.error_files, 0);
    assert!(results.has_errors());
    assert!(results.discovery_errors.is_empty());
}

#[tokio::test]
async fn test_explicit_schema_overrides_hints() {
    let temp_dir = create_corpus().await;
    let chapter_schema = write_file(temp_dir.path(), "chapter.xsd", CHAPTER_ONLY_XSD).await;
    let engine = ValidationEngine::new(
        SchemaLoader::with_schema(chapter_schema.clone()),
        EngineConfig::default(),
    );

    let results = engine
        .validate_path(temp_dir.path(), &FileDiscovery::new(), None)
        .await
        .unwrap();

    // Every document has a book or novel root, none of which chapter.xsd declares
    assert_eq!(results.invalid_files, 6);
    assert!(
        results
            .file_results
            .iter()
            .all(|r| r.schema.as_deref() == Some(chapter_schema.as_path()))
    );
}

#[tokio::test]
async fn test_outcome_matches_direct_validation() {
    let temp_dir = create_corpus().await;
    let engine = ValidationEngine::new(SchemaLoader::from_hints(), EngineConfig::default());
    let path = temp_dir.path().join("invalid.xml");

    let result: FileValidationResult = engine.validate_file(&path).await;
    let xml = std::fs::read_to_string(&path).unwrap();
    let expected = xml_structure_validator::validate(&xml, BOOK_XSD);

    assert_eq!(result.outcome, Some(expected));
}

#[tokio::test]
async fn test_progress_reports_every_file() {
    let temp_dir = create_valid_corpus(10).await;
    let engine = ValidationEngine::new(
        SchemaLoader::from_hints(),
        EngineConfig {
            max_concurrent_validations: 4,
            ..EngineConfig::default()
        },
    );

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let callback: ProgressCallback = Arc::new(move |progress: ValidationProgress| {
        if let Some(file) = progress.current_file {
            recorder.lock().unwrap().push((file, progress.total));
        }
    });

    let results = engine
        .validate_path(temp_dir.path(), &FileDiscovery::new(), Some(callback))
        .await
        .unwrap();

    assert!(results.all_valid());
    assert_eq!(results.success_rate(), 100.0);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 10);
    assert!(seen.iter().all(|(_, total)| *total == 10));
}

#[tokio::test]
async fn test_unescaping_applies_to_files() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let schema = write_file(
        temp_dir.path(),
        "book.xsd",
        &BOOK_XSD.replace('<', "&lt;").replace('>', "&gt;"),
    )
    .await;
    write_file(temp_dir.path(), "book.xml", "&lt;book/&gt;").await;

    let mut config = EngineConfig::default();
    config.validator.unescape_input = true;
    let engine = ValidationEngine::new(SchemaLoader::with_schema(schema), config);

    let result = engine
        .validate_file(&temp_dir.path().join("book.xml"))
        .await;
    assert_eq!(result.status, ValidationStatus::Valid);
}

#[tokio::test]
async fn test_unreadable_file_is_error() {
    let engine = ValidationEngine::new(
        SchemaLoader::with_schema(Path::new("book.xsd").to_path_buf()),
        EngineConfig {
            validation_timeout: Duration::from_secs(5),
            ..EngineConfig::default()
        },
    );

    let result = engine.validate_file(Path::new("/nonexistent/book.xml")).await;
    assert!(result.status.is_error());
    assert!(result.outcome.is_none());
}
