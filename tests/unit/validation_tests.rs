//! Validation tests for the xml-structure-validator library
//!
//! These tests exercise the validation core through its public entry points.

use xml_structure_validator::structure::{element_not_defined, root_not_defined};
use xml_structure_validator::{
    ParseLimits, StructuralValidator, ValidatorOptions, is_valid, summarize, validate,
};

use crate::common::test_helpers::*;

#[test]
fn test_undeclared_root_is_invalid() {
    let outcome = validate("<book/>", CHAPTER_ONLY_XSD);

    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors(), &[root_not_defined("book")]);
    assert!(outcome.errors()[0].contains("\"book\""));
    // The root is reported again by the descendant walk
    assert_eq!(outcome.warnings(), &[element_not_defined("book")]);
}

#[test]
fn test_all_elements_declared() {
    let outcome = validate("<book><chapter/></book>", BOOK_XSD);

    assert!(outcome.is_valid());
    assert!(outcome.errors().is_empty());
    assert!(outcome.warnings().is_empty());
    assert_eq!(summarize(&outcome), "✓ Valid — conforms to schema");
}

#[test]
fn test_undeclared_descendant_is_warning() {
    let schema = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="book"/>
</xs:schema>"#;
    let outcome = validate("<book><preface/></book>", schema);

    assert!(outcome.is_valid());
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.warnings().len(), 1);
    assert!(outcome.warnings()[0].contains("preface"));
    assert_eq!(summarize(&outcome), "⚠ Valid with 1 warning(s)");
}

#[test]
fn test_schema_root_must_be_schema() {
    let outcome = validate(VALID_BOOK, NOT_A_SCHEMA);

    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors().len(), 1);
    assert!(outcome.errors()[0].contains("rootConfig"));
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_repeated_undeclared_elements_each_warn() {
    let outcome = validate(
        "<book><title/><aside/><chapter><aside/></chapter></book>",
        BOOK_XSD,
    );

    assert!(outcome.is_valid());
    assert_eq!(
        outcome.warnings(),
        &[element_not_defined("aside"), element_not_defined("aside")]
    );
}

#[test]
fn test_document_order_of_warnings() {
    let outcome = validate("<book><a><b/></a><c/></book>", BOOK_XSD);
    assert_eq!(
        outcome.warnings(),
        &[
            element_not_defined("a"),
            element_not_defined("b"),
            element_not_defined("c"),
        ]
    );
}

#[test]
fn test_empty_inputs_name_their_document() {
    let outcome = validate("", BOOK_XSD);
    assert_eq!(outcome.errors(), &["XML content is empty"]);

    let outcome = validate(VALID_BOOK, "\n\t ");
    assert_eq!(outcome.errors(), &["XSD content is empty"]);
}

#[test]
fn test_malformed_xml_short_circuits() {
    let outcome = validate("<book><chapter></book>", BOOK_XSD);

    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors().len(), 1);
    assert!(outcome.errors()[0].starts_with("XML parsing error: "));
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_malformed_inputs_accumulate() {
    let outcome = validate("<book>", "<xs:schema");

    assert_eq!(outcome.errors().len(), 2);
    assert!(outcome.errors()[0].starts_with("XML parsing error: "));
    assert!(outcome.errors()[1].starts_with("XSD parsing error: "));
}

#[test]
fn test_namespace_mismatch_is_warning_only() {
    let outcome = validate("<book><chapter/></book>", NAMESPACED_XSD);

    assert!(outcome.is_valid());
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.warnings().len(), 1);
    assert!(outcome.warnings()[0].starts_with("Namespace mismatch"));
    assert!(outcome.warnings()[0].contains("urn:library"));
}

#[test]
fn test_matching_namespace_is_silent() {
    let outcome = validate(
        r#"<lib:book xmlns:lib="urn:library"><lib:chapter/></lib:book>"#,
        NAMESPACED_XSD,
    );

    assert!(outcome.is_valid());
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_namespace_warning_precedes_structural_warnings() {
    let outcome = validate(r#"<book><preface/></book>"#, NAMESPACED_XSD);

    assert_eq!(outcome.warnings().len(), 2);
    assert!(outcome.warnings()[0].starts_with("Namespace mismatch"));
    assert_eq!(outcome.warnings()[1], element_not_defined("preface"));
}

#[test]
fn test_ref_declarations_do_not_declare() {
    let schema = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="book">
    <xs:complexType><xs:sequence><xs:element ref="chapter"/></xs:sequence></xs:complexType>
  </xs:element>
</xs:schema>"#;
    let outcome = validate("<book><chapter/></book>", schema);

    assert!(outcome.is_valid());
    assert_eq!(outcome.warnings(), &[element_not_defined("chapter")]);
}

#[test]
fn test_occurrence_constraints_not_enforced() {
    let schema = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="book"/>
  <xs:element name="chapter" minOccurs="2" maxOccurs="2"/>
</xs:schema>"#;

    assert!(is_valid("<book><chapter/></book>", schema));
    assert!(is_valid("<book/>", schema));
}

#[test]
fn test_validation_is_idempotent() {
    let inputs = [
        ("<book><chapter/></book>", BOOK_XSD),
        ("<book><preface/></book>", BOOK_XSD),
        ("<novel/>", BOOK_XSD),
        ("", ""),
        (VALID_BOOK, NOT_A_SCHEMA),
    ];

    for (xml, schema) in inputs {
        assert_eq!(validate(xml, schema), validate(xml, schema));
    }
}

#[test]
fn test_quick_check_matches_full_validation() {
    let inputs = [
        ("<book><chapter/></book>", BOOK_XSD),
        ("<book><preface/></book>", BOOK_XSD),
        ("<novel/>", BOOK_XSD),
        ("<book>", BOOK_XSD),
        ("<book/>", NAMESPACED_XSD),
        (VALID_BOOK, NOT_A_SCHEMA),
    ];

    for (xml, schema) in inputs {
        assert_eq!(is_valid(xml, schema), validate(xml, schema).is_valid());
    }
}

#[test]
fn test_validity_matches_errors() {
    for xml in ["<book/>", "<novel/>", "", "<book><x/></book>"] {
        let outcome = validate(xml, BOOK_XSD);
        assert_eq!(outcome.is_valid(), outcome.errors().is_empty());
    }
}

#[test]
fn test_escaped_markup_with_unescaping() {
    let validator = StructuralValidator::new(ValidatorOptions {
        unescape_input: true,
        ..ValidatorOptions::default()
    });
    let escaped = "&lt;book&gt;&lt;title&gt;A &amp;amp; B&lt;/title&gt;&lt;/book&gt;";

    let outcome = validator.validate(escaped, BOOK_XSD);
    assert!(outcome.is_valid(), "{:?}", outcome);
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_dtd_rejected_when_disallowed() {
    let xml = r#"<!DOCTYPE book [<!ELEMENT book ANY>]><book/>"#;
    assert!(is_valid(xml, BOOK_XSD));

    let validator = StructuralValidator::new(ValidatorOptions {
        parse_limits: ParseLimits {
            allow_dtd: false,
            ..ParseLimits::default()
        },
        ..ValidatorOptions::default()
    });
    let outcome = validator.validate(xml, BOOK_XSD);
    assert!(!outcome.is_valid());
    assert!(outcome.errors()[0].starts_with("XML parsing error: "));
}

#[test]
fn test_deep_documents_valid_by_default() {
    let depth = 1000;
    let xml = format!("{}{}", "<book>".repeat(depth), "</book>".repeat(depth));

    let outcome = validate(&xml, BOOK_XSD);
    assert!(outcome.is_valid(), "{:?}", outcome.errors());
    assert!(outcome.errors().is_empty());
    assert!(outcome.warnings().is_empty());
    assert!(is_valid(&xml, BOOK_XSD));
}

#[test]
fn test_depth_beyond_configured_limit_is_internal_error() {
    let validator = StructuralValidator::new(ValidatorOptions {
        max_depth: Some(3),
        ..ValidatorOptions::default()
    });
    let xml = "<book><chapter><title><title/></title></chapter></book>";

    let outcome = validator.validate(xml, BOOK_XSD);
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors().len(), 1);
    assert!(outcome.errors()[0].starts_with("Validation error: "));
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_concurrent_validations_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let xml = if i % 2 == 0 { "<book/>" } else { "<novel/>" };
                (i, validate(xml, BOOK_XSD).is_valid())
            })
        })
        .collect();

    for handle in handles {
        let (i, valid) = handle.join().unwrap();
        assert_eq!(valid, i % 2 == 0);
    }
}
