//! Element-name cross-check of the XML tree against the schema dictionary.

use roxmltree::Node;

use crate::document::{local_name, walk_elements};
use crate::error::Result;
use crate::schema::SchemaElementDictionary;

/// Findings of the structural walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralFindings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn root_not_defined(name: &str) -> String {
    format!("Root element \"{}\" is not defined in the XSD schema.", name)
}

pub fn element_not_defined(name: &str) -> String {
    format!(
        "Element \"{}\" is not explicitly defined in the XSD schema.",
        name
    )
}

/// Check every element name against `dictionary`.
///
/// An undeclared root is an error. Every undeclared element, the root
/// included, is also a warning, so an undeclared root is reported twice.
/// The whole tree is walked regardless of what has been found so far.
pub fn validate_structure(
    xml_root: Node,
    dictionary: &SchemaElementDictionary,
    max_depth: Option<usize>,
) -> Result<StructuralFindings> {
    let mut findings = StructuralFindings::default();

    let root_name = local_name(&xml_root);
    if !dictionary.contains(root_name) {
        findings.errors.push(root_not_defined(root_name));
    }

    walk_elements(xml_root, max_depth, |node| {
        let name = local_name(&node);
        if !dictionary.contains(name) {
            findings.warnings.push(element_not_defined(name));
        }
    })?;

    Ok(findings)
}
