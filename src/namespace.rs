//! Target namespace reconciliation between the schema and the XML root.

use roxmltree::Node;

use crate::schema::SchemaRoot;

const NO_NAMESPACE: &str = "(none)";

/// Warn when the schema declares a target namespace the XML root is not in.
///
/// Yields at most one warning. A schema without `targetNamespace` never
/// produces one.
pub fn reconcile_namespaces(schema: &SchemaRoot, xml_root: &Node) -> Vec<String> {
    let Some(target) = schema.target_namespace() else {
        return Vec::new();
    };

    let actual = xml_root.tag_name().namespace();
    if actual == Some(target) {
        return Vec::new();
    }

    vec![format!(
        "Namespace mismatch: XSD targetNamespace is \"{}\" but XML root namespace is \"{}\"",
        target,
        actual.unwrap_or(NO_NAMESPACE)
    )]
}
