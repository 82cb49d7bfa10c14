//! Thin layer over `roxmltree` shared by every validation stage.

use std::fmt;

use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Namespace URI of the W3C XML Schema language
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Role a document plays in a validation request, used to label diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentRole {
    Xml,
    Xsd,
}

impl DocumentRole {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentRole::Xml => "XML",
            DocumentRole::Xsd => "XSD",
        }
    }
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parser limits applied to both documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Accept documents carrying a DTD
    pub allow_dtd: bool,
    /// Maximum number of nodes a single document may produce
    pub nodes_limit: u32,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            allow_dtd: true,
            nodes_limit: u32::MAX,
        }
    }
}

/// Why the parser rejected a document
#[derive(Debug)]
pub enum ParseFailure {
    /// The markup itself is broken; carries the parser's message
    Malformed(String),
    /// The parser gave up for a reason unrelated to the markup
    Internal(ValidationError),
}

/// Parse `content` into a tree, sorting parser failures into markup problems
/// and resource problems.
pub fn parse(content: &str, limits: ParseLimits) -> std::result::Result<Document<'_>, ParseFailure> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = limits.allow_dtd;
    options.nodes_limit = limits.nodes_limit;

    Document::parse_with_options(content, options).map_err(|e| match e {
        roxmltree::Error::NodesLimitReached => ParseFailure::Internal(
            ValidationError::ResourceExhaustion {
                resource: "document nodes".to_string(),
                details: format!("more than {} nodes", limits.nodes_limit),
            },
        ),
        other => ParseFailure::Malformed(other.to_string()),
    })
}

/// Local name of an element: the tag name without any namespace prefix
pub fn local_name<'a>(node: &Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Whether `node` is the XML Schema construct `local`, written with any
/// prefix bound to the XML Schema namespace or with no namespace at all.
pub fn is_schema_construct(node: &Node, local: &str) -> bool {
    if !node.is_element() || node.tag_name().name() != local {
        return false;
    }
    matches!(node.tag_name().namespace(), None | Some(XSD_NAMESPACE))
}

/// Walk every element below and including `root` in document order
/// (pre-order). With a `max_depth`, fails once nesting exceeds it.
///
/// The walk keeps its own stack, so without a bound any depth the parser
/// accepted is walked in full.
pub fn walk_elements<'a, 'input, F>(
    root: Node<'a, 'input>,
    max_depth: Option<usize>,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(Node<'a, 'input>),
{
    let mut stack = vec![(root, 1usize)];

    while let Some((node, depth)) = stack.pop() {
        if let Some(max) = max_depth
            && depth > max
        {
            return Err(ValidationError::ResourceExhaustion {
                resource: "element depth".to_string(),
                details: format!(
                    "element \"{}\" is nested deeper than {} levels",
                    local_name(&node),
                    max
                ),
            });
        }

        visit(node);

        let children: Vec<_> = node.children().filter(|n| n.is_element()).collect();
        for child in children.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    Ok(())
}
