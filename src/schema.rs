//! Schema-side view: root shape check and element declaration extraction.

use std::collections::HashMap;

use roxmltree::Node;
use serde::Serialize;
use thiserror::Error;

use crate::document::{self, local_name};

const DEFAULT_OCCURS: &str = "1";

/// The schema document's root is not a schema declaration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("XSD root element must be a schema declaration, found \"{found}\"")]
pub struct SchemaShapeError {
    pub found: String,
}

/// Root element of a schema document that has passed the shape check
///
/// Extraction and namespace reconciliation only accept this type, so neither
/// can run against a document whose root was not recognised.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRoot<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> SchemaRoot<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Result<Self, SchemaShapeError> {
        if document::is_schema_construct(&node, "schema") {
            Ok(Self { node })
        } else {
            Err(SchemaShapeError {
                found: local_name(&node).to_string(),
            })
        }
    }

    pub fn node(&self) -> Node<'a, 'input> {
        self.node
    }

    /// Value of the `targetNamespace` attribute, if declared
    pub fn target_namespace(&self) -> Option<&'a str> {
        self.node.attribute("targetNamespace")
    }
}

/// One declared element, as written in the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementDeclaration {
    pub name: String,
    pub type_ref: Option<String>,
    /// Extracted for reporting only; occurrence bounds are not enforced
    pub min_occurs: String,
    pub max_occurs: String,
}

impl ElementDeclaration {
    fn from_node(node: &Node, name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_ref: node.attribute("type").map(str::to_string),
            min_occurs: node
                .attribute("minOccurs")
                .unwrap_or(DEFAULT_OCCURS)
                .to_string(),
            max_occurs: node
                .attribute("maxOccurs")
                .unwrap_or(DEFAULT_OCCURS)
                .to_string(),
        }
    }
}

/// Frozen lookup from element name to its declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaElementDictionary {
    declarations: HashMap<String, ElementDeclaration>,
}

impl SchemaElementDictionary {
    pub fn builder() -> SchemaElementDictionaryBuilder {
        SchemaElementDictionaryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&ElementDeclaration> {
        self.declarations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Mutable stage of a [`SchemaElementDictionary`]
#[derive(Debug, Default)]
pub struct SchemaElementDictionaryBuilder {
    declarations: HashMap<String, ElementDeclaration>,
}

impl SchemaElementDictionaryBuilder {
    /// Record a declaration; a later declaration of the same name replaces
    /// the earlier one.
    pub fn declare(&mut self, declaration: ElementDeclaration) -> &mut Self {
        self.declarations
            .insert(declaration.name.clone(), declaration);
        self
    }

    pub fn build(self) -> SchemaElementDictionary {
        SchemaElementDictionary {
            declarations: self.declarations,
        }
    }
}

/// Collect every named element declaration anywhere in the schema tree,
/// global or nested, in document order.
pub fn extract_element_declarations(schema: &SchemaRoot) -> SchemaElementDictionary {
    let mut builder = SchemaElementDictionary::builder();

    for node in schema
        .node()
        .descendants()
        .filter(|n| document::is_schema_construct(n, "element"))
    {
        if let Some(name) = node.attribute("name") {
            builder.declare(ElementDeclaration::from_node(&node, name));
        }
    }

    builder.build()
}
