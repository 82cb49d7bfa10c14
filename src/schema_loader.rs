use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Result, ValidationError};

/// Cached regex for xsi:schemaLocation extraction
static SCHEMA_LOCATION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for xsi:noNamespaceSchemaLocation extraction
static NO_NAMESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_schema_location_regex() -> &'static Regex {
    SCHEMA_LOCATION_REGEX.get_or_init(|| {
        Regex::new(r#"xsi:schemaLocation\s*=\s*["']\s*\S+\s+([^"'\s]+)"#)
            .expect("schemaLocation regex is valid")
    })
}

fn get_no_namespace_regex() -> &'static Regex {
    NO_NAMESPACE_REGEX.get_or_init(|| {
        Regex::new(r#"xsi:noNamespaceSchemaLocation\s*=\s*["']\s*([^"'\s]+)"#)
            .expect("noNamespaceSchemaLocation regex is valid")
    })
}

/// Schema location hint found in an XML document
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaReference {
    pub location: String,
    pub source_type: SchemaSourceType,
}

/// Where a schema hint points to
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSourceType {
    Local(PathBuf),
    Remote(String),
}

/// Reads schema location hints out of XML text
pub struct SchemaExtractor;

impl SchemaExtractor {
    /// First schema hint in `xml`, resolved against the directory of
    /// `xml_path`. `xsi:noNamespaceSchemaLocation` takes precedence over the
    /// first location of `xsi:schemaLocation`.
    pub fn extract(xml: &str, xml_path: &Path) -> Option<SchemaReference> {
        let caps = get_no_namespace_regex()
            .captures(xml)
            .or_else(|| get_schema_location_regex().captures(xml))?;

        let location = caps[1].to_string();
        let source_type = Self::determine_source_type(&location, xml_path);
        Some(SchemaReference {
            location,
            source_type,
        })
    }

    fn determine_source_type(location: &str, xml_path: &Path) -> SchemaSourceType {
        if location.starts_with("http://") || location.starts_with("https://") {
            return SchemaSourceType::Remote(location.to_string());
        }

        let location = location.strip_prefix("file://").unwrap_or(location);
        let schema_path = Path::new(location);
        if schema_path.is_absolute() {
            SchemaSourceType::Local(schema_path.to_path_buf())
        } else {
            let base = xml_path.parent().unwrap_or(Path::new("."));
            SchemaSourceType::Local(base.join(schema_path))
        }
    }
}

/// Decides which schema applies to an XML file and reads it
///
/// Schema text is read fresh for every file.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    explicit_schema: Option<PathBuf>,
}

impl SchemaLoader {
    /// Loader that uses each file's own schema hint
    pub fn from_hints() -> Self {
        Self::default()
    }

    /// Loader that applies `schema` to every file
    pub fn with_schema(schema: PathBuf) -> Self {
        Self {
            explicit_schema: Some(schema),
        }
    }

    /// Schema path for the XML file at `xml_path` with content `xml`
    pub fn resolve(&self, xml_path: &Path, xml: &str) -> Result<PathBuf> {
        if let Some(schema) = &self.explicit_schema {
            return Ok(schema.clone());
        }

        let reference = SchemaExtractor::extract(xml, xml_path).ok_or_else(|| {
            ValidationError::SchemaUrlNotFound {
                file: xml_path.to_path_buf(),
            }
        })?;

        match reference.source_type {
            SchemaSourceType::Local(path) => Ok(path),
            SchemaSourceType::Remote(url) => Err(ValidationError::RemoteSchema { url }),
        }
    }

    /// Read the schema document at `path`
    pub async fn load(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ValidationError::SchemaNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ValidationError::Io(e)
            }
        })
    }
}
