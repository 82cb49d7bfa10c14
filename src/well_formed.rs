//! Well-formedness gate run on both documents before anything else.

use roxmltree::Document;
use thiserror::Error;

use crate::document::{self, DocumentRole, ParseFailure, ParseLimits};
use crate::error::ValidationError;

const UNKNOWN_PARSING_ERROR: &str = "Unknown parsing error";

/// Reasons a document fails the well-formedness gate
#[derive(Error, Debug)]
pub enum WellFormednessError {
    #[error("{role} content is empty")]
    Empty { role: DocumentRole },

    #[error("{role} parsing error: {details}")]
    Malformed { role: DocumentRole, details: String },

    #[error(transparent)]
    Internal(#[from] ValidationError),
}

/// Confirm `content` is non-blank and parses as a single well-formed tree.
pub fn check_well_formed(
    content: &str,
    role: DocumentRole,
    limits: ParseLimits,
) -> Result<Document<'_>, WellFormednessError> {
    if content.trim().is_empty() {
        return Err(WellFormednessError::Empty { role });
    }

    document::parse(content, limits).map_err(|failure| match failure {
        ParseFailure::Malformed(details) => WellFormednessError::Malformed {
            role,
            details: if details.trim().is_empty() {
                UNKNOWN_PARSING_ERROR.to_string()
            } else {
                details
            },
        },
        ParseFailure::Internal(err) => WellFormednessError::Internal(err),
    })
}
