//! Error types for the XML mappers.

use thiserror::Error;

/// Fatal mapping failures.
///
/// Field-level decode problems are not errors: import records them as
/// validation issues on the imported report instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappingError {
    /// The template lacks a node the mapper fills.
    #[error("template node not found: {path}")]
    TemplateMapping {
        /// Slash-separated path of the missing node.
        path: String,
    },

    /// The input is not XML or not an E2B message.
    #[error("malformed document: {message}")]
    MalformedDocument {
        /// Description of the problem.
        message: String,
    },

    /// A drug-reaction matrix row does not name a reaction of the report.
    #[error("drug {drug} matrix row {row} does not reference a reaction of this report")]
    UnresolvedReaction {
        /// Zero-based drug position.
        drug: usize,
        /// Zero-based matrix row position.
        row: usize,
    },

    /// Writing the output failed.
    #[error("XML write error: {0}")]
    Io(#[from] std::io::Error),

    /// quick-xml rejected an event.
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Serialized output was not UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl MappingError {
    pub fn template(path: impl Into<String>) -> Self {
        Self::TemplateMapping { path: path.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }
}

impl From<roxmltree::Error> for MappingError {
    fn from(error: roxmltree::Error) -> Self {
        Self::malformed(error.to_string())
    }
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MappingError::template("PORR_IN049016UV/controlActProcess").to_string(),
            "template node not found: PORR_IN049016UV/controlActProcess"
        );
        assert_eq!(
            MappingError::UnresolvedReaction { drug: 0, row: 2 }.to_string(),
            "drug 0 matrix row 2 does not reference a reaction of this report"
        );
    }
}
