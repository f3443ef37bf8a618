//! Error types for scalar decoding.

use thiserror::Error;

/// Errors raised when a raw XML attribute or text value cannot be decoded
/// into the declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Boolean field received something other than `true`/`false`.
    #[error("{field}: input should be a valid boolean, got '{raw}'")]
    InvalidBoolean { field: String, raw: String },

    /// Integer field could not be parsed.
    #[error("{field}: input should be a valid integer, got '{raw}'")]
    InvalidInteger { field: String, raw: String },

    /// Decimal field could not be parsed.
    #[error("{field}: input should be a valid decimal, got '{raw}'")]
    InvalidDecimal { field: String, raw: String },

    /// Date does not follow the HL7 TS syntax or is not a calendar date.
    #[error("{field}: invalid date '{raw}': {reason}")]
    InvalidDate {
        field: String,
        raw: String,
        reason: String,
    },

    /// Code is not a member of the declared code list.
    #[error("{field}: '{raw}' is not a valid {code_list} code")]
    UnknownCode {
        field: String,
        code_list: &'static str,
        raw: String,
    },

    /// Unknown code list name.
    #[error("unknown code list: {name}")]
    UnknownCodeList { name: String },

    /// `nullFlavor` attribute carries an unknown value.
    #[error("{field}: unknown null flavor '{raw}'")]
    UnknownNullFlavor { field: String, raw: String },

    /// Field does not accept the given null flavor.
    #[error("{field}: null flavor {flavor} is not allowed")]
    NullFlavorNotAllowed { field: String, flavor: String },

    /// Literal-true marker received `false`.
    #[error("{field}: input should be true")]
    ExpectedTrue { field: String },

    /// Technical identifier is not a valid UUID.
    #[error("{field}: invalid uuid '{raw}'")]
    InvalidUuid { field: String, raw: String },

    /// Decoded value does not match the Rust type of the field.
    #[error("{field}: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
}

impl CodecError {
    /// Name of the field that failed to decode, if the error is field-scoped.
    pub fn field(&self) -> Option<&str> {
        match self {
            CodecError::InvalidBoolean { field, .. }
            | CodecError::InvalidInteger { field, .. }
            | CodecError::InvalidDecimal { field, .. }
            | CodecError::InvalidDate { field, .. }
            | CodecError::UnknownCode { field, .. }
            | CodecError::UnknownNullFlavor { field, .. }
            | CodecError::NullFlavorNotAllowed { field, .. }
            | CodecError::ExpectedTrue { field }
            | CodecError::InvalidUuid { field, .. }
            | CodecError::TypeMismatch { field, .. } => Some(field),
            CodecError::UnknownCodeList { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::InvalidBoolean {
            field: "d_9_3_autopsy".to_string(),
            raw: "maybe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "d_9_3_autopsy: input should be a valid boolean, got 'maybe'"
        );
        assert_eq!(err.field(), Some("d_9_3_autopsy"));
    }

    #[test]
    fn test_unknown_code_list_has_no_field() {
        let err = CodecError::UnknownCodeList {
            name: "X".to_string(),
        };
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "unknown code list: X");
    }
}
