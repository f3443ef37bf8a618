//! Scalar codec between XML attribute/text values and typed field values.
//!
//! Two layers are provided:
//!
//! - [`decode`] / [`encode`] work on a declared [`FieldType`] and return a
//!   dynamically typed [`ScalarValue`]. Field metadata uses the same
//!   [`FieldType`] to drive structural validation.
//! - The [`Scalar`] trait binds a Rust type to its field type, so mappers can
//!   decode straight into `Option<T>` / `Option<Nullable<T>>` fields.
//!
//! A `nullFlavor` marker always takes precedence over the value it sits next
//! to; see [`decode_node`].

use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::date::{DatePrecision, Hl7Date};
use crate::enums::CodeList;
use crate::error::{CodecError, Result};
use crate::null_flavor::{NullFlavor, Nullable};

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Decimal,
    Boolean,
    /// Alphanumeric with a maximum length in characters.
    AlphaNumeric(usize),
    /// Alphabetic with a fixed length (country and language codes).
    Alpha(usize),
    /// Integer-backed enumeration.
    Code(CodeList),
    /// String-backed enumeration of null flavor literals.
    NullFlavorCode,
    /// Date with a declared minimum precision.
    Date(DatePrecision),
    /// Field whose only admissible value is `true`.
    TrueMarker,
    Uuid,
}

impl FieldType {
    pub fn describe(&self) -> String {
        match self {
            FieldType::Integer => "integer".to_string(),
            FieldType::Decimal => "decimal".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::AlphaNumeric(max) => format!("AN[{max}]"),
            FieldType::Alpha(len) => format!("A[{len}]"),
            FieldType::Code(list) => format!("code list {list}"),
            FieldType::NullFlavorCode => "null flavor".to_string(),
            FieldType::Date(precision) => format!("date ({precision} or finer)"),
            FieldType::TrueMarker => "true marker".to_string(),
            FieldType::Uuid => "uuid".to_string(),
        }
    }
}

/// A decoded scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Text(String),
    Code(i64),
    NullFlavor(NullFlavor),
    Date(Hl7Date),
    Uuid(Uuid),
}

/// Decode a raw attribute or text value according to its declared type.
pub fn decode(raw: &str, field_type: FieldType, field: &str) -> Result<ScalarValue> {
    match field_type {
        FieldType::Integer => parse_integer(raw, field).map(ScalarValue::Integer),
        FieldType::Decimal => Decimal::from_str(raw.trim())
            .map(ScalarValue::Decimal)
            .map_err(|_| CodecError::InvalidDecimal {
                field: field.to_string(),
                raw: raw.to_string(),
            }),
        FieldType::Boolean => parse_bool(raw, field).map(ScalarValue::Boolean),
        FieldType::TrueMarker => match parse_bool(raw, field)? {
            true => Ok(ScalarValue::Boolean(true)),
            false => Err(CodecError::ExpectedTrue {
                field: field.to_string(),
            }),
        },
        FieldType::AlphaNumeric(_) | FieldType::Alpha(_) => Ok(ScalarValue::Text(raw.to_string())),
        FieldType::Code(list) => {
            let code = parse_integer(raw, field)?;
            if list.contains(code) {
                Ok(ScalarValue::Code(code))
            } else {
                Err(CodecError::UnknownCode {
                    field: field.to_string(),
                    code_list: list.name(),
                    raw: raw.to_string(),
                })
            }
        }
        FieldType::NullFlavorCode => parse_null_flavor(raw, field).map(ScalarValue::NullFlavor),
        FieldType::Date(_) => Hl7Date::parse(raw)
            .map(ScalarValue::Date)
            .map_err(|reason| CodecError::InvalidDate {
                field: field.to_string(),
                raw: raw.to_string(),
                reason,
            }),
        FieldType::Uuid => Uuid::parse_str(raw.trim())
            .map(ScalarValue::Uuid)
            .map_err(|_| CodecError::InvalidUuid {
                field: field.to_string(),
                raw: raw.to_string(),
            }),
    }
}

/// Decode a node given its value and `nullFlavor` attribute.
///
/// Returns `Ok(None)` when the node carries neither.
pub fn decode_node(
    value: Option<&str>,
    null_flavor: Option<&str>,
    field_type: FieldType,
    field: &str,
) -> Result<Option<ScalarValue>> {
    if let Some(flavor) = null_flavor {
        return parse_null_flavor(flavor, field).map(|flavor| Some(ScalarValue::NullFlavor(flavor)));
    }
    value.map(|raw| decode(raw, field_type, field)).transpose()
}

/// Render a scalar for the wire.
pub fn encode(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Integer(value) => value.to_string(),
        ScalarValue::Decimal(value) => value.to_string(),
        ScalarValue::Boolean(value) => value.to_string(),
        ScalarValue::Text(value) => value.clone(),
        ScalarValue::Code(code) => code.to_string(),
        ScalarValue::NullFlavor(flavor) => flavor.as_str().to_string(),
        ScalarValue::Date(date) => date.as_str().to_string(),
        ScalarValue::Uuid(uuid) => uuid.to_string(),
    }
}

fn parse_integer(raw: &str, field: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| CodecError::InvalidInteger {
        field: field.to_string(),
        raw: raw.to_string(),
    })
}

fn parse_bool(raw: &str, field: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CodecError::InvalidBoolean {
            field: field.to_string(),
            raw: raw.to_string(),
        }),
    }
}

fn parse_null_flavor(raw: &str, field: &str) -> Result<NullFlavor> {
    raw.parse().map_err(|_| CodecError::UnknownNullFlavor {
        field: field.to_string(),
        raw: raw.to_string(),
    })
}

/// A Rust type that maps to a single declared field type.
pub trait Scalar: Sized {
    const FIELD_TYPE: FieldType;

    fn from_scalar(value: ScalarValue, field: &str) -> Result<Self>;

    fn to_scalar(&self) -> ScalarValue;

    fn decode(raw: &str, field: &str) -> Result<Self> {
        Self::from_scalar(decode(raw, Self::FIELD_TYPE, field)?, field)
    }

    fn encode(&self) -> String {
        encode(&self.to_scalar())
    }
}

fn mismatch<T>(field: &str, expected: &'static str) -> Result<T> {
    Err(CodecError::TypeMismatch {
        field: field.to_string(),
        expected,
    })
}

impl Scalar for i64 {
    const FIELD_TYPE: FieldType = FieldType::Integer;

    fn from_scalar(value: ScalarValue, field: &str) -> Result<Self> {
        match value {
            ScalarValue::Integer(value) => Ok(value),
            _ => mismatch(field, "integer"),
        }
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Integer(*self)
    }
}

impl Scalar for Decimal {
    const FIELD_TYPE: FieldType = FieldType::Decimal;

    fn from_scalar(value: ScalarValue, field: &str) -> Result<Self> {
        match value {
            ScalarValue::Decimal(value) => Ok(value),
            _ => mismatch(field, "decimal"),
        }
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Decimal(*self)
    }
}

impl Scalar for bool {
    const FIELD_TYPE: FieldType = FieldType::Boolean;

    fn from_scalar(value: ScalarValue, field: &str) -> Result<Self> {
        match value {
            ScalarValue::Boolean(value) => Ok(value),
            _ => mismatch(field, "boolean"),
        }
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Boolean(*self)
    }
}

impl Scalar for String {
    // Length limits are field specific and enforced by structural validation.
    const FIELD_TYPE: FieldType = FieldType::AlphaNumeric(usize::MAX);

    fn from_scalar(value: ScalarValue, field: &str) -> Result<Self> {
        match value {
            ScalarValue::Text(value) => Ok(value),
            _ => mismatch(field, "text"),
        }
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Text(self.clone())
    }
}

impl Scalar for Hl7Date {
    const FIELD_TYPE: FieldType = FieldType::Date(DatePrecision::Year);

    fn from_scalar(value: ScalarValue, field: &str) -> Result<Self> {
        match value {
            ScalarValue::Date(value) => Ok(value),
            _ => mismatch(field, "date"),
        }
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Date(self.clone())
    }
}

impl Scalar for Uuid {
    const FIELD_TYPE: FieldType = FieldType::Uuid;

    fn from_scalar(value: ScalarValue, field: &str) -> Result<Self> {
        match value {
            ScalarValue::Uuid(value) => Ok(value),
            _ => mismatch(field, "uuid"),
        }
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Uuid(*self)
    }
}

/// Decode a field that does not accept null flavors.
///
/// A `nullFlavor` on such a node is reported instead of being dropped.
pub fn decode_plain<T: Scalar>(
    value: Option<&str>,
    null_flavor: Option<&str>,
    field: &str,
) -> Result<Option<T>> {
    match decode_node(value, null_flavor, T::FIELD_TYPE, field)? {
        Some(ScalarValue::NullFlavor(flavor)) => Err(CodecError::NullFlavorNotAllowed {
            field: field.to_string(),
            flavor: flavor.to_string(),
        }),
        Some(scalar) => T::from_scalar(scalar, field).map(Some),
        None => Ok(None),
    }
}

/// Decode a nullable-with-flavor field.
pub fn decode_nullable<T: Scalar>(
    value: Option<&str>,
    null_flavor: Option<&str>,
    field: &str,
) -> Result<Option<Nullable<T>>> {
    match decode_node(value, null_flavor, T::FIELD_TYPE, field)? {
        Some(ScalarValue::NullFlavor(flavor)) => Ok(Some(Nullable::NullFlavor(flavor))),
        Some(scalar) => T::from_scalar(scalar, field).map(|value| Some(Nullable::Value(value))),
        None => Ok(None),
    }
}

/// Encode a nullable value as `(attribute, text)`; the attribute is
/// `nullFlavor` for a sentinel and `value_key` otherwise.
pub fn encode_nullable<'k, T: Scalar>(value: &Nullable<T>, value_key: &'k str) -> (&'k str, String) {
    match value {
        Nullable::Value(value) => (value_key, value.encode()),
        Nullable::NullFlavor(flavor) => ("nullFlavor", flavor.as_str().to_string()),
    }
}
