//! Field metadata exposed by every entity.
//!
//! Entities describe their scalar fields (name, declared type, required-ness
//! and accepted null flavors) so that validation can run generically over the
//! whole tree.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::codec::FieldType;
use crate::date::{DatePrecision, Hl7Date};
use crate::enums::CodeList;
use crate::null_flavor::{NullFlavor, Nullable, flavors};

/// Borrowed view of a populated field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Text(&'a str),
    Code(i64),
    Date(&'a Hl7Date),
    NullFlavor(NullFlavor),
    Uuid(Uuid),
}

/// Conversion from a stored field type to a [`FieldValue`].
pub trait AsFieldValue {
    fn field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for i64 {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Integer(*self)
    }
}

impl AsFieldValue for Decimal {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Decimal(*self)
    }
}

impl AsFieldValue for bool {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Boolean(*self)
    }
}

impl AsFieldValue for String {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl AsFieldValue for Hl7Date {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Date(self)
    }
}

impl AsFieldValue for Uuid {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Uuid(*self)
    }
}

impl<T: AsFieldValue> AsFieldValue for Nullable<T> {
    fn field_value(&self) -> FieldValue<'_> {
        match self {
            Nullable::Value(value) => value.field_value(),
            Nullable::NullFlavor(flavor) => FieldValue::NullFlavor(*flavor),
        }
    }
}

/// Metadata and current value of one field.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub null_flavors: &'static [NullFlavor],
    pub value: Option<FieldValue<'a>>,
}

impl<'a> Field<'a> {
    pub fn new<T: AsFieldValue>(name: &'static str, field_type: FieldType, value: &'a Option<T>) -> Self {
        Self {
            name,
            field_type,
            required: false,
            null_flavors: flavors::NONE,
            value: value.as_ref().map(AsFieldValue::field_value),
        }
    }

    pub fn text<T: AsFieldValue>(name: &'static str, max: usize, value: &'a Option<T>) -> Self {
        Self::new(name, FieldType::AlphaNumeric(max), value)
    }

    pub fn alpha<T: AsFieldValue>(name: &'static str, len: usize, value: &'a Option<T>) -> Self {
        Self::new(name, FieldType::Alpha(len), value)
    }

    pub fn date<T: AsFieldValue>(
        name: &'static str,
        precision: DatePrecision,
        value: &'a Option<T>,
    ) -> Self {
        Self::new(name, FieldType::Date(precision), value)
    }

    pub fn code<T: AsFieldValue>(name: &'static str, list: CodeList, value: &'a Option<T>) -> Self {
        Self::new(name, FieldType::Code(list), value)
    }

    pub fn integer<T: AsFieldValue>(name: &'static str, value: &'a Option<T>) -> Self {
        Self::new(name, FieldType::Integer, value)
    }

    pub fn decimal<T: AsFieldValue>(name: &'static str, value: &'a Option<T>) -> Self {
        Self::new(name, FieldType::Decimal, value)
    }

    pub fn boolean<T: AsFieldValue>(name: &'static str, value: &'a Option<T>) -> Self {
        Self::new(name, FieldType::Boolean, value)
    }

    pub fn marker<T: AsFieldValue>(name: &'static str, value: &'a Option<T>) -> Self {
        Self::new(name, FieldType::TrueMarker, value)
    }

    /// Mark the field as required for business validation.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare the null flavors the field accepts.
    pub fn flavors(mut self, null_flavors: &'static [NullFlavor]) -> Self {
        self.null_flavors = null_flavors;
        self
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// An entity of the ICSR tree.
pub trait Entity {
    /// Element group name, e.g. `g_k_drug_information`.
    const NAME: &'static str;

    /// Scalar fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Persistence identity.
    fn id(&self) -> Option<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let value = Some(Nullable::<String>::NullFlavor(NullFlavor::Msk));
        let field = Field::new("d_1_patient", FieldType::AlphaNumeric(60), &value)
            .required()
            .flavors(flavors::MSK_ASKU_NASK_UNK);
        assert!(field.required);
        assert!(field.is_set());
        assert_eq!(field.value, Some(FieldValue::NullFlavor(NullFlavor::Msk)));
    }

    #[test]
    fn test_unset_field() {
        let value: Option<Hl7Date> = None;
        let field = Field::date("d_2_1_date_birth", DatePrecision::Day, &value);
        assert!(!field.is_set());
        assert!(!field.required);
    }
}
