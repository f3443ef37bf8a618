//! Field type and format checks.
//!
//! Decoding already guarantees the Rust type of a value; what remains are the
//! declared limits the type system does not carry: non-blank text within its
//! length, alphabetic codes, date precision, literal-true markers and accepted
//! null flavors.

use icsr_model::{
    CodeList, DatePrecision, Field, FieldType, FieldValue, Location, NullFlavor, ValidationIssue,
};

/// Check one populated field against its declared type.
pub fn check(field: &Field<'_>, location: &Location) -> Option<ValidationIssue> {
    let value = field.value?;
    let message = match (value, field.field_type) {
        (FieldValue::NullFlavor(flavor), _) => null_flavor_message(flavor, field.null_flavors),
        (FieldValue::Text(text), FieldType::AlphaNumeric(max)) => text_message(text, max),
        (FieldValue::Text(text), FieldType::Alpha(len)) => alpha_message(text, len),
        (FieldValue::Date(date), FieldType::Date(min)) => {
            precision_message(date.precision(), min)
        }
        (FieldValue::Boolean(false), FieldType::TrueMarker) => {
            Some("Input should be true".to_string())
        }
        (FieldValue::Code(code), FieldType::Code(list)) => code_message(code, list),
        _ => None,
    }?;
    Some(ValidationIssue::structural(location.field(field.name), message))
}

fn null_flavor_message(flavor: NullFlavor, accepted: &[NullFlavor]) -> Option<String> {
    if accepted.contains(&flavor) {
        return None;
    }
    if accepted.is_empty() {
        return Some(format!("Null flavor {flavor} is not accepted for this field"));
    }
    let expected = accepted
        .iter()
        .map(NullFlavor::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "Null flavor {flavor} is not accepted, expected one of: {expected}"
    ))
}

/// Blank text has no XML form: whitespace-only content reads back as absent.
fn text_message(text: &str, max: usize) -> Option<String> {
    if text.trim().is_empty() {
        return Some("String should not be blank".to_string());
    }
    let length = text.chars().count();
    (length > max).then(|| format!("String should have at most {max} characters, got {length}"))
}

fn alpha_message(text: &str, len: usize) -> Option<String> {
    let valid = text.chars().count() == len && text.chars().all(|c| c.is_ascii_alphabetic());
    (!valid).then(|| format!("String should be exactly {len} alphabetic characters"))
}

fn precision_message(actual: DatePrecision, min: DatePrecision) -> Option<String> {
    (actual < min).then(|| format!("Date should be precise to at least the {min}, got {actual}"))
}

fn code_message(code: i64, list: CodeList) -> Option<String> {
    (!list.contains(code)).then(|| format!("Code {code} is not in code list {list}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::null_flavor::flavors;
    use icsr_model::{Hl7Date, Nullable};

    fn issue_for(field: &Field<'_>) -> Option<String> {
        check(field, &Location::root()).map(|issue| issue.message)
    }

    #[test]
    fn test_text_length() {
        let ok = Some("x".repeat(60));
        assert_eq!(issue_for(&Field::text("d_1_patient", 60, &ok)), None);
        let long = Some("x".repeat(61));
        assert_eq!(
            issue_for(&Field::text("d_1_patient", 60, &long)).as_deref(),
            Some("String should have at most 60 characters, got 61")
        );
    }

    #[test]
    fn test_blank_text() {
        for blank in ["", "  ", "\n\t"] {
            let value = Some(blank.to_string());
            assert_eq!(
                issue_for(&Field::text("h_1_case_narrative", 100_000, &value)).as_deref(),
                Some("String should not be blank")
            );
        }
        let padded = Some(" x ".to_string());
        assert_eq!(issue_for(&Field::text("h_1_case_narrative", 100_000, &padded)), None);
    }

    #[test]
    fn test_alpha_codes() {
        let ok = Some("DE".to_string());
        assert_eq!(issue_for(&Field::alpha("c", 2, &ok)), None);
        let digits = Some("D1".to_string());
        assert!(issue_for(&Field::alpha("c", 2, &digits)).is_some());
        let long = Some("DEU".to_string());
        assert!(issue_for(&Field::alpha("c", 2, &long)).is_some());
    }

    #[test]
    fn test_date_precision() {
        let day = Some(Hl7Date::parse("20240102").unwrap());
        assert_eq!(issue_for(&Field::date("d", DatePrecision::Day, &day)), None);
        assert!(issue_for(&Field::date("d", DatePrecision::Second, &day)).is_some());
    }

    #[test]
    fn test_true_marker() {
        let value = Some(false);
        assert_eq!(
            issue_for(&Field::marker("d_7_3", &value)).as_deref(),
            Some("Input should be true")
        );
        let value = Some(true);
        assert_eq!(issue_for(&Field::marker("d_7_3", &value)), None);
    }

    #[test]
    fn test_null_flavor_acceptance() {
        let value: Option<Nullable<String>> = Some(Nullable::NullFlavor(NullFlavor::Unk));
        let field = Field::text("c_2_r_1_2_reporter_given_name", 60, &value);
        assert!(issue_for(&field.clone().flavors(flavors::MSK_ASKU_NASK)).is_some());
        assert_eq!(issue_for(&field.flavors(flavors::MSK_ASKU_NASK_UNK)), None);

        let plain: Option<Nullable<bool>> = Some(Nullable::NullFlavor(NullFlavor::Ni));
        assert_eq!(
            issue_for(&Field::boolean("f", &plain)).as_deref(),
            Some("Null flavor NI is not accepted for this field")
        );
    }
}
