//! Required field presence.

use icsr_model::{Field, Location, ValidationIssue};

/// A required field must hold either a value or an accepted null flavor.
pub fn check(fields: &[Field<'_>], location: &Location) -> Vec<ValidationIssue> {
    fields
        .iter()
        .filter(|field| field.required && !field.is_set())
        .map(|field| ValidationIssue::business(location.field(field.name), "Value is required"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{NullFlavor, Nullable};

    #[test]
    fn test_required_fields() {
        let missing: Option<String> = None;
        let masked = Some(Nullable::<String>::NullFlavor(NullFlavor::Msk));
        let optional: Option<String> = None;
        let fields = vec![
            Field::text("h_1_case_narrative", 100_000, &missing).required(),
            Field::text("d_1_patient", 60, &masked).required(),
            Field::text("h_2_reporter_comments", 20_000, &optional),
        ];
        let issues = check(&fields, &Location::root().field("h_narrative_case_summary"));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].location.to_string(),
            "h_narrative_case_summary.h_1_case_narrative"
        );
        assert_eq!(issues[0].message, "Value is required");
    }
}
