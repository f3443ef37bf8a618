use icsr_model::TestResult;

use super::{Rule, RuleSet};

impl RuleSet for TestResult {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "F.r.1",
            field: "f_r_1_test_date",
            message: "F.r.1 is required if F.r.2 is populated",
            check: |test| !test.has_test_name() || test.f_r_1_test_date.is_some(),
        },
        Rule {
            id: "F.r.3",
            field: "f_r_3_1_test_result_code",
            message: "F.r.3.1 is required if F.r.2 is populated and neither F.r.3.2 nor F.r.3.4 \
                      is populated; F.r.3.2 and F.r.3.4 follow the same condition",
            // Fails when exactly two of the three result forms are missing.
            check: |test| {
                let missing = [
                    test.f_r_3_2_test_result_val_qual.is_none(),
                    test.f_r_3_4_result_unstructured_data.is_none(),
                    test.f_r_3_1_test_result_code.is_none(),
                ]
                .into_iter()
                .filter(|missing| *missing)
                .count();
                !test.has_test_name() || missing != 2
            },
        },
        Rule {
            id: "F.r.3.3",
            field: "f_r_3_3_test_result_unit",
            message: "F.r.3.3 is required if F.r.2 is populated",
            check: |test| !test.has_test_name() || test.f_r_3_3_test_result_unit.is_some(),
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{Hl7Date, Nullable, TestResultCode};
    use rust_decimal::Decimal;

    fn failing(test: &TestResult) -> Vec<&'static str> {
        TestResult::RULES
            .iter()
            .filter(|rule| !rule.holds(test))
            .map(|rule| rule.id)
            .collect()
    }

    #[test]
    fn test_unnamed_test_has_no_requirements() {
        assert!(failing(&TestResult::default()).is_empty());
    }

    #[test]
    fn test_named_test_requirements() {
        let mut test = TestResult {
            f_r_2_1_test_name: Some("Haemoglobin".to_string()),
            ..Default::default()
        };
        // No result form given at all: the two-of-three condition does not fire.
        assert_eq!(failing(&test), vec!["F.r.1", "F.r.3.3"]);

        test.f_r_1_test_date = Some(Nullable::Value(Hl7Date::parse("20240105").unwrap()));
        test.f_r_3_3_test_result_unit = Some("g/dL".to_string());
        test.f_r_3_2_test_result_val_qual = Some(Nullable::Value(Decimal::new(118, 1)));
        assert_eq!(failing(&test), vec!["F.r.3"]);

        test.f_r_3_1_test_result_code = Some(TestResultCode::Negative);
        assert!(failing(&test).is_empty());
    }
}
