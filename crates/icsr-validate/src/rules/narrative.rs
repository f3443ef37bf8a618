use icsr_model::{Narrative, ReporterCommentsNative, SenderDiagnosis};

use super::{Rule, RuleSet, pair};

impl RuleSet for Narrative {}

impl RuleSet for SenderDiagnosis {
    const RULES: &'static [Rule<Self>] = &[Rule {
        id: "H.3.r.1",
        field: "h_3_r_1a_meddra_version_sender_diagnosis",
        message: "H.3.r.1a and H.3.r.1b must be provided together",
        check: |diagnosis| {
            pair(
                &diagnosis.h_3_r_1a_meddra_version_sender_diagnosis,
                &diagnosis.h_3_r_1b_sender_diagnosis_meddra_code,
            )
        },
    }];
}

impl RuleSet for ReporterCommentsNative {
    const RULES: &'static [Rule<Self>] = &[Rule {
        id: "H.5.r.1b",
        field: "h_5_r_1b_case_summary_reporter_comments_language",
        message: "H.5.r.1b is required if H.5.r.1a is populated",
        // Fails when a language is given without text.
        check: |comments| {
            comments.h_5_r_1a_case_summary_reporter_comments_text.is_some()
                || comments
                    .h_5_r_1b_case_summary_reporter_comments_language
                    .is_none()
        },
    }];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing<T: RuleSet>(entity: &T) -> Vec<&'static str> {
        T::RULES
            .iter()
            .filter(|rule| !rule.holds(entity))
            .map(|rule| rule.id)
            .collect()
    }

    #[test]
    fn test_sender_diagnosis_pair() {
        assert!(failing(&SenderDiagnosis::default()).is_empty());

        let version_only = SenderDiagnosis {
            h_3_r_1a_meddra_version_sender_diagnosis: Some("26.1".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&version_only), vec!["H.3.r.1"]);

        let code_only = SenderDiagnosis {
            h_3_r_1b_sender_diagnosis_meddra_code: Some(10_019_211),
            ..Default::default()
        };
        assert_eq!(failing(&code_only), vec!["H.3.r.1"]);

        let coded = SenderDiagnosis {
            h_3_r_1a_meddra_version_sender_diagnosis: Some("26.1".to_string()),
            h_3_r_1b_sender_diagnosis_meddra_code: Some(10_019_211),
            ..Default::default()
        };
        assert!(failing(&coded).is_empty());
    }

    #[test]
    fn test_comment_language_needs_text() {
        assert!(failing(&ReporterCommentsNative::default()).is_empty());

        let mut comments = ReporterCommentsNative {
            h_5_r_1b_case_summary_reporter_comments_language: Some("de".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&comments), vec!["H.5.r.1b"]);

        comments.h_5_r_1a_case_summary_reporter_comments_text = Some("Kopfschmerzen".to_string());
        assert!(failing(&comments).is_empty());

        // Text without a language is allowed.
        comments.h_5_r_1b_case_summary_reporter_comments_language = None;
        assert!(failing(&comments).is_empty());
    }
}
