use icsr_model::{
    CaseIdentification, DocumentHeldBySender, LinkedReport, LiteratureReference, Nullable,
    PrimarySource, Sender, SenderType, SourceCaseId, StudyIdentification, StudyRegistration,
};

use super::{Rule, RuleSet, pair, requires};

impl RuleSet for CaseIdentification {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "C.1.1",
            field: "c_1_1_sender_safety_report_unique_id",
            message: "C.1.1 could not be determined: check that exactly one primary source \
                      with C.2.r.5 and C.2.r.3 exists and that the sender organisation is set",
            check: |c_1| c_1.c_1_1_sender_safety_report_unique_id.is_some(),
        },
        Rule {
            id: "C.1.6.1.r",
            field: "c_1_6_1_r_documents_held_sender",
            message: "C.1.6.1.r is required if and only if C.1.6.1 is true",
            check: |c_1| {
                !c_1.c_1_6_1_r_documents_held_sender.is_empty()
                    == (c_1.c_1_6_1_additional_documents_available == Some(true))
            },
        },
        Rule {
            id: "C.1.9.1.r",
            field: "c_1_9_1_r_source_case_id",
            message: "C.1.9.1.r is required if and only if C.1.9.1 is true",
            check: |c_1| {
                !c_1.c_1_9_1_r_source_case_id.is_empty()
                    == matches!(
                        c_1.c_1_9_1_other_case_ids_previous_transmissions,
                        Some(Nullable::Value(true))
                    )
            },
        },
        Rule {
            id: "C.1.11.2",
            field: "c_1_11_2_reason_nullification_amendment",
            message: "C.1.11.1 and C.1.11.2 must be provided together",
            check: |c_1| {
                pair(
                    &c_1.c_1_11_1_report_nullification_amendment,
                    &c_1.c_1_11_2_reason_nullification_amendment,
                )
            },
        },
    ];
}

impl RuleSet for DocumentHeldBySender {}

impl RuleSet for SourceCaseId {}

impl RuleSet for LinkedReport {}

impl RuleSet for PrimarySource {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "C.2.r.3",
            field: "c_2_r_3_reporter_country_code",
            message: "C.2.r.3 is required if C.2.r.5 is populated",
            check: |source| {
                requires(
                    &source.c_2_r_5_primary_source_regulatory_purposes,
                    &source.c_2_r_3_reporter_country_code,
                )
            },
        },
        Rule {
            id: "C.2.r.4",
            field: "c_2_r_4_qualification",
            message: "C.2.r.4 is required if C.2.r.5 is populated",
            check: |source| {
                requires(
                    &source.c_2_r_5_primary_source_regulatory_purposes,
                    &source.c_2_r_4_qualification,
                )
            },
        },
    ];
}

impl RuleSet for Sender {
    const RULES: &'static [Rule<Self>] = &[Rule {
        id: "C.3.2",
        field: "c_3_2_sender_organisation",
        message: "C.3.2 is required if C.3.1 is coded as patient / consumer",
        check: |sender| {
            sender.c_3_1_sender_type != Some(SenderType::PatientOrConsumer)
                || sender.c_3_2_sender_organisation.is_some()
        },
    }];
}

impl RuleSet for LiteratureReference {}

impl RuleSet for StudyIdentification {}

impl RuleSet for StudyRegistration {}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{NullFlavor, NullificationAmendment, RegulatoryPurpose};

    fn failing<T: RuleSet>(entity: &T) -> Vec<&'static str> {
        T::RULES
            .iter()
            .filter(|rule| !rule.holds(entity))
            .map(|rule| rule.id)
            .collect()
    }

    fn valid_c_1() -> CaseIdentification {
        CaseIdentification {
            c_1_1_sender_safety_report_unique_id: Some("US-ACME-1".to_string()),
            c_1_6_1_additional_documents_available: Some(false),
            c_1_9_1_other_case_ids_previous_transmissions: Some(Nullable::NullFlavor(
                NullFlavor::Ni,
            )),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_identification_passes() {
        assert!(failing(&valid_c_1()).is_empty());
    }

    #[test]
    fn test_sender_report_id_required() {
        let mut c_1 = valid_c_1();
        c_1.c_1_1_sender_safety_report_unique_id = None;
        assert_eq!(failing(&c_1), vec!["C.1.1"]);
    }

    #[test]
    fn test_nullification_pair() {
        let mut c_1 = valid_c_1();
        c_1.c_1_11_2_reason_nullification_amendment = Some("duplicate".to_string());
        assert_eq!(failing(&c_1), vec!["C.1.11.2"]);

        let mut c_1 = valid_c_1();
        c_1.c_1_11_1_report_nullification_amendment = Some(NullificationAmendment::Amendment);
        assert_eq!(failing(&c_1), vec!["C.1.11.2"]);

        c_1.c_1_11_2_reason_nullification_amendment = Some("follow-up data".to_string());
        assert!(failing(&c_1).is_empty());
    }

    #[test]
    fn test_documents_follow_flag() {
        let mut c_1 = valid_c_1();
        c_1.c_1_6_1_r_documents_held_sender.push(DocumentHeldBySender::default());
        assert_eq!(failing(&c_1), vec!["C.1.6.1.r"]);

        c_1.c_1_6_1_additional_documents_available = Some(true);
        assert!(failing(&c_1).is_empty());

        c_1.c_1_6_1_r_documents_held_sender.clear();
        assert_eq!(failing(&c_1), vec!["C.1.6.1.r"]);
    }

    #[test]
    fn test_other_case_ids_need_concrete_true() {
        let mut c_1 = valid_c_1();
        c_1.c_1_9_1_r_source_case_id.push(SourceCaseId::default());
        assert_eq!(failing(&c_1), vec!["C.1.9.1.r"]);

        c_1.c_1_9_1_other_case_ids_previous_transmissions = Some(Nullable::Value(true));
        assert!(failing(&c_1).is_empty());
    }

    #[test]
    fn test_primary_source_requirements() {
        let mut source = PrimarySource {
            c_2_r_5_primary_source_regulatory_purposes: Some(RegulatoryPurpose::Primary),
            ..Default::default()
        };
        assert_eq!(failing(&source), vec!["C.2.r.3", "C.2.r.4"]);

        source.c_2_r_3_reporter_country_code = Some("DE".to_string());
        source.c_2_r_4_qualification = Some(Nullable::NullFlavor(NullFlavor::Unk));
        assert!(failing(&source).is_empty());

        assert!(failing(&PrimarySource::default()).is_empty());
    }

    #[test]
    fn test_consumer_sender_needs_organisation() {
        let mut sender = Sender {
            c_3_1_sender_type: Some(SenderType::PatientOrConsumer),
            ..Default::default()
        };
        assert_eq!(failing(&sender), vec!["C.3.2"]);
        sender.c_3_1_sender_type = Some(SenderType::RegulatoryAuthority);
        assert!(failing(&sender).is_empty());
    }
}
