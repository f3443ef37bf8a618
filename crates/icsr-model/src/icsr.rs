use serde::{Deserialize, Serialize};

use crate::drug::DrugInformation;
use crate::field::{Entity, Field};
use crate::identification::{
    CaseIdentification, LiteratureReference, PrimarySource, Sender, StudyIdentification,
};
use crate::narrative::Narrative;
use crate::patient::Patient;
use crate::reaction::ReactionEvent;
use crate::reference::ReactionRef;
use crate::test_result::TestResult;

/// Individual case safety report, the aggregate root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icsr {
    pub id: Option<i64>,

    pub c_1_identification_case_safety_report: Option<CaseIdentification>,
    pub c_2_r_primary_source_information: Vec<PrimarySource>,
    pub c_3_information_sender_case_safety_report: Option<Sender>,
    pub c_4_r_literature_reference: Vec<LiteratureReference>,
    pub c_5_study_identification: Option<StudyIdentification>,
    pub d_patient_characteristics: Option<Patient>,
    pub e_i_reaction_event: Vec<ReactionEvent>,
    pub f_r_results_tests_procedures_investigation_patient: Vec<TestResult>,
    pub g_k_drug_information: Vec<DrugInformation>,
    pub h_narrative_case_summary: Option<Narrative>,
}

impl Icsr {
    /// The first reported reaction is the primary one.
    pub fn primary_reaction(&self) -> Option<&ReactionEvent> {
        self.e_i_reaction_event.first()
    }

    /// A report is initial when its worldwide unique case id equals the
    /// sender's safety report id.
    pub fn is_initial(&self) -> bool {
        self.c_1_identification_case_safety_report
            .as_ref()
            .is_some_and(|c_1| {
                c_1.c_1_1_sender_safety_report_unique_id.is_some()
                    && c_1.c_1_8_1_worldwide_unique_case_identification_number
                        == c_1.c_1_1_sender_safety_report_unique_id
            })
    }

    /// Sender's safety report id (C.1.1), when set.
    pub fn safety_report_id(&self) -> Option<&str> {
        self.c_1_identification_case_safety_report
            .as_ref()
            .and_then(|c_1| c_1.c_1_1_sender_safety_report_unique_id.as_deref())
    }

    /// Position of the reaction a matrix reference points at.
    pub fn reaction_position(&self, reference: &ReactionRef) -> Option<usize> {
        self.e_i_reaction_event
            .iter()
            .position(|reaction| reaction.is_referenced_by(reference))
    }
}

impl Entity for Icsr {
    const NAME: &'static str = "icsr";

    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_is_initial() {
        let mut icsr = Icsr::default();
        assert!(!icsr.is_initial());

        icsr.c_1_identification_case_safety_report = Some(CaseIdentification {
            c_1_1_sender_safety_report_unique_id: Some("DE-ACME-2024-1".to_string()),
            c_1_8_1_worldwide_unique_case_identification_number: Some(
                "DE-ACME-2024-1".to_string(),
            ),
            ..Default::default()
        });
        assert!(icsr.is_initial());
        assert_eq!(icsr.safety_report_id(), Some("DE-ACME-2024-1"));

        if let Some(c_1) = icsr.c_1_identification_case_safety_report.as_mut() {
            c_1.c_1_8_1_worldwide_unique_case_identification_number =
                Some("FR-OTHER-9".to_string());
        }
        assert!(!icsr.is_initial());
    }

    #[test]
    fn test_primary_reaction_and_position() {
        let uuid = Uuid::new_v4();
        let icsr = Icsr {
            e_i_reaction_event: vec![
                ReactionEvent {
                    id: Some(3),
                    ..Default::default()
                },
                ReactionEvent {
                    uuid: Some(uuid),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(icsr.primary_reaction().and_then(|r| r.id), Some(3));
        assert_eq!(icsr.reaction_position(&ReactionRef::Uuid(uuid)), Some(1));
        assert_eq!(icsr.reaction_position(&ReactionRef::Id(4)), None);
        assert_eq!(Icsr::default().primary_reaction(), None);
    }

    #[test]
    fn test_json_defaults() {
        let icsr: Icsr = serde_json::from_str(r#"{"e_i_reaction_event": [{}]}"#).unwrap();
        assert_eq!(icsr.e_i_reaction_event.len(), 1);
        assert!(icsr.c_1_identification_case_safety_report.is_none());
    }
}
