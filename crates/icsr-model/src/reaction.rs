//! Section E: reactions and events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::{DatePrecision, Hl7Date};
use crate::enums::{CodeList, ReactionOutcome, TermHighlighted};
use crate::field::{Entity, Field};
use crate::null_flavor::{Nullable, flavors};
use crate::reference::ReactionRef;

/// E.i reaction / event.
///
/// `uuid` is a transient identity used to link drug-reaction matrix rows to
/// reactions that have not been persisted yet. It must not be set together
/// with `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionEvent {
    pub id: Option<i64>,
    pub uuid: Option<Uuid>,

    pub e_i_1_1a_reaction_primary_source_native_language: Option<String>,
    pub e_i_1_1b_reaction_primary_source_language: Option<String>,
    pub e_i_1_2_reaction_primary_source_translation: Option<String>,

    pub e_i_2_1a_meddra_version_reaction: Option<String>,
    pub e_i_2_1b_reaction_meddra_code: Option<i64>,

    pub e_i_3_1_term_highlighted_reporter: Option<TermHighlighted>,

    pub e_i_3_2a_results_death: Option<Nullable<bool>>,
    pub e_i_3_2b_life_threatening: Option<Nullable<bool>>,
    pub e_i_3_2c_caused_prolonged_hospitalisation: Option<Nullable<bool>>,
    pub e_i_3_2d_disabling_incapacitating: Option<Nullable<bool>>,
    pub e_i_3_2e_congenital_anomaly_birth_defect: Option<Nullable<bool>>,
    pub e_i_3_2f_other_medically_important_condition: Option<Nullable<bool>>,

    pub e_i_4_date_start_reaction: Option<Nullable<Hl7Date>>,
    pub e_i_5_date_end_reaction: Option<Nullable<Hl7Date>>,

    pub e_i_6a_duration_reaction_num: Option<i64>,
    pub e_i_6b_duration_reaction_unit: Option<String>,

    pub e_i_7_outcome_reaction_last_observation: Option<ReactionOutcome>,
    pub e_i_8_medical_confirmation_healthcare_professional: Option<bool>,
    pub e_i_9_identification_country_reaction: Option<String>,
}

impl ReactionEvent {
    /// Whether a matrix reference points at this reaction.
    pub fn is_referenced_by(&self, reference: &ReactionRef) -> bool {
        match reference {
            ReactionRef::Id(id) => self.id == Some(*id),
            ReactionRef::Uuid(uuid) => self.uuid == Some(*uuid),
        }
    }

    /// The reference other entities should use to point at this reaction.
    pub fn reference(&self) -> Option<ReactionRef> {
        self.id
            .map(ReactionRef::Id)
            .or_else(|| self.uuid.map(ReactionRef::Uuid))
    }

    /// Seriousness criteria (E.i.3.2a-f) in wire order.
    pub fn seriousness(&self) -> [(&'static str, &Option<Nullable<bool>>); 6] {
        [
            ("e_i_3_2a_results_death", &self.e_i_3_2a_results_death),
            ("e_i_3_2b_life_threatening", &self.e_i_3_2b_life_threatening),
            (
                "e_i_3_2c_caused_prolonged_hospitalisation",
                &self.e_i_3_2c_caused_prolonged_hospitalisation,
            ),
            (
                "e_i_3_2d_disabling_incapacitating",
                &self.e_i_3_2d_disabling_incapacitating,
            ),
            (
                "e_i_3_2e_congenital_anomaly_birth_defect",
                &self.e_i_3_2e_congenital_anomaly_birth_defect,
            ),
            (
                "e_i_3_2f_other_medically_important_condition",
                &self.e_i_3_2f_other_medically_important_condition,
            ),
        ]
    }
}

impl Entity for ReactionEvent {
    const NAME: &'static str = "e_i_reaction_event";

    fn fields(&self) -> Vec<Field<'_>> {
        let mut fields = vec![
            Field::text(
                "e_i_1_1a_reaction_primary_source_native_language",
                250,
                &self.e_i_1_1a_reaction_primary_source_native_language,
            ),
            Field::alpha(
                "e_i_1_1b_reaction_primary_source_language",
                3,
                &self.e_i_1_1b_reaction_primary_source_language,
            ),
            Field::text(
                "e_i_1_2_reaction_primary_source_translation",
                250,
                &self.e_i_1_2_reaction_primary_source_translation,
            ),
            Field::text(
                "e_i_2_1a_meddra_version_reaction",
                4,
                &self.e_i_2_1a_meddra_version_reaction,
            )
            .required(),
            Field::integer(
                "e_i_2_1b_reaction_meddra_code",
                &self.e_i_2_1b_reaction_meddra_code,
            )
            .required(),
            Field::code(
                "e_i_3_1_term_highlighted_reporter",
                CodeList::TermHighlighted,
                &self.e_i_3_1_term_highlighted_reporter,
            ),
        ];
        fields.extend(
            self.seriousness()
                .into_iter()
                .map(|(name, value)| Field::marker(name, value).required().flavors(flavors::NI)),
        );
        fields.extend([
            Field::date(
                "e_i_4_date_start_reaction",
                DatePrecision::Year,
                &self.e_i_4_date_start_reaction,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::date(
                "e_i_5_date_end_reaction",
                DatePrecision::Year,
                &self.e_i_5_date_end_reaction,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::integer(
                "e_i_6a_duration_reaction_num",
                &self.e_i_6a_duration_reaction_num,
            ),
            Field::text(
                "e_i_6b_duration_reaction_unit",
                50,
                &self.e_i_6b_duration_reaction_unit,
            ),
            Field::code(
                "e_i_7_outcome_reaction_last_observation",
                CodeList::ReactionOutcome,
                &self.e_i_7_outcome_reaction_last_observation,
            )
            .required(),
            Field::boolean(
                "e_i_8_medical_confirmation_healthcare_professional",
                &self.e_i_8_medical_confirmation_healthcare_professional,
            ),
            Field::alpha(
                "e_i_9_identification_country_reaction",
                2,
                &self.e_i_9_identification_country_reaction,
            ),
        ]);
        fields
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_prefers_id() {
        let uuid = Uuid::new_v4();
        let reaction = ReactionEvent {
            uuid: Some(uuid),
            ..Default::default()
        };
        assert_eq!(reaction.reference(), Some(ReactionRef::Uuid(uuid)));
        assert!(reaction.is_referenced_by(&ReactionRef::Uuid(uuid)));
        assert!(!reaction.is_referenced_by(&ReactionRef::Id(1)));

        let persisted = ReactionEvent {
            id: Some(7),
            ..Default::default()
        };
        assert_eq!(persisted.reference(), Some(ReactionRef::Id(7)));
    }

    #[test]
    fn test_seriousness_fields_are_required_markers() {
        let reaction = ReactionEvent::default();
        let markers: Vec<_> = reaction
            .fields()
            .into_iter()
            .filter(|field| field.name.starts_with("e_i_3_2"))
            .collect();
        assert_eq!(markers.len(), 6);
        assert!(markers.iter().all(|field| field.required));
    }
}
