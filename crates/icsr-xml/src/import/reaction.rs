//! Section E: reactions, addressed by `r-id{n}`.

use icsr_model::{Icsr, Location, ReactionEvent};
use tracing::debug;
use uuid::Uuid;

use crate::codes::ObservationCode;
use crate::common::{Decoder, Scope, code_of};
use crate::tree::Element;

use super::{ReactionIds, role_observations};

/// Read the reaction observations of the primary role.
///
/// Every reaction gets a fresh transient id; the returned map resolves the
/// `r-id` wire identifiers used by drug sections to those ids.
pub(super) fn read(icsr: &mut Icsr, role: &Element, decoder: &mut Decoder) -> ReactionIds {
    let mut ids = ReactionIds::default();
    for observation in role_observations(role)
        .filter(|observation| code_of::<ObservationCode>(observation) == Some(ObservationCode::Reaction))
    {
        let index = icsr.e_i_reaction_event.len();
        let uuid = Uuid::new_v4();
        if let Some(wire_id) = observation.first("id").and_then(|id| id.get("extension")) {
            ids.insert(wire_id, uuid);
        }
        let mut scope = decoder.scope(Location::root().item("e_i_reaction_event", index));
        let mut reaction = reaction_event(&mut scope, observation);
        reaction.uuid = Some(uuid);
        icsr.e_i_reaction_event.push(reaction);
    }
    debug!(count = icsr.e_i_reaction_event.len(), "reactions read");
    ids
}

fn reaction_event(scope: &mut Scope<'_>, observation: &Element) -> ReactionEvent {
    let value = observation.first("value");
    let original = value.and_then(|value| value.first("originalText"));
    let period = observation.first("effectiveTime");
    let width = period.and_then(|period| period.first("width"));

    let mut reaction = ReactionEvent {
        e_i_1_1a_reaction_primary_source_native_language: scope
            .text("e_i_1_1a_reaction_primary_source_native_language", original),
        e_i_1_1b_reaction_primary_source_language: scope.attr(
            "e_i_1_1b_reaction_primary_source_language",
            original,
            "language",
        ),
        e_i_2_1a_meddra_version_reaction: scope.attr(
            "e_i_2_1a_meddra_version_reaction",
            value,
            "codeSystemVersion",
        ),
        e_i_2_1b_reaction_meddra_code: scope.attr("e_i_2_1b_reaction_meddra_code", value, "code"),
        e_i_4_date_start_reaction: scope.nullable_attr(
            "e_i_4_date_start_reaction",
            period.and_then(|period| period.first("low")),
            "value",
        ),
        e_i_5_date_end_reaction: scope.nullable_attr(
            "e_i_5_date_end_reaction",
            period.and_then(|period| period.first("high")),
            "value",
        ),
        e_i_6a_duration_reaction_num: scope.attr("e_i_6a_duration_reaction_num", width, "value"),
        e_i_6b_duration_reaction_unit: scope.attr("e_i_6b_duration_reaction_unit", width, "unit"),
        e_i_9_identification_country_reaction: scope.attr(
            "e_i_9_identification_country_reaction",
            observation.find("location/locatedEntity/locatedPlace/code"),
            "code",
        ),
        ..Default::default()
    };

    for detail in observation
        .all("outboundRelationship2")
        .filter_map(|link| link.first("observation"))
    {
        let value = detail.first("value");
        let Some(code) = code_of::<ObservationCode>(detail) else {
            continue;
        };
        match code {
            ObservationCode::ReactionTranslation => {
                reaction.e_i_1_2_reaction_primary_source_translation =
                    scope.text("e_i_1_2_reaction_primary_source_translation", value);
            }
            ObservationCode::TermHighlighted => {
                reaction.e_i_3_1_term_highlighted_reporter =
                    scope.attr("e_i_3_1_term_highlighted_reporter", value, "code");
            }
            ObservationCode::ResultsInDeath => {
                reaction.e_i_3_2a_results_death =
                    scope.nullable_attr("e_i_3_2a_results_death", value, "value");
            }
            ObservationCode::LifeThreatening => {
                reaction.e_i_3_2b_life_threatening =
                    scope.nullable_attr("e_i_3_2b_life_threatening", value, "value");
            }
            ObservationCode::Hospitalisation => {
                reaction.e_i_3_2c_caused_prolonged_hospitalisation = scope.nullable_attr(
                    "e_i_3_2c_caused_prolonged_hospitalisation",
                    value,
                    "value",
                );
            }
            ObservationCode::Disabling => {
                reaction.e_i_3_2d_disabling_incapacitating =
                    scope.nullable_attr("e_i_3_2d_disabling_incapacitating", value, "value");
            }
            ObservationCode::CongenitalAnomaly => {
                reaction.e_i_3_2e_congenital_anomaly_birth_defect = scope.nullable_attr(
                    "e_i_3_2e_congenital_anomaly_birth_defect",
                    value,
                    "value",
                );
            }
            ObservationCode::OtherMedicallyImportant => {
                reaction.e_i_3_2f_other_medically_important_condition = scope.nullable_attr(
                    "e_i_3_2f_other_medically_important_condition",
                    value,
                    "value",
                );
            }
            ObservationCode::Outcome => {
                reaction.e_i_7_outcome_reaction_last_observation =
                    scope.attr("e_i_7_outcome_reaction_last_observation", value, "code");
            }
            ObservationCode::MedicalConfirmation => {
                reaction.e_i_8_medical_confirmation_healthcare_professional = scope.attr(
                    "e_i_8_medical_confirmation_healthcare_professional",
                    value,
                    "value",
                );
            }
            _ => {}
        }
    }
    reaction
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{NullFlavor, Nullable, ReactionRef};

    use crate::tree;

    const ROLE: &str = r#"
        <primaryRole>
          <subjectOf2 typeCode="SBJ">
            <observation classCode="OBS" moodCode="EVN">
              <id root="2.16.840.1.113883.3.989.2.1.3.15" extension="r-id1"/>
              <code code="29" codeSystem="2.16.840.1.113883.3.989.2.1.1.19"/>
              <effectiveTime>
                <low value="20240110"/>
                <width value="3" unit="d"/>
              </effectiveTime>
              <value code="10019211" codeSystem="2.16.840.1.113883.6.163" codeSystemVersion="26.1">
                <originalText language="eng">headache</originalText>
              </value>
              <outboundRelationship2 typeCode="PERT">
                <observation classCode="OBS" moodCode="EVN">
                  <code code="34" codeSystem="2.16.840.1.113883.3.989.2.1.1.19"/>
                  <value value="true"/>
                </observation>
              </outboundRelationship2>
              <outboundRelationship2 typeCode="PERT">
                <observation classCode="OBS" moodCode="EVN">
                  <code code="21" codeSystem="2.16.840.1.113883.3.989.2.1.1.19"/>
                  <value nullFlavor="NI"/>
                </observation>
              </outboundRelationship2>
            </observation>
          </subjectOf2>
        </primaryRole>"#;

    #[test]
    fn test_reaction_fields_and_wire_id() {
        let role = tree::parse(ROLE).unwrap();
        let mut icsr = Icsr::default();
        let mut decoder = Decoder::new();
        let ids = read(&mut icsr, &role, &mut decoder);
        assert!(decoder.into_issues().is_empty());

        let reaction = &icsr.e_i_reaction_event[0];
        assert_eq!(reaction.e_i_2_1b_reaction_meddra_code, Some(10019211));
        assert_eq!(reaction.e_i_2_1a_meddra_version_reaction.as_deref(), Some("26.1"));
        assert_eq!(
            reaction.e_i_1_1a_reaction_primary_source_native_language.as_deref(),
            Some("headache")
        );
        assert_eq!(reaction.e_i_6a_duration_reaction_num, Some(3));
        assert_eq!(reaction.e_i_3_2a_results_death, Some(Nullable::Value(true)));
        assert_eq!(
            reaction.e_i_3_2b_life_threatening,
            Some(Nullable::NullFlavor(NullFlavor::Ni))
        );
        assert_eq!(reaction.id, None);

        let resolved = ids.resolve(Some("r-id1"));
        assert_eq!(resolved, reaction.uuid.map(ReactionRef::Uuid));
        assert!(ids.resolve(None).is_none());
        assert_ne!(ids.resolve(Some("r-id9")), resolved);
    }
}
