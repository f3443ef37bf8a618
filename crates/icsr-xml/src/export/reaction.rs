//! Section E: reactions, addressed by `r-id{n}`.

use icsr_model::{Icsr, ReactionEvent};

use crate::codes::{ObservationCode, SERIOUSNESS};
use crate::common::{
    bl_nullable, bl_value, ce_value, code_element, country_code, ed_value, id_element, meddra,
    non_empty, nullable_value_element, observation, oid, reaction_id,
};
use crate::tree::Element;

use super::{relationship, subject};

fn duration(reaction: &ReactionEvent) -> Option<Element> {
    (reaction.e_i_6a_duration_reaction_num.is_some()
        || reaction.e_i_6b_duration_reaction_unit.is_some())
    .then(|| {
        Element::new("width")
            .value("value", &reaction.e_i_6a_duration_reaction_num)
            .value("unit", &reaction.e_i_6b_duration_reaction_unit)
    })
}

fn reported_term(reaction: &ReactionEvent) -> Option<Element> {
    let native = &reaction.e_i_1_1a_reaction_primary_source_native_language;
    let language = &reaction.e_i_1_1b_reaction_primary_source_language;
    (native.is_some() || language.is_some()).then(|| {
        let original = Element::new("originalText").value("language", language);
        match native {
            Some(text) => original.with_text(text.as_str()),
            None => original,
        }
    })
}

fn reaction_observation(index: usize, reaction: &ReactionEvent) -> Element {
    let period = Element::new("effectiveTime")
        .xsi_type("IVL_TS")
        .maybe_child(nullable_value_element("low", &reaction.e_i_4_date_start_reaction))
        .maybe_child(nullable_value_element("high", &reaction.e_i_5_date_end_reaction))
        .maybe_child(duration(reaction));
    let value = meddra(
        "value",
        &reaction.e_i_2_1a_meddra_version_reaction,
        &reaction.e_i_2_1b_reaction_meddra_code,
    )
    .xsi_type("CE")
    .maybe_child(reported_term(reaction));
    let country = country_code(&reaction.e_i_9_identification_country_reaction).map(|code| {
        Element::new("location").attr("typeCode", "LOC").child(
            Element::new("locatedEntity").attr("classCode", "LOCE").child(
                Element::new("locatedPlace")
                    .attr("classCode", "COUNTRY")
                    .attr("determinerCode", "INSTANCE")
                    .child(code),
            ),
        )
    });

    let mut details = vec![
        (
            ObservationCode::ReactionTranslation,
            ed_value(&reaction.e_i_1_2_reaction_primary_source_translation),
        ),
        (
            ObservationCode::TermHighlighted,
            ce_value(&reaction.e_i_3_1_term_highlighted_reporter),
        ),
    ];
    details.extend(
        SERIOUSNESS
            .into_iter()
            .zip(reaction.seriousness())
            .map(|(code, (_, value))| (code, bl_nullable(value))),
    );
    details.push((
        ObservationCode::Outcome,
        ce_value(&reaction.e_i_7_outcome_reaction_last_observation),
    ));
    details.push((
        ObservationCode::MedicalConfirmation,
        bl_value(&reaction.e_i_8_medical_confirmation_healthcare_professional),
    ));

    Element::new("observation")
        .attr("classCode", "OBS")
        .attr("moodCode", "EVN")
        .child(id_element(oid::LOCAL_ID, reaction_id(index)))
        .child(code_element(ObservationCode::Reaction))
        .maybe_child(non_empty(period))
        .child(value)
        .maybe_child(country)
        .with_children(details.into_iter().filter_map(|(code, value)| {
            value.map(|value| {
                relationship(
                    "outboundRelationship2",
                    "PERT",
                    observation(code, Some(value)),
                )
            })
        }))
}

/// One `subjectOf2/observation` per reaction, in report order.
pub(super) fn observations(icsr: &Icsr) -> Vec<Element> {
    icsr.e_i_reaction_event
        .iter()
        .enumerate()
        .map(|(index, reaction)| subject(reaction_observation(index, reaction)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{NullFlavor, Nullable};

    #[test]
    fn test_seriousness_criteria_are_coded() {
        let reaction = ReactionEvent {
            e_i_3_2a_results_death: Some(Nullable::Value(true)),
            e_i_3_2f_other_medically_important_condition: Some(Nullable::NullFlavor(
                NullFlavor::Ni,
            )),
            ..Default::default()
        };
        let element = reaction_observation(1, &reaction);
        assert_eq!(element.find("id").and_then(|id| id.get("extension")), Some("r-id2"));

        let criteria: Vec<(i64, Option<&str>, Option<&str>)> = element
            .all("outboundRelationship2")
            .filter_map(|relationship| relationship.first("observation"))
            .map(|observation| {
                let code = observation
                    .find("code")
                    .and_then(|code| code.get("code"))
                    .and_then(|code| code.parse().ok())
                    .unwrap_or_default();
                let value = observation.first("value");
                (
                    code,
                    value.and_then(|value| value.get("value")),
                    value.and_then(|value| value.get("nullFlavor")),
                )
            })
            .collect();
        assert_eq!(criteria, vec![(34, Some("true"), None), (26, None, Some("NI"))]);
    }

    #[test]
    fn test_reported_term_keeps_language() {
        let reaction = ReactionEvent {
            e_i_1_1a_reaction_primary_source_native_language: Some("Kopfschmerzen".to_string()),
            e_i_1_1b_reaction_primary_source_language: Some("deu".to_string()),
            ..Default::default()
        };
        let element = reaction_observation(0, &reaction);
        let original = element.find("value/originalText").unwrap();
        assert_eq!(original.get("language"), Some("deu"));
        assert_eq!(original.text().as_deref(), Some("Kopfschmerzen"));
    }
}
