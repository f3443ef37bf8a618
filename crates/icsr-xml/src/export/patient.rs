//! Section D: patient, parent and their histories.

use icsr_model::{Hl7Date, Nullable, Patient};
use tracing::debug;

use crate::codes::{ObservationCode, OrganizerCode, RecordSource};
use crate::common::{
    bl_nullable, bl_value, ce_value, code_element, coded_nullable, ed_nullable, ed_value,
    interval, meddra, meddra_value, non_empty, nullable_text_element, nullable_value_element,
    observation, oid, pq_value, quantity, text_element, ts_nullable, ts_value, versioned_code,
};
use crate::tree::Element;

use super::{consumable, organizer, relationship, subject};

/// A structured medical history entry, patient or parent.
struct HistoryRow<'a> {
    version: &'a Option<String>,
    code: &'a Option<i64>,
    start: &'a Option<Nullable<Hl7Date>>,
    continuing: &'a Option<Nullable<bool>>,
    end: &'a Option<Nullable<Hl7Date>>,
    comments: &'a Option<String>,
    family_history: &'a Option<bool>,
}

/// A past drug therapy entry, patient or parent.
struct DrugHistoryRow<'a> {
    name: Option<Element>,
    mpid_version: &'a Option<String>,
    mpid: &'a Option<String>,
    phpid_version: &'a Option<String>,
    phpid: &'a Option<String>,
    start: &'a Option<Nullable<Hl7Date>>,
    end: &'a Option<Nullable<Hl7Date>>,
    indication_version: &'a Option<String>,
    indication: &'a Option<i64>,
    reaction_version: &'a Option<String>,
    reaction: &'a Option<i64>,
}

fn history_observation(row: &HistoryRow<'_>) -> Element {
    Element::new("observation")
        .attr("classCode", "OBS")
        .attr("moodCode", "EVN")
        .child(meddra("code", row.version, row.code))
        .maybe_child(interval("effectiveTime", row.start, row.end))
        .maybe_child(ed_value(row.comments).map(|value| {
            relationship(
                "outboundRelationship2",
                "COMP",
                observation(ObservationCode::Comment, Some(value)),
            )
        }))
        .maybe_child(bl_value(row.family_history).map(|value| {
            relationship(
                "outboundRelationship2",
                "EXPL",
                observation(ObservationCode::FamilyHistory, Some(value)),
            )
        }))
        .maybe_child(bl_nullable(row.continuing).map(|value| {
            relationship(
                "inboundRelationship",
                "REFR",
                observation(ObservationCode::Continuing, Some(value)),
            )
        }))
}

fn coded_reason(
    type_code: &str,
    code: ObservationCode,
    version: &Option<String>,
    term: &Option<i64>,
) -> Option<Element> {
    (version.is_some() || term.is_some()).then(|| {
        relationship(
            "outboundRelationship2",
            type_code,
            observation(code, Some(meddra_value(version, term, None))),
        )
    })
}

fn drug_history_administration(row: DrugHistoryRow<'_>) -> Element {
    let generic = versioned_code("code", row.phpid_version, row.phpid).map(|code| {
        Element::new("asSpecializedKind")
            .attr("classCode", "GRIC")
            .child(
                Element::new("generalizedMaterialKind")
                    .attr("classCode", "MAT")
                    .attr("determinerCode", "KIND")
                    .child(code),
            )
    });
    let product = Element::new("kindOfProduct")
        .attr("classCode", "MMAT")
        .attr("determinerCode", "KIND")
        .maybe_child(versioned_code("code", row.mpid_version, row.mpid))
        .maybe_child(row.name)
        .maybe_child(generic);

    Element::new("substanceAdministration")
        .attr("classCode", "SBADM")
        .attr("moodCode", "EVN")
        .maybe_child(interval("effectiveTime", row.start, row.end))
        .child(consumable(product))
        .maybe_child(coded_reason(
            "RSON",
            ObservationCode::Indication,
            row.indication_version,
            row.indication,
        ))
        .maybe_child(coded_reason(
            "CAUS",
            ObservationCode::Reaction,
            row.reaction_version,
            row.reaction,
        ))
}

/// Name, sex, dates, record numbers and the parent role on `player1`.
pub(super) fn fill_person(player: &mut Element, patient: &Patient) {
    player.extend(nullable_text_element("name", &patient.d_1_patient));
    player.extend(coded_nullable("administrativeGenderCode", &patient.d_5_sex));
    player.extend(nullable_value_element("birthTime", &patient.d_2_1_date_birth));
    player.extend(nullable_value_element("deceasedTime", &patient.d_9_1_date_death));

    let records = [
        (
            RecordSource::GeneralPractitioner,
            &patient.d_1_1_1_medical_record_number_source_gp,
        ),
        (
            RecordSource::Specialist,
            &patient.d_1_1_2_medical_record_number_source_specialist,
        ),
        (
            RecordSource::Hospital,
            &patient.d_1_1_3_medical_record_number_source_hospital,
        ),
        (
            RecordSource::Investigation,
            &patient.d_1_1_4_medical_record_number_source_investigation,
        ),
    ];
    for (source, number) in records {
        if number.is_some() {
            player.push(
                Element::new("asIdentifiedEntity")
                    .attr("classCode", "IDENT")
                    .child(
                        Element::new("id")
                            .attr("root", oid::MEDICAL_RECORD)
                            .nullable("extension", number),
                    )
                    .child(code_element(source)),
            );
        }
    }
    player.extend(parent_role(patient));
}

fn parent_role(patient: &Patient) -> Option<Element> {
    let person = non_empty(
        Element::new("associatedPerson")
            .attr("classCode", "PSN")
            .attr("determinerCode", "INSTANCE")
            .maybe_child(nullable_text_element("name", &patient.d_10_1_parent_identification))
            .maybe_child(coded_nullable(
                "administrativeGenderCode",
                &patient.d_10_6_sex_parent,
            ))
            .maybe_child(nullable_value_element(
                "birthTime",
                &patient.d_10_2_1_date_birth_parent,
            )),
    );
    let observations = [
        (
            ObservationCode::Age,
            pq_value(
                &patient.d_10_2_2a_age_parent_num,
                &patient.d_10_2_2b_age_parent_unit,
            ),
        ),
        (
            ObservationCode::LastMenstrualPeriod,
            ts_nullable(&patient.d_10_3_last_menstrual_period_date_parent),
        ),
        (
            ObservationCode::BodyWeight,
            quantity(&patient.d_10_4_body_weight_parent, "kg"),
        ),
        (
            ObservationCode::Height,
            quantity(&patient.d_10_5_height_parent, "cm"),
        ),
    ]
    .into_iter()
    .filter_map(|(code, value)| value.map(|value| subject(observation(code, Some(value)))));

    let mut history: Vec<Element> = patient
        .d_10_7_1_r_structured_information_parent_meddra_code
        .iter()
        .map(|row| {
            history_observation(&HistoryRow {
                version: &row.d_10_7_1_r_1a_meddra_version_medical_history,
                code: &row.d_10_7_1_r_1b_medical_history_meddra_code,
                start: &row.d_10_7_1_r_2_start_date,
                continuing: &row.d_10_7_1_r_3_continuing,
                end: &row.d_10_7_1_r_4_end_date,
                comments: &row.d_10_7_1_r_5_comments,
                family_history: &None,
            })
        })
        .collect();
    history.extend(
        ed_value(&patient.d_10_7_2_text_medical_history_parent)
            .map(|value| observation(ObservationCode::MedicalHistoryText, Some(value))),
    );

    let drugs = patient
        .d_10_8_r_past_drug_history_parent
        .iter()
        .map(|row| {
            drug_history_administration(DrugHistoryRow {
                name: text_element("name", &row.d_10_8_r_1_name_drug),
                mpid_version: &row.d_10_8_r_2a_mpid_version,
                mpid: &row.d_10_8_r_2b_mpid,
                phpid_version: &row.d_10_8_r_3a_phpid_version,
                phpid: &row.d_10_8_r_3b_phpid,
                start: &row.d_10_8_r_4_start_date,
                end: &row.d_10_8_r_5_end_date,
                indication_version: &row.d_10_8_r_6a_meddra_version_indication,
                indication: &row.d_10_8_r_6b_indication_meddra_code,
                reaction_version: &row.d_10_8_r_7a_meddra_version_reaction,
                reaction: &row.d_10_8_r_7b_reactions_meddra_code,
            })
        })
        .collect();

    let children: Vec<Element> = person
        .into_iter()
        .chain(observations)
        .chain(organizer(OrganizerCode::MedicalHistory, history))
        .chain(organizer(OrganizerCode::DrugHistory, drugs))
        .collect();
    if children.is_empty() {
        return None;
    }
    Some(
        Element::new("role")
            .attr("classCode", "PRS")
            .child(
                Element::new("code")
                    .attr("code", "PRN")
                    .attr("codeSystem", oid::CS_ROLE),
            )
            .with_children(children),
    )
}

/// Age, weight, height, causes of death and autopsy of the patient.
pub(super) fn observations(patient: &Patient) -> Vec<Element> {
    let mut observations: Vec<Element> = [
        (
            ObservationCode::Age,
            pq_value(
                &patient.d_2_2a_age_onset_reaction_num,
                &patient.d_2_2b_age_onset_reaction_unit,
            ),
        ),
        (
            ObservationCode::GestationPeriod,
            pq_value(
                &patient.d_2_2_1a_gestation_period_reaction_foetus_num,
                &patient.d_2_2_1b_gestation_period_reaction_foetus_unit,
            ),
        ),
        (ObservationCode::AgeGroup, ce_value(&patient.d_2_3_patient_age_group)),
        (ObservationCode::BodyWeight, quantity(&patient.d_3_body_weight, "kg")),
        (ObservationCode::Height, quantity(&patient.d_4_height, "cm")),
        (
            ObservationCode::LastMenstrualPeriod,
            ts_value(&patient.d_6_last_menstrual_period_date),
        ),
    ]
    .into_iter()
    .filter_map(|(code, value)| value.map(|value| subject(observation(code, Some(value)))))
    .collect();

    observations.extend(patient.d_9_2_r_cause_death.iter().map(|cause| {
        subject(observation(
            ObservationCode::ReportedCauseOfDeath,
            Some(meddra_value(
                &cause.d_9_2_r_1a_meddra_version_cause_death,
                &cause.d_9_2_r_1b_cause_death_meddra_code,
                text_element("originalText", &cause.d_9_2_r_2_cause_death),
            )),
        ))
    }));

    let autopsy_causes = &patient.d_9_4_r_autopsy_determined_cause_death;
    if patient.d_9_3_autopsy.is_some() || !autopsy_causes.is_empty() {
        let causes = autopsy_causes.iter().map(|cause| {
            relationship(
                "outboundRelationship2",
                "DRIV",
                observation(
                    ObservationCode::AutopsyCauseOfDeath,
                    Some(meddra_value(
                        &cause.d_9_4_r_1a_meddra_version_autopsy_determined_cause_death,
                        &cause.d_9_4_r_1b_autopsy_determined_cause_death_meddra_code,
                        text_element(
                            "originalText",
                            &cause.d_9_4_r_2_autopsy_determined_cause_death,
                        ),
                    )),
                ),
            )
        });
        observations.push(subject(
            observation(ObservationCode::Autopsy, bl_nullable(&patient.d_9_3_autopsy))
                .with_children(causes),
        ));
    }
    debug!(count = observations.len(), "patient observations mapped");
    observations
}

/// Medical history and past drug history organizers.
pub(super) fn organizers(patient: &Patient) -> Vec<Element> {
    let mut history: Vec<Element> = patient
        .d_7_1_r_structured_information_medical_history
        .iter()
        .map(|row| {
            history_observation(&HistoryRow {
                version: &row.d_7_1_r_1a_meddra_version_medical_history,
                code: &row.d_7_1_r_1b_medical_history_meddra_code,
                start: &row.d_7_1_r_2_start_date,
                continuing: &row.d_7_1_r_3_continuing,
                end: &row.d_7_1_r_4_end_date,
                comments: &row.d_7_1_r_5_comments,
                family_history: &row.d_7_1_r_6_family_history,
            })
        })
        .collect();
    history.extend(
        ed_nullable(&patient.d_7_2_text_medical_history)
            .map(|value| observation(ObservationCode::MedicalHistoryText, Some(value))),
    );
    history.extend(
        bl_value(&patient.d_7_3_concomitant_therapies)
            .map(|value| observation(ObservationCode::ConcomitantTherapy, Some(value))),
    );

    let drugs = patient
        .d_8_r_past_drug_history
        .iter()
        .map(|row| {
            drug_history_administration(DrugHistoryRow {
                name: nullable_text_element("name", &row.d_8_r_1_name_drug),
                mpid_version: &row.d_8_r_2a_mpid_version,
                mpid: &row.d_8_r_2b_mpid,
                phpid_version: &row.d_8_r_3a_phpid_version,
                phpid: &row.d_8_r_3b_phpid,
                start: &row.d_8_r_4_start_date,
                end: &row.d_8_r_5_end_date,
                indication_version: &row.d_8_r_6a_meddra_version_indication,
                indication: &row.d_8_r_6b_indication_meddra_code,
                reaction_version: &row.d_8_r_7a_meddra_version_reaction,
                reaction: &row.d_8_r_7b_reaction_meddra_code,
            })
        })
        .collect();

    organizer(OrganizerCode::MedicalHistory, history)
        .into_iter()
        .chain(organizer(OrganizerCode::DrugHistory, drugs))
        .collect()
}
