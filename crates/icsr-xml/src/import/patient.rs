//! Section D: patient, parent and their histories.

use icsr_model::{
    AutopsyCauseOfDeath, CauseOfDeath, Hl7Date, Icsr, Location, MedicalHistory, Nullable,
    ParentMedicalHistory, ParentPastDrugHistory, PastDrugHistory, Patient,
};

use crate::codes::{ObservationCode, OrganizerCode, RecordSource};
use crate::common::{Decoder, Scope, code_of};
use crate::tree::Element;

use super::{organizer_components, role_observations};

/// Decoded columns of a medical history entry.
struct HistoryRow {
    version: Option<String>,
    code: Option<i64>,
    start: Option<Nullable<Hl7Date>>,
    continuing: Option<Nullable<bool>>,
    end: Option<Nullable<Hl7Date>>,
    comments: Option<String>,
    family_history: Option<bool>,
}

/// Field names a history entry reports its problems under.
struct HistoryFields {
    version: &'static str,
    code: &'static str,
    start: &'static str,
    continuing: &'static str,
    end: &'static str,
    comments: &'static str,
    family_history: Option<&'static str>,
}

const PATIENT_HISTORY: HistoryFields = HistoryFields {
    version: "d_7_1_r_1a_meddra_version_medical_history",
    code: "d_7_1_r_1b_medical_history_meddra_code",
    start: "d_7_1_r_2_start_date",
    continuing: "d_7_1_r_3_continuing",
    end: "d_7_1_r_4_end_date",
    comments: "d_7_1_r_5_comments",
    family_history: Some("d_7_1_r_6_family_history"),
};

const PARENT_HISTORY: HistoryFields = HistoryFields {
    version: "d_10_7_1_r_1a_meddra_version_medical_history",
    code: "d_10_7_1_r_1b_medical_history_meddra_code",
    start: "d_10_7_1_r_2_start_date",
    continuing: "d_10_7_1_r_3_continuing",
    end: "d_10_7_1_r_4_end_date",
    comments: "d_10_7_1_r_5_comments",
    family_history: None,
};

/// Decoded columns of a past drug therapy entry.
struct DrugHistoryRow {
    mpid_version: Option<String>,
    mpid: Option<String>,
    phpid_version: Option<String>,
    phpid: Option<String>,
    start: Option<Nullable<Hl7Date>>,
    end: Option<Nullable<Hl7Date>>,
    indication_version: Option<String>,
    indication: Option<i64>,
    reaction_version: Option<String>,
    reaction: Option<i64>,
}

struct DrugHistoryFields {
    mpid_version: &'static str,
    mpid: &'static str,
    phpid_version: &'static str,
    phpid: &'static str,
    start: &'static str,
    end: &'static str,
    indication_version: &'static str,
    indication: &'static str,
    reaction_version: &'static str,
    reaction: &'static str,
}

const PATIENT_DRUGS: DrugHistoryFields = DrugHistoryFields {
    mpid_version: "d_8_r_2a_mpid_version",
    mpid: "d_8_r_2b_mpid",
    phpid_version: "d_8_r_3a_phpid_version",
    phpid: "d_8_r_3b_phpid",
    start: "d_8_r_4_start_date",
    end: "d_8_r_5_end_date",
    indication_version: "d_8_r_6a_meddra_version_indication",
    indication: "d_8_r_6b_indication_meddra_code",
    reaction_version: "d_8_r_7a_meddra_version_reaction",
    reaction: "d_8_r_7b_reaction_meddra_code",
};

const PARENT_DRUGS: DrugHistoryFields = DrugHistoryFields {
    mpid_version: "d_10_8_r_2a_mpid_version",
    mpid: "d_10_8_r_2b_mpid",
    phpid_version: "d_10_8_r_3a_phpid_version",
    phpid: "d_10_8_r_3b_phpid",
    start: "d_10_8_r_4_start_date",
    end: "d_10_8_r_5_end_date",
    indication_version: "d_10_8_r_6a_meddra_version_indication",
    indication: "d_10_8_r_6b_indication_meddra_code",
    reaction_version: "d_10_8_r_7a_meddra_version_reaction",
    reaction: "d_10_8_r_7b_reactions_meddra_code",
};

/// Observations linked from `observation` under the given relationship.
fn linked<'a>(
    observation: &'a Element,
    relationship: &str,
    code: ObservationCode,
) -> Option<&'a Element> {
    observation
        .all(relationship)
        .filter_map(|link| link.first("observation"))
        .find(|linked| code_of::<ObservationCode>(linked) == Some(code))
}

fn history_row(scope: &mut Scope<'_>, observation: &Element, fields: &HistoryFields) -> HistoryRow {
    let code = observation.first("code");
    let period = observation.first("effectiveTime");
    let value = |code: ObservationCode, relationship: &str| {
        linked(observation, relationship, code).and_then(|linked| linked.first("value"))
    };
    HistoryRow {
        version: scope.attr(fields.version, code, "codeSystemVersion"),
        code: scope.attr(fields.code, code, "code"),
        start: scope.nullable_attr(fields.start, period.and_then(|period| period.first("low")), "value"),
        end: scope.nullable_attr(fields.end, period.and_then(|period| period.first("high")), "value"),
        continuing: scope.nullable_attr(
            fields.continuing,
            value(ObservationCode::Continuing, "inboundRelationship"),
            "value",
        ),
        comments: scope.text(
            fields.comments,
            value(ObservationCode::Comment, "outboundRelationship2"),
        ),
        family_history: fields.family_history.and_then(|field| {
            scope.attr(
                field,
                value(ObservationCode::FamilyHistory, "outboundRelationship2"),
                "value",
            )
        }),
    }
}

/// Reads a `substanceAdministration` of a drug history organizer; the product
/// name is left to the caller since its nullability differs.
fn drug_history_row(
    scope: &mut Scope<'_>,
    administration: &Element,
    fields: &DrugHistoryFields,
) -> DrugHistoryRow {
    let period = administration.first("effectiveTime");
    let product = administration.find("consumable/instanceOfKind/kindOfProduct");
    let mpid = product.and_then(|product| product.first("code"));
    let phpid =
        product.and_then(|product| product.find("asSpecializedKind/generalizedMaterialKind/code"));
    let reason = |type_code: &str, code: ObservationCode| {
        administration
            .all("outboundRelationship2")
            .filter(|link| link.get("typeCode") == Some(type_code))
            .filter_map(|link| link.first("observation"))
            .find(|observation| code_of::<ObservationCode>(observation) == Some(code))
            .and_then(|observation| observation.first("value"))
    };
    let indication = reason("RSON", ObservationCode::Indication);
    let reaction = reason("CAUS", ObservationCode::Reaction);

    DrugHistoryRow {
        mpid_version: scope.attr(fields.mpid_version, mpid, "codeSystemVersion"),
        mpid: scope.attr(fields.mpid, mpid, "code"),
        phpid_version: scope.attr(fields.phpid_version, phpid, "codeSystemVersion"),
        phpid: scope.attr(fields.phpid, phpid, "code"),
        start: scope.nullable_attr(fields.start, period.and_then(|period| period.first("low")), "value"),
        end: scope.nullable_attr(fields.end, period.and_then(|period| period.first("high")), "value"),
        indication_version: scope.attr(fields.indication_version, indication, "codeSystemVersion"),
        indication: scope.attr(fields.indication, indication, "code"),
        reaction_version: scope.attr(fields.reaction_version, reaction, "codeSystemVersion"),
        reaction: scope.attr(fields.reaction, reaction, "code"),
    }
}

fn product_name(administration: &Element) -> Option<&Element> {
    administration.find("consumable/instanceOfKind/kindOfProduct/name")
}

pub(super) fn read(icsr: &mut Icsr, role: &Element, decoder: &mut Decoder) {
    let mut scope = decoder.scope(Location::root().field("d_patient_characteristics"));
    let mut patient = Patient::default();

    if let Some(player) = role.first("player1") {
        read_person(&mut patient, &mut scope, player);
    }
    read_observations(&mut patient, &mut scope, role);
    read_history(&mut patient, &mut scope, role);

    if patient != Patient::default() {
        icsr.d_patient_characteristics = Some(patient);
    }
}

fn read_person(patient: &mut Patient, scope: &mut Scope<'_>, player: &Element) {
    patient.d_1_patient = scope.nullable_text("d_1_patient", player.first("name"));
    patient.d_5_sex = scope.nullable_attr("d_5_sex", player.first("administrativeGenderCode"), "code");
    patient.d_2_1_date_birth = scope.nullable_attr("d_2_1_date_birth", player.first("birthTime"), "value");
    patient.d_9_1_date_death = scope.nullable_attr("d_9_1_date_death", player.first("deceasedTime"), "value");

    for entity in player.all("asIdentifiedEntity") {
        let id = entity.first("id");
        match code_of::<RecordSource>(entity) {
            Some(RecordSource::GeneralPractitioner) => {
                patient.d_1_1_1_medical_record_number_source_gp = scope.nullable_attr(
                    "d_1_1_1_medical_record_number_source_gp",
                    id,
                    "extension",
                );
            }
            Some(RecordSource::Specialist) => {
                patient.d_1_1_2_medical_record_number_source_specialist = scope.nullable_attr(
                    "d_1_1_2_medical_record_number_source_specialist",
                    id,
                    "extension",
                );
            }
            Some(RecordSource::Hospital) => {
                patient.d_1_1_3_medical_record_number_source_hospital = scope.nullable_attr(
                    "d_1_1_3_medical_record_number_source_hospital",
                    id,
                    "extension",
                );
            }
            Some(RecordSource::Investigation) => {
                patient.d_1_1_4_medical_record_number_source_investigation = scope.nullable_attr(
                    "d_1_1_4_medical_record_number_source_investigation",
                    id,
                    "extension",
                );
            }
            None => {}
        }
    }

    if let Some(parent) = player.first("role") {
        read_parent(patient, scope, parent);
    }
}

fn read_observations(patient: &mut Patient, scope: &mut Scope<'_>, role: &Element) {
    for observation in role_observations(role) {
        let value = observation.first("value");
        match code_of::<ObservationCode>(observation) {
            Some(ObservationCode::Age) => {
                patient.d_2_2a_age_onset_reaction_num =
                    scope.attr("d_2_2a_age_onset_reaction_num", value, "value");
                patient.d_2_2b_age_onset_reaction_unit =
                    scope.attr("d_2_2b_age_onset_reaction_unit", value, "unit");
            }
            Some(ObservationCode::GestationPeriod) => {
                patient.d_2_2_1a_gestation_period_reaction_foetus_num =
                    scope.attr("d_2_2_1a_gestation_period_reaction_foetus_num", value, "value");
                patient.d_2_2_1b_gestation_period_reaction_foetus_unit =
                    scope.attr("d_2_2_1b_gestation_period_reaction_foetus_unit", value, "unit");
            }
            Some(ObservationCode::AgeGroup) => {
                patient.d_2_3_patient_age_group =
                    scope.attr("d_2_3_patient_age_group", value, "code");
            }
            Some(ObservationCode::BodyWeight) => {
                patient.d_3_body_weight = scope.attr("d_3_body_weight", value, "value");
            }
            Some(ObservationCode::Height) => {
                patient.d_4_height = scope.attr("d_4_height", value, "value");
            }
            Some(ObservationCode::LastMenstrualPeriod) => {
                patient.d_6_last_menstrual_period_date =
                    scope.attr("d_6_last_menstrual_period_date", value, "value");
            }
            Some(ObservationCode::ReportedCauseOfDeath) => {
                let location = scope
                    .location()
                    .item("d_9_2_r_cause_death", patient.d_9_2_r_cause_death.len());
                let mut scope = scope.nested(location);
                patient.d_9_2_r_cause_death.push(CauseOfDeath {
                    d_9_2_r_1a_meddra_version_cause_death: scope.attr(
                        "d_9_2_r_1a_meddra_version_cause_death",
                        value,
                        "codeSystemVersion",
                    ),
                    d_9_2_r_1b_cause_death_meddra_code: scope.attr(
                        "d_9_2_r_1b_cause_death_meddra_code",
                        value,
                        "code",
                    ),
                    d_9_2_r_2_cause_death: scope.text(
                        "d_9_2_r_2_cause_death",
                        value.and_then(|value| value.first("originalText")),
                    ),
                    ..Default::default()
                });
            }
            Some(ObservationCode::Autopsy) => {
                patient.d_9_3_autopsy = scope.nullable_attr("d_9_3_autopsy", value, "value");
                for cause in observation
                    .all("outboundRelationship2")
                    .filter_map(|link| link.first("observation"))
                    .filter(|cause| {
                        code_of::<ObservationCode>(cause)
                            == Some(ObservationCode::AutopsyCauseOfDeath)
                    })
                {
                    let value = cause.first("value");
                    let location = scope.location().item(
                        "d_9_4_r_autopsy_determined_cause_death",
                        patient.d_9_4_r_autopsy_determined_cause_death.len(),
                    );
                    let mut scope = scope.nested(location);
                    patient
                        .d_9_4_r_autopsy_determined_cause_death
                        .push(AutopsyCauseOfDeath {
                            d_9_4_r_1a_meddra_version_autopsy_determined_cause_death: scope.attr(
                                "d_9_4_r_1a_meddra_version_autopsy_determined_cause_death",
                                value,
                                "codeSystemVersion",
                            ),
                            d_9_4_r_1b_autopsy_determined_cause_death_meddra_code: scope.attr(
                                "d_9_4_r_1b_autopsy_determined_cause_death_meddra_code",
                                value,
                                "code",
                            ),
                            d_9_4_r_2_autopsy_determined_cause_death: scope.text(
                                "d_9_4_r_2_autopsy_determined_cause_death",
                                value.and_then(|value| value.first("originalText")),
                            ),
                            ..Default::default()
                        });
                }
            }
            _ => {}
        }
    }
}

fn read_history(patient: &mut Patient, scope: &mut Scope<'_>, role: &Element) {
    for observation in organizer_components(role, OrganizerCode::MedicalHistory)
        .filter_map(|component| component.first("observation"))
    {
        let value = observation.first("value");
        match code_of::<ObservationCode>(observation) {
            Some(ObservationCode::MedicalHistoryText) => {
                patient.d_7_2_text_medical_history =
                    scope.nullable_text("d_7_2_text_medical_history", value);
            }
            Some(ObservationCode::ConcomitantTherapy) => {
                patient.d_7_3_concomitant_therapies =
                    scope.attr("d_7_3_concomitant_therapies", value, "value");
            }
            _ => {
                let location = scope.location().item(
                    "d_7_1_r_structured_information_medical_history",
                    patient.d_7_1_r_structured_information_medical_history.len(),
                );
                let row = history_row(&mut scope.nested(location), observation, &PATIENT_HISTORY);
                patient
                    .d_7_1_r_structured_information_medical_history
                    .push(MedicalHistory {
                        d_7_1_r_1a_meddra_version_medical_history: row.version,
                        d_7_1_r_1b_medical_history_meddra_code: row.code,
                        d_7_1_r_2_start_date: row.start,
                        d_7_1_r_3_continuing: row.continuing,
                        d_7_1_r_4_end_date: row.end,
                        d_7_1_r_5_comments: row.comments,
                        d_7_1_r_6_family_history: row.family_history,
                        ..Default::default()
                    });
            }
        }
    }

    for administration in organizer_components(role, OrganizerCode::DrugHistory)
        .filter_map(|component| component.first("substanceAdministration"))
    {
        let location = scope
            .location()
            .item("d_8_r_past_drug_history", patient.d_8_r_past_drug_history.len());
        let mut scope = scope.nested(location);
        let row = drug_history_row(&mut scope, administration, &PATIENT_DRUGS);
        patient.d_8_r_past_drug_history.push(PastDrugHistory {
            d_8_r_1_name_drug: scope.nullable_text("d_8_r_1_name_drug", product_name(administration)),
            d_8_r_2a_mpid_version: row.mpid_version,
            d_8_r_2b_mpid: row.mpid,
            d_8_r_3a_phpid_version: row.phpid_version,
            d_8_r_3b_phpid: row.phpid,
            d_8_r_4_start_date: row.start,
            d_8_r_5_end_date: row.end,
            d_8_r_6a_meddra_version_indication: row.indication_version,
            d_8_r_6b_indication_meddra_code: row.indication,
            d_8_r_7a_meddra_version_reaction: row.reaction_version,
            d_8_r_7b_reaction_meddra_code: row.reaction,
            ..Default::default()
        });
    }
}

fn read_parent(patient: &mut Patient, scope: &mut Scope<'_>, parent: &Element) {
    if let Some(person) = parent.first("associatedPerson") {
        patient.d_10_1_parent_identification =
            scope.nullable_text("d_10_1_parent_identification", person.first("name"));
        patient.d_10_6_sex_parent = scope.nullable_attr(
            "d_10_6_sex_parent",
            person.first("administrativeGenderCode"),
            "code",
        );
        patient.d_10_2_1_date_birth_parent =
            scope.nullable_attr("d_10_2_1_date_birth_parent", person.first("birthTime"), "value");
    }

    for observation in role_observations(parent) {
        let value = observation.first("value");
        match code_of::<ObservationCode>(observation) {
            Some(ObservationCode::Age) => {
                patient.d_10_2_2a_age_parent_num =
                    scope.attr("d_10_2_2a_age_parent_num", value, "value");
                patient.d_10_2_2b_age_parent_unit =
                    scope.attr("d_10_2_2b_age_parent_unit", value, "unit");
            }
            Some(ObservationCode::LastMenstrualPeriod) => {
                patient.d_10_3_last_menstrual_period_date_parent = scope.nullable_attr(
                    "d_10_3_last_menstrual_period_date_parent",
                    value,
                    "value",
                );
            }
            Some(ObservationCode::BodyWeight) => {
                patient.d_10_4_body_weight_parent =
                    scope.attr("d_10_4_body_weight_parent", value, "value");
            }
            Some(ObservationCode::Height) => {
                patient.d_10_5_height_parent = scope.attr("d_10_5_height_parent", value, "value");
            }
            _ => {}
        }
    }

    for observation in organizer_components(parent, OrganizerCode::MedicalHistory)
        .filter_map(|component| component.first("observation"))
    {
        if code_of::<ObservationCode>(observation) == Some(ObservationCode::MedicalHistoryText) {
            patient.d_10_7_2_text_medical_history_parent =
                scope.text("d_10_7_2_text_medical_history_parent", observation.first("value"));
            continue;
        }
        let location = scope.location().item(
            "d_10_7_1_r_structured_information_parent_meddra_code",
            patient.d_10_7_1_r_structured_information_parent_meddra_code.len(),
        );
        let row = history_row(&mut scope.nested(location), observation, &PARENT_HISTORY);
        patient
            .d_10_7_1_r_structured_information_parent_meddra_code
            .push(ParentMedicalHistory {
                d_10_7_1_r_1a_meddra_version_medical_history: row.version,
                d_10_7_1_r_1b_medical_history_meddra_code: row.code,
                d_10_7_1_r_2_start_date: row.start,
                d_10_7_1_r_3_continuing: row.continuing,
                d_10_7_1_r_4_end_date: row.end,
                d_10_7_1_r_5_comments: row.comments,
                ..Default::default()
            });
    }

    for administration in organizer_components(parent, OrganizerCode::DrugHistory)
        .filter_map(|component| component.first("substanceAdministration"))
    {
        let location = scope.location().item(
            "d_10_8_r_past_drug_history_parent",
            patient.d_10_8_r_past_drug_history_parent.len(),
        );
        let mut scope = scope.nested(location);
        let row = drug_history_row(&mut scope, administration, &PARENT_DRUGS);
        patient
            .d_10_8_r_past_drug_history_parent
            .push(ParentPastDrugHistory {
                d_10_8_r_1_name_drug: scope.text("d_10_8_r_1_name_drug", product_name(administration)),
                d_10_8_r_2a_mpid_version: row.mpid_version,
                d_10_8_r_2b_mpid: row.mpid,
                d_10_8_r_3a_phpid_version: row.phpid_version,
                d_10_8_r_3b_phpid: row.phpid,
                d_10_8_r_4_start_date: row.start,
                d_10_8_r_5_end_date: row.end,
                d_10_8_r_6a_meddra_version_indication: row.indication_version,
                d_10_8_r_6b_indication_meddra_code: row.indication,
                d_10_8_r_7a_meddra_version_reaction: row.reaction_version,
                d_10_8_r_7b_reactions_meddra_code: row.reaction,
                ..Default::default()
            });
    }
}
