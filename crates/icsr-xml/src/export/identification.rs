//! Sections C.1 to C.5.

use icsr_model::{CaseIdentification, Icsr, Nullable, PrimarySource, Sender, StudyIdentification};
use tracing::debug;

use crate::codes::{CharacteristicCode, DocumentCode, ObservationCode, RelatedInvestigation};
use crate::common::{
    bl_nullable, bl_value, ce_value, code_element, coded, coded_nullable, country_code,
    id_element, non_empty, nullable_text_element, oid, text_element,
};
use crate::tree::Element;

use super::{component, observation_event};

/// C.1.1 and C.1.8.1 identifiers.
pub(super) fn ids(c_1: Option<&CaseIdentification>) -> Vec<Element> {
    let Some(c_1) = c_1 else {
        return Vec::new();
    };
    [
        (oid::REPORT_ID, &c_1.c_1_1_sender_safety_report_unique_id),
        (
            oid::WORLDWIDE_ID,
            &c_1.c_1_8_1_worldwide_unique_case_identification_number,
        ),
    ]
    .into_iter()
    .filter_map(|(root, value)| value.as_ref().map(|value| id_element(root, value.as_str())))
    .collect()
}

/// C.1.4 as `effectiveTime/low` and C.1.5 as `availabilityTime`.
pub(super) fn received_dates(c_1: Option<&CaseIdentification>) -> Vec<Element> {
    let Some(c_1) = c_1 else {
        return Vec::new();
    };
    let first_received = c_1
        .c_1_4_date_report_first_received_source
        .is_some()
        .then(|| {
            Element::new("effectiveTime").child(
                Element::new("low").value("value", &c_1.c_1_4_date_report_first_received_source),
            )
        });
    let most_recent = c_1
        .c_1_5_date_most_recent_information
        .is_some()
        .then(|| {
            Element::new("availabilityTime")
                .value("value", &c_1.c_1_5_date_most_recent_information)
        });
    first_received.into_iter().chain(most_recent).collect()
}

fn document(code: DocumentCode, content: Option<Element>) -> Element {
    Element::new("reference").attr("typeCode", "REFR").child(
        Element::new("document")
            .attr("classCode", "DOC")
            .attr("moodCode", "EVN")
            .child(code_element(code))
            .maybe_child(content),
    )
}

/// C.1.6.1.r documents held by the sender and C.4.r literature references.
pub(super) fn references(icsr: &Icsr) -> Vec<Element> {
    let documents = icsr
        .c_1_identification_case_safety_report
        .iter()
        .flat_map(|c_1| &c_1.c_1_6_1_r_documents_held_sender)
        .map(|held| {
            document(
                DocumentCode::HeldBySender,
                text_element("title", &held.c_1_6_1_r_1_documents_held_sender),
            )
        });
    let literature = icsr.c_4_r_literature_reference.iter().map(|reference| {
        document(
            DocumentCode::Literature,
            nullable_text_element(
                "bibliographicDesignationText",
                &reference.c_4_r_1_literature_reference,
            ),
        )
    });
    documents.chain(literature).collect()
}

/// C.1.6.1 and C.1.7 flags.
pub(super) fn case_observations(c_1: Option<&CaseIdentification>) -> Vec<Element> {
    let Some(c_1) = c_1 else {
        return Vec::new();
    };
    [
        (
            ObservationCode::AdditionalDocuments,
            bl_value(&c_1.c_1_6_1_additional_documents_available),
        ),
        (
            ObservationCode::LocalCriteria,
            bl_nullable(&c_1.c_1_7_fulfil_local_criteria_expedited_report),
        ),
    ]
    .into_iter()
    .filter_map(|(code, value)| value.map(|value| component(observation_event(code, Some(value)))))
    .collect()
}

fn controlled_act(content: impl IntoIterator<Item = Element>) -> Element {
    Element::new("controlActEvent")
        .attr("classCode", "CACT")
        .attr("moodCode", "EVN")
        .with_children(content)
}

fn related(type_code: &str, code: Element, priority: Option<Element>, act: Element) -> Element {
    Element::new("outboundRelationship")
        .attr("typeCode", type_code)
        .maybe_child(priority)
        .child(
            Element::new("relatedInvestigation")
                .attr("classCode", "INVSTG")
                .attr("moodCode", "EVN")
                .child(code)
                .child(Element::new("subjectOf2").attr("typeCode", "SUBJ").child(act)),
        )
}

fn author(entity: Element) -> Element {
    Element::new("author").attr("typeCode", "AUT").child(entity)
}

fn assigned_entity() -> Element {
    Element::new("assignedEntity").attr("classCode", "ASSIGNED")
}

fn person() -> Element {
    Element::new("assignedPerson")
        .attr("classCode", "PSN")
        .attr("determinerCode", "INSTANCE")
}

fn organization() -> Element {
    Element::new("representedOrganization")
        .attr("classCode", "ORG")
        .attr("determinerCode", "INSTANCE")
}

fn located_country(code: Option<Element>) -> Option<Element> {
    code.map(|code| {
        Element::new("asLocatedEntity").attr("classCode", "LOCE").child(
            Element::new("location")
                .attr("classCode", "COUNTRY")
                .attr("determinerCode", "INSTANCE")
                .child(code),
        )
    })
}

/// Organisation with a department: the department is the represented
/// organisation, the organisation itself is nested below it.
fn department_of(department: Option<Element>, organisation: Option<Element>) -> Option<Element> {
    if department.is_none() && organisation.is_none() {
        return None;
    }
    let parent = organisation.map(|name| assigned_entity().child(organization().child(name)));
    Some(organization().maybe_child(department).maybe_child(parent))
}

/// Given names; an empty first slot keeps a lone middle name second.
fn given_names(given: Option<Element>, middle: Option<Element>) -> Vec<Element> {
    match (given, middle) {
        (given, Some(middle)) => vec![given.unwrap_or_else(|| Element::new("given")), middle],
        (given, None) => given.into_iter().collect(),
    }
}

/// `tel:` prefixed telecom, or `nullFlavor`.
fn reporter_telecom(value: &Option<Nullable<String>>) -> Option<Element> {
    value.as_ref().map(|value| match value {
        Nullable::Value(number) => Element::new("telecom").attr("value", format!("tel:{number}")),
        Nullable::NullFlavor(flavor) => Element::new("telecom").attr("nullFlavor", flavor.as_str()),
    })
}

fn primary_source(source: &PrimarySource) -> Element {
    let address = non_empty(
        Element::new("addr")
            .maybe_child(nullable_text_element(
                "streetAddressLine",
                &source.c_2_r_2_3_reporter_street,
            ))
            .maybe_child(nullable_text_element("city", &source.c_2_r_2_4_reporter_city))
            .maybe_child(nullable_text_element(
                "state",
                &source.c_2_r_2_5_reporter_state_province,
            ))
            .maybe_child(nullable_text_element(
                "postalCode",
                &source.c_2_r_2_6_reporter_postcode,
            )),
    );
    let name = non_empty(
        Element::new("name")
            .maybe_child(nullable_text_element("prefix", &source.c_2_r_1_1_reporter_title))
            .with_children(given_names(
                nullable_text_element("given", &source.c_2_r_1_2_reporter_given_name),
                nullable_text_element("given", &source.c_2_r_1_3_reporter_middle_name),
            ))
            .maybe_child(nullable_text_element(
                "family",
                &source.c_2_r_1_4_reporter_family_name,
            )),
    );
    let qualification = coded_nullable("code", &source.c_2_r_4_qualification)
        .map(|code| Element::new("asQualifiedEntity").attr("classCode", "QUAL").child(code));
    let person = non_empty(
        person()
            .maybe_child(name)
            .maybe_child(qualification)
            .maybe_child(located_country(country_code(
                &source.c_2_r_3_reporter_country_code,
            ))),
    );
    let entity = assigned_entity()
        .maybe_child(address)
        .maybe_child(reporter_telecom(&source.c_2_r_2_7_reporter_telephone))
        .maybe_child(person)
        .maybe_child(department_of(
            nullable_text_element("name", &source.c_2_r_2_2_reporter_department),
            nullable_text_element("name", &source.c_2_r_2_1_reporter_organisation),
        ));

    let priority = source
        .c_2_r_5_primary_source_regulatory_purposes
        .is_some()
        .then(|| {
            Element::new("priorityNumber")
                .value("value", &source.c_2_r_5_primary_source_regulatory_purposes)
        });
    related(
        "SPRT",
        code_element(RelatedInvestigation::SourceReport),
        priority,
        controlled_act([author(entity)]),
    )
}

/// C.1.8.2 first sender, C.2.r primary sources and C.1.10.r linked reports.
pub(super) fn related_investigations(icsr: &Icsr) -> Vec<Element> {
    let c_1 = icsr.c_1_identification_case_safety_report.as_ref();
    let mut relationships = Vec::new();

    if let Some(code) = c_1.and_then(|c_1| coded("code", &c_1.c_1_8_2_first_sender)) {
        let entity = assigned_entity().child(code);
        relationships.push(related(
            "SPRT",
            code_element(RelatedInvestigation::FirstSender),
            None,
            controlled_act([author(entity)]),
        ));
    }

    relationships.extend(icsr.c_2_r_primary_source_information.iter().map(primary_source));

    for linked in c_1
        .into_iter()
        .flat_map(|c_1| &c_1.c_1_10_r_identification_number_report_linked)
    {
        let id = Element::new("id")
            .attr("root", oid::WORLDWIDE_ID)
            .value("extension", &linked.c_1_10_r_identification_number_report_linked);
        relationships.push(related(
            "REFR",
            Element::new("code").attr("nullFlavor", "NA"),
            None,
            controlled_act([id]),
        ));
    }
    debug!(count = relationships.len(), "related investigations mapped");
    relationships
}

fn sender_entity(sender: &Sender) -> Element {
    let address = non_empty(
        Element::new("addr")
            .maybe_child(text_element(
                "streetAddressLine",
                &sender.c_3_4_1_sender_street_address,
            ))
            .maybe_child(text_element("city", &sender.c_3_4_2_sender_city))
            .maybe_child(text_element("state", &sender.c_3_4_3_sender_state_province))
            .maybe_child(text_element("postalCode", &sender.c_3_4_4_sender_postcode)),
    );
    let telecoms = [
        ("tel", &sender.c_3_4_6_sender_telephone),
        ("fax", &sender.c_3_4_7_sender_fax),
        ("mailto", &sender.c_3_4_8_sender_email),
    ]
    .into_iter()
    .filter_map(|(scheme, value)| {
        value
            .as_ref()
            .map(|value| Element::new("telecom").attr("value", format!("{scheme}:{value}")))
    });
    let name = non_empty(
        Element::new("name")
            .maybe_child(text_element("prefix", &sender.c_3_3_2_sender_title))
            .with_children(given_names(
                text_element("given", &sender.c_3_3_3_sender_given_name),
                text_element("given", &sender.c_3_3_4_sender_middle_name),
            ))
            .maybe_child(text_element("family", &sender.c_3_3_5_sender_family_name)),
    );
    let person = non_empty(
        person()
            .maybe_child(name)
            .maybe_child(located_country(country_code(
                &sender.c_3_4_5_sender_country_code,
            ))),
    );

    assigned_entity()
        .maybe_child(coded("code", &sender.c_3_1_sender_type))
        .maybe_child(address)
        .with_children(telecoms)
        .maybe_child(person)
        .maybe_child(department_of(
            text_element("name", &sender.c_3_3_1_sender_department),
            text_element("name", &sender.c_3_2_sender_organisation),
        ))
}

/// C.1.9.1.r source case ids and the C.3 sender.
pub(super) fn sender(icsr: &Icsr) -> Option<Element> {
    let ids: Vec<Element> = icsr
        .c_1_identification_case_safety_report
        .iter()
        .flat_map(|c_1| &c_1.c_1_9_1_r_source_case_id)
        .map(|source| {
            Element::new("id")
                .attr("root", oid::SOURCE_CASE_ID)
                .value("assigningAuthorityName", &source.c_1_9_1_r_1_source_case_id)
                .value("extension", &source.c_1_9_1_r_2_case_id)
        })
        .collect();
    let author = icsr
        .c_3_information_sender_case_safety_report
        .as_ref()
        .map(|sender| author(sender_entity(sender)));
    if ids.is_empty() && author.is_none() {
        return None;
    }
    Some(
        Element::new("subjectOf1")
            .attr("typeCode", "SUBJ")
            .child(controlled_act(ids.into_iter().chain(author))),
    )
}

/// C.1.3, C.1.9.1 and C.1.11 investigation characteristics.
pub(super) fn characteristics(c_1: Option<&CaseIdentification>) -> Vec<Element> {
    let Some(c_1) = c_1 else {
        return Vec::new();
    };
    let reason = text_element("originalText", &c_1.c_1_11_2_reason_nullification_amendment)
        .map(|text| Element::new("value").xsi_type("CE").child(text));
    [
        (CharacteristicCode::ReportType, ce_value(&c_1.c_1_3_type_report)),
        (
            CharacteristicCode::OtherCaseIds,
            bl_nullable(&c_1.c_1_9_1_other_case_ids_previous_transmissions),
        ),
        (
            CharacteristicCode::Nullification,
            ce_value(&c_1.c_1_11_1_report_nullification_amendment),
        ),
        (CharacteristicCode::NullificationReason, reason),
    ]
    .into_iter()
    .filter_map(|(code, value)| {
        value.map(|value| {
            Element::new("subjectOf2").attr("typeCode", "SUBJ").child(
                Element::new("investigationCharacteristic")
                    .attr("classCode", "OBS")
                    .attr("moodCode", "EVN")
                    .child(code_element(code))
                    .child(value),
            )
        })
    })
    .collect()
}

fn registration(study: &StudyIdentification) -> impl Iterator<Item = Element> + '_ {
    study.c_5_1_r_study_registration.iter().map(|registration| {
        let country = registration
            .c_5_1_r_2_study_registration_country
            .is_some()
            .then(|| {
                author(
                    Element::new("territorialAuthority")
                        .attr("classCode", "TERR")
                        .child(
                            Element::new("governingPlace")
                                .attr("classCode", "COUNTRY")
                                .attr("determinerCode", "INSTANCE")
                                .child(
                                    Element::new("code")
                                        .nullable(
                                            "code",
                                            &registration.c_5_1_r_2_study_registration_country,
                                        )
                                        .attr("codeSystem", oid::CS_COUNTRY),
                                ),
                        ),
                )
            });
        Element::new("authorization").attr("typeCode", "AUTH").child(
            Element::new("studyRegistration")
                .attr("classCode", "ACT")
                .attr("moodCode", "EVN")
                .child(
                    Element::new("id")
                        .attr("root", oid::STUDY_REGISTRATION)
                        .nullable("extension", &registration.c_5_1_r_1_study_registration_number),
                )
                .maybe_child(country),
        )
    })
}

/// C.5 study, attached to the patient's primary role.
pub(super) fn study(icsr: &Icsr) -> Option<Element> {
    let study = icsr.c_5_study_identification.as_ref()?;
    let research = Element::new("researchStudy")
        .attr("classCode", "CLNTRL")
        .attr("moodCode", "EVN")
        .maybe_child(study.c_5_3_sponsor_study_number.is_some().then(|| {
            Element::new("id")
                .attr("root", oid::SPONSOR_STUDY)
                .nullable("extension", &study.c_5_3_sponsor_study_number)
        }))
        .maybe_child(coded("code", &study.c_5_4_study_type_reaction))
        .maybe_child(nullable_text_element("title", &study.c_5_2_study_name))
        .with_children(registration(study));
    Some(Element::new("subjectOf1").attr("typeCode", "SBJ").child(research))
}
