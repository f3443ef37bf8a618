//! Sections C.1 to C.5.

use icsr_model::{
    CaseIdentification, DocumentHeldBySender, Icsr, LinkedReport, LiteratureReference, Location,
    PrimarySource, Sender, SourceCaseId, StudyIdentification, StudyRegistration,
};

use crate::codes::{CharacteristicCode, DocumentCode, ObservationCode, RelatedInvestigation};
use crate::common::{Decoder, Scope, code_of, oid};
use crate::tree::Element;

pub(super) fn read(
    icsr: &mut Icsr,
    fragment: &Element,
    event: &Element,
    role: &Element,
    decoder: &mut Decoder,
) {
    let root = Location::root();
    let mut c_1 = CaseIdentification::default();
    {
        let mut scope = decoder.scope(root.field("c_1_identification_case_safety_report"));
        read_case(&mut c_1, &mut scope, fragment, event);
        read_documents(&mut c_1, icsr, &mut scope, event);
        read_characteristics(&mut c_1, &mut scope, event);
    }
    read_related(&mut c_1, icsr, decoder, event);
    read_sender(&mut c_1, icsr, decoder, event);
    if c_1 != CaseIdentification::default() {
        icsr.c_1_identification_case_safety_report = Some(c_1);
    }

    if let Some(research) = role.find("subjectOf1/researchStudy") {
        let mut scope = decoder.scope(root.field("c_5_study_identification"));
        icsr.c_5_study_identification = Some(study(&mut scope, research));
    }
}

fn read_case(c_1: &mut CaseIdentification, scope: &mut Scope<'_>, fragment: &Element, event: &Element) {
    for id in event.all("id") {
        match id.get("root") {
            Some(oid::REPORT_ID) => {
                c_1.c_1_1_sender_safety_report_unique_id =
                    scope.attr("c_1_1_sender_safety_report_unique_id", Some(id), "extension");
            }
            Some(oid::WORLDWIDE_ID) => {
                c_1.c_1_8_1_worldwide_unique_case_identification_number = scope.attr(
                    "c_1_8_1_worldwide_unique_case_identification_number",
                    Some(id),
                    "extension",
                );
            }
            _ => {}
        }
    }
    c_1.c_1_2_date_creation = scope.attr(
        "c_1_2_date_creation",
        fragment.find("controlActProcess/effectiveTime"),
        "value",
    );
    c_1.c_1_4_date_report_first_received_source = scope.attr(
        "c_1_4_date_report_first_received_source",
        event.find("effectiveTime/low"),
        "value",
    );
    c_1.c_1_5_date_most_recent_information = scope.attr(
        "c_1_5_date_most_recent_information",
        event.first("availabilityTime"),
        "value",
    );

    for observation in event
        .all("component")
        .filter_map(|component| component.first("observationEvent"))
    {
        let value = observation.first("value");
        match code_of::<ObservationCode>(observation) {
            Some(ObservationCode::AdditionalDocuments) => {
                c_1.c_1_6_1_additional_documents_available =
                    scope.attr("c_1_6_1_additional_documents_available", value, "value");
            }
            Some(ObservationCode::LocalCriteria) => {
                c_1.c_1_7_fulfil_local_criteria_expedited_report = scope.nullable_attr(
                    "c_1_7_fulfil_local_criteria_expedited_report",
                    value,
                    "value",
                );
            }
            _ => {}
        }
    }
}

/// C.1.6.1.r held documents and C.4.r literature share `reference/document`.
fn read_documents(
    c_1: &mut CaseIdentification,
    icsr: &mut Icsr,
    scope: &mut Scope<'_>,
    event: &Element,
) {
    for document in event
        .all("reference")
        .filter_map(|reference| reference.first("document"))
    {
        match code_of::<DocumentCode>(document) {
            Some(DocumentCode::HeldBySender) => {
                let location = scope.location().item(
                    "c_1_6_1_r_documents_held_sender",
                    c_1.c_1_6_1_r_documents_held_sender.len(),
                );
                let mut scope = scope.nested(location);
                c_1.c_1_6_1_r_documents_held_sender.push(DocumentHeldBySender {
                    c_1_6_1_r_1_documents_held_sender: scope
                        .text("c_1_6_1_r_1_documents_held_sender", document.first("title")),
                    ..Default::default()
                });
            }
            Some(DocumentCode::Literature) => {
                let location = Location::root().item(
                    "c_4_r_literature_reference",
                    icsr.c_4_r_literature_reference.len(),
                );
                let mut scope = scope.nested(location);
                icsr.c_4_r_literature_reference.push(LiteratureReference {
                    c_4_r_1_literature_reference: scope.nullable_text(
                        "c_4_r_1_literature_reference",
                        document.first("bibliographicDesignationText"),
                    ),
                    ..Default::default()
                });
            }
            None => {}
        }
    }
}

fn read_characteristics(c_1: &mut CaseIdentification, scope: &mut Scope<'_>, event: &Element) {
    for characteristic in event
        .all("subjectOf2")
        .filter_map(|subject| subject.first("investigationCharacteristic"))
    {
        let value = characteristic.first("value");
        match code_of::<CharacteristicCode>(characteristic) {
            Some(CharacteristicCode::ReportType) => {
                c_1.c_1_3_type_report = scope.attr("c_1_3_type_report", value, "code");
            }
            Some(CharacteristicCode::OtherCaseIds) => {
                c_1.c_1_9_1_other_case_ids_previous_transmissions = scope.nullable_attr(
                    "c_1_9_1_other_case_ids_previous_transmissions",
                    value,
                    "value",
                );
            }
            Some(CharacteristicCode::Nullification) => {
                c_1.c_1_11_1_report_nullification_amendment =
                    scope.attr("c_1_11_1_report_nullification_amendment", value, "code");
            }
            Some(CharacteristicCode::NullificationReason) => {
                c_1.c_1_11_2_reason_nullification_amendment = scope.text(
                    "c_1_11_2_reason_nullification_amendment",
                    value.and_then(|value| value.first("originalText")),
                );
            }
            None => {}
        }
    }
}

/// First sender, primary sources and linked reports.
fn read_related(
    c_1: &mut CaseIdentification,
    icsr: &mut Icsr,
    decoder: &mut Decoder,
    event: &Element,
) {
    for relationship in event.all("outboundRelationship") {
        let Some(investigation) = relationship.first("relatedInvestigation") else {
            continue;
        };
        let act = investigation.find("subjectOf2/controlActEvent");
        match code_of::<RelatedInvestigation>(investigation) {
            Some(RelatedInvestigation::FirstSender) => {
                let mut scope =
                    decoder.scope(Location::root().field("c_1_identification_case_safety_report"));
                c_1.c_1_8_2_first_sender = scope.attr(
                    "c_1_8_2_first_sender",
                    act.and_then(|act| act.find("author/assignedEntity/code")),
                    "code",
                );
            }
            Some(RelatedInvestigation::SourceReport) => {
                let index = icsr.c_2_r_primary_source_information.len();
                let mut scope =
                    decoder.scope(Location::root().item("c_2_r_primary_source_information", index));
                let source = primary_source(&mut scope, relationship, act);
                icsr.c_2_r_primary_source_information.push(source);
            }
            None => {
                let Some(id) = act
                    .into_iter()
                    .flat_map(|act| act.all("id"))
                    .find(|id| id.get("root") == Some(oid::WORLDWIDE_ID))
                else {
                    continue;
                };
                let location = Location::root()
                    .field("c_1_identification_case_safety_report")
                    .item(
                        "c_1_10_r_identification_number_report_linked",
                        c_1.c_1_10_r_identification_number_report_linked.len(),
                    );
                let mut scope = decoder.scope(location);
                c_1.c_1_10_r_identification_number_report_linked.push(LinkedReport {
                    c_1_10_r_identification_number_report_linked: scope.attr(
                        "c_1_10_r_identification_number_report_linked",
                        Some(id),
                        "extension",
                    ),
                    ..Default::default()
                });
            }
        }
    }
}

/// Given name and middle name; the first `given` may be an empty placeholder.
fn given_names(name: Option<&Element>) -> (Option<&Element>, Option<&Element>) {
    let mut given = name.into_iter().flat_map(|name| name.all("given"));
    (given.next(), given.next())
}

/// Department on the represented organisation, organisation nested below it.
fn department_of(entity: Option<&Element>) -> (Option<&Element>, Option<&Element>) {
    let organization = entity.and_then(|entity| entity.first("representedOrganization"));
    (
        organization.and_then(|organization| organization.first("name")),
        organization
            .and_then(|organization| organization.find("assignedEntity/representedOrganization/name")),
    )
}

fn primary_source(
    scope: &mut Scope<'_>,
    relationship: &Element,
    act: Option<&Element>,
) -> PrimarySource {
    let entity = act.and_then(|act| act.find("author/assignedEntity"));
    let address = entity.and_then(|entity| entity.first("addr"));
    let person = entity.and_then(|entity| entity.first("assignedPerson"));
    let name = person.and_then(|person| person.first("name"));
    let (given, middle) = given_names(name);
    let (department, organisation) = department_of(entity);
    let line = |part: &str| address.and_then(|address| address.first(part));

    let telecom = entity.and_then(|entity| entity.first("telecom"));
    let telephone = telecom.and_then(|telecom| {
        let value = telecom.get("value").map(|value| {
            value.strip_prefix("tel:").unwrap_or(value)
        });
        scope.nullable("c_2_r_2_7_reporter_telephone", value, telecom.get("nullFlavor"))
    });

    PrimarySource {
        c_2_r_1_1_reporter_title: scope.nullable_text(
            "c_2_r_1_1_reporter_title",
            name.and_then(|name| name.first("prefix")),
        ),
        c_2_r_1_2_reporter_given_name: scope.nullable_text("c_2_r_1_2_reporter_given_name", given),
        c_2_r_1_3_reporter_middle_name: scope
            .nullable_text("c_2_r_1_3_reporter_middle_name", middle),
        c_2_r_1_4_reporter_family_name: scope.nullable_text(
            "c_2_r_1_4_reporter_family_name",
            name.and_then(|name| name.first("family")),
        ),
        c_2_r_2_1_reporter_organisation: scope
            .nullable_text("c_2_r_2_1_reporter_organisation", organisation),
        c_2_r_2_2_reporter_department: scope
            .nullable_text("c_2_r_2_2_reporter_department", department),
        c_2_r_2_3_reporter_street: scope
            .nullable_text("c_2_r_2_3_reporter_street", line("streetAddressLine")),
        c_2_r_2_4_reporter_city: scope.nullable_text("c_2_r_2_4_reporter_city", line("city")),
        c_2_r_2_5_reporter_state_province: scope
            .nullable_text("c_2_r_2_5_reporter_state_province", line("state")),
        c_2_r_2_6_reporter_postcode: scope
            .nullable_text("c_2_r_2_6_reporter_postcode", line("postalCode")),
        c_2_r_2_7_reporter_telephone: telephone,
        c_2_r_3_reporter_country_code: scope.attr(
            "c_2_r_3_reporter_country_code",
            person.and_then(|person| person.find("asLocatedEntity/location/code")),
            "code",
        ),
        c_2_r_4_qualification: scope.nullable_attr(
            "c_2_r_4_qualification",
            person.and_then(|person| person.find("asQualifiedEntity/code")),
            "code",
        ),
        c_2_r_5_primary_source_regulatory_purposes: scope.attr(
            "c_2_r_5_primary_source_regulatory_purposes",
            relationship.first("priorityNumber"),
            "value",
        ),
        ..Default::default()
    }
}

/// C.1.9.1.r source case ids and the C.3 sender, both on `subjectOf1`.
fn read_sender(
    c_1: &mut CaseIdentification,
    icsr: &mut Icsr,
    decoder: &mut Decoder,
    event: &Element,
) {
    let Some(act) = event
        .all("subjectOf1")
        .find_map(|subject| subject.first("controlActEvent"))
    else {
        return;
    };

    let location = Location::root().field("c_1_identification_case_safety_report");
    for id in act
        .all("id")
        .filter(|id| id.get("root") == Some(oid::SOURCE_CASE_ID))
    {
        let index = c_1.c_1_9_1_r_source_case_id.len();
        let mut scope = decoder.scope(location.item("c_1_9_1_r_source_case_id", index));
        c_1.c_1_9_1_r_source_case_id.push(SourceCaseId {
            c_1_9_1_r_1_source_case_id: scope.attr(
                "c_1_9_1_r_1_source_case_id",
                Some(id),
                "assigningAuthorityName",
            ),
            c_1_9_1_r_2_case_id: scope.attr("c_1_9_1_r_2_case_id", Some(id), "extension"),
            ..Default::default()
        });
    }

    if let Some(entity) = act.find("author/assignedEntity") {
        let mut scope =
            decoder.scope(Location::root().field("c_3_information_sender_case_safety_report"));
        icsr.c_3_information_sender_case_safety_report = Some(sender(&mut scope, entity));
    }
}

fn sender(scope: &mut Scope<'_>, entity: &Element) -> Sender {
    let address = entity.first("addr");
    let person = entity.first("assignedPerson");
    let name = person.and_then(|person| person.first("name"));
    let (given, middle) = given_names(name);
    let (department, organisation) = department_of(Some(entity));
    let line = |part: &str| address.and_then(|address| address.first(part));

    let mut sender = Sender {
        c_3_1_sender_type: scope.attr("c_3_1_sender_type", entity.first("code"), "code"),
        c_3_2_sender_organisation: scope.text("c_3_2_sender_organisation", organisation),
        c_3_3_1_sender_department: scope.text("c_3_3_1_sender_department", department),
        c_3_3_2_sender_title: scope.text(
            "c_3_3_2_sender_title",
            name.and_then(|name| name.first("prefix")),
        ),
        c_3_3_3_sender_given_name: scope.text("c_3_3_3_sender_given_name", given),
        c_3_3_4_sender_middle_name: scope.text("c_3_3_4_sender_middle_name", middle),
        c_3_3_5_sender_family_name: scope.text(
            "c_3_3_5_sender_family_name",
            name.and_then(|name| name.first("family")),
        ),
        c_3_4_1_sender_street_address: scope
            .text("c_3_4_1_sender_street_address", line("streetAddressLine")),
        c_3_4_2_sender_city: scope.text("c_3_4_2_sender_city", line("city")),
        c_3_4_3_sender_state_province: scope.text("c_3_4_3_sender_state_province", line("state")),
        c_3_4_4_sender_postcode: scope.text("c_3_4_4_sender_postcode", line("postalCode")),
        c_3_4_5_sender_country_code: scope.attr(
            "c_3_4_5_sender_country_code",
            person.and_then(|person| person.find("asLocatedEntity/location/code")),
            "code",
        ),
        ..Default::default()
    };

    for value in entity
        .all("telecom")
        .filter_map(|telecom| telecom.get("value"))
    {
        match value.split_once(':') {
            Some(("tel", number)) => {
                sender.c_3_4_6_sender_telephone =
                    scope.plain("c_3_4_6_sender_telephone", Some(number), None);
            }
            Some(("fax", number)) => {
                sender.c_3_4_7_sender_fax = scope.plain("c_3_4_7_sender_fax", Some(number), None);
            }
            Some(("mailto", address)) => {
                sender.c_3_4_8_sender_email =
                    scope.plain("c_3_4_8_sender_email", Some(address), None);
            }
            _ => {}
        }
    }
    sender
}

fn study(scope: &mut Scope<'_>, research: &Element) -> StudyIdentification {
    let mut study = StudyIdentification {
        c_5_2_study_name: scope.nullable_text("c_5_2_study_name", research.first("title")),
        c_5_3_sponsor_study_number: scope.nullable_attr(
            "c_5_3_sponsor_study_number",
            research
                .all("id")
                .find(|id| id.get("root") == Some(oid::SPONSOR_STUDY)),
            "extension",
        ),
        c_5_4_study_type_reaction: scope.attr(
            "c_5_4_study_type_reaction",
            research.first("code"),
            "code",
        ),
        ..Default::default()
    };

    for (index, registration) in research
        .all("authorization")
        .filter_map(|authorization| authorization.first("studyRegistration"))
        .enumerate()
    {
        let location = scope.location().item("c_5_1_r_study_registration", index);
        let mut scope = scope.nested(location);
        study.c_5_1_r_study_registration.push(StudyRegistration {
            c_5_1_r_1_study_registration_number: scope.nullable_attr(
                "c_5_1_r_1_study_registration_number",
                registration.first("id"),
                "extension",
            ),
            c_5_1_r_2_study_registration_country: scope.nullable_attr(
                "c_5_1_r_2_study_registration_country",
                registration.find("author/territorialAuthority/governingPlace/code"),
                "code",
            ),
            ..Default::default()
        });
    }
    study
}
