//! Section C: case identification, primary sources, sender, literature and
//! study identification.

use serde::{Deserialize, Serialize};

use crate::date::{DatePrecision, Hl7Date};
use crate::enums::{
    CodeList, FirstSender, NullificationAmendment, Qualification, RegulatoryPurpose, ReportType,
    SenderType, StudyType,
};
use crate::field::{Entity, Field};
use crate::null_flavor::{Nullable, flavors};

/// C.1 identification of the case safety report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseIdentification {
    pub id: Option<i64>,

    pub c_1_6_1_additional_documents_available: Option<bool>,
    pub c_1_6_1_r_documents_held_sender: Vec<DocumentHeldBySender>,

    pub c_1_9_1_other_case_ids_previous_transmissions: Option<Nullable<bool>>,
    pub c_1_9_1_r_source_case_id: Vec<SourceCaseId>,

    pub c_1_10_r_identification_number_report_linked: Vec<LinkedReport>,

    pub c_1_1_sender_safety_report_unique_id: Option<String>,
    pub c_1_2_date_creation: Option<Hl7Date>,
    pub c_1_3_type_report: Option<ReportType>,
    pub c_1_4_date_report_first_received_source: Option<Hl7Date>,
    pub c_1_5_date_most_recent_information: Option<Hl7Date>,

    pub c_1_7_fulfil_local_criteria_expedited_report: Option<Nullable<bool>>,

    pub c_1_8_1_worldwide_unique_case_identification_number: Option<String>,
    pub c_1_8_2_first_sender: Option<FirstSender>,

    pub c_1_11_1_report_nullification_amendment: Option<NullificationAmendment>,
    pub c_1_11_2_reason_nullification_amendment: Option<String>,
}

impl Entity for CaseIdentification {
    const NAME: &'static str = "c_1_identification_case_safety_report";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::boolean(
                "c_1_6_1_additional_documents_available",
                &self.c_1_6_1_additional_documents_available,
            )
            .required(),
            Field::marker(
                "c_1_9_1_other_case_ids_previous_transmissions",
                &self.c_1_9_1_other_case_ids_previous_transmissions,
            )
            .required()
            .flavors(flavors::NI),
            Field::text(
                "c_1_1_sender_safety_report_unique_id",
                100,
                &self.c_1_1_sender_safety_report_unique_id,
            )
            .required(),
            Field::date(
                "c_1_2_date_creation",
                DatePrecision::Second,
                &self.c_1_2_date_creation,
            )
            .required(),
            Field::code(
                "c_1_3_type_report",
                CodeList::ReportType,
                &self.c_1_3_type_report,
            )
            .required(),
            Field::date(
                "c_1_4_date_report_first_received_source",
                DatePrecision::Day,
                &self.c_1_4_date_report_first_received_source,
            )
            .required(),
            Field::date(
                "c_1_5_date_most_recent_information",
                DatePrecision::Day,
                &self.c_1_5_date_most_recent_information,
            )
            .required(),
            Field::boolean(
                "c_1_7_fulfil_local_criteria_expedited_report",
                &self.c_1_7_fulfil_local_criteria_expedited_report,
            )
            .required()
            .flavors(flavors::NI),
            Field::text(
                "c_1_8_1_worldwide_unique_case_identification_number",
                100,
                &self.c_1_8_1_worldwide_unique_case_identification_number,
            )
            .required(),
            Field::code(
                "c_1_8_2_first_sender",
                CodeList::FirstSender,
                &self.c_1_8_2_first_sender,
            )
            .required(),
            Field::code(
                "c_1_11_1_report_nullification_amendment",
                CodeList::NullificationAmendment,
                &self.c_1_11_1_report_nullification_amendment,
            ),
            Field::text(
                "c_1_11_2_reason_nullification_amendment",
                2000,
                &self.c_1_11_2_reason_nullification_amendment,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.1.6.1.r documents held by sender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentHeldBySender {
    pub id: Option<i64>,
    pub c_1_6_1_r_1_documents_held_sender: Option<String>,
}

impl Entity for DocumentHeldBySender {
    const NAME: &'static str = "c_1_6_1_r_documents_held_sender";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "c_1_6_1_r_1_documents_held_sender",
                2000,
                &self.c_1_6_1_r_1_documents_held_sender,
            )
            .required(),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.1.9.1.r source of the case identifier and case identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCaseId {
    pub id: Option<i64>,
    pub c_1_9_1_r_1_source_case_id: Option<String>,
    pub c_1_9_1_r_2_case_id: Option<String>,
}

impl Entity for SourceCaseId {
    const NAME: &'static str = "c_1_9_1_r_source_case_id";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("c_1_9_1_r_1_source_case_id", 100, &self.c_1_9_1_r_1_source_case_id)
                .required(),
            Field::text("c_1_9_1_r_2_case_id", 100, &self.c_1_9_1_r_2_case_id).required(),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.1.10.r identification number of the report linked to this report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedReport {
    pub id: Option<i64>,
    pub c_1_10_r_identification_number_report_linked: Option<String>,
}

impl Entity for LinkedReport {
    const NAME: &'static str = "c_1_10_r_identification_number_report_linked";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::text(
            "c_1_10_r_identification_number_report_linked",
            100,
            &self.c_1_10_r_identification_number_report_linked,
        )]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.2.r primary source(s) of information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimarySource {
    pub id: Option<i64>,

    pub c_2_r_1_1_reporter_title: Option<Nullable<String>>,
    pub c_2_r_1_2_reporter_given_name: Option<Nullable<String>>,
    pub c_2_r_1_3_reporter_middle_name: Option<Nullable<String>>,
    pub c_2_r_1_4_reporter_family_name: Option<Nullable<String>>,

    pub c_2_r_2_1_reporter_organisation: Option<Nullable<String>>,
    pub c_2_r_2_2_reporter_department: Option<Nullable<String>>,
    pub c_2_r_2_3_reporter_street: Option<Nullable<String>>,
    pub c_2_r_2_4_reporter_city: Option<Nullable<String>>,
    pub c_2_r_2_5_reporter_state_province: Option<Nullable<String>>,
    pub c_2_r_2_6_reporter_postcode: Option<Nullable<String>>,
    pub c_2_r_2_7_reporter_telephone: Option<Nullable<String>>,

    pub c_2_r_3_reporter_country_code: Option<String>,
    pub c_2_r_4_qualification: Option<Nullable<Qualification>>,
    pub c_2_r_5_primary_source_regulatory_purposes: Option<RegulatoryPurpose>,
}

impl Entity for PrimarySource {
    const NAME: &'static str = "c_2_r_primary_source_information";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("c_2_r_1_1_reporter_title", 50, &self.c_2_r_1_1_reporter_title)
                .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::text(
                "c_2_r_1_2_reporter_given_name",
                60,
                &self.c_2_r_1_2_reporter_given_name,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "c_2_r_1_3_reporter_middle_name",
                60,
                &self.c_2_r_1_3_reporter_middle_name,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "c_2_r_1_4_reporter_family_name",
                60,
                &self.c_2_r_1_4_reporter_family_name,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "c_2_r_2_1_reporter_organisation",
                60,
                &self.c_2_r_2_1_reporter_organisation,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "c_2_r_2_2_reporter_department",
                60,
                &self.c_2_r_2_2_reporter_department,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::text("c_2_r_2_3_reporter_street", 100, &self.c_2_r_2_3_reporter_street)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::text("c_2_r_2_4_reporter_city", 35, &self.c_2_r_2_4_reporter_city)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "c_2_r_2_5_reporter_state_province",
                40,
                &self.c_2_r_2_5_reporter_state_province,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::text("c_2_r_2_6_reporter_postcode", 15, &self.c_2_r_2_6_reporter_postcode)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "c_2_r_2_7_reporter_telephone",
                33,
                &self.c_2_r_2_7_reporter_telephone,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::alpha(
                "c_2_r_3_reporter_country_code",
                2,
                &self.c_2_r_3_reporter_country_code,
            ),
            Field::code(
                "c_2_r_4_qualification",
                CodeList::Qualification,
                &self.c_2_r_4_qualification,
            )
            .flavors(flavors::UNK),
            Field::code(
                "c_2_r_5_primary_source_regulatory_purposes",
                CodeList::RegulatoryPurpose,
                &self.c_2_r_5_primary_source_regulatory_purposes,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.3 information on sender of case safety report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub id: Option<i64>,

    pub c_3_1_sender_type: Option<SenderType>,
    pub c_3_2_sender_organisation: Option<String>,

    pub c_3_3_1_sender_department: Option<String>,
    pub c_3_3_2_sender_title: Option<String>,
    pub c_3_3_3_sender_given_name: Option<String>,
    pub c_3_3_4_sender_middle_name: Option<String>,
    pub c_3_3_5_sender_family_name: Option<String>,

    pub c_3_4_1_sender_street_address: Option<String>,
    pub c_3_4_2_sender_city: Option<String>,
    pub c_3_4_3_sender_state_province: Option<String>,
    pub c_3_4_4_sender_postcode: Option<String>,
    pub c_3_4_5_sender_country_code: Option<String>,
    pub c_3_4_6_sender_telephone: Option<String>,
    pub c_3_4_7_sender_fax: Option<String>,
    pub c_3_4_8_sender_email: Option<String>,
}

impl Entity for Sender {
    const NAME: &'static str = "c_3_information_sender_case_safety_report";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::code("c_3_1_sender_type", CodeList::SenderType, &self.c_3_1_sender_type)
                .required(),
            Field::text("c_3_2_sender_organisation", 100, &self.c_3_2_sender_organisation),
            Field::text("c_3_3_1_sender_department", 60, &self.c_3_3_1_sender_department),
            Field::text("c_3_3_2_sender_title", 50, &self.c_3_3_2_sender_title),
            Field::text("c_3_3_3_sender_given_name", 60, &self.c_3_3_3_sender_given_name),
            Field::text("c_3_3_4_sender_middle_name", 60, &self.c_3_3_4_sender_middle_name),
            Field::text("c_3_3_5_sender_family_name", 60, &self.c_3_3_5_sender_family_name),
            Field::text(
                "c_3_4_1_sender_street_address",
                100,
                &self.c_3_4_1_sender_street_address,
            ),
            Field::text("c_3_4_2_sender_city", 35, &self.c_3_4_2_sender_city),
            Field::text(
                "c_3_4_3_sender_state_province",
                40,
                &self.c_3_4_3_sender_state_province,
            ),
            Field::text("c_3_4_4_sender_postcode", 15, &self.c_3_4_4_sender_postcode),
            Field::text("c_3_4_5_sender_country_code", 2, &self.c_3_4_5_sender_country_code),
            Field::text("c_3_4_6_sender_telephone", 33, &self.c_3_4_6_sender_telephone),
            Field::text("c_3_4_7_sender_fax", 33, &self.c_3_4_7_sender_fax),
            Field::text("c_3_4_8_sender_email", 100, &self.c_3_4_8_sender_email),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.4.r literature reference(s).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiteratureReference {
    pub id: Option<i64>,
    pub c_4_r_1_literature_reference: Option<Nullable<String>>,
}

impl Entity for LiteratureReference {
    const NAME: &'static str = "c_4_r_literature_reference";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "c_4_r_1_literature_reference",
                500,
                &self.c_4_r_1_literature_reference,
            )
            .flavors(flavors::ASKU_NASK),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.5 study identification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyIdentification {
    pub id: Option<i64>,

    pub c_5_1_r_study_registration: Vec<StudyRegistration>,

    pub c_5_2_study_name: Option<Nullable<String>>,
    pub c_5_3_sponsor_study_number: Option<Nullable<String>>,
    pub c_5_4_study_type_reaction: Option<StudyType>,
}

impl Entity for StudyIdentification {
    const NAME: &'static str = "c_5_study_identification";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("c_5_2_study_name", 2000, &self.c_5_2_study_name)
                .flavors(flavors::ASKU_NASK),
            Field::text("c_5_3_sponsor_study_number", 50, &self.c_5_3_sponsor_study_number)
                .flavors(flavors::ASKU_NASK),
            Field::code(
                "c_5_4_study_type_reaction",
                CodeList::StudyType,
                &self.c_5_4_study_type_reaction,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// C.5.1.r study registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyRegistration {
    pub id: Option<i64>,
    pub c_5_1_r_1_study_registration_number: Option<Nullable<String>>,
    pub c_5_1_r_2_study_registration_country: Option<Nullable<String>>,
}

impl Entity for StudyRegistration {
    const NAME: &'static str = "c_5_1_r_study_registration";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "c_5_1_r_1_study_registration_number",
                50,
                &self.c_5_1_r_1_study_registration_number,
            )
            .flavors(flavors::ASKU_NASK),
            Field::alpha(
                "c_5_1_r_2_study_registration_country",
                2,
                &self.c_5_1_r_2_study_registration_country,
            )
            .flavors(flavors::ASKU_NASK),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}
