use chrono::NaiveDate;
use icsr_model::{
    ActionTaken, AdditionalDrugInfo, AdditionalDrugInformation, AgeGroup, AutopsyCauseOfDeath,
    CaseIdentification, CauseOfDeath, DocumentHeldBySender, DosageInformation, DrugInformation,
    DrugReactionMatrix, DrugRole, FirstSender, Hl7Date, Icsr, IndicationForUse, IssueKind,
    LinkedReport, LiteratureReference, MedicalHistory, Narrative, NullFlavor, Nullable,
    NullificationAmendment,
    ParentMedicalHistory, ParentPastDrugHistory, PastDrugHistory, Patient, PrimarySource,
    Qualification, ReactionEvent, ReactionOutcome, ReactionRef, Recurrence, RegulatoryPurpose,
    RelatednessAssessment, ReportType, ReporterCommentsNative, Sender, SenderDiagnosis,
    SenderType, Sex, SourceCaseId, StudyIdentification, StudyRegistration, StudyType,
    SubstanceStrength, TermHighlighted, TestResult, TestResultCode, ValidationLevel,
};
use icsr_xml::tree::{self, Element};
use icsr_xml::{
    ExportOptions, MappingError, Template, export_many, export_one, import_many, import_one,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(raw: &str) -> Hl7Date {
    Hl7Date::parse(raw).expect("valid date")
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn known(value: &str) -> Option<Nullable<String>> {
    Some(Nullable::Value(value.to_string()))
}

fn options() -> ExportOptions {
    ExportOptions {
        creation_time: NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|day| day.and_hms_opt(9, 15, 0)),
        indent: 2,
    }
}

fn reaction(id: i64, code: i64, term: &str) -> ReactionEvent {
    ReactionEvent {
        id: Some(id),
        e_i_1_1a_reaction_primary_source_native_language: text(term),
        e_i_1_1b_reaction_primary_source_language: text("deu"),
        e_i_1_2_reaction_primary_source_translation: text("translated"),
        e_i_2_1a_meddra_version_reaction: text("26.1"),
        e_i_2_1b_reaction_meddra_code: Some(code),
        e_i_3_1_term_highlighted_reporter: Some(TermHighlighted::HighlightedSerious),
        e_i_3_2a_results_death: Some(Nullable::Value(false)),
        e_i_3_2b_life_threatening: Some(Nullable::NullFlavor(NullFlavor::Ni)),
        e_i_3_2c_caused_prolonged_hospitalisation: Some(Nullable::Value(true)),
        e_i_4_date_start_reaction: Some(Nullable::Value(date("20240110"))),
        e_i_5_date_end_reaction: Some(Nullable::NullFlavor(NullFlavor::Asku)),
        e_i_6a_duration_reaction_num: Some(3),
        e_i_6b_duration_reaction_unit: text("d"),
        e_i_7_outcome_reaction_last_observation: Some(ReactionOutcome::Recovering),
        e_i_8_medical_confirmation_healthcare_professional: Some(true),
        e_i_9_identification_country_reaction: text("DE"),
        ..Default::default()
    }
}

fn drug(reaction_id: i64) -> DrugInformation {
    DrugInformation {
        g_k_1_characterisation_drug_role: Some(DrugRole::Suspect),
        g_k_2_1_1a_mpid_version: text("2024-01"),
        g_k_2_1_1b_mpid: text("MPID-1"),
        g_k_2_1_2a_phpid_version: text("2024-02"),
        g_k_2_1_2b_phpid: text("PHPID-1"),
        g_k_2_2_medicinal_product_name_primary_source: text("Aspirin"),
        g_k_2_3_r_substance_id_strength: vec![SubstanceStrength {
            g_k_2_3_r_1_substance_name: text("acetylsalicylic acid"),
            g_k_2_3_r_2a_substance_termid_version: text("1"),
            g_k_2_3_r_2b_substance_termid: text("TERM-1"),
            g_k_2_3_r_3a_strength_num: Some(Decimal::new(500, 0)),
            g_k_2_3_r_3b_strength_unit: text("mg"),
            ..Default::default()
        }],
        g_k_2_4_identification_country_drug_obtained: text("FR"),
        g_k_2_5_investigational_product_blinded: Some(true),
        g_k_3_1_authorisation_application_number: text("EU/1/00/000"),
        g_k_3_2_country_authorisation_application: text("DE"),
        g_k_3_3_name_holder_applicant: text("ACME Pharma"),
        g_k_4_r_dosage_information: vec![
            DosageInformation {
                g_k_4_r_1a_dose_num: Some(Decimal::new(5, 1)),
                g_k_4_r_1b_dose_unit: text("g"),
                g_k_4_r_2_number_units_interval: Some(Decimal::new(8, 0)),
                g_k_4_r_3_definition_interval_unit: text("h"),
                g_k_4_r_4_date_time_drug: Some(Nullable::Value(date("20240101"))),
                g_k_4_r_5_date_time_last_administration: Some(Nullable::NullFlavor(
                    NullFlavor::Unk,
                )),
                g_k_4_r_6a_duration_drug_administration_num: Some(Decimal::new(9, 0)),
                g_k_4_r_6b_duration_drug_administration_unit: text("d"),
                g_k_4_r_7_batch_lot_number: text("LOT-7"),
                g_k_4_r_8_dosage_text: text("500 mg three times daily"),
                g_k_4_r_9_1_pharmaceutical_dose_form: known("tablet"),
                g_k_4_r_9_2a_pharmaceutical_dose_form_termid_version: text("2.1"),
                g_k_4_r_9_2b_pharmaceutical_dose_form_termid: text("FORM-1"),
                g_k_4_r_10_1_route_administration: known("oral"),
                g_k_4_r_10_2a_route_administration_termid_version: text("2.1"),
                g_k_4_r_10_2b_route_administration_termid: text("ROUTE-1"),
                ..Default::default()
            },
            DosageInformation {
                g_k_4_r_8_dosage_text: text("loading dose"),
                g_k_4_r_10_1_route_administration: Some(Nullable::NullFlavor(NullFlavor::Unk)),
                g_k_4_r_11_1_parent_route_administration: known("transplacental"),
                g_k_4_r_11_2a_parent_route_administration_termid_version: text("2.1"),
                g_k_4_r_11_2b_parent_route_administration_termid: text("ROUTE-9"),
                ..Default::default()
            },
        ],
        g_k_5a_cumulative_dose_first_reaction_num: Some(Decimal::new(15, 0)),
        g_k_5b_cumulative_dose_first_reaction_unit: text("g"),
        g_k_6a_gestation_period_exposure_num: Some(Decimal::new(12, 0)),
        g_k_6b_gestation_period_exposure_unit: text("wk"),
        g_k_7_r_indication_use_case: vec![IndicationForUse {
            g_k_7_r_1_indication_primary_source: known("headache"),
            g_k_7_r_2a_meddra_version_indication: text("26.1"),
            g_k_7_r_2b_indication_meddra_code: Some(10_019_211),
            ..Default::default()
        }],
        g_k_8_action_taken_drug: Some(ActionTaken::Withdrawn),
        g_k_9_i_drug_reaction_matrix: vec![DrugReactionMatrix {
            g_k_9_i_1_reaction_assessed: Some(ReactionRef::Id(reaction_id)),
            g_k_9_i_2_r_assessment_relatedness_drug_reaction: vec![
                RelatednessAssessment {
                    g_k_9_i_2_r_1_source_assessment: text("Reporter"),
                    g_k_9_i_2_r_2_method_assessment: text("Global introspection"),
                    g_k_9_i_2_r_3_result_assessment: text("Related"),
                    ..Default::default()
                },
                RelatednessAssessment {
                    g_k_9_i_2_r_1_source_assessment: text("Sender"),
                    g_k_9_i_2_r_3_result_assessment: text("Possible"),
                    ..Default::default()
                },
            ],
            g_k_9_i_3_1a_interval_drug_administration_reaction_num: Some(Decimal::new(2, 0)),
            g_k_9_i_3_1b_interval_drug_administration_reaction_unit: text("d"),
            g_k_9_i_3_2a_interval_last_dose_drug_reaction_num: Some(Decimal::new(6, 0)),
            g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit: text("h"),
            g_k_9_i_4_reaction_recur_readministration: Some(Recurrence::NoRechallenge),
            ..Default::default()
        }],
        g_k_10_r_additional_information_drug: vec![AdditionalDrugInformation {
            g_k_10_r_additional_information_drug: Some(AdditionalDrugInfo::Overdose),
            ..Default::default()
        }],
        g_k_11_additional_information_drug: text("taken with food"),
        ..Default::default()
    }
}

fn full_report() -> Icsr {
    Icsr {
        c_1_identification_case_safety_report: Some(CaseIdentification {
            c_1_1_sender_safety_report_unique_id: text("DE-ACME-2024-001"),
            c_1_2_date_creation: Some(date("20240102120000")),
            c_1_3_type_report: Some(ReportType::ReportFromStudy),
            c_1_4_date_report_first_received_source: Some(date("20240101")),
            c_1_5_date_most_recent_information: Some(date("20240105")),
            c_1_6_1_additional_documents_available: Some(true),
            c_1_6_1_r_documents_held_sender: vec![DocumentHeldBySender {
                c_1_6_1_r_1_documents_held_sender: text("discharge letter"),
                ..Default::default()
            }],
            c_1_7_fulfil_local_criteria_expedited_report: Some(Nullable::Value(true)),
            c_1_8_1_worldwide_unique_case_identification_number: text("DE-ACME-2024-001"),
            c_1_8_2_first_sender: Some(FirstSender::Other),
            c_1_9_1_other_case_ids_previous_transmissions: Some(Nullable::Value(true)),
            c_1_9_1_r_source_case_id: vec![SourceCaseId {
                c_1_9_1_r_1_source_case_id: text("FDA"),
                c_1_9_1_r_2_case_id: text("US-123"),
                ..Default::default()
            }],
            c_1_10_r_identification_number_report_linked: vec![LinkedReport {
                c_1_10_r_identification_number_report_linked: text("DE-ACME-2023-099"),
                ..Default::default()
            }],
            c_1_11_1_report_nullification_amendment: Some(NullificationAmendment::Amendment),
            c_1_11_2_reason_nullification_amendment: text("follow-up corrected dates"),
            ..Default::default()
        }),
        c_2_r_primary_source_information: vec![
            PrimarySource {
                c_2_r_1_1_reporter_title: known("Dr."),
                c_2_r_1_2_reporter_given_name: known("Anna"),
                c_2_r_1_3_reporter_middle_name: known("Maria"),
                c_2_r_1_4_reporter_family_name: known("Schmidt"),
                c_2_r_2_1_reporter_organisation: known("Charite"),
                c_2_r_2_2_reporter_department: known("Neurology"),
                c_2_r_2_3_reporter_street: known("Chariteplatz 1"),
                c_2_r_2_4_reporter_city: known("Berlin"),
                c_2_r_2_5_reporter_state_province: Some(Nullable::NullFlavor(NullFlavor::Msk)),
                c_2_r_2_6_reporter_postcode: known("10117"),
                c_2_r_2_7_reporter_telephone: known("+49 30 450"),
                c_2_r_3_reporter_country_code: text("DE"),
                c_2_r_4_qualification: Some(Nullable::Value(Qualification::Physician)),
                c_2_r_5_primary_source_regulatory_purposes: Some(RegulatoryPurpose::Primary),
                ..Default::default()
            },
            PrimarySource {
                c_2_r_1_3_reporter_middle_name: known("Lee"),
                c_2_r_2_1_reporter_organisation: known("City Pharmacy"),
                c_2_r_2_7_reporter_telephone: Some(Nullable::NullFlavor(NullFlavor::Asku)),
                c_2_r_4_qualification: Some(Nullable::NullFlavor(NullFlavor::Unk)),
                ..Default::default()
            },
        ],
        c_3_information_sender_case_safety_report: Some(Sender {
            c_3_1_sender_type: Some(SenderType::PharmaceuticalCompany),
            c_3_2_sender_organisation: text("ACME"),
            c_3_3_1_sender_department: text("Drug Safety"),
            c_3_3_2_sender_title: text("Mr."),
            c_3_3_3_sender_given_name: text("John"),
            c_3_3_5_sender_family_name: text("Doe"),
            c_3_4_1_sender_street_address: text("Main Street 1"),
            c_3_4_2_sender_city: text("Munich"),
            c_3_4_4_sender_postcode: text("80331"),
            c_3_4_5_sender_country_code: text("DE"),
            c_3_4_6_sender_telephone: text("+49 89 1"),
            c_3_4_7_sender_fax: text("+49 89 2"),
            c_3_4_8_sender_email: text("safety@acme.example"),
            ..Default::default()
        }),
        c_4_r_literature_reference: vec![
            LiteratureReference {
                c_4_r_1_literature_reference: known("Smith J. Headache after aspirin. 2023."),
                ..Default::default()
            },
            LiteratureReference {
                c_4_r_1_literature_reference: Some(Nullable::NullFlavor(NullFlavor::Asku)),
                ..Default::default()
            },
        ],
        c_5_study_identification: Some(StudyIdentification {
            c_5_1_r_study_registration: vec![StudyRegistration {
                c_5_1_r_1_study_registration_number: known("EudraCT 2023-000001-11"),
                c_5_1_r_2_study_registration_country: known("DE"),
                ..Default::default()
            }],
            c_5_2_study_name: known("ACME-101"),
            c_5_3_sponsor_study_number: Some(Nullable::NullFlavor(NullFlavor::Asku)),
            c_5_4_study_type_reaction: Some(StudyType::ClinicalTrials),
            ..Default::default()
        }),
        d_patient_characteristics: Some(Patient {
            d_1_patient: known("AS"),
            d_1_1_1_medical_record_number_source_gp: known("GP-1"),
            d_1_1_3_medical_record_number_source_hospital: Some(Nullable::NullFlavor(
                NullFlavor::Msk,
            )),
            d_2_1_date_birth: Some(Nullable::Value(date("19800101"))),
            d_2_2a_age_onset_reaction_num: Some(44),
            d_2_2b_age_onset_reaction_unit: text("a"),
            d_2_3_patient_age_group: Some(AgeGroup::Adult),
            d_3_body_weight: Some(Decimal::new(725, 1)),
            d_4_height: Some(172),
            d_5_sex: Some(Nullable::Value(Sex::Female)),
            d_6_last_menstrual_period_date: Some(date("20231220")),
            d_7_1_r_structured_information_medical_history: vec![MedicalHistory {
                d_7_1_r_1a_meddra_version_medical_history: text("26.1"),
                d_7_1_r_1b_medical_history_meddra_code: Some(10_020_772),
                d_7_1_r_2_start_date: Some(Nullable::Value(date("2015"))),
                d_7_1_r_3_continuing: Some(Nullable::Value(true)),
                d_7_1_r_5_comments: text("controlled"),
                d_7_1_r_6_family_history: Some(true),
                ..Default::default()
            }],
            d_7_2_text_medical_history: known("no other relevant history"),
            d_7_3_concomitant_therapies: Some(true),
            d_8_r_past_drug_history: vec![PastDrugHistory {
                d_8_r_1_name_drug: known("Ibuprofen"),
                d_8_r_2a_mpid_version: text("2024-01"),
                d_8_r_2b_mpid: text("MPID-9"),
                d_8_r_4_start_date: Some(Nullable::Value(date("2020"))),
                d_8_r_5_end_date: Some(Nullable::NullFlavor(NullFlavor::Unk)),
                d_8_r_6a_meddra_version_indication: text("26.1"),
                d_8_r_6b_indication_meddra_code: Some(10_019_211),
                d_8_r_7a_meddra_version_reaction: text("26.1"),
                d_8_r_7b_reaction_meddra_code: Some(10_037_087),
                ..Default::default()
            }],
            d_9_1_date_death: Some(Nullable::Value(date("20240120"))),
            d_9_2_r_cause_death: vec![CauseOfDeath {
                d_9_2_r_1a_meddra_version_cause_death: text("26.1"),
                d_9_2_r_1b_cause_death_meddra_code: Some(10_042_434),
                d_9_2_r_2_cause_death: text("stroke"),
                ..Default::default()
            }],
            d_9_3_autopsy: Some(Nullable::Value(true)),
            d_9_4_r_autopsy_determined_cause_death: vec![AutopsyCauseOfDeath {
                d_9_4_r_1a_meddra_version_autopsy_determined_cause_death: text("26.1"),
                d_9_4_r_1b_autopsy_determined_cause_death_meddra_code: Some(10_019_005),
                d_9_4_r_2_autopsy_determined_cause_death: text("haemorrhage"),
                ..Default::default()
            }],
            d_10_1_parent_identification: known("MS"),
            d_10_2_1_date_birth_parent: Some(Nullable::NullFlavor(NullFlavor::Unk)),
            d_10_2_2a_age_parent_num: Some(35),
            d_10_2_2b_age_parent_unit: text("a"),
            d_10_3_last_menstrual_period_date_parent: Some(Nullable::Value(date("20230401"))),
            d_10_4_body_weight_parent: Some(Decimal::new(60, 0)),
            d_10_5_height_parent: Some(165),
            d_10_6_sex_parent: Some(Nullable::Value(Sex::Female)),
            d_10_7_1_r_structured_information_parent_meddra_code: vec![ParentMedicalHistory {
                d_10_7_1_r_1a_meddra_version_medical_history: text("26.1"),
                d_10_7_1_r_1b_medical_history_meddra_code: Some(10_012_601),
                d_10_7_1_r_4_end_date: Some(Nullable::Value(date("2022"))),
                ..Default::default()
            }],
            d_10_7_2_text_medical_history_parent: text("gestational diabetes"),
            d_10_8_r_past_drug_history_parent: vec![ParentPastDrugHistory {
                d_10_8_r_1_name_drug: text("Metformin"),
                d_10_8_r_3a_phpid_version: text("1"),
                d_10_8_r_3b_phpid: text("PHPID-7"),
                ..Default::default()
            }],
            ..Default::default()
        }),
        e_i_reaction_event: vec![
            reaction(1, 10_019_211, "Kopfschmerzen"),
            reaction(2, 10_028_813, "Übelkeit"),
        ],
        f_r_results_tests_procedures_investigation_patient: vec![TestResult {
            f_r_1_test_date: Some(Nullable::Value(date("20240112"))),
            f_r_2_1_test_name: text("Blood glucose"),
            f_r_2_2a_meddra_version_test_name: text("26.1"),
            f_r_2_2b_test_name_meddra_code: Some(10_005_557),
            f_r_3_1_test_result_code: Some(TestResultCode::Positive),
            f_r_3_2_test_result_val_qual: Some(Nullable::Value(Decimal::new(74, 1))),
            f_r_3_3_test_result_unit: text("mmol/l"),
            f_r_3_4_result_unstructured_data: text("fasting"),
            f_r_4_normal_low_value: text("3.9"),
            f_r_5_normal_high_value: text("5.6"),
            f_r_6_comments: text("repeat in a week"),
            f_r_7_more_information_available: Some(false),
            ..Default::default()
        }],
        g_k_drug_information: vec![drug(2), DrugInformation {
            g_k_1_characterisation_drug_role: Some(DrugRole::Concomitant),
            g_k_2_2_medicinal_product_name_primary_source: text("Paracetamol"),
            ..Default::default()
        }],
        h_narrative_case_summary: Some(Narrative {
            h_1_case_narrative: text("Patient developed a headache <severe> & nausea."),
            h_2_reporter_comments: text("likely related"),
            h_3_r_sender_diagnosis_meddra_code: vec![SenderDiagnosis {
                h_3_r_1a_meddra_version_sender_diagnosis: text("26.1"),
                h_3_r_1b_sender_diagnosis_meddra_code: Some(10_019_211),
                ..Default::default()
            }],
            h_4_sender_comments: text("expectedness under review"),
            h_5_r_case_summary_reporter_comments_native_language: vec![ReporterCommentsNative {
                h_5_r_1a_case_summary_reporter_comments_text: text("Patientin klagte"),
                h_5_r_1b_case_summary_reporter_comments_language: text("deu"),
                ..Default::default()
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Replace transient reaction ids with positional ones so an imported report
/// compares equal to its source.
fn by_position(mut icsr: Icsr) -> Icsr {
    let positions: Vec<Vec<Option<usize>>> = icsr
        .g_k_drug_information
        .iter()
        .map(|drug| {
            drug.g_k_9_i_drug_reaction_matrix
                .iter()
                .map(|row| {
                    row.g_k_9_i_1_reaction_assessed
                        .as_ref()
                        .and_then(|reference| icsr.reaction_position(reference))
                })
                .collect()
        })
        .collect();
    for (drug, rows) in icsr.g_k_drug_information.iter_mut().zip(positions) {
        for (row, position) in drug.g_k_9_i_drug_reaction_matrix.iter_mut().zip(rows) {
            row.g_k_9_i_1_reaction_assessed =
                position.map(|position| ReactionRef::Id(position as i64 + 1));
        }
    }
    for (position, reaction) in icsr.e_i_reaction_event.iter_mut().enumerate() {
        reaction.id = Some(position as i64 + 1);
        reaction.uuid = None;
    }
    icsr
}

fn round_trip(icsr: &Icsr) -> Icsr {
    let batch = export_many(std::slice::from_ref(icsr), &options()).expect("export");
    assert_eq!(batch.exported(), 1);
    let imported = import_many(&batch.xml).expect("import");
    assert_eq!(imported.records.len(), 1);
    let record = imported.records.into_iter().next().expect("one record");
    let imported = record.result.expect("fragment imports");
    assert!(imported.issues.is_empty(), "{:?}", imported.issues);
    imported.icsr
}

/// Blank every attribute value that is a random UUID.
fn mask_uuids(element: &mut Element) {
    for (_, value) in &mut element.attributes {
        if Uuid::parse_str(value).is_ok() {
            *value = "<uuid>".to_string();
        }
    }
    for child in &mut element.children {
        if let tree::Node::Element(child) = child {
            mask_uuids(child);
        }
    }
}

const ROLE_PATH: &str = "controlActProcess/subject/investigationEvent/component/adverseEventAssessment/subject1/primaryRole";

#[test]
fn full_report_round_trips() {
    let original = full_report();
    let imported = round_trip(&original);
    assert_eq!(by_position(imported), original);
}

#[test]
fn matrix_row_keeps_its_reaction_by_position() {
    let imported = round_trip(&full_report());
    let row = &imported.g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[0];
    let reference = row.g_k_9_i_1_reaction_assessed.expect("reference");
    assert_eq!(imported.reaction_position(&reference), Some(1));
    assert!(matches!(reference, ReactionRef::Uuid(_)));
    assert!(imported.e_i_reaction_event.iter().all(|reaction| reaction.id.is_none()));
}

#[test]
fn second_matrix_row_for_a_reaction_folds_into_the_first() {
    let assessed = |result: &str| DrugReactionMatrix {
        g_k_9_i_1_reaction_assessed: Some(ReactionRef::Id(1)),
        g_k_9_i_2_r_assessment_relatedness_drug_reaction: vec![RelatednessAssessment {
            g_k_9_i_2_r_3_result_assessment: text(result),
            ..Default::default()
        }],
        ..Default::default()
    };
    let icsr = Icsr {
        e_i_reaction_event: vec![reaction(1, 10_019_211, "Kopfschmerzen")],
        g_k_drug_information: vec![DrugInformation {
            g_k_9_i_drug_reaction_matrix: vec![assessed("Related"), assessed("Possible")],
            ..Default::default()
        }],
        ..Default::default()
    };

    let report = icsr_validate::validate(&icsr, ValidationLevel::Structural);
    let duplicate = report
        .issues
        .iter()
        .find(|issue| issue.kind == IssueKind::ReferentialIntegrity)
        .unwrap();
    assert_eq!(
        duplicate.location.to_string(),
        "g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[1].g_k_9_i_1_reaction_assessed"
    );
    assert_eq!(report.referential_count(), 1);

    let imported = round_trip(&icsr);
    let rows = &imported.g_k_drug_information[0].g_k_9_i_drug_reaction_matrix;
    assert_eq!(rows.len(), 1);
    let results: Vec<_> = rows[0]
        .g_k_9_i_2_r_assessment_relatedness_drug_reaction
        .iter()
        .map(|assessment| assessment.g_k_9_i_2_r_3_result_assessment.as_deref())
        .collect();
    assert_eq!(results, vec![Some("Related"), Some("Possible")]);
}

#[test]
fn report_without_literature_has_no_literature_documents() {
    let mut icsr = full_report();
    icsr.c_4_r_literature_reference.clear();
    let batch = export_many(std::slice::from_ref(&icsr), &options()).unwrap();
    assert!(!batch.xml.contains("bibliographicDesignationText"));
    assert!(batch.xml.contains("discharge letter"));

    let imported = round_trip(&icsr);
    assert!(imported.c_4_r_literature_reference.is_empty());
    assert_eq!(
        imported
            .c_1_identification_case_safety_report
            .map(|c_1| c_1.c_1_6_1_r_documents_held_sender.len()),
        Some(1)
    );
}

#[test]
fn empty_report_round_trips_to_empty_report() {
    let imported = round_trip(&Icsr::default());
    assert_eq!(imported, Icsr::default());
}

#[test]
fn export_is_stable_apart_from_generated_ids() {
    let reports = [full_report()];
    let first = export_many(&reports, &options()).unwrap();
    let second = export_many(&reports, &options()).unwrap();
    let mut first = tree::parse(&first.xml).unwrap();
    let mut second = tree::parse(&second.xml).unwrap();
    mask_uuids(&mut first);
    mask_uuids(&mut second);
    assert_eq!(first, second);
}

#[test]
fn re_export_of_imported_report_is_identical() {
    let icsr = full_report();
    let template = Template::builtin().unwrap();
    let mut first = export_one(&icsr, &template, &options()).unwrap();
    let imported = import_one(&first).unwrap();
    let mut second = export_one(&imported.icsr, &template, &options()).unwrap();
    mask_uuids(&mut first);
    mask_uuids(&mut second);
    assert_eq!(first, second);
}

#[test]
fn unknown_reaction_wire_id_is_reported_by_validation() {
    let icsr = Icsr {
        e_i_reaction_event: vec![ReactionEvent {
            id: Some(1),
            ..Default::default()
        }],
        g_k_drug_information: vec![DrugInformation {
            g_k_9_i_drug_reaction_matrix: vec![DrugReactionMatrix {
                g_k_9_i_1_reaction_assessed: Some(ReactionRef::Id(1)),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    };
    let template = Template::builtin().unwrap();
    let mut fragment = export_one(&icsr, &template, &options()).unwrap();
    fragment
        .find_mut(&format!("{ROLE_PATH}/subjectOf2/observation/id"))
        .expect("reaction id")
        .set_attr("extension", "r-id7");

    let imported = import_one(&fragment).unwrap();
    assert!(imported.issues.is_empty());
    let row = &imported.icsr.g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[0];
    assert!(row.g_k_9_i_1_reaction_assessed.is_some());

    let report = icsr_validate::validate(&imported.icsr, ValidationLevel::Structural);
    assert_eq!(report.referential_count(), 1);
    let issue = report
        .issues
        .iter()
        .find(|issue| issue.kind == IssueKind::ReferentialIntegrity)
        .unwrap();
    assert_eq!(
        issue.location.to_string(),
        "g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[0].g_k_9_i_1_reaction_assessed"
    );
}

#[test]
fn causality_for_unknown_drug_is_dropped_with_issue() {
    let icsr = Icsr {
        g_k_drug_information: vec![DrugInformation {
            g_k_1_characterisation_drug_role: Some(DrugRole::Suspect),
            ..Default::default()
        }],
        ..Default::default()
    };
    let template = Template::builtin().unwrap();
    let mut fragment = export_one(&icsr, &template, &options()).unwrap();
    fragment
        .find_mut(&format!("{ROLE_PATH}/subjectOf2/organizer/component/substanceAdministration/id"))
        .expect("drug id")
        .set_attr("extension", "d-id5");

    let imported = import_one(&fragment).unwrap();
    assert_eq!(imported.icsr.g_k_drug_information.len(), 1);
    assert_eq!(imported.icsr.g_k_drug_information[0].g_k_1_characterisation_drug_role, None);
    assert_eq!(imported.issues.len(), 1);
    assert_eq!(imported.issues[0].kind, IssueKind::ReferentialIntegrity);
}

#[test]
fn boolean_decoding_issues() {
    let icsr = Icsr {
        e_i_reaction_event: vec![ReactionEvent {
            e_i_3_2a_results_death: Some(Nullable::Value(true)),
            e_i_8_medical_confirmation_healthcare_professional: Some(true),
            ..Default::default()
        }],
        ..Default::default()
    };
    let batch = export_many(&[icsr], &options()).unwrap();
    let xml = batch
        .xml
        .replacen(r#"value="true""#, r#"value="True""#, 1)
        .replacen(r#"value="true""#, r#"value="maybe""#, 1);

    let imported = import_many(&xml).unwrap();
    let imported = imported.records[0].result.as_ref().unwrap();
    let reaction = &imported.icsr.e_i_reaction_event[0];
    assert_eq!(reaction.e_i_3_2a_results_death, Some(Nullable::Value(true)));
    assert_eq!(reaction.e_i_8_medical_confirmation_healthcare_professional, None);
    insta::assert_json_snapshot!(imported.issues);
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(
        import_many("<MCCI_IN200100UV01><unclosed>"),
        Err(MappingError::MalformedDocument { .. })
    ));
    assert!(matches!(
        import_many("<MCCI_IN200100UV01/>"),
        Err(MappingError::MalformedDocument { .. })
    ));
}

#[test]
fn broken_fragment_fails_only_its_record() {
    let batch = export_many(&[full_report()], &options()).unwrap();
    let xml = batch
        .xml
        .replacen("<PORR_IN049016UV>", "<PORR_IN049016UV/><PORR_IN049016UV>", 1);

    let imported = import_many(&xml).unwrap();
    assert_eq!(imported.records.len(), 2);
    assert!(matches!(
        imported.records[0].result,
        Err(MappingError::MalformedDocument { .. })
    ));
    assert_eq!(imported.failures().map(|(index, _)| index).collect::<Vec<_>>(), vec![0]);
    assert_eq!(imported.imported().count(), 1);
}

#[test]
fn bare_fragment_is_accepted() {
    let template = Template::builtin().unwrap();
    let fragment = export_one(&full_report(), &template, &options()).unwrap();
    let xml = tree::write(&fragment, 0).unwrap();
    let imported = import_many(&xml).unwrap();
    assert_eq!(imported.imported().count(), 1);
}

proptest! {
    #[test]
    fn free_text_survives_escaping(narrative in "[A-Za-z0-9&<>\"'][A-Za-z0-9 &<>\"'.,;-]{0,40}[A-Za-z0-9&<>.]") {
        let icsr = Icsr {
            h_narrative_case_summary: Some(Narrative {
                h_1_case_narrative: Some(narrative.clone()),
                ..Default::default()
            }),
            c_3_information_sender_case_safety_report: Some(Sender {
                c_3_2_sender_organisation: Some(narrative.clone()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let imported = round_trip(&icsr);
        prop_assert_eq!(imported, icsr);
    }

    #[test]
    fn blank_free_text_is_rejected_and_reads_back_absent(blank in "[ \t\n]{0,8}") {
        let icsr = Icsr {
            h_narrative_case_summary: Some(Narrative {
                h_1_case_narrative: Some(blank),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = icsr_validate::validate(&icsr, ValidationLevel::Structural);
        prop_assert_eq!(report.structural_count(), 1);
        prop_assert_eq!(
            report.issues[0].location.to_string(),
            "h_narrative_case_summary.h_1_case_narrative"
        );

        let imported = round_trip(&icsr);
        prop_assert_eq!(
            imported.h_narrative_case_summary.and_then(|h| h.h_1_case_narrative),
            None
        );
    }
}
