//! Integration tests for the export, import and validate commands.

use std::fs;
use std::path::PathBuf;

use icsr_cli::cli::{CodesArgs, ExportArgs, ImportArgs, LevelArg, ReportFormatArg, ValidateArgs};
use icsr_cli::commands::{read_reports, run_codes, run_export, run_import, run_validate};
use icsr_model::{
    CaseIdentification, DrugInformation, DrugReactionMatrix, DrugRole, FirstSender, Hl7Date, Icsr,
    IssueKind, NullFlavor, Nullable, PrimarySource, Qualification, ReactionEvent, ReactionOutcome,
    ReactionRef, RegulatoryPurpose, ReportType, Sender, SenderType,
};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("icsr-cli-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn date(raw: &str) -> Hl7Date {
    Hl7Date::parse(raw).unwrap()
}

fn no_information() -> Option<Nullable<bool>> {
    Some(Nullable::NullFlavor(NullFlavor::Ni))
}

fn valid_report(id: &str) -> Icsr {
    Icsr {
        c_1_identification_case_safety_report: Some(CaseIdentification {
            c_1_1_sender_safety_report_unique_id: Some(id.to_string()),
            c_1_2_date_creation: Some(date("20240102120000")),
            c_1_3_type_report: Some(ReportType::Spontaneous),
            c_1_4_date_report_first_received_source: Some(date("20240101")),
            c_1_5_date_most_recent_information: Some(date("20240101")),
            c_1_6_1_additional_documents_available: Some(false),
            c_1_7_fulfil_local_criteria_expedited_report: Some(Nullable::Value(true)),
            c_1_8_1_worldwide_unique_case_identification_number: Some(id.to_string()),
            c_1_8_2_first_sender: Some(FirstSender::Other),
            c_1_9_1_other_case_ids_previous_transmissions: no_information(),
            ..Default::default()
        }),
        c_2_r_primary_source_information: vec![PrimarySource {
            c_2_r_3_reporter_country_code: Some("DE".to_string()),
            c_2_r_4_qualification: Some(Nullable::Value(Qualification::Physician)),
            c_2_r_5_primary_source_regulatory_purposes: Some(RegulatoryPurpose::Primary),
            ..Default::default()
        }],
        c_3_information_sender_case_safety_report: Some(Sender {
            c_3_1_sender_type: Some(SenderType::PharmaceuticalCompany),
            c_3_2_sender_organisation: Some("ACME".to_string()),
            ..Default::default()
        }),
        e_i_reaction_event: vec![ReactionEvent {
            id: Some(1),
            e_i_2_1a_meddra_version_reaction: Some("26.1".to_string()),
            e_i_2_1b_reaction_meddra_code: Some(10_019_211),
            e_i_3_2a_results_death: no_information(),
            e_i_3_2b_life_threatening: no_information(),
            e_i_3_2c_caused_prolonged_hospitalisation: no_information(),
            e_i_3_2d_disabling_incapacitating: no_information(),
            e_i_3_2e_congenital_anomaly_birth_defect: no_information(),
            e_i_3_2f_other_medically_important_condition: no_information(),
            e_i_7_outcome_reaction_last_observation: Some(ReactionOutcome::Recovered),
            ..Default::default()
        }],
        g_k_drug_information: vec![DrugInformation {
            g_k_1_characterisation_drug_role: Some(DrugRole::Suspect),
            g_k_2_2_medicinal_product_name_primary_source: Some("Aspirin".to_string()),
            g_k_9_i_drug_reaction_matrix: vec![DrugReactionMatrix {
                g_k_9_i_1_reaction_assessed: Some(ReactionRef::Id(1)),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn write_reports(dir: &PathBuf, reports: &[Icsr]) -> PathBuf {
    let path = dir.join("reports.json");
    fs::write(&path, serde_json::to_string_pretty(reports).unwrap()).unwrap();
    path
}

fn export_args(input: PathBuf, output: PathBuf) -> ExportArgs {
    ExportArgs {
        input,
        output: Some(output),
        skip_validation: false,
        creation_time: None,
        indent: 2,
    }
}

#[test]
fn validate_reports_issues_per_record() {
    let dir = scratch("validate");
    let input = write_reports(&dir, &[valid_report("DE-ACME-1"), Icsr::default()]);

    let result = run_validate(&ValidateArgs {
        input,
        level: LevelArg::Business,
        format: ReportFormatArg::Table,
    })
    .unwrap();

    assert_eq!(result.records.len(), 2);
    assert!(result.records[0].is_ok());
    assert_eq!(
        result.records[0].safety_report_id.as_deref(),
        Some("DE-ACME-1")
    );
    assert!(!result.records[1].is_ok());
    assert!(result.has_failures());
    assert_eq!(result.failed(), 1);
}

#[test]
fn validation_results_serialize_per_record() {
    let dir = scratch("validate-json");
    let input = write_reports(&dir, &[valid_report("DE-ACME-1")]);

    let result = run_validate(&ValidateArgs {
        input,
        level: LevelArg::Business,
        format: ReportFormatArg::Json,
    })
    .unwrap();

    insta::assert_json_snapshot!(result.records, @r#"
    [
      {
        "index": 0,
        "safety_report_id": "DE-ACME-1",
        "report": {
          "level": "business",
          "issues": []
        }
      }
    ]
    "#);
}

#[test]
fn structural_level_accepts_incomplete_report() {
    let dir = scratch("structural");
    let input = write_reports(&dir, &[Icsr::default()]);

    let result = run_validate(&ValidateArgs {
        input,
        level: LevelArg::Structural,
        format: ReportFormatArg::Json,
    })
    .unwrap();

    assert!(!result.has_failures());
}

#[test]
fn export_leaves_out_invalid_reports() {
    let dir = scratch("export-invalid");
    let input = write_reports(&dir, &[valid_report("DE-ACME-1"), Icsr::default()]);
    let output = dir.join("out").join("batch.xml");

    let result = run_export(&export_args(input, output.clone())).unwrap();

    assert_eq!(result.failed(), 1);
    let xml = fs::read_to_string(&output).unwrap();
    assert_eq!(xml.matches("<PORR_IN049016UV>").count(), 1);
    assert!(xml.contains("DE-ACME-1"));
}

#[test]
fn skip_validation_exports_everything() {
    let dir = scratch("export-skip");
    let input = write_reports(&dir, &[valid_report("DE-ACME-1"), Icsr::default()]);
    let output = dir.join("batch.xml");
    let mut args = export_args(input, output.clone());
    args.skip_validation = true;

    let result = run_export(&args).unwrap();

    assert!(!result.has_failures());
    assert!(result.records.iter().all(|record| record.report.is_none()));
    let xml = fs::read_to_string(&output).unwrap();
    assert_eq!(xml.matches("<PORR_IN049016UV>").count(), 2);
}

#[test]
fn export_then_import_restores_reports() {
    let dir = scratch("round-trip");
    let reports = vec![valid_report("DE-ACME-1"), valid_report("DE-ACME-2")];
    let input = write_reports(&dir, &reports);
    let xml = dir.join("batch.xml");
    run_export(&export_args(input, xml.clone())).unwrap();

    let json = dir.join("imported.json");
    let result = run_import(&ImportArgs {
        input: xml,
        output: Some(json.clone()),
        level: LevelArg::Business,
    })
    .unwrap();

    assert!(!result.has_failures(), "{:?}", result.records);
    let imported = read_reports(&json).unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(imported[0].safety_report_id(), Some("DE-ACME-1"));
    assert_eq!(imported[1].safety_report_id(), Some("DE-ACME-2"));
    let assessed = imported[0].g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[0]
        .g_k_9_i_1_reaction_assessed
        .unwrap();
    assert!(matches!(assessed, ReactionRef::Uuid(_)));
    assert_eq!(imported[0].reaction_position(&assessed), Some(0));
}

#[test]
fn import_reports_decode_issues_with_validation() {
    let dir = scratch("import-issues");
    let input = write_reports(&dir, &[valid_report("DE-ACME-1")]);
    let xml = dir.join("batch.xml");
    let mut args = export_args(input, xml.clone());
    args.skip_validation = true;
    run_export(&args).unwrap();
    let raw = fs::read_to_string(&xml).unwrap();
    fs::write(&xml, raw.replacen(r#"value="false""#, r#"value="nope""#, 1)).unwrap();

    let result = run_import(&ImportArgs {
        input: xml,
        output: Some(dir.join("imported.json")),
        level: LevelArg::Structural,
    })
    .unwrap();

    let report = result.records[0].report.as_ref().unwrap();
    assert!(
        report
            .issues
            .iter()
            .any(|issue| issue.kind == IssueKind::StructuralType
                && issue.message.contains("'nope'"))
    );
    assert!(result.has_failures());
}

#[test]
fn missing_input_is_an_error() {
    let dir = scratch("missing");
    let error = run_validate(&ValidateArgs {
        input: dir.join("absent.json"),
        level: LevelArg::Business,
        format: ReportFormatArg::Table,
    })
    .unwrap_err();
    assert!(format!("{error:#}").contains("absent.json"));
}

#[test]
fn unknown_code_list_is_an_error() {
    assert!(
        run_codes(&CodesArgs {
            list: Some("no_such_list".to_string()),
        })
        .is_err()
    );
    assert!(run_codes(&CodesArgs { list: None }).is_ok());
}
