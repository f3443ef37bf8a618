use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use icsr_model::{
    BuiltinCodeSets, CodeList, CodeSetLookup, Icsr, Nullable, ValidationLevel, ValidationReport,
};
use icsr_validate::RuleEngine;
use icsr_xml::{ExportOptions, export_many, import_many};
use serde::Deserialize;
use tracing::{debug, info, info_span, warn};

use crate::cli::{CodesArgs, ExportArgs, ImportArgs, ValidateArgs};
use crate::logging::redact_value;
use crate::summary::{code_entry_table, code_list_table};
use crate::types::{RecordOutcome, RunResult};

/// A JSON input file holds either one report or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReportFile {
    Many(Vec<Icsr>),
    One(Box<Icsr>),
}

/// Read the reports of a JSON file.
pub fn read_reports(path: &Path) -> Result<Vec<Icsr>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_reports(&raw).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_reports(raw: &str) -> Result<Vec<Icsr>> {
    let file: ReportFile = serde_json::from_str(raw)?;
    Ok(match file {
        ReportFile::Many(reports) => reports,
        ReportFile::One(report) => vec![*report],
    })
}

pub fn run_export(args: &ExportArgs) -> Result<RunResult> {
    let span = info_span!("export", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();
    let reports = read_reports(&args.input)?;

    let mut records: Vec<RecordOutcome> = Vec::with_capacity(reports.len());
    let mut accepted: Vec<usize> = Vec::with_capacity(reports.len());
    let engine = RuleEngine::new(ValidationLevel::Business);
    for (index, icsr) in reports.iter().enumerate() {
        let report = if args.skip_validation {
            None
        } else {
            Some(engine.validate(icsr))
        };
        if report.as_ref().is_none_or(ValidationReport::passed) {
            accepted.push(index);
        } else {
            warn!(index, "report left out after failed validation");
        }
        records.push(outcome(index, icsr, report));
    }

    let selected: Vec<Icsr> = accepted.iter().map(|&index| reports[index].clone()).collect();
    let options = ExportOptions {
        creation_time: args.creation_time,
        indent: args.indent,
    };
    let batch = export_many(&selected, &options).context("export reports")?;
    let exported = batch.exported();
    for record in batch.records {
        if let Some(error) = record.error {
            records[accepted[record.index]].error = Some(error.to_string());
        }
    }

    write_output(args.output.as_deref(), batch.xml.as_bytes())?;
    info!(
        reports = reports.len(),
        exported,
        duration_ms = start.elapsed().as_millis(),
        "export complete"
    );
    Ok(RunResult {
        command: "exported",
        input: args.input.clone(),
        output: args.output.clone(),
        records,
    })
}

pub fn run_import(args: &ImportArgs) -> Result<RunResult> {
    let span = info_span!("import", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let batch = import_many(&raw).with_context(|| format!("import {}", args.input.display()))?;

    let level = ValidationLevel::from(args.level);
    let engine = RuleEngine::new(level);
    let mut reports = Vec::new();
    let mut records = Vec::with_capacity(batch.records.len());
    for record in batch.records {
        match record.result {
            Ok(imported) => {
                let icsr = imported.icsr;
                debug!(
                    index = record.index,
                    patient = redact_value(patient_initials(&icsr).unwrap_or("-")),
                    decode_issues = imported.issues.len(),
                    "record imported"
                );
                let mut report = ValidationReport::new(level);
                report.extend(imported.issues);
                report.extend(engine.validate(&icsr).issues);
                records.push(outcome(record.index, &icsr, Some(report)));
                reports.push(icsr);
            }
            Err(error) => {
                warn!(index = record.index, %error, "fragment not imported");
                records.push(RecordOutcome {
                    index: record.index,
                    safety_report_id: None,
                    report: None,
                    error: Some(error.to_string()),
                });
            }
        }
    }

    let json = serde_json::to_string_pretty(&reports).context("serialize reports")?;
    write_output(args.output.as_deref(), json.as_bytes())?;
    info!(
        fragments = records.len(),
        imported = reports.len(),
        duration_ms = start.elapsed().as_millis(),
        "import complete"
    );
    Ok(RunResult {
        command: "imported",
        input: args.input.clone(),
        output: args.output.clone(),
        records,
    })
}

pub fn run_validate(args: &ValidateArgs) -> Result<RunResult> {
    let span = info_span!("validate", input = %args.input.display());
    let _guard = span.enter();
    let reports = read_reports(&args.input)?;
    let engine = RuleEngine::new(args.level.into());
    let records: Vec<RecordOutcome> = reports
        .iter()
        .enumerate()
        .map(|(index, icsr)| outcome(index, icsr, Some(engine.validate(icsr))))
        .collect();
    info!(
        reports = records.len(),
        failed = records.iter().filter(|record| !record.is_ok()).count(),
        "validation complete"
    );
    Ok(RunResult {
        command: "validated",
        input: args.input.clone(),
        output: None,
        records,
    })
}

/// Print validation results as JSON on stdout.
pub fn print_validation_json(result: &RunResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&result.records).context("serialize results")?;
    println!("{json}");
    Ok(())
}

pub fn run_codes(args: &CodesArgs) -> Result<()> {
    let lookup = BuiltinCodeSets;
    let table = match &args.list {
        Some(name) => {
            let list = CodeList::from_name(name)?;
            code_entry_table(&list.entries())
        }
        None => {
            let lists = lookup
                .set_names()
                .iter()
                .map(|name| CodeList::from_name(name))
                .collect::<Result<Vec<_>, _>>()?;
            code_list_table(&lists)
        }
    };
    println!("{table}");
    Ok(())
}

fn outcome(index: usize, icsr: &Icsr, report: Option<ValidationReport>) -> RecordOutcome {
    RecordOutcome {
        index,
        safety_report_id: icsr.safety_report_id().map(str::to_string),
        report,
        error: None,
    }
}

fn patient_initials(icsr: &Icsr) -> Option<&str> {
    match icsr.d_patient_characteristics.as_ref()?.d_1_patient.as_ref()? {
        Nullable::Value(initials) => Some(initials.as_str()),
        Nullable::NullFlavor(_) => None,
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("write stdout")?;
            stdout.write_all(b"\n").context("write stdout")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_report() {
        let reports = parse_reports(
            r#"{"c_1_identification_case_safety_report": {"c_1_1_sender_safety_report_unique_id": "DE-1"}}"#,
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].safety_report_id(), Some("DE-1"));
    }

    #[test]
    fn test_parse_report_array() {
        let reports = parse_reports("[{}, {}]").unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], Icsr::default());
    }

    #[test]
    fn test_parse_rejects_scalars() {
        assert!(parse_reports("42").is_err());
    }
}
