use std::path::PathBuf;

use icsr_model::ValidationReport;
use serde::Serialize;

/// Outcome of one input report.
#[derive(Debug, Serialize)]
pub struct RecordOutcome {
    pub index: usize,
    pub safety_report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
    /// Mapping error that kept the record out of the output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.report.as_ref().is_none_or(ValidationReport::passed)
    }

    pub fn issue_count(&self) -> usize {
        self.report.as_ref().map_or(0, |report| report.issues.len())
    }
}

/// Result of an export, import or validate run.
#[derive(Debug)]
pub struct RunResult {
    pub command: &'static str,
    pub input: PathBuf,
    /// Written file; `None` when the document went to stdout or nothing was written.
    pub output: Option<PathBuf>,
    pub records: Vec<RecordOutcome>,
}

impl RunResult {
    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|record| !record.is_ok())
    }

    pub fn failed(&self) -> usize {
        self.records.iter().filter(|record| !record.is_ok()).count()
    }
}
