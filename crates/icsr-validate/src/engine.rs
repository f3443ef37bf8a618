//! Validation engine.
//!
//! Structural checks always run. Business checks (required fields and the
//! conditional rule catalogue) run only at the business level and only when
//! the structural pass found nothing, since rules over malformed values would
//! report noise. Reaction references are checked at both levels.

use icsr_model::{Icsr, ValidationLevel, ValidationReport};
use tracing::{debug, info};

use crate::checks;

/// Runs the validation passes over one ICSR.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine {
    level: ValidationLevel,
}

impl RuleEngine {
    /// Create an engine for the given level.
    pub fn new(level: ValidationLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> ValidationLevel {
        self.level
    }

    /// Validate one report.
    pub fn validate(&self, icsr: &Icsr) -> ValidationReport {
        let mut report = ValidationReport::new(self.level);

        // 1. Field types and entity-level structural rules
        report.extend(checks::run_structural(icsr));
        debug!(issues = report.structural_count(), "structural pass finished");

        // 2. Required fields and conditional rules
        if self.level == ValidationLevel::Business {
            if report.has_structural_errors() {
                debug!("business pass skipped after structural failures");
            } else {
                report.extend(checks::run_business(icsr));
                debug!(issues = report.business_count(), "business pass finished");
            }
        }

        // 3. Drug-reaction matrix references
        report.extend(checks::run_references(icsr));

        info!(
            level = %self.level,
            safety_report_id = icsr.safety_report_id().unwrap_or("<unset>"),
            structural = report.structural_count(),
            business = report.business_count(),
            referential = report.referential_count(),
            "validation finished"
        );
        report
    }
}

/// Validate one report at the given level.
pub fn validate(icsr: &Icsr, level: ValidationLevel) -> ValidationReport {
    RuleEngine::new(level).validate(icsr)
}
