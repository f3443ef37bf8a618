//! Rule table evaluation.

use icsr_model::{Location, ValidationIssue};

use crate::rules::Rule;

/// Evaluate a rule table against one entity.
///
/// Failures are reported on `rule.field` under the entity's location.
pub fn check<T>(
    entity: &T,
    rules: &[Rule<T>],
    location: &Location,
    structural: bool,
) -> Vec<ValidationIssue> {
    rules
        .iter()
        .filter(|rule| !rule.holds(entity))
        .map(|rule| {
            let location = location.field(rule.field);
            let issue = if structural {
                ValidationIssue::structural(location, rule.message)
            } else {
                ValidationIssue::business(location, rule.message)
            };
            issue.with_rule(rule.id)
        })
        .collect()
}
