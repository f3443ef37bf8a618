//! Referential integrity of the drug-reaction matrix.

use std::collections::HashSet;

use icsr_model::{Icsr, Location, ValidationIssue};
use tracing::debug;

const RULE_ID: &str = "G.k.9.i.1";
const MESSAGE: &str = "Technical id was not found among possible related entities";
const DUPLICATE: &str = "Reaction is already assessed by another matrix row of this drug";

/// Every matrix row must name a reaction of the same report, and a drug
/// assesses each reaction in at most one row.
///
/// The XML addresses matrix rows only by reaction id, so a second row for
/// the same reaction would be folded into the first on import.
pub fn check(icsr: &Icsr) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (k, drug) in icsr.g_k_drug_information.iter().enumerate() {
        let mut assessed = HashSet::new();
        for (i, row) in drug.g_k_9_i_drug_reaction_matrix.iter().enumerate() {
            let location = Location::root()
                .item("g_k_drug_information", k)
                .item("g_k_9_i_drug_reaction_matrix", i)
                .field("g_k_9_i_1_reaction_assessed");
            let position = row
                .g_k_9_i_1_reaction_assessed
                .as_ref()
                .and_then(|reference| icsr.reaction_position(reference));
            match position {
                Some(position) if assessed.insert(position) => {}
                Some(position) => {
                    debug!(drug = k, row = i, reaction = position, "reaction assessed twice");
                    issues.push(
                        ValidationIssue::referential(location, DUPLICATE).with_rule(RULE_ID),
                    );
                }
                None => {
                    debug!(drug = k, row = i, "unresolved reaction reference");
                    issues.push(
                        ValidationIssue::referential(location, MESSAGE).with_rule(RULE_ID),
                    );
                }
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{DrugInformation, DrugReactionMatrix, ReactionEvent, ReactionRef};

    fn report(reference: Option<ReactionRef>) -> Icsr {
        Icsr {
            e_i_reaction_event: vec![ReactionEvent {
                id: Some(7),
                ..Default::default()
            }],
            g_k_drug_information: vec![DrugInformation {
                g_k_9_i_drug_reaction_matrix: vec![DrugReactionMatrix {
                    g_k_9_i_1_reaction_assessed: reference,
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_resolved_reference() {
        assert!(check(&report(Some(ReactionRef::Id(7)))).is_empty());
    }

    #[test]
    fn test_dangling_and_missing_references() {
        for reference in [Some(ReactionRef::Id(8)), None] {
            let issues = check(&report(reference));
            assert_eq!(issues.len(), 1);
            assert_eq!(
                issues[0].location.to_string(),
                "g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[0].g_k_9_i_1_reaction_assessed"
            );
            assert_eq!(issues[0].rule_id.as_deref(), Some("G.k.9.i.1"));
        }
    }

    #[test]
    fn test_reaction_assessed_twice() {
        let mut icsr = report(Some(ReactionRef::Id(7)));
        icsr.e_i_reaction_event.push(ReactionEvent {
            id: Some(9),
            ..Default::default()
        });
        let matrix = &mut icsr.g_k_drug_information[0].g_k_9_i_drug_reaction_matrix;
        matrix.push(DrugReactionMatrix {
            g_k_9_i_1_reaction_assessed: Some(ReactionRef::Id(9)),
            ..Default::default()
        });
        assert!(check(&icsr).is_empty());

        icsr.g_k_drug_information[0]
            .g_k_9_i_drug_reaction_matrix
            .push(DrugReactionMatrix {
                g_k_9_i_1_reaction_assessed: Some(ReactionRef::Id(7)),
                ..Default::default()
            });
        let issues = check(&icsr);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].location.to_string(),
            "g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[2].g_k_9_i_1_reaction_assessed"
        );
        assert_eq!(issues[0].message, DUPLICATE);

        // Another drug may assess the same reaction.
        let other = icsr.g_k_drug_information[0].clone();
        icsr.g_k_drug_information[0].g_k_9_i_drug_reaction_matrix.pop();
        icsr.g_k_drug_information.push(other);
        assert_eq!(check(&icsr).len(), 1);
    }
}
