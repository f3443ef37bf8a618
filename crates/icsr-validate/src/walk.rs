//! Depth-first traversal of the ICSR tree.

use icsr_model::{Icsr, Location};

use crate::rules::RuleSet;

/// Receives every entity of the tree with its location.
pub(crate) trait Visitor {
    fn visit<T: RuleSet>(&mut self, entity: &T, location: &Location);
}

fn visit_all<V: Visitor, T: RuleSet>(
    visitor: &mut V,
    items: &[T],
    parent: &Location,
    name: &str,
    mut children: impl FnMut(&mut V, &T, &Location),
) {
    for (index, item) in items.iter().enumerate() {
        let location = parent.item(name, index);
        visitor.visit(item, &location);
        children(visitor, item, &location);
    }
}

fn leaves<V: Visitor, T: RuleSet>(visitor: &mut V, items: &[T], parent: &Location, name: &str) {
    visit_all(visitor, items, parent, name, |_, _, _| {});
}

pub(crate) fn walk<V: Visitor>(icsr: &Icsr, visitor: &mut V) {
    let root = Location::root();
    visitor.visit(icsr, &root);

    if let Some(c_1) = &icsr.c_1_identification_case_safety_report {
        let location = root.field("c_1_identification_case_safety_report");
        visitor.visit(c_1, &location);
        leaves(
            visitor,
            &c_1.c_1_6_1_r_documents_held_sender,
            &location,
            "c_1_6_1_r_documents_held_sender",
        );
        leaves(
            visitor,
            &c_1.c_1_9_1_r_source_case_id,
            &location,
            "c_1_9_1_r_source_case_id",
        );
        leaves(
            visitor,
            &c_1.c_1_10_r_identification_number_report_linked,
            &location,
            "c_1_10_r_identification_number_report_linked",
        );
    }

    leaves(
        visitor,
        &icsr.c_2_r_primary_source_information,
        &root,
        "c_2_r_primary_source_information",
    );

    if let Some(c_3) = &icsr.c_3_information_sender_case_safety_report {
        visitor.visit(c_3, &root.field("c_3_information_sender_case_safety_report"));
    }

    leaves(
        visitor,
        &icsr.c_4_r_literature_reference,
        &root,
        "c_4_r_literature_reference",
    );

    if let Some(c_5) = &icsr.c_5_study_identification {
        let location = root.field("c_5_study_identification");
        visitor.visit(c_5, &location);
        leaves(
            visitor,
            &c_5.c_5_1_r_study_registration,
            &location,
            "c_5_1_r_study_registration",
        );
    }

    if let Some(d) = &icsr.d_patient_characteristics {
        let location = root.field("d_patient_characteristics");
        visitor.visit(d, &location);
        leaves(
            visitor,
            &d.d_7_1_r_structured_information_medical_history,
            &location,
            "d_7_1_r_structured_information_medical_history",
        );
        leaves(visitor, &d.d_8_r_past_drug_history, &location, "d_8_r_past_drug_history");
        leaves(visitor, &d.d_9_2_r_cause_death, &location, "d_9_2_r_cause_death");
        leaves(
            visitor,
            &d.d_9_4_r_autopsy_determined_cause_death,
            &location,
            "d_9_4_r_autopsy_determined_cause_death",
        );
        leaves(
            visitor,
            &d.d_10_7_1_r_structured_information_parent_meddra_code,
            &location,
            "d_10_7_1_r_structured_information_parent_meddra_code",
        );
        leaves(
            visitor,
            &d.d_10_8_r_past_drug_history_parent,
            &location,
            "d_10_8_r_past_drug_history_parent",
        );
    }

    leaves(visitor, &icsr.e_i_reaction_event, &root, "e_i_reaction_event");

    leaves(
        visitor,
        &icsr.f_r_results_tests_procedures_investigation_patient,
        &root,
        "f_r_results_tests_procedures_investigation_patient",
    );

    visit_all(
        visitor,
        &icsr.g_k_drug_information,
        &root,
        "g_k_drug_information",
        |visitor, drug, location| {
            leaves(
                visitor,
                &drug.g_k_2_3_r_substance_id_strength,
                location,
                "g_k_2_3_r_substance_id_strength",
            );
            leaves(
                visitor,
                &drug.g_k_4_r_dosage_information,
                location,
                "g_k_4_r_dosage_information",
            );
            leaves(
                visitor,
                &drug.g_k_7_r_indication_use_case,
                location,
                "g_k_7_r_indication_use_case",
            );
            visit_all(
                visitor,
                &drug.g_k_9_i_drug_reaction_matrix,
                location,
                "g_k_9_i_drug_reaction_matrix",
                |visitor, row, location| {
                    leaves(
                        visitor,
                        &row.g_k_9_i_2_r_assessment_relatedness_drug_reaction,
                        location,
                        "g_k_9_i_2_r_assessment_relatedness_drug_reaction",
                    );
                },
            );
            leaves(
                visitor,
                &drug.g_k_10_r_additional_information_drug,
                location,
                "g_k_10_r_additional_information_drug",
            );
        },
    );

    if let Some(h) = &icsr.h_narrative_case_summary {
        let location = root.field("h_narrative_case_summary");
        visitor.visit(h, &location);
        leaves(
            visitor,
            &h.h_3_r_sender_diagnosis_meddra_code,
            &location,
            "h_3_r_sender_diagnosis_meddra_code",
        );
        leaves(
            visitor,
            &h.h_5_r_case_summary_reporter_comments_native_language,
            &location,
            "h_5_r_case_summary_reporter_comments_native_language",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{DrugInformation, DrugReactionMatrix, Entity, RelatednessAssessment};

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl Visitor for Collect {
        fn visit<T: RuleSet>(&mut self, _entity: &T, location: &Location) {
            self.0.push(format!("{}@{location}", T::NAME));
        }
    }

    #[test]
    fn test_walk_reaches_nested_collections() {
        let icsr = Icsr {
            g_k_drug_information: vec![DrugInformation {
                g_k_9_i_drug_reaction_matrix: vec![DrugReactionMatrix {
                    g_k_9_i_2_r_assessment_relatedness_drug_reaction: vec![
                        RelatednessAssessment::default(),
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut collect = Collect::default();
        walk(&icsr, &mut collect);
        assert_eq!(
            collect.0,
            vec![
                format!("{}@<root>", Icsr::NAME),
                "g_k_drug_information@g_k_drug_information[0]".to_string(),
                "g_k_9_i_drug_reaction_matrix@g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[0]"
                    .to_string(),
                "g_k_9_i_2_r_assessment_relatedness_drug_reaction@g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[0].g_k_9_i_2_r_assessment_relatedness_drug_reaction[0]"
                    .to_string(),
            ]
        );
    }
}
