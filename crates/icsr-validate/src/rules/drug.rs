use icsr_model::{
    AdditionalDrugInformation, DosageInformation, DrugInformation, DrugReactionMatrix,
    IndicationForUse, RelatednessAssessment, SubstanceStrength,
};

use super::{Rule, RuleSet, pair, requires};

impl RuleSet for DrugInformation {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "G.k.2.1.2b",
            field: "g_k_2_1_2b_phpid",
            message: "G.k.2.1.2b is not allowed if G.k.2.1.1 is provided",
            check: |drug| {
                drug.g_k_2_1_2b_phpid.is_none()
                    || (drug.g_k_2_1_1a_mpid_version.is_none() && drug.g_k_2_1_1b_mpid.is_none())
            },
        },
        Rule {
            id: "G.k.3.2",
            field: "g_k_3_2_country_authorisation_application",
            message: "G.k.3.2 is required if G.k.3.1 is populated",
            // Fails when the country is given without an authorisation number.
            check: |drug| {
                drug.g_k_3_1_authorisation_application_number.is_some()
                    || drug.g_k_3_2_country_authorisation_application.is_none()
            },
        },
        Rule {
            id: "G.k.5",
            field: "g_k_5a_cumulative_dose_first_reaction_num",
            message: "G.k.5a and G.k.5b must be provided together",
            check: |drug| {
                pair(
                    &drug.g_k_5a_cumulative_dose_first_reaction_num,
                    &drug.g_k_5b_cumulative_dose_first_reaction_unit,
                )
            },
        },
        Rule {
            id: "G.k.6",
            field: "g_k_6a_gestation_period_exposure_num",
            message: "G.k.6a and G.k.6b must be provided together",
            check: |drug| {
                pair(
                    &drug.g_k_6a_gestation_period_exposure_num,
                    &drug.g_k_6b_gestation_period_exposure_unit,
                )
            },
        },
    ];
}

impl RuleSet for SubstanceStrength {
    const RULES: &'static [Rule<Self>] = &[Rule {
        id: "G.k.2.3.r.3b",
        field: "g_k_2_3_r_3b_strength_unit",
        message: "G.k.2.3.r.3b is required if G.k.2.3.r.3a is populated",
        check: |substance| {
            requires(
                &substance.g_k_2_3_r_3a_strength_num,
                &substance.g_k_2_3_r_3b_strength_unit,
            )
        },
    }];
}

impl RuleSet for DosageInformation {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "G.k.4.r.1b",
            field: "g_k_4_r_1b_dose_unit",
            message: "G.k.4.r.1b is required if G.k.4.r.1a is populated",
            check: |dosage| requires(&dosage.g_k_4_r_1a_dose_num, &dosage.g_k_4_r_1b_dose_unit),
        },
        Rule {
            id: "G.k.4.r.3",
            field: "g_k_4_r_3_definition_interval_unit",
            message: "G.k.4.r.3 is required if G.k.4.r.2 is populated",
            check: |dosage| {
                requires(
                    &dosage.g_k_4_r_2_number_units_interval,
                    &dosage.g_k_4_r_3_definition_interval_unit,
                )
            },
        },
        Rule {
            id: "G.k.4.r.6",
            field: "g_k_4_r_6a_duration_drug_administration_num",
            message: "G.k.4.r.6a and G.k.4.r.6b must be provided together",
            check: |dosage| {
                pair(
                    &dosage.g_k_4_r_6a_duration_drug_administration_num,
                    &dosage.g_k_4_r_6b_duration_drug_administration_unit,
                )
            },
        },
    ];
}

impl RuleSet for IndicationForUse {
    const RULES: &'static [Rule<Self>] = &[Rule {
        id: "G.k.7.r.2",
        field: "g_k_7_r_2a_meddra_version_indication",
        message: "G.k.7.r.2a and G.k.7.r.2b must be provided together",
        check: |indication| {
            pair(
                &indication.g_k_7_r_2a_meddra_version_indication,
                &indication.g_k_7_r_2b_indication_meddra_code,
            )
        },
    }];
}

impl RuleSet for DrugReactionMatrix {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "G.k.9.i.3.1",
            field: "g_k_9_i_3_1a_interval_drug_administration_reaction_num",
            message: "G.k.9.i.3.1a and G.k.9.i.3.1b must be provided together",
            check: |row| {
                pair(
                    &row.g_k_9_i_3_1a_interval_drug_administration_reaction_num,
                    &row.g_k_9_i_3_1b_interval_drug_administration_reaction_unit,
                )
            },
        },
        Rule {
            id: "G.k.9.i.3.2",
            field: "g_k_9_i_3_2a_interval_last_dose_drug_reaction_num",
            message: "G.k.9.i.3.2a and G.k.9.i.3.2b must be provided together",
            check: |row| {
                pair(
                    &row.g_k_9_i_3_2a_interval_last_dose_drug_reaction_num,
                    &row.g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit,
                )
            },
        },
    ];
}

impl RuleSet for RelatednessAssessment {}

impl RuleSet for AdditionalDrugInformation {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn failing<T: RuleSet>(entity: &T) -> Vec<&'static str> {
        T::RULES
            .iter()
            .filter(|rule| !rule.holds(entity))
            .map(|rule| rule.id)
            .collect()
    }

    #[test]
    fn test_phpid_excluded_by_mpid() {
        let mut drug = DrugInformation {
            g_k_2_1_2b_phpid: Some("PH".to_string()),
            ..Default::default()
        };
        assert!(failing(&drug).is_empty());
        drug.g_k_2_1_1b_mpid = Some("MP".to_string());
        assert_eq!(failing(&drug), vec!["G.k.2.1.2b"]);
    }

    #[test]
    fn test_authorisation_country_without_number() {
        let mut drug = DrugInformation {
            g_k_3_2_country_authorisation_application: Some("DE".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&drug), vec!["G.k.3.2"]);
        drug.g_k_3_1_authorisation_application_number = Some("EU/1/00/001".to_string());
        assert!(failing(&drug).is_empty());
    }

    #[test]
    fn test_dosage_units() {
        let mut dosage = DosageInformation {
            g_k_4_r_1a_dose_num: Some(Decimal::new(5, 0)),
            g_k_4_r_2_number_units_interval: Some(Decimal::ONE),
            ..Default::default()
        };
        assert_eq!(failing(&dosage), vec!["G.k.4.r.1b", "G.k.4.r.3"]);

        dosage.g_k_4_r_1b_dose_unit = Some("mg".to_string());
        dosage.g_k_4_r_3_definition_interval_unit = Some("d".to_string());
        dosage.g_k_4_r_6b_duration_drug_administration_unit = Some("d".to_string());
        assert_eq!(failing(&dosage), vec!["G.k.4.r.6"]);
    }

    #[test]
    fn test_matrix_interval_pairs() {
        let mut row = DrugReactionMatrix {
            g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit: Some("h".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&row), vec!["G.k.9.i.3.2"]);
        row.g_k_9_i_3_2a_interval_last_dose_drug_reaction_num = Some(Decimal::new(3, 0));
        assert!(failing(&row).is_empty());
    }

    #[test]
    fn test_cumulative_dose_and_gestation_pairs() {
        assert!(failing(&DrugInformation::default()).is_empty());

        let mut drug = DrugInformation {
            g_k_5a_cumulative_dose_first_reaction_num: Some(Decimal::new(250, 0)),
            ..Default::default()
        };
        assert_eq!(failing(&drug), vec!["G.k.5"]);
        drug.g_k_5b_cumulative_dose_first_reaction_unit = Some("mg".to_string());
        assert!(failing(&drug).is_empty());

        drug.g_k_6b_gestation_period_exposure_unit = Some("wk".to_string());
        assert_eq!(failing(&drug), vec!["G.k.6"]);
        drug.g_k_6a_gestation_period_exposure_num = Some(Decimal::new(12, 0));
        assert!(failing(&drug).is_empty());

        let unit_only = DrugInformation {
            g_k_5b_cumulative_dose_first_reaction_unit: Some("mg".to_string()),
            g_k_6a_gestation_period_exposure_num: Some(Decimal::new(12, 0)),
            ..Default::default()
        };
        assert_eq!(failing(&unit_only), vec!["G.k.5", "G.k.6"]);
    }

    #[test]
    fn test_strength_unit_required_with_number() {
        assert!(failing(&SubstanceStrength::default()).is_empty());

        let mut substance = SubstanceStrength {
            g_k_2_3_r_3a_strength_num: Some(Decimal::new(5, 1)),
            ..Default::default()
        };
        assert_eq!(failing(&substance), vec!["G.k.2.3.r.3b"]);
        substance.g_k_2_3_r_3b_strength_unit = Some("mg".to_string());
        assert!(failing(&substance).is_empty());

        // A unit on its own is allowed.
        substance.g_k_2_3_r_3a_strength_num = None;
        assert!(failing(&substance).is_empty());
    }

    #[test]
    fn test_indication_pair() {
        assert!(failing(&IndicationForUse::default()).is_empty());

        let version_only = IndicationForUse {
            g_k_7_r_2a_meddra_version_indication: Some("26.1".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&version_only), vec!["G.k.7.r.2"]);

        let mut indication = IndicationForUse {
            g_k_7_r_2b_indication_meddra_code: Some(10_019_211),
            ..Default::default()
        };
        assert_eq!(failing(&indication), vec!["G.k.7.r.2"]);
        indication.g_k_7_r_2a_meddra_version_indication = Some("26.1".to_string());
        assert!(failing(&indication).is_empty());
    }

    #[test]
    fn test_matrix_administration_interval_pair() {
        let mut row = DrugReactionMatrix {
            g_k_9_i_3_1a_interval_drug_administration_reaction_num: Some(Decimal::new(2, 0)),
            ..Default::default()
        };
        assert_eq!(failing(&row), vec!["G.k.9.i.3.1"]);
        row.g_k_9_i_3_1b_interval_drug_administration_reaction_unit = Some("d".to_string());
        assert!(failing(&row).is_empty());

        let unit_only = DrugReactionMatrix {
            g_k_9_i_3_1b_interval_drug_administration_reaction_unit: Some("d".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&unit_only), vec!["G.k.9.i.3.1"]);

        // The two intervals pair independently.
        let both_partial = DrugReactionMatrix {
            g_k_9_i_3_1a_interval_drug_administration_reaction_num: Some(Decimal::new(2, 0)),
            g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit: Some("h".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&both_partial), vec!["G.k.9.i.3.1", "G.k.9.i.3.2"]);
    }
}
