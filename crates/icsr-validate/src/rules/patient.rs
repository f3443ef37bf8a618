use icsr_model::{
    AutopsyCauseOfDeath, CauseOfDeath, MedicalHistory, ParentMedicalHistory,
    ParentPastDrugHistory, PastDrugHistory, Patient,
};

use super::{Rule, RuleSet, pair, requires};

impl RuleSet for Patient {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "D.2.2",
            field: "d_2_2a_age_onset_reaction_num",
            message: "D.2.2a and D.2.2b must be provided together",
            check: |d| pair(&d.d_2_2a_age_onset_reaction_num, &d.d_2_2b_age_onset_reaction_unit),
        },
        Rule {
            id: "D.2.2.1",
            field: "d_2_2_1a_gestation_period_reaction_foetus_num",
            message: "D.2.2.1a and D.2.2.1b must be provided together",
            check: |d| {
                pair(
                    &d.d_2_2_1a_gestation_period_reaction_foetus_num,
                    &d.d_2_2_1b_gestation_period_reaction_foetus_unit,
                )
            },
        },
        Rule {
            id: "D.7.2",
            field: "d_7_2_text_medical_history",
            message: "D.7.2 is required if D.7.1.r is empty",
            check: |d| {
                !d.d_7_1_r_structured_information_medical_history.is_empty()
                    || d.d_7_2_text_medical_history.is_some()
            },
        },
        Rule {
            id: "D.9.3",
            field: "d_9_3_autopsy",
            message: "D.9.3 is required if D.9.1 is populated",
            check: |d| requires(&d.d_9_1_date_death, &d.d_9_3_autopsy),
        },
        Rule {
            id: "D.10.2.2",
            field: "d_10_2_2a_age_parent_num",
            message: "D.10.2.2a and D.10.2.2b must be provided together",
            check: |d| pair(&d.d_10_2_2a_age_parent_num, &d.d_10_2_2b_age_parent_unit),
        },
        Rule {
            id: "D.10.6",
            field: "d_10_6_sex_parent",
            message: "D.10.6 is required if any data element in D.10 is populated",
            check: |d| !d.has_parent_data() || d.d_10_6_sex_parent.is_some(),
        },
    ];
}

impl RuleSet for MedicalHistory {
    const RULES: &'static [Rule<Self>] = &[Rule {
        id: "D.7.1.r.1",
        field: "d_7_1_r_1a_meddra_version_medical_history",
        message: "D.7.1.r.1a and D.7.1.r.1b must be provided together",
        check: |history| {
            pair(
                &history.d_7_1_r_1a_meddra_version_medical_history,
                &history.d_7_1_r_1b_medical_history_meddra_code,
            )
        },
    }];
}

impl RuleSet for PastDrugHistory {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "D.8.r.3b",
            field: "d_8_r_3b_phpid",
            message: "D.8.r.3b is not allowed unless D.8.r.2 is populated",
            // Fails only when no MPID is given but a PhPID is.
            check: |drug| {
                drug.d_8_r_2a_mpid_version.is_some()
                    || drug.d_8_r_2b_mpid.is_some()
                    || drug.d_8_r_3b_phpid.is_none()
            },
        },
        Rule {
            id: "D.8.r.6",
            field: "d_8_r_6a_meddra_version_indication",
            message: "D.8.r.6a and D.8.r.6b must be provided together",
            check: |drug| {
                pair(
                    &drug.d_8_r_6a_meddra_version_indication,
                    &drug.d_8_r_6b_indication_meddra_code,
                )
            },
        },
        Rule {
            id: "D.8.r.7",
            field: "d_8_r_7a_meddra_version_reaction",
            message: "D.8.r.7a and D.8.r.7b must be provided together",
            check: |drug| {
                pair(
                    &drug.d_8_r_7a_meddra_version_reaction,
                    &drug.d_8_r_7b_reaction_meddra_code,
                )
            },
        },
    ];
}

impl RuleSet for CauseOfDeath {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "D.9.2.r.1",
            field: "d_9_2_r_1a_meddra_version_cause_death",
            message: "D.9.2.r.1a and D.9.2.r.1b must be provided together",
            check: |cause| {
                pair(
                    &cause.d_9_2_r_1a_meddra_version_cause_death,
                    &cause.d_9_2_r_1b_cause_death_meddra_code,
                )
            },
        },
        Rule {
            id: "D.9.2.r.2",
            field: "d_9_2_r_2_cause_death",
            message: "D.9.2.r.2 is required if D.9.2.r.1 is populated",
            check: |cause| {
                cause.d_9_2_r_2_cause_death.is_some()
                    || (cause.d_9_2_r_1a_meddra_version_cause_death.is_none()
                        && cause.d_9_2_r_1b_cause_death_meddra_code.is_none())
            },
        },
    ];
}

impl RuleSet for AutopsyCauseOfDeath {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "D.9.4.r.1",
            field: "d_9_4_r_1a_meddra_version_autopsy_determined_cause_death",
            message: "D.9.4.r.1a and D.9.4.r.1b must be provided together",
            check: |cause| {
                pair(
                    &cause.d_9_4_r_1a_meddra_version_autopsy_determined_cause_death,
                    &cause.d_9_4_r_1b_autopsy_determined_cause_death_meddra_code,
                )
            },
        },
        Rule {
            id: "D.9.4.r.2",
            field: "d_9_4_r_2_autopsy_determined_cause_death",
            message: "D.9.4.r.2 is required if D.9.4.r.1 is populated",
            // Triggers on a partially coded cause, as the rule was first written.
            check: |cause| {
                cause.d_9_4_r_2_autopsy_determined_cause_death.is_some()
                    || (cause
                        .d_9_4_r_1a_meddra_version_autopsy_determined_cause_death
                        .is_some()
                        && cause
                            .d_9_4_r_1b_autopsy_determined_cause_death_meddra_code
                            .is_some())
            },
        },
    ];
}

impl RuleSet for ParentMedicalHistory {
    const RULES: &'static [Rule<Self>] = &[Rule {
        id: "D.10.7.1.r.1",
        field: "d_10_7_1_r_1a_meddra_version_medical_history",
        message: "D.10.7.1.r.1a and D.10.7.1.r.1b must be provided together",
        check: |history| {
            pair(
                &history.d_10_7_1_r_1a_meddra_version_medical_history,
                &history.d_10_7_1_r_1b_medical_history_meddra_code,
            )
        },
    }];
}

impl RuleSet for ParentPastDrugHistory {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "D.10.8.r.6",
            field: "d_10_8_r_6a_meddra_version_indication",
            message: "D.10.8.r.6a and D.10.8.r.6b must be provided together",
            check: |drug| {
                pair(
                    &drug.d_10_8_r_6a_meddra_version_indication,
                    &drug.d_10_8_r_6b_indication_meddra_code,
                )
            },
        },
        Rule {
            id: "D.10.8.r.7",
            field: "d_10_8_r_7a_meddra_version_reaction",
            message: "D.10.8.r.7a and D.10.8.r.7b must be provided together",
            check: |drug| {
                pair(
                    &drug.d_10_8_r_7a_meddra_version_reaction,
                    &drug.d_10_8_r_7b_reactions_meddra_code,
                )
            },
        },
    ];
}
