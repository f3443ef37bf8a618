//! Section G: drug information and its nested collections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::{DatePrecision, Hl7Date};
use crate::enums::{ActionTaken, AdditionalDrugInfo, CodeList, DrugRole, Recurrence};
use crate::field::{Entity, Field};
use crate::null_flavor::{Nullable, flavors};
use crate::reference::ReactionRef;

/// G.k drug information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugInformation {
    pub id: Option<i64>,

    pub g_k_2_3_r_substance_id_strength: Vec<SubstanceStrength>,
    pub g_k_4_r_dosage_information: Vec<DosageInformation>,
    pub g_k_7_r_indication_use_case: Vec<IndicationForUse>,
    pub g_k_9_i_drug_reaction_matrix: Vec<DrugReactionMatrix>,
    pub g_k_10_r_additional_information_drug: Vec<AdditionalDrugInformation>,

    pub g_k_1_characterisation_drug_role: Option<DrugRole>,

    pub g_k_2_1_1a_mpid_version: Option<String>,
    pub g_k_2_1_1b_mpid: Option<String>,
    pub g_k_2_1_2a_phpid_version: Option<String>,
    pub g_k_2_1_2b_phpid: Option<String>,

    pub g_k_2_2_medicinal_product_name_primary_source: Option<String>,
    pub g_k_2_4_identification_country_drug_obtained: Option<String>,
    pub g_k_2_5_investigational_product_blinded: Option<bool>,

    pub g_k_3_1_authorisation_application_number: Option<String>,
    pub g_k_3_2_country_authorisation_application: Option<String>,
    pub g_k_3_3_name_holder_applicant: Option<String>,

    pub g_k_5a_cumulative_dose_first_reaction_num: Option<Decimal>,
    pub g_k_5b_cumulative_dose_first_reaction_unit: Option<String>,

    pub g_k_6a_gestation_period_exposure_num: Option<Decimal>,
    pub g_k_6b_gestation_period_exposure_unit: Option<String>,

    pub g_k_8_action_taken_drug: Option<ActionTaken>,

    pub g_k_11_additional_information_drug: Option<String>,
}

impl Entity for DrugInformation {
    const NAME: &'static str = "g_k_drug_information";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::code(
                "g_k_1_characterisation_drug_role",
                CodeList::DrugRole,
                &self.g_k_1_characterisation_drug_role,
            )
            .required(),
            Field::text("g_k_2_1_1a_mpid_version", 10, &self.g_k_2_1_1a_mpid_version),
            Field::text("g_k_2_1_1b_mpid", 1000, &self.g_k_2_1_1b_mpid),
            Field::text("g_k_2_1_2a_phpid_version", 10, &self.g_k_2_1_2a_phpid_version),
            Field::text("g_k_2_1_2b_phpid", 250, &self.g_k_2_1_2b_phpid),
            Field::text(
                "g_k_2_2_medicinal_product_name_primary_source",
                250,
                &self.g_k_2_2_medicinal_product_name_primary_source,
            )
            .required(),
            Field::alpha(
                "g_k_2_4_identification_country_drug_obtained",
                2,
                &self.g_k_2_4_identification_country_drug_obtained,
            ),
            Field::marker(
                "g_k_2_5_investigational_product_blinded",
                &self.g_k_2_5_investigational_product_blinded,
            ),
            Field::text(
                "g_k_3_1_authorisation_application_number",
                35,
                &self.g_k_3_1_authorisation_application_number,
            ),
            Field::alpha(
                "g_k_3_2_country_authorisation_application",
                2,
                &self.g_k_3_2_country_authorisation_application,
            ),
            Field::text(
                "g_k_3_3_name_holder_applicant",
                60,
                &self.g_k_3_3_name_holder_applicant,
            ),
            Field::decimal(
                "g_k_5a_cumulative_dose_first_reaction_num",
                &self.g_k_5a_cumulative_dose_first_reaction_num,
            ),
            Field::text(
                "g_k_5b_cumulative_dose_first_reaction_unit",
                50,
                &self.g_k_5b_cumulative_dose_first_reaction_unit,
            ),
            Field::decimal(
                "g_k_6a_gestation_period_exposure_num",
                &self.g_k_6a_gestation_period_exposure_num,
            ),
            Field::text(
                "g_k_6b_gestation_period_exposure_unit",
                50,
                &self.g_k_6b_gestation_period_exposure_unit,
            ),
            Field::code(
                "g_k_8_action_taken_drug",
                CodeList::ActionTaken,
                &self.g_k_8_action_taken_drug,
            ),
            Field::text(
                "g_k_11_additional_information_drug",
                2000,
                &self.g_k_11_additional_information_drug,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// G.k.2.3.r substance / specified substance identifier and strength.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstanceStrength {
    pub id: Option<i64>,
    pub g_k_2_3_r_1_substance_name: Option<String>,
    pub g_k_2_3_r_2a_substance_termid_version: Option<String>,
    pub g_k_2_3_r_2b_substance_termid: Option<String>,
    pub g_k_2_3_r_3a_strength_num: Option<Decimal>,
    pub g_k_2_3_r_3b_strength_unit: Option<String>,
}

impl Entity for SubstanceStrength {
    const NAME: &'static str = "g_k_2_3_r_substance_id_strength";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("g_k_2_3_r_1_substance_name", 250, &self.g_k_2_3_r_1_substance_name),
            Field::text(
                "g_k_2_3_r_2a_substance_termid_version",
                10,
                &self.g_k_2_3_r_2a_substance_termid_version,
            ),
            Field::text(
                "g_k_2_3_r_2b_substance_termid",
                100,
                &self.g_k_2_3_r_2b_substance_termid,
            ),
            Field::decimal("g_k_2_3_r_3a_strength_num", &self.g_k_2_3_r_3a_strength_num),
            Field::text("g_k_2_3_r_3b_strength_unit", 50, &self.g_k_2_3_r_3b_strength_unit),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// G.k.4.r dosage and relevant information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosageInformation {
    pub id: Option<i64>,

    pub g_k_4_r_1a_dose_num: Option<Decimal>,
    pub g_k_4_r_1b_dose_unit: Option<String>,
    pub g_k_4_r_2_number_units_interval: Option<Decimal>,
    pub g_k_4_r_3_definition_interval_unit: Option<String>,
    pub g_k_4_r_4_date_time_drug: Option<Nullable<Hl7Date>>,
    pub g_k_4_r_5_date_time_last_administration: Option<Nullable<Hl7Date>>,

    pub g_k_4_r_6a_duration_drug_administration_num: Option<Decimal>,
    pub g_k_4_r_6b_duration_drug_administration_unit: Option<String>,

    pub g_k_4_r_7_batch_lot_number: Option<String>,
    pub g_k_4_r_8_dosage_text: Option<String>,

    pub g_k_4_r_9_1_pharmaceutical_dose_form: Option<Nullable<String>>,
    pub g_k_4_r_9_2a_pharmaceutical_dose_form_termid_version: Option<String>,
    pub g_k_4_r_9_2b_pharmaceutical_dose_form_termid: Option<String>,

    pub g_k_4_r_10_1_route_administration: Option<Nullable<String>>,
    pub g_k_4_r_10_2a_route_administration_termid_version: Option<String>,
    pub g_k_4_r_10_2b_route_administration_termid: Option<String>,

    pub g_k_4_r_11_1_parent_route_administration: Option<Nullable<String>>,
    pub g_k_4_r_11_2a_parent_route_administration_termid_version: Option<String>,
    pub g_k_4_r_11_2b_parent_route_administration_termid: Option<String>,
}

impl Entity for DosageInformation {
    const NAME: &'static str = "g_k_4_r_dosage_information";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::decimal("g_k_4_r_1a_dose_num", &self.g_k_4_r_1a_dose_num),
            Field::text("g_k_4_r_1b_dose_unit", 50, &self.g_k_4_r_1b_dose_unit),
            Field::decimal(
                "g_k_4_r_2_number_units_interval",
                &self.g_k_4_r_2_number_units_interval,
            ),
            Field::text(
                "g_k_4_r_3_definition_interval_unit",
                50,
                &self.g_k_4_r_3_definition_interval_unit,
            ),
            Field::date(
                "g_k_4_r_4_date_time_drug",
                DatePrecision::Year,
                &self.g_k_4_r_4_date_time_drug,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::date(
                "g_k_4_r_5_date_time_last_administration",
                DatePrecision::Year,
                &self.g_k_4_r_5_date_time_last_administration,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::decimal(
                "g_k_4_r_6a_duration_drug_administration_num",
                &self.g_k_4_r_6a_duration_drug_administration_num,
            ),
            Field::text(
                "g_k_4_r_6b_duration_drug_administration_unit",
                50,
                &self.g_k_4_r_6b_duration_drug_administration_unit,
            ),
            Field::text("g_k_4_r_7_batch_lot_number", 35, &self.g_k_4_r_7_batch_lot_number),
            Field::text("g_k_4_r_8_dosage_text", 2000, &self.g_k_4_r_8_dosage_text),
            Field::text(
                "g_k_4_r_9_1_pharmaceutical_dose_form",
                60,
                &self.g_k_4_r_9_1_pharmaceutical_dose_form,
            )
            .flavors(flavors::ASKU_NASK_UNK),
            Field::text(
                "g_k_4_r_9_2a_pharmaceutical_dose_form_termid_version",
                10,
                &self.g_k_4_r_9_2a_pharmaceutical_dose_form_termid_version,
            ),
            Field::text(
                "g_k_4_r_9_2b_pharmaceutical_dose_form_termid",
                100,
                &self.g_k_4_r_9_2b_pharmaceutical_dose_form_termid,
            ),
            Field::text(
                "g_k_4_r_10_1_route_administration",
                60,
                &self.g_k_4_r_10_1_route_administration,
            )
            .flavors(flavors::ASKU_NASK_UNK),
            Field::text(
                "g_k_4_r_10_2a_route_administration_termid_version",
                10,
                &self.g_k_4_r_10_2a_route_administration_termid_version,
            ),
            Field::text(
                "g_k_4_r_10_2b_route_administration_termid",
                100,
                &self.g_k_4_r_10_2b_route_administration_termid,
            ),
            Field::text(
                "g_k_4_r_11_1_parent_route_administration",
                60,
                &self.g_k_4_r_11_1_parent_route_administration,
            )
            .flavors(flavors::ASKU_NASK_UNK),
            Field::text(
                "g_k_4_r_11_2a_parent_route_administration_termid_version",
                10,
                &self.g_k_4_r_11_2a_parent_route_administration_termid_version,
            ),
            Field::text(
                "g_k_4_r_11_2b_parent_route_administration_termid",
                100,
                &self.g_k_4_r_11_2b_parent_route_administration_termid,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// G.k.7.r indication for use in case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicationForUse {
    pub id: Option<i64>,
    pub g_k_7_r_1_indication_primary_source: Option<Nullable<String>>,
    pub g_k_7_r_2a_meddra_version_indication: Option<String>,
    pub g_k_7_r_2b_indication_meddra_code: Option<i64>,
}

impl Entity for IndicationForUse {
    const NAME: &'static str = "g_k_7_r_indication_use_case";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "g_k_7_r_1_indication_primary_source",
                250,
                &self.g_k_7_r_1_indication_primary_source,
            )
            .flavors(flavors::ASKU_NASK_UNK),
            Field::text(
                "g_k_7_r_2a_meddra_version_indication",
                4,
                &self.g_k_7_r_2a_meddra_version_indication,
            ),
            Field::integer(
                "g_k_7_r_2b_indication_meddra_code",
                &self.g_k_7_r_2b_indication_meddra_code,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// G.k.9.i drug-reaction(s) / event(s) matrix row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugReactionMatrix {
    pub id: Option<i64>,

    pub g_k_9_i_2_r_assessment_relatedness_drug_reaction: Vec<RelatednessAssessment>,

    pub g_k_9_i_1_reaction_assessed: Option<ReactionRef>,

    pub g_k_9_i_3_1a_interval_drug_administration_reaction_num: Option<Decimal>,
    pub g_k_9_i_3_1b_interval_drug_administration_reaction_unit: Option<String>,
    pub g_k_9_i_3_2a_interval_last_dose_drug_reaction_num: Option<Decimal>,
    pub g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit: Option<String>,

    pub g_k_9_i_4_reaction_recur_readministration: Option<Recurrence>,
}

impl Entity for DrugReactionMatrix {
    const NAME: &'static str = "g_k_9_i_drug_reaction_matrix";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::decimal(
                "g_k_9_i_3_1a_interval_drug_administration_reaction_num",
                &self.g_k_9_i_3_1a_interval_drug_administration_reaction_num,
            ),
            Field::text(
                "g_k_9_i_3_1b_interval_drug_administration_reaction_unit",
                50,
                &self.g_k_9_i_3_1b_interval_drug_administration_reaction_unit,
            ),
            Field::decimal(
                "g_k_9_i_3_2a_interval_last_dose_drug_reaction_num",
                &self.g_k_9_i_3_2a_interval_last_dose_drug_reaction_num,
            ),
            Field::text(
                "g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit",
                50,
                &self.g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit,
            ),
            Field::code(
                "g_k_9_i_4_reaction_recur_readministration",
                CodeList::Recurrence,
                &self.g_k_9_i_4_reaction_recur_readministration,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// G.k.9.i.2.r assessment of relatedness of drug to reaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatednessAssessment {
    pub id: Option<i64>,
    pub g_k_9_i_2_r_1_source_assessment: Option<String>,
    pub g_k_9_i_2_r_2_method_assessment: Option<String>,
    pub g_k_9_i_2_r_3_result_assessment: Option<String>,
}

impl Entity for RelatednessAssessment {
    const NAME: &'static str = "g_k_9_i_2_r_assessment_relatedness_drug_reaction";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "g_k_9_i_2_r_1_source_assessment",
                60,
                &self.g_k_9_i_2_r_1_source_assessment,
            ),
            Field::text(
                "g_k_9_i_2_r_2_method_assessment",
                60,
                &self.g_k_9_i_2_r_2_method_assessment,
            ),
            Field::text(
                "g_k_9_i_2_r_3_result_assessment",
                60,
                &self.g_k_9_i_2_r_3_result_assessment,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// G.k.10.r additional information on drug (coded).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalDrugInformation {
    pub id: Option<i64>,
    pub g_k_10_r_additional_information_drug: Option<AdditionalDrugInfo>,
}

impl Entity for AdditionalDrugInformation {
    const NAME: &'static str = "g_k_10_r_additional_information_drug";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::code(
            "g_k_10_r_additional_information_drug",
            CodeList::AdditionalDrugInfo,
            &self.g_k_10_r_additional_information_drug,
        )]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}
