//! Section D: patient characteristics and the parent subsection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::{DatePrecision, Hl7Date};
use crate::enums::{AgeGroup, CodeList, Sex};
use crate::field::{Entity, Field};
use crate::null_flavor::{Nullable, flavors};

/// D patient characteristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub id: Option<i64>,

    pub d_7_1_r_structured_information_medical_history: Vec<MedicalHistory>,
    pub d_8_r_past_drug_history: Vec<PastDrugHistory>,
    pub d_9_2_r_cause_death: Vec<CauseOfDeath>,
    pub d_9_4_r_autopsy_determined_cause_death: Vec<AutopsyCauseOfDeath>,
    pub d_10_7_1_r_structured_information_parent_meddra_code: Vec<ParentMedicalHistory>,
    pub d_10_8_r_past_drug_history_parent: Vec<ParentPastDrugHistory>,

    pub d_1_patient: Option<Nullable<String>>,

    pub d_1_1_1_medical_record_number_source_gp: Option<Nullable<String>>,
    pub d_1_1_2_medical_record_number_source_specialist: Option<Nullable<String>>,
    pub d_1_1_3_medical_record_number_source_hospital: Option<Nullable<String>>,
    pub d_1_1_4_medical_record_number_source_investigation: Option<Nullable<String>>,

    pub d_2_1_date_birth: Option<Nullable<Hl7Date>>,

    pub d_2_2a_age_onset_reaction_num: Option<i64>,
    pub d_2_2b_age_onset_reaction_unit: Option<String>,

    pub d_2_2_1a_gestation_period_reaction_foetus_num: Option<i64>,
    pub d_2_2_1b_gestation_period_reaction_foetus_unit: Option<String>,

    pub d_2_3_patient_age_group: Option<AgeGroup>,

    pub d_3_body_weight: Option<Decimal>,
    pub d_4_height: Option<i64>,
    pub d_5_sex: Option<Nullable<Sex>>,
    pub d_6_last_menstrual_period_date: Option<Hl7Date>,

    pub d_7_2_text_medical_history: Option<Nullable<String>>,
    pub d_7_3_concomitant_therapies: Option<bool>,

    pub d_9_1_date_death: Option<Nullable<Hl7Date>>,
    pub d_9_3_autopsy: Option<Nullable<bool>>,

    pub d_10_1_parent_identification: Option<Nullable<String>>,
    pub d_10_2_1_date_birth_parent: Option<Nullable<Hl7Date>>,
    pub d_10_2_2a_age_parent_num: Option<i64>,
    pub d_10_2_2b_age_parent_unit: Option<String>,
    pub d_10_3_last_menstrual_period_date_parent: Option<Nullable<Hl7Date>>,
    pub d_10_4_body_weight_parent: Option<Decimal>,
    pub d_10_5_height_parent: Option<i64>,
    pub d_10_6_sex_parent: Option<Nullable<Sex>>,
    pub d_10_7_2_text_medical_history_parent: Option<String>,
}

impl Patient {
    /// Whether any field of the parent subsection (D.10) other than D.10.6 is
    /// populated.
    pub fn has_parent_data(&self) -> bool {
        self.d_10_1_parent_identification.is_some()
            || self.d_10_2_1_date_birth_parent.is_some()
            || self.d_10_2_2a_age_parent_num.is_some()
            || self.d_10_2_2b_age_parent_unit.is_some()
            || self.d_10_3_last_menstrual_period_date_parent.is_some()
            || self.d_10_4_body_weight_parent.is_some()
            || self.d_10_5_height_parent.is_some()
            || self.d_10_7_2_text_medical_history_parent.is_some()
    }
}

impl Entity for Patient {
    const NAME: &'static str = "d_patient_characteristics";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("d_1_patient", 60, &self.d_1_patient)
                .required()
                .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::text(
                "d_1_1_1_medical_record_number_source_gp",
                20,
                &self.d_1_1_1_medical_record_number_source_gp,
            )
            .flavors(flavors::MSK),
            Field::text(
                "d_1_1_2_medical_record_number_source_specialist",
                20,
                &self.d_1_1_2_medical_record_number_source_specialist,
            )
            .flavors(flavors::MSK),
            Field::text(
                "d_1_1_3_medical_record_number_source_hospital",
                20,
                &self.d_1_1_3_medical_record_number_source_hospital,
            )
            .flavors(flavors::MSK),
            Field::text(
                "d_1_1_4_medical_record_number_source_investigation",
                20,
                &self.d_1_1_4_medical_record_number_source_investigation,
            )
            .flavors(flavors::MSK),
            Field::date("d_2_1_date_birth", DatePrecision::Day, &self.d_2_1_date_birth)
                .flavors(flavors::MSK),
            Field::integer(
                "d_2_2a_age_onset_reaction_num",
                &self.d_2_2a_age_onset_reaction_num,
            ),
            Field::text(
                "d_2_2b_age_onset_reaction_unit",
                50,
                &self.d_2_2b_age_onset_reaction_unit,
            ),
            Field::integer(
                "d_2_2_1a_gestation_period_reaction_foetus_num",
                &self.d_2_2_1a_gestation_period_reaction_foetus_num,
            ),
            Field::text(
                "d_2_2_1b_gestation_period_reaction_foetus_unit",
                50,
                &self.d_2_2_1b_gestation_period_reaction_foetus_unit,
            ),
            Field::code(
                "d_2_3_patient_age_group",
                CodeList::AgeGroup,
                &self.d_2_3_patient_age_group,
            ),
            Field::decimal("d_3_body_weight", &self.d_3_body_weight),
            Field::integer("d_4_height", &self.d_4_height),
            Field::code("d_5_sex", CodeList::Sex, &self.d_5_sex)
                .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::date(
                "d_6_last_menstrual_period_date",
                DatePrecision::Year,
                &self.d_6_last_menstrual_period_date,
            ),
            Field::text(
                "d_7_2_text_medical_history",
                10000,
                &self.d_7_2_text_medical_history,
            )
            .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::marker(
                "d_7_3_concomitant_therapies",
                &self.d_7_3_concomitant_therapies,
            ),
            Field::date("d_9_1_date_death", DatePrecision::Year, &self.d_9_1_date_death)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::boolean("d_9_3_autopsy", &self.d_9_3_autopsy).flavors(flavors::ASKU_NASK_UNK),
            Field::text(
                "d_10_1_parent_identification",
                60,
                &self.d_10_1_parent_identification,
            )
            .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::date(
                "d_10_2_1_date_birth_parent",
                DatePrecision::Year,
                &self.d_10_2_1_date_birth_parent,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::integer("d_10_2_2a_age_parent_num", &self.d_10_2_2a_age_parent_num),
            Field::text(
                "d_10_2_2b_age_parent_unit",
                50,
                &self.d_10_2_2b_age_parent_unit,
            ),
            Field::date(
                "d_10_3_last_menstrual_period_date_parent",
                DatePrecision::Year,
                &self.d_10_3_last_menstrual_period_date_parent,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::decimal("d_10_4_body_weight_parent", &self.d_10_4_body_weight_parent),
            Field::integer("d_10_5_height_parent", &self.d_10_5_height_parent),
            Field::code("d_10_6_sex_parent", CodeList::Sex, &self.d_10_6_sex_parent)
                .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::text(
                "d_10_7_2_text_medical_history_parent",
                10000,
                &self.d_10_7_2_text_medical_history_parent,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// D.7.1.r structured information on relevant medical history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalHistory {
    pub id: Option<i64>,
    pub d_7_1_r_1a_meddra_version_medical_history: Option<String>,
    pub d_7_1_r_1b_medical_history_meddra_code: Option<i64>,
    pub d_7_1_r_2_start_date: Option<Nullable<Hl7Date>>,
    pub d_7_1_r_3_continuing: Option<Nullable<bool>>,
    pub d_7_1_r_4_end_date: Option<Nullable<Hl7Date>>,
    pub d_7_1_r_5_comments: Option<String>,
    pub d_7_1_r_6_family_history: Option<bool>,
}

impl Entity for MedicalHistory {
    const NAME: &'static str = "d_7_1_r_structured_information_medical_history";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "d_7_1_r_1a_meddra_version_medical_history",
                4,
                &self.d_7_1_r_1a_meddra_version_medical_history,
            ),
            Field::integer(
                "d_7_1_r_1b_medical_history_meddra_code",
                &self.d_7_1_r_1b_medical_history_meddra_code,
            ),
            Field::date(
                "d_7_1_r_2_start_date",
                DatePrecision::Year,
                &self.d_7_1_r_2_start_date,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::boolean("d_7_1_r_3_continuing", &self.d_7_1_r_3_continuing)
                .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::date("d_7_1_r_4_end_date", DatePrecision::Year, &self.d_7_1_r_4_end_date)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::text("d_7_1_r_5_comments", 2000, &self.d_7_1_r_5_comments),
            Field::marker("d_7_1_r_6_family_history", &self.d_7_1_r_6_family_history),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// D.8.r relevant past drug history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PastDrugHistory {
    pub id: Option<i64>,
    pub d_8_r_1_name_drug: Option<Nullable<String>>,
    pub d_8_r_2a_mpid_version: Option<String>,
    pub d_8_r_2b_mpid: Option<String>,
    pub d_8_r_3a_phpid_version: Option<String>,
    pub d_8_r_3b_phpid: Option<String>,
    pub d_8_r_4_start_date: Option<Nullable<Hl7Date>>,
    pub d_8_r_5_end_date: Option<Nullable<Hl7Date>>,
    pub d_8_r_6a_meddra_version_indication: Option<String>,
    pub d_8_r_6b_indication_meddra_code: Option<i64>,
    pub d_8_r_7a_meddra_version_reaction: Option<String>,
    pub d_8_r_7b_reaction_meddra_code: Option<i64>,
}

impl Entity for PastDrugHistory {
    const NAME: &'static str = "d_8_r_past_drug_history";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("d_8_r_1_name_drug", 250, &self.d_8_r_1_name_drug)
                .required()
                .flavors(flavors::UNK_NA),
            Field::text("d_8_r_2a_mpid_version", 10, &self.d_8_r_2a_mpid_version),
            Field::text("d_8_r_2b_mpid", 1000, &self.d_8_r_2b_mpid),
            Field::text("d_8_r_3a_phpid_version", 10, &self.d_8_r_3a_phpid_version),
            Field::text("d_8_r_3b_phpid", 250, &self.d_8_r_3b_phpid),
            Field::date("d_8_r_4_start_date", DatePrecision::Year, &self.d_8_r_4_start_date)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::date("d_8_r_5_end_date", DatePrecision::Year, &self.d_8_r_5_end_date)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "d_8_r_6a_meddra_version_indication",
                4,
                &self.d_8_r_6a_meddra_version_indication,
            ),
            Field::integer(
                "d_8_r_6b_indication_meddra_code",
                &self.d_8_r_6b_indication_meddra_code,
            ),
            Field::text(
                "d_8_r_7a_meddra_version_reaction",
                4,
                &self.d_8_r_7a_meddra_version_reaction,
            ),
            Field::integer(
                "d_8_r_7b_reaction_meddra_code",
                &self.d_8_r_7b_reaction_meddra_code,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// D.9.2.r reported cause(s) of death.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CauseOfDeath {
    pub id: Option<i64>,
    pub d_9_2_r_1a_meddra_version_cause_death: Option<String>,
    pub d_9_2_r_1b_cause_death_meddra_code: Option<i64>,
    pub d_9_2_r_2_cause_death: Option<String>,
}

impl Entity for CauseOfDeath {
    const NAME: &'static str = "d_9_2_r_cause_death";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "d_9_2_r_1a_meddra_version_cause_death",
                4,
                &self.d_9_2_r_1a_meddra_version_cause_death,
            ),
            Field::integer(
                "d_9_2_r_1b_cause_death_meddra_code",
                &self.d_9_2_r_1b_cause_death_meddra_code,
            ),
            Field::text("d_9_2_r_2_cause_death", 250, &self.d_9_2_r_2_cause_death),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// D.9.4.r autopsy-determined cause(s) of death.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopsyCauseOfDeath {
    pub id: Option<i64>,
    pub d_9_4_r_1a_meddra_version_autopsy_determined_cause_death: Option<String>,
    pub d_9_4_r_1b_autopsy_determined_cause_death_meddra_code: Option<i64>,
    pub d_9_4_r_2_autopsy_determined_cause_death: Option<String>,
}

impl Entity for AutopsyCauseOfDeath {
    const NAME: &'static str = "d_9_4_r_autopsy_determined_cause_death";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "d_9_4_r_1a_meddra_version_autopsy_determined_cause_death",
                4,
                &self.d_9_4_r_1a_meddra_version_autopsy_determined_cause_death,
            ),
            Field::integer(
                "d_9_4_r_1b_autopsy_determined_cause_death_meddra_code",
                &self.d_9_4_r_1b_autopsy_determined_cause_death_meddra_code,
            ),
            Field::text(
                "d_9_4_r_2_autopsy_determined_cause_death",
                250,
                &self.d_9_4_r_2_autopsy_determined_cause_death,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// D.10.7.1.r structured information on the parent's medical history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentMedicalHistory {
    pub id: Option<i64>,
    pub d_10_7_1_r_1a_meddra_version_medical_history: Option<String>,
    pub d_10_7_1_r_1b_medical_history_meddra_code: Option<i64>,
    pub d_10_7_1_r_2_start_date: Option<Nullable<Hl7Date>>,
    pub d_10_7_1_r_3_continuing: Option<Nullable<bool>>,
    pub d_10_7_1_r_4_end_date: Option<Nullable<Hl7Date>>,
    pub d_10_7_1_r_5_comments: Option<String>,
}

impl Entity for ParentMedicalHistory {
    const NAME: &'static str = "d_10_7_1_r_structured_information_parent_meddra_code";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "d_10_7_1_r_1a_meddra_version_medical_history",
                4,
                &self.d_10_7_1_r_1a_meddra_version_medical_history,
            ),
            Field::integer(
                "d_10_7_1_r_1b_medical_history_meddra_code",
                &self.d_10_7_1_r_1b_medical_history_meddra_code,
            ),
            Field::date(
                "d_10_7_1_r_2_start_date",
                DatePrecision::Year,
                &self.d_10_7_1_r_2_start_date,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::boolean("d_10_7_1_r_3_continuing", &self.d_10_7_1_r_3_continuing)
                .flavors(flavors::MSK_ASKU_NASK_UNK),
            Field::date(
                "d_10_7_1_r_4_end_date",
                DatePrecision::Year,
                &self.d_10_7_1_r_4_end_date,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::text("d_10_7_1_r_5_comments", 2000, &self.d_10_7_1_r_5_comments),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// D.10.8.r relevant past drug history of the parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentPastDrugHistory {
    pub id: Option<i64>,
    pub d_10_8_r_1_name_drug: Option<String>,
    pub d_10_8_r_2a_mpid_version: Option<String>,
    pub d_10_8_r_2b_mpid: Option<String>,
    pub d_10_8_r_3a_phpid_version: Option<String>,
    pub d_10_8_r_3b_phpid: Option<String>,
    pub d_10_8_r_4_start_date: Option<Nullable<Hl7Date>>,
    pub d_10_8_r_5_end_date: Option<Nullable<Hl7Date>>,
    pub d_10_8_r_6a_meddra_version_indication: Option<String>,
    pub d_10_8_r_6b_indication_meddra_code: Option<i64>,
    pub d_10_8_r_7a_meddra_version_reaction: Option<String>,
    pub d_10_8_r_7b_reactions_meddra_code: Option<i64>,
}

impl Entity for ParentPastDrugHistory {
    const NAME: &'static str = "d_10_8_r_past_drug_history_parent";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("d_10_8_r_1_name_drug", 250, &self.d_10_8_r_1_name_drug),
            Field::text("d_10_8_r_2a_mpid_version", 10, &self.d_10_8_r_2a_mpid_version),
            Field::text("d_10_8_r_2b_mpid", 1000, &self.d_10_8_r_2b_mpid),
            Field::text("d_10_8_r_3a_phpid_version", 10, &self.d_10_8_r_3a_phpid_version),
            Field::text("d_10_8_r_3b_phpid", 250, &self.d_10_8_r_3b_phpid),
            Field::date(
                "d_10_8_r_4_start_date",
                DatePrecision::Year,
                &self.d_10_8_r_4_start_date,
            )
            .flavors(flavors::MSK_ASKU_NASK),
            Field::date("d_10_8_r_5_end_date", DatePrecision::Year, &self.d_10_8_r_5_end_date)
                .flavors(flavors::MSK_ASKU_NASK),
            Field::text(
                "d_10_8_r_6a_meddra_version_indication",
                4,
                &self.d_10_8_r_6a_meddra_version_indication,
            ),
            Field::integer(
                "d_10_8_r_6b_indication_meddra_code",
                &self.d_10_8_r_6b_indication_meddra_code,
            ),
            Field::text(
                "d_10_8_r_7a_meddra_version_reaction",
                4,
                &self.d_10_8_r_7a_meddra_version_reaction,
            ),
            Field::integer(
                "d_10_8_r_7b_reactions_meddra_code",
                &self.d_10_8_r_7b_reactions_meddra_code,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}
