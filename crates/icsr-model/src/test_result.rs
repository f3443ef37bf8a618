//! Section F: results of tests and procedures relevant to the investigation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::{DatePrecision, Hl7Date};
use crate::enums::{CodeList, TestResultCode};
use crate::field::{Entity, Field};
use crate::null_flavor::{Nullable, flavors};

/// F.r test or procedure result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestResult {
    pub id: Option<i64>,

    pub f_r_1_test_date: Option<Nullable<Hl7Date>>,

    pub f_r_2_1_test_name: Option<String>,
    pub f_r_2_2a_meddra_version_test_name: Option<String>,
    pub f_r_2_2b_test_name_meddra_code: Option<i64>,

    pub f_r_3_1_test_result_code: Option<TestResultCode>,
    pub f_r_3_2_test_result_val_qual: Option<Nullable<Decimal>>,
    pub f_r_3_3_test_result_unit: Option<String>,
    pub f_r_3_4_result_unstructured_data: Option<String>,

    pub f_r_4_normal_low_value: Option<String>,
    pub f_r_5_normal_high_value: Option<String>,
    pub f_r_6_comments: Option<String>,
    pub f_r_7_more_information_available: Option<bool>,
}

impl TestResult {
    /// F.r.2 counts as populated when either the free-text or the coded test
    /// name is present.
    pub fn has_test_name(&self) -> bool {
        self.f_r_2_1_test_name.is_some()
            || self.f_r_2_2a_meddra_version_test_name.is_some()
            || self.f_r_2_2b_test_name_meddra_code.is_some()
    }
}

impl Entity for TestResult {
    const NAME: &'static str = "f_r_results_tests_procedures_investigation_patient";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::date("f_r_1_test_date", DatePrecision::Year, &self.f_r_1_test_date)
                .flavors(flavors::UNK),
            Field::text("f_r_2_1_test_name", 250, &self.f_r_2_1_test_name),
            Field::text(
                "f_r_2_2a_meddra_version_test_name",
                4,
                &self.f_r_2_2a_meddra_version_test_name,
            ),
            Field::integer(
                "f_r_2_2b_test_name_meddra_code",
                &self.f_r_2_2b_test_name_meddra_code,
            ),
            Field::code(
                "f_r_3_1_test_result_code",
                CodeList::TestResultCode,
                &self.f_r_3_1_test_result_code,
            ),
            Field::decimal(
                "f_r_3_2_test_result_val_qual",
                &self.f_r_3_2_test_result_val_qual,
            )
            .flavors(flavors::INFINITY),
            Field::text("f_r_3_3_test_result_unit", 50, &self.f_r_3_3_test_result_unit),
            Field::text(
                "f_r_3_4_result_unstructured_data",
                2000,
                &self.f_r_3_4_result_unstructured_data,
            ),
            Field::text("f_r_4_normal_low_value", 50, &self.f_r_4_normal_low_value),
            Field::text("f_r_5_normal_high_value", 50, &self.f_r_5_normal_high_value),
            Field::text("f_r_6_comments", 2000, &self.f_r_6_comments),
            Field::boolean(
                "f_r_7_more_information_available",
                &self.f_r_7_more_information_available,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}
