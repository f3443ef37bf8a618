//! Section F: tests and procedures.

use icsr_model::{Icsr, Location, TestResult};

use crate::codes::{ObservationCode, OrganizerCode};
use crate::common::{Decoder, Scope, code_of};
use crate::tree::Element;

use super::organizer_components;

pub(super) fn read(icsr: &mut Icsr, role: &Element, decoder: &mut Decoder) {
    for observation in organizer_components(role, OrganizerCode::TestResults)
        .filter_map(|component| component.first("observation"))
    {
        let index = icsr.f_r_results_tests_procedures_investigation_patient.len();
        let mut scope = decoder.scope(
            Location::root().item("f_r_results_tests_procedures_investigation_patient", index),
        );
        let test = test_result(&mut scope, observation);
        icsr.f_r_results_tests_procedures_investigation_patient
            .push(test);
    }
}

fn test_result(scope: &mut Scope<'_>, observation: &Element) -> TestResult {
    let code = observation.first("code");
    let mut test = TestResult {
        f_r_1_test_date: scope.nullable_attr(
            "f_r_1_test_date",
            observation.first("effectiveTime"),
            "value",
        ),
        f_r_2_1_test_name: scope.text(
            "f_r_2_1_test_name",
            code.and_then(|code| code.first("originalText")),
        ),
        f_r_2_2a_meddra_version_test_name: scope.attr(
            "f_r_2_2a_meddra_version_test_name",
            code,
            "codeSystemVersion",
        ),
        f_r_2_2b_test_name_meddra_code: scope.attr("f_r_2_2b_test_name_meddra_code", code, "code"),
        f_r_3_1_test_result_code: scope.attr(
            "f_r_3_1_test_result_code",
            observation.first("interpretationCode"),
            "code",
        ),
        ..Default::default()
    };

    for value in observation.all("value") {
        match value.get("xsi:type") {
            Some("IVL_PQ") => {
                let center = value.first("center");
                test.f_r_3_2_test_result_val_qual =
                    scope.nullable_attr("f_r_3_2_test_result_val_qual", center, "value");
                test.f_r_3_3_test_result_unit =
                    scope.attr("f_r_3_3_test_result_unit", center, "unit");
            }
            Some("ED") => {
                test.f_r_3_4_result_unstructured_data =
                    scope.text("f_r_3_4_result_unstructured_data", Some(value));
            }
            _ => {}
        }
    }

    for range in observation
        .all("referenceRange")
        .filter_map(|range| range.first("observationRange"))
    {
        let bound = range.first("value");
        match range.first("interpretationCode").and_then(|code| code.get("code")) {
            Some("L") => {
                test.f_r_4_normal_low_value = scope.text("f_r_4_normal_low_value", bound);
            }
            Some("H") => {
                test.f_r_5_normal_high_value = scope.text("f_r_5_normal_high_value", bound);
            }
            _ => {}
        }
    }

    for related in observation
        .all("outboundRelationship2")
        .filter_map(|link| link.first("observation"))
    {
        let value = related.first("value");
        match code_of::<ObservationCode>(related) {
            Some(ObservationCode::Comment) => {
                test.f_r_6_comments = scope.text("f_r_6_comments", value);
            }
            Some(ObservationCode::MoreInformation) => {
                test.f_r_7_more_information_available =
                    scope.attr("f_r_7_more_information_available", value, "value");
            }
            _ => {}
        }
    }
    test
}
