//! Section F: tests and procedures.

use icsr_model::{Icsr, TestResult};

use crate::codes::{ObservationCode, OrganizerCode};
use crate::common::{
    bl_value, coded, ed_value, meddra, nullable_value_element, observation, oid, text_element,
};
use crate::tree::Element;

use super::{organizer, relationship};

fn reference_range(bound: &Option<String>, interpretation: &str) -> Option<Element> {
    bound.as_ref().map(|bound| {
        Element::new("referenceRange").attr("typeCode", "REFV").child(
            Element::new("observationRange")
                .attr("classCode", "OBS")
                .attr("moodCode", "EVN.CRT")
                .child(Element::new("value").xsi_type("ST").with_text(bound.as_str()))
                .child(
                    Element::new("interpretationCode")
                        .attr("code", interpretation)
                        .attr("codeSystem", oid::CS_INTERPRETATION),
                ),
        )
    })
}

fn test_observation(test: &TestResult) -> Element {
    let name = meddra(
        "code",
        &test.f_r_2_2a_meddra_version_test_name,
        &test.f_r_2_2b_test_name_meddra_code,
    )
    .maybe_child(text_element("originalText", &test.f_r_2_1_test_name));
    let result = (test.f_r_3_2_test_result_val_qual.is_some()
        || test.f_r_3_3_test_result_unit.is_some())
    .then(|| {
        Element::new("value").xsi_type("IVL_PQ").child(
            Element::new("center")
                .nullable("value", &test.f_r_3_2_test_result_val_qual)
                .value("unit", &test.f_r_3_3_test_result_unit),
        )
    });

    Element::new("observation")
        .attr("classCode", "OBS")
        .attr("moodCode", "EVN")
        .child(name)
        .maybe_child(nullable_value_element("effectiveTime", &test.f_r_1_test_date))
        .maybe_child(result)
        .maybe_child(ed_value(&test.f_r_3_4_result_unstructured_data))
        .maybe_child(coded("interpretationCode", &test.f_r_3_1_test_result_code))
        .maybe_child(reference_range(&test.f_r_4_normal_low_value, "L"))
        .maybe_child(reference_range(&test.f_r_5_normal_high_value, "H"))
        .maybe_child(ed_value(&test.f_r_6_comments).map(|value| {
            relationship(
                "outboundRelationship2",
                "REFR",
                observation(ObservationCode::Comment, Some(value)),
            )
        }))
        .maybe_child(bl_value(&test.f_r_7_more_information_available).map(|value| {
            relationship(
                "outboundRelationship2",
                "REFR",
                observation(ObservationCode::MoreInformation, Some(value)),
            )
        }))
}

/// The test results organizer, when the report has tests.
pub(super) fn results(icsr: &Icsr) -> Option<Element> {
    organizer(
        OrganizerCode::TestResults,
        icsr.f_r_results_tests_procedures_investigation_patient
            .iter()
            .map(test_observation)
            .collect(),
    )
}
