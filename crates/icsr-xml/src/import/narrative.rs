//! Section H: narrative, comments and diagnoses.

use icsr_model::{Icsr, Location, Narrative, ReporterCommentsNative, SenderDiagnosis};

use crate::codes::{CommentAuthor, ObservationCode, WireCode};
use crate::common::{Decoder, code_of};
use crate::tree::Element;

pub(super) fn read(icsr: &mut Icsr, event: &Element, assessment: &Element, decoder: &mut Decoder) {
    let mut scope = decoder.scope(Location::root().field("h_narrative_case_summary"));
    let mut narrative = Narrative {
        h_1_case_narrative: scope.text("h_1_case_narrative", event.first("text")),
        ..Default::default()
    };

    for summary in event
        .all("component")
        .filter_map(|component| component.first("observationEvent"))
        .filter(|observation| {
            code_of::<ObservationCode>(observation) == Some(ObservationCode::SummaryAndComment)
        })
    {
        let value = summary.first("value");
        let location = scope.location().item(
            "h_5_r_case_summary_reporter_comments_native_language",
            narrative
                .h_5_r_case_summary_reporter_comments_native_language
                .len(),
        );
        let mut scope = scope.nested(location);
        narrative
            .h_5_r_case_summary_reporter_comments_native_language
            .push(ReporterCommentsNative {
                h_5_r_1a_case_summary_reporter_comments_text: scope
                    .text("h_5_r_1a_case_summary_reporter_comments_text", value),
                h_5_r_1b_case_summary_reporter_comments_language: scope.attr(
                    "h_5_r_1b_case_summary_reporter_comments_language",
                    value,
                    "language",
                ),
                ..Default::default()
            });
    }

    for observation in assessment
        .all("component1")
        .filter_map(|component| component.first("observationEvent"))
    {
        let value = observation.first("value");
        let author = observation
            .find("author/assignedEntity/code")
            .and_then(CommentAuthor::of);
        match (code_of::<ObservationCode>(observation), author) {
            (Some(ObservationCode::Comment), Some(CommentAuthor::Reporter)) => {
                narrative.h_2_reporter_comments = scope.text("h_2_reporter_comments", value);
            }
            (Some(ObservationCode::Comment), Some(CommentAuthor::Sender)) => {
                narrative.h_4_sender_comments = scope.text("h_4_sender_comments", value);
            }
            (Some(ObservationCode::Diagnosis), _) => {
                let location = scope.location().item(
                    "h_3_r_sender_diagnosis_meddra_code",
                    narrative.h_3_r_sender_diagnosis_meddra_code.len(),
                );
                let mut scope = scope.nested(location);
                narrative
                    .h_3_r_sender_diagnosis_meddra_code
                    .push(SenderDiagnosis {
                        h_3_r_1a_meddra_version_sender_diagnosis: scope.attr(
                            "h_3_r_1a_meddra_version_sender_diagnosis",
                            value,
                            "codeSystemVersion",
                        ),
                        h_3_r_1b_sender_diagnosis_meddra_code: scope.attr(
                            "h_3_r_1b_sender_diagnosis_meddra_code",
                            value,
                            "code",
                        ),
                        ..Default::default()
                    });
            }
            _ => {}
        }
    }

    if narrative != Narrative::default() {
        icsr.h_narrative_case_summary = Some(narrative);
    }
}
