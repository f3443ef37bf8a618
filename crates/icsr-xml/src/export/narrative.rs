//! Section H: narrative, comments and diagnoses.

use icsr_model::{Icsr, Narrative};

use crate::codes::{CommentAuthor, ObservationCode};
use crate::common::{code_element, ed_value, meddra_value, text_element};
use crate::tree::Element;

use super::{component, observation_event, relationship};

fn narrative(icsr: &Icsr) -> Option<&Narrative> {
    icsr.h_narrative_case_summary.as_ref()
}

/// H.1 as the investigation event `text`.
pub(super) fn case_narrative(icsr: &Icsr) -> Option<Element> {
    narrative(icsr).and_then(|h| text_element("text", &h.h_1_case_narrative))
}

/// H.5.r reporter comments in the native language.
pub(super) fn summaries(icsr: &Icsr) -> Vec<Element> {
    narrative(icsr)
        .into_iter()
        .flat_map(|h| &h.h_5_r_case_summary_reporter_comments_native_language)
        .map(|summary| {
            let value = Element::new("value")
                .xsi_type("ED")
                .value("language", &summary.h_5_r_1b_case_summary_reporter_comments_language);
            let value = match &summary.h_5_r_1a_case_summary_reporter_comments_text {
                Some(text) => value.with_text(text.as_str()),
                None => value,
            };
            component(observation_event(
                ObservationCode::SummaryAndComment,
                Some(value),
            ))
        })
        .collect()
}

fn authored(code: ObservationCode, value: Element, author: CommentAuthor) -> Element {
    relationship(
        "component1",
        "COMP",
        observation_event(code, Some(value)).child(relationship(
            "author",
            "AUT",
            Element::new("assignedEntity")
                .attr("classCode", "ASSIGNED")
                .child(code_element(author)),
        )),
    )
}

/// H.2 reporter comments, H.3.r sender diagnoses and H.4 sender comments on
/// the adverse event assessment.
pub(super) fn assessment_comments(icsr: &Icsr) -> Vec<Element> {
    let Some(h) = narrative(icsr) else {
        return Vec::new();
    };
    let mut comments = Vec::new();
    comments.extend(
        ed_value(&h.h_2_reporter_comments)
            .map(|value| authored(ObservationCode::Comment, value, CommentAuthor::Reporter)),
    );
    comments.extend(h.h_3_r_sender_diagnosis_meddra_code.iter().map(|diagnosis| {
        authored(
            ObservationCode::Diagnosis,
            meddra_value(
                &diagnosis.h_3_r_1a_meddra_version_sender_diagnosis,
                &diagnosis.h_3_r_1b_sender_diagnosis_meddra_code,
                None,
            ),
            CommentAuthor::Sender,
        )
    }));
    comments.extend(
        ed_value(&h.h_4_sender_comments)
            .map(|value| authored(ObservationCode::Comment, value, CommentAuthor::Sender)),
    );
    comments
}
