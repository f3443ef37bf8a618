//! Section H: narrative case summary and further information.

use serde::{Deserialize, Serialize};

use crate::field::{Entity, Field};

/// H narrative case summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Narrative {
    pub id: Option<i64>,

    pub h_3_r_sender_diagnosis_meddra_code: Vec<SenderDiagnosis>,
    pub h_5_r_case_summary_reporter_comments_native_language: Vec<ReporterCommentsNative>,

    pub h_1_case_narrative: Option<String>,
    pub h_2_reporter_comments: Option<String>,
    pub h_4_sender_comments: Option<String>,
}

impl Entity for Narrative {
    const NAME: &'static str = "h_narrative_case_summary";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("h_1_case_narrative", 100_000, &self.h_1_case_narrative).required(),
            Field::text("h_2_reporter_comments", 20_000, &self.h_2_reporter_comments),
            Field::text("h_4_sender_comments", 20_000, &self.h_4_sender_comments),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// H.3.r sender's diagnosis (MedDRA coded).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderDiagnosis {
    pub id: Option<i64>,
    pub h_3_r_1a_meddra_version_sender_diagnosis: Option<String>,
    pub h_3_r_1b_sender_diagnosis_meddra_code: Option<i64>,
}

impl Entity for SenderDiagnosis {
    const NAME: &'static str = "h_3_r_sender_diagnosis_meddra_code";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "h_3_r_1a_meddra_version_sender_diagnosis",
                4,
                &self.h_3_r_1a_meddra_version_sender_diagnosis,
            ),
            Field::integer(
                "h_3_r_1b_sender_diagnosis_meddra_code",
                &self.h_3_r_1b_sender_diagnosis_meddra_code,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// H.5.r case summary and reporter's comments in native language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterCommentsNative {
    pub id: Option<i64>,
    pub h_5_r_1a_case_summary_reporter_comments_text: Option<String>,
    pub h_5_r_1b_case_summary_reporter_comments_language: Option<String>,
}

impl Entity for ReporterCommentsNative {
    const NAME: &'static str = "h_5_r_case_summary_reporter_comments_native_language";

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text(
                "h_5_r_1a_case_summary_reporter_comments_text",
                100_000,
                &self.h_5_r_1a_case_summary_reporter_comments_text,
            ),
            Field::alpha(
                "h_5_r_1b_case_summary_reporter_comments_language",
                3,
                &self.h_5_r_1b_case_summary_reporter_comments_language,
            ),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }
}
