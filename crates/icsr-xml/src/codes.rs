//! Coded disambiguation tables.
//!
//! HL7 v3 reuses a handful of generic elements (`observation`, `organizer`,
//! `investigationCharacteristic`, `document`) for many E2B data elements. The
//! element's `code` selects which business field it carries. Each table below
//! is declared once and shared by export and import.

use icsr_model::CodeList;

use crate::common::oid;

/// A code from one of the E2B structural code systems.
pub(crate) trait WireCode: Copy + Sized {
    const SYSTEM: &'static str;

    fn code(self) -> i64;

    fn from_code(code: i64) -> Option<Self>;

    /// Read a `<code>` element of this code system.
    fn of(code: &crate::tree::Element) -> Option<Self> {
        if code.get("codeSystem") != Some(Self::SYSTEM) {
            return None;
        }
        code.get("code")?.trim().parse().ok().and_then(Self::from_code)
    }
}

macro_rules! wire_codes {
    (
        $(#[$meta:meta])*
        $name:ident in $system:expr => {
            $( $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub(crate) enum $name {
            $( $variant, )+
        }

        impl WireCode for $name {
            const SYSTEM: &'static str = $system;

            fn code(self) -> i64 {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            fn from_code(code: i64) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

wire_codes! {
    /// `observation` / `observationEvent` / `causalityAssessment` codes.
    ObservationCode in oid::CS_OBSERVATION => {
        AdditionalDocuments = 1,
        CumulativeDose = 2,
        Age = 3,
        AgeGroup = 4,
        Autopsy = 5,
        Blinded = 6,
        BodyWeight = 7,
        AutopsyCauseOfDeath = 8,
        CodedDrugInformation = 9,
        Comment = 10,
        ConcomitantTherapy = 11,
        CongenitalAnomaly = 12,
        Continuing = 13,
        Diagnosis = 15,
        GestationPeriod = 16,
        Height = 17,
        MedicalHistoryText = 18,
        Indication = 19,
        DrugRole = 20,
        LifeThreatening = 21,
        LastMenstrualPeriod = 22,
        LocalCriteria = 23,
        MedicalConfirmation = 24,
        MoreInformation = 25,
        OtherMedicallyImportant = 26,
        Outcome = 27,
        ParentRoute = 28,
        Reaction = 29,
        ReactionTranslation = 30,
        Recurrence = 31,
        ReportedCauseOfDeath = 32,
        Hospitalisation = 33,
        ResultsInDeath = 34,
        Disabling = 35,
        SummaryAndComment = 36,
        TermHighlighted = 37,
        FamilyHistory = 38,
        Relatedness = 39,
    }
}

wire_codes! {
    /// `organizer` categories grouping repeated patient data.
    OrganizerCode in oid::CS_ORGANIZER => {
        MedicalHistory = 1,
        DrugHistory = 2,
        TestResults = 3,
        DrugInformation = 4,
    }
}

wire_codes! {
    /// `investigationCharacteristic` codes of the case.
    CharacteristicCode in oid::CS_CHARACTERISTIC => {
        ReportType = 1,
        OtherCaseIds = 2,
        Nullification = 3,
        NullificationReason = 4,
    }
}

wire_codes! {
    /// `document` references: C.1.6.1.r and C.4.r.
    DocumentCode in oid::CS_DOCUMENT => {
        HeldBySender = 1,
        Literature = 2,
    }
}

wire_codes! {
    /// Source of a patient medical record number (D.1.1.1 to D.1.1.4).
    RecordSource in oid::CS_RECORD_SOURCE => {
        GeneralPractitioner = 1,
        Specialist = 2,
        Hospital = 3,
        Investigation = 4,
    }
}

wire_codes! {
    /// `relatedInvestigation` codes.
    RelatedInvestigation in oid::CS_RELATED_INVESTIGATION => {
        FirstSender = 1,
        SourceReport = 2,
    }
}

wire_codes! {
    /// Author of a narrative comment or diagnosis.
    CommentAuthor in oid::CS_COMMENT_AUTHOR => {
        Sender = 1,
        Reporter = 3,
    }
}

/// Seriousness criteria E.i.3.2a to E.i.3.2f, in field order.
pub(crate) const SERIOUSNESS: [ObservationCode; 6] = [
    ObservationCode::ResultsInDeath,
    ObservationCode::LifeThreatening,
    ObservationCode::Hospitalisation,
    ObservationCode::Disabling,
    ObservationCode::CongenitalAnomaly,
    ObservationCode::OtherMedicallyImportant,
];

/// Code system OID carried next to a code list value.
pub(crate) fn code_system(list: CodeList) -> &'static str {
    match list {
        CodeList::ReportType => oid::CS_REPORT_TYPE,
        CodeList::FirstSender => oid::CS_FIRST_SENDER,
        CodeList::NullificationAmendment => oid::CS_NULLIFICATION,
        CodeList::Qualification => oid::CS_QUALIFICATION,
        CodeList::RegulatoryPurpose => oid::CS_REGULATORY_PURPOSE,
        CodeList::SenderType => oid::CS_SENDER_TYPE,
        CodeList::StudyType => oid::CS_STUDY_TYPE,
        CodeList::AgeGroup => oid::CS_AGE_GROUP,
        CodeList::Sex => oid::CS_SEX,
        CodeList::TermHighlighted => oid::CS_TERM_HIGHLIGHTED,
        CodeList::ReactionOutcome => oid::CS_OUTCOME,
        CodeList::TestResultCode => oid::CS_TEST_RESULT,
        CodeList::DrugRole => oid::CS_DRUG_ROLE,
        CodeList::ActionTaken => oid::CS_ACTION_TAKEN,
        CodeList::Recurrence => oid::CS_RECURRENCE,
        CodeList::AdditionalDrugInfo => oid::CS_ADDITIONAL_INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;

    #[test]
    fn test_codes_round_trip() {
        for code in 1..=39 {
            if let Some(observation) = ObservationCode::from_code(code) {
                assert_eq!(observation.code(), code);
            }
        }
        assert_eq!(ObservationCode::from_code(14), None);
        assert_eq!(OrganizerCode::from_code(4), Some(OrganizerCode::DrugInformation));
    }

    #[test]
    fn test_read_code_element() {
        let code = Element::new("code")
            .attr("code", "29")
            .attr("codeSystem", ObservationCode::SYSTEM);
        assert_eq!(ObservationCode::of(&code), Some(ObservationCode::Reaction));
        assert_eq!(CharacteristicCode::of(&Element::new("code")), None);
    }
}
