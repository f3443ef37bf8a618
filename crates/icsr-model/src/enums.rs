//! E2B(R3) code lists.
//!
//! Every code list is integer backed on the wire. Each enum knows its codes,
//! a display label, and its registry entry in [`CodeList`], which lets the
//! codec resolve a code list by name.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::{Scalar, ScalarValue};
use crate::error::{CodecError, Result};
use crate::field::{AsFieldValue, FieldValue};

macro_rules! code_list {
    (
        $(#[$meta:meta])*
        $name:ident => $list:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire code.
            pub fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn code_list() -> CodeList {
                CodeList::$list
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> i64 {
                value.code()
            }
        }

        impl TryFrom<i64> for $name {
            type Error = String;

            fn try_from(code: i64) -> std::result::Result<Self, Self::Error> {
                Self::from_code(code)
                    .ok_or_else(|| format!("unknown {} code: {code}", CodeList::$list.name()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Scalar for $name {
            const FIELD_TYPE: crate::codec::FieldType = crate::codec::FieldType::Code(CodeList::$list);

            fn from_scalar(value: ScalarValue, field: &str) -> Result<Self> {
                match value {
                    ScalarValue::Code(code) => Self::from_code(code).ok_or_else(|| CodecError::UnknownCode {
                        field: field.to_string(),
                        code_list: CodeList::$list.name(),
                        raw: code.to_string(),
                    }),
                    _ => Err(CodecError::TypeMismatch {
                        field: field.to_string(),
                        expected: CodeList::$list.name(),
                    }),
                }
            }

            fn to_scalar(&self) -> ScalarValue {
                ScalarValue::Code(self.code())
            }
        }

        impl AsFieldValue for $name {
            fn field_value(&self) -> FieldValue<'_> {
                FieldValue::Code(self.code())
            }
        }
    };
}

code_list! {
    /// C.1.3 type of report.
    ReportType => ReportType {
        Spontaneous = 1 => "Spontaneous report",
        ReportFromStudy = 2 => "Report from study",
        Other = 3 => "Other",
        NotAvailableToSender = 4 => "Not available to sender (unknown)",
    }
}

code_list! {
    /// C.1.8.2 first sender of this case.
    FirstSender => FirstSender {
        Regulator = 1 => "Regulator",
        Other = 2 => "Other",
    }
}

code_list! {
    /// C.1.11.1 report nullification / amendment.
    NullificationAmendment => NullificationAmendment {
        Nullification = 1 => "Nullification",
        Amendment = 2 => "Amendment",
    }
}

code_list! {
    /// C.2.r.4 qualification of the primary source.
    Qualification => Qualification {
        Physician = 1 => "Physician",
        Pharmacist = 2 => "Pharmacist",
        OtherHealthProfessional = 3 => "Other health professional",
        Lawyer = 4 => "Lawyer",
        ConsumerOrOther = 5 => "Consumer or other non health professional",
    }
}

code_list! {
    /// C.2.r.5 primary source for regulatory purposes.
    RegulatoryPurpose => RegulatoryPurpose {
        Primary = 1 => "Primary",
    }
}

code_list! {
    /// C.3.1 sender type.
    SenderType => SenderType {
        PharmaceuticalCompany = 1 => "Pharmaceutical company",
        RegulatoryAuthority = 2 => "Regulatory authority",
        HealthProfessional = 3 => "Health professional",
        RegionalPharmacovigilanceCentre = 4 => "Regional pharmacovigilance centre",
        WhoCollaboratingCentre = 5 => "WHO collaborating centre for international drug monitoring",
        Other = 6 => "Other",
        PatientOrConsumer = 7 => "Patient / consumer",
    }
}

code_list! {
    /// C.5.4 study type where reaction(s)/event(s) were observed.
    StudyType => StudyType {
        ClinicalTrials = 1 => "Clinical trials",
        IndividualPatientUse = 2 => "Individual patient use",
        OtherStudies = 3 => "Other studies",
    }
}

code_list! {
    /// D.2.3 patient age group.
    AgeGroup => AgeGroup {
        Foetus = 0 => "Foetus",
        Neonate = 1 => "Neonate",
        Infant = 2 => "Infant",
        Child = 3 => "Child",
        Adolescent = 4 => "Adolescent",
        Adult = 5 => "Adult",
        Elderly = 6 => "Elderly",
    }
}

code_list! {
    /// D.5 / D.10.6 sex.
    Sex => Sex {
        Male = 1 => "Male",
        Female = 2 => "Female",
    }
}

code_list! {
    /// E.i.3.1 term highlighted by the reporter.
    TermHighlighted => TermHighlighted {
        HighlightedNotSerious = 1 => "Yes, highlighted by the reporter, NOT serious",
        NotHighlightedNotSerious = 2 => "No, not highlighted by the reporter, NOT serious",
        HighlightedSerious = 3 => "Yes, highlighted by the reporter, SERIOUS",
        NotHighlightedSerious = 4 => "No, not highlighted by the reporter, SERIOUS",
    }
}

code_list! {
    /// E.i.7 outcome of reaction / event at the time of last observation.
    ReactionOutcome => ReactionOutcome {
        Unknown = 0 => "Unknown",
        Recovered = 1 => "Recovered / resolved",
        Recovering = 2 => "Recovering / resolving",
        NotRecovered = 3 => "Not recovered / not resolved / ongoing",
        RecoveredWithSequelae = 4 => "Recovered / resolved with sequelae",
        Fatal = 5 => "Fatal",
    }
}

code_list! {
    /// F.r.3.1 test result code.
    TestResultCode => TestResultCode {
        Positive = 1 => "Positive",
        Negative = 2 => "Negative",
        Borderline = 3 => "Borderline",
        Inconclusive = 4 => "Inconclusive",
    }
}

code_list! {
    /// G.k.1 characterisation of drug role.
    DrugRole => DrugRole {
        Suspect = 1 => "Suspect",
        Concomitant = 2 => "Concomitant",
        Interacting = 3 => "Interacting",
        NotAdministered = 4 => "Drug not administered",
    }
}

code_list! {
    /// G.k.8 action taken with drug.
    ActionTaken => ActionTaken {
        Unknown = 0 => "Unknown",
        Withdrawn = 1 => "Drug withdrawn",
        DoseReduced = 2 => "Dose reduced",
        DoseIncreased = 3 => "Dose increased",
        DoseNotChanged = 4 => "Dose not changed",
        NotApplicable = 9 => "Not applicable",
    }
}

code_list! {
    /// G.k.9.i.4 did reaction recur on re-administration?
    Recurrence => Recurrence {
        RechallengeRecurred = 1 => "Yes - yes (rechallenge was done, reaction recurred)",
        RechallengeNotRecurred = 2 => "Yes - no (rechallenge was done, reaction did not recur)",
        RechallengeUnknown = 3 => "Yes - unk (rechallenge was done, outcome unknown)",
        NoRechallenge = 4 => "No - n/a (no rechallenge was done)",
    }
}

code_list! {
    /// G.k.10.r additional information on drug (coded).
    AdditionalDrugInfo => AdditionalDrugInfo {
        Counterfeit = 1 => "Counterfeit",
        Overdose = 2 => "Overdose",
        TakenByFather = 3 => "Drug taken by the father",
        BeyondExpiry = 4 => "Drug taken beyond expiry date",
        BatchWithinSpecification = 5 => "Batch and lot tested and found within specifications",
        BatchOutsideSpecification = 6 => "Batch and lot tested and found not within specifications",
        MedicationError = 7 => "Medication error",
        Misuse = 8 => "Misuse",
        Abuse = 9 => "Abuse",
        OccupationalExposure = 10 => "Occupational exposure",
        OffLabelUse = 11 => "Off label use",
    }
}

/// Registry of every code list, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeList {
    ReportType,
    FirstSender,
    NullificationAmendment,
    Qualification,
    RegulatoryPurpose,
    SenderType,
    StudyType,
    AgeGroup,
    Sex,
    TermHighlighted,
    ReactionOutcome,
    TestResultCode,
    DrugRole,
    ActionTaken,
    Recurrence,
    AdditionalDrugInfo,
}

/// A single code with its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    pub code: i64,
    pub label: &'static str,
}

fn entries_of<T: Copy>(all: &[T], code: fn(T) -> i64, label: fn(T) -> &'static str) -> Vec<CodeEntry> {
    all.iter()
        .map(|value| CodeEntry {
            code: code(*value),
            label: label(*value),
        })
        .collect()
}

impl CodeList {
    pub const ALL: [CodeList; 16] = [
        CodeList::ReportType,
        CodeList::FirstSender,
        CodeList::NullificationAmendment,
        CodeList::Qualification,
        CodeList::RegulatoryPurpose,
        CodeList::SenderType,
        CodeList::StudyType,
        CodeList::AgeGroup,
        CodeList::Sex,
        CodeList::TermHighlighted,
        CodeList::ReactionOutcome,
        CodeList::TestResultCode,
        CodeList::DrugRole,
        CodeList::ActionTaken,
        CodeList::Recurrence,
        CodeList::AdditionalDrugInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CodeList::ReportType => "report_type",
            CodeList::FirstSender => "first_sender",
            CodeList::NullificationAmendment => "nullification_amendment",
            CodeList::Qualification => "qualification",
            CodeList::RegulatoryPurpose => "regulatory_purpose",
            CodeList::SenderType => "sender_type",
            CodeList::StudyType => "study_type",
            CodeList::AgeGroup => "age_group",
            CodeList::Sex => "sex",
            CodeList::TermHighlighted => "term_highlighted",
            CodeList::ReactionOutcome => "reaction_outcome",
            CodeList::TestResultCode => "test_result_code",
            CodeList::DrugRole => "drug_role",
            CodeList::ActionTaken => "action_taken",
            CodeList::Recurrence => "recurrence",
            CodeList::AdditionalDrugInfo => "additional_drug_info",
        }
    }

    /// E2B data element the code list is used for.
    pub fn element(&self) -> &'static str {
        match self {
            CodeList::ReportType => "C.1.3",
            CodeList::FirstSender => "C.1.8.2",
            CodeList::NullificationAmendment => "C.1.11.1",
            CodeList::Qualification => "C.2.r.4",
            CodeList::RegulatoryPurpose => "C.2.r.5",
            CodeList::SenderType => "C.3.1",
            CodeList::StudyType => "C.5.4",
            CodeList::AgeGroup => "D.2.3",
            CodeList::Sex => "D.5, D.10.6",
            CodeList::TermHighlighted => "E.i.3.1",
            CodeList::ReactionOutcome => "E.i.7",
            CodeList::TestResultCode => "F.r.3.1",
            CodeList::DrugRole => "G.k.1",
            CodeList::ActionTaken => "G.k.8",
            CodeList::Recurrence => "G.k.9.i.4",
            CodeList::AdditionalDrugInfo => "G.k.10.r",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        CodeList::ALL
            .into_iter()
            .find(|list| list.name() == normalized)
            .ok_or_else(|| CodecError::UnknownCodeList {
                name: name.to_string(),
            })
    }

    pub fn entries(&self) -> Vec<CodeEntry> {
        match self {
            CodeList::ReportType => entries_of(ReportType::ALL, ReportType::code, ReportType::label),
            CodeList::FirstSender => entries_of(FirstSender::ALL, FirstSender::code, FirstSender::label),
            CodeList::NullificationAmendment => entries_of(
                NullificationAmendment::ALL,
                NullificationAmendment::code,
                NullificationAmendment::label,
            ),
            CodeList::Qualification => {
                entries_of(Qualification::ALL, Qualification::code, Qualification::label)
            }
            CodeList::RegulatoryPurpose => entries_of(
                RegulatoryPurpose::ALL,
                RegulatoryPurpose::code,
                RegulatoryPurpose::label,
            ),
            CodeList::SenderType => entries_of(SenderType::ALL, SenderType::code, SenderType::label),
            CodeList::StudyType => entries_of(StudyType::ALL, StudyType::code, StudyType::label),
            CodeList::AgeGroup => entries_of(AgeGroup::ALL, AgeGroup::code, AgeGroup::label),
            CodeList::Sex => entries_of(Sex::ALL, Sex::code, Sex::label),
            CodeList::TermHighlighted => {
                entries_of(TermHighlighted::ALL, TermHighlighted::code, TermHighlighted::label)
            }
            CodeList::ReactionOutcome => {
                entries_of(ReactionOutcome::ALL, ReactionOutcome::code, ReactionOutcome::label)
            }
            CodeList::TestResultCode => {
                entries_of(TestResultCode::ALL, TestResultCode::code, TestResultCode::label)
            }
            CodeList::DrugRole => entries_of(DrugRole::ALL, DrugRole::code, DrugRole::label),
            CodeList::ActionTaken => entries_of(ActionTaken::ALL, ActionTaken::code, ActionTaken::label),
            CodeList::Recurrence => entries_of(Recurrence::ALL, Recurrence::code, Recurrence::label),
            CodeList::AdditionalDrugInfo => entries_of(
                AdditionalDrugInfo::ALL,
                AdditionalDrugInfo::code,
                AdditionalDrugInfo::label,
            ),
        }
    }

    pub fn contains(&self, code: i64) -> bool {
        self.entries().iter().any(|entry| entry.code == code)
    }

    pub fn label_of(&self, code: i64) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.label)
    }
}

impl fmt::Display for CodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
