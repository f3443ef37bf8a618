pub mod codec;
pub mod date;
pub mod drug;
pub mod enums;
pub mod error;
pub mod field;
pub mod icsr;
pub mod identification;
pub mod issue;
pub mod lookup;
pub mod narrative;
pub mod null_flavor;
pub mod patient;
pub mod reaction;
pub mod reference;
pub mod test_result;

pub use codec::{FieldType, Scalar, ScalarValue};
pub use date::{DatePrecision, Hl7Date};
pub use drug::{
    AdditionalDrugInformation, DosageInformation, DrugInformation, DrugReactionMatrix,
    IndicationForUse, RelatednessAssessment, SubstanceStrength,
};
pub use enums::{
    ActionTaken, AdditionalDrugInfo, AgeGroup, CodeEntry, CodeList, DrugRole, FirstSender,
    NullificationAmendment, Qualification, ReactionOutcome, Recurrence, RegulatoryPurpose,
    ReportType, SenderType, Sex, StudyType, TermHighlighted, TestResultCode,
};
pub use error::{CodecError, Result};
pub use field::{AsFieldValue, Entity, Field, FieldValue};
pub use icsr::Icsr;
pub use identification::{
    CaseIdentification, DocumentHeldBySender, LinkedReport, LiteratureReference, PrimarySource,
    Sender, SourceCaseId, StudyIdentification, StudyRegistration,
};
pub use issue::{IssueKind, Location, Segment, ValidationIssue, ValidationLevel, ValidationReport};
pub use lookup::{BuiltinCodeSets, CodeSetLookup, InMemoryMeddra, MeddraLookup, Term};
pub use narrative::{Narrative, ReporterCommentsNative, SenderDiagnosis};
pub use null_flavor::{NullFlavor, Nullable};
pub use patient::{
    AutopsyCauseOfDeath, CauseOfDeath, MedicalHistory, ParentMedicalHistory,
    ParentPastDrugHistory, PastDrugHistory, Patient,
};
pub use reaction::ReactionEvent;
pub use reference::ReactionRef;
pub use test_result::TestResult;
