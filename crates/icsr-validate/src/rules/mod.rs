//! Business rule catalogue.
//!
//! Every entity type carries a static list of conditional requirements. A
//! rule holds when its `check` returns `true`; a failing rule is reported on
//! the entity at `field`.

mod drug;
mod icsr;
mod identification;
mod narrative;
mod patient;
mod reaction;
mod test_result;

use icsr_model::Entity;

/// One conditional requirement between sibling fields.
pub struct Rule<T> {
    /// E2B data element the rule is named after, e.g. `C.1.11.2`.
    pub id: &'static str,
    /// Field the failure is reported on.
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&T) -> bool,
}

impl<T> Rule<T> {
    pub fn holds(&self, entity: &T) -> bool {
        (self.check)(entity)
    }
}

/// Rules attached to an entity type.
pub trait RuleSet: Entity + Sized + 'static {
    /// Checks that run at every validation level.
    const STRUCTURAL: &'static [Rule<Self>] = &[];

    /// Conditional requirements, checked only by business validation.
    const RULES: &'static [Rule<Self>] = &[];
}

/// Both or neither of two fields are set.
pub(crate) fn pair<A, B>(a: &Option<A>, b: &Option<B>) -> bool {
    a.is_some() == b.is_some()
}

/// `dependent` is set whenever `trigger` is.
pub(crate) fn requires<A, B>(trigger: &Option<A>, dependent: &Option<B>) -> bool {
    trigger.is_none() || dependent.is_some()
}

/// Identifiers of every business rule in the catalogue, in walk order.
pub fn catalogue() -> Vec<&'static str> {
    use icsr_model::{
        AdditionalDrugInformation, AutopsyCauseOfDeath, CaseIdentification, CauseOfDeath,
        DocumentHeldBySender, DosageInformation, DrugInformation, DrugReactionMatrix, Icsr,
        IndicationForUse, LinkedReport, LiteratureReference, MedicalHistory, Narrative,
        ParentMedicalHistory, ParentPastDrugHistory, PastDrugHistory, Patient, PrimarySource,
        ReactionEvent, RelatednessAssessment, ReporterCommentsNative, Sender, SenderDiagnosis,
        SourceCaseId, StudyIdentification, StudyRegistration, SubstanceStrength, TestResult,
    };

    fn ids<T: RuleSet>() -> impl Iterator<Item = &'static str> {
        T::RULES.iter().map(|rule| rule.id)
    }

    ids::<Icsr>()
        .chain(ids::<CaseIdentification>())
        .chain(ids::<DocumentHeldBySender>())
        .chain(ids::<SourceCaseId>())
        .chain(ids::<LinkedReport>())
        .chain(ids::<PrimarySource>())
        .chain(ids::<Sender>())
        .chain(ids::<LiteratureReference>())
        .chain(ids::<StudyIdentification>())
        .chain(ids::<StudyRegistration>())
        .chain(ids::<Patient>())
        .chain(ids::<MedicalHistory>())
        .chain(ids::<PastDrugHistory>())
        .chain(ids::<CauseOfDeath>())
        .chain(ids::<AutopsyCauseOfDeath>())
        .chain(ids::<ParentMedicalHistory>())
        .chain(ids::<ParentPastDrugHistory>())
        .chain(ids::<ReactionEvent>())
        .chain(ids::<TestResult>())
        .chain(ids::<DrugInformation>())
        .chain(ids::<SubstanceStrength>())
        .chain(ids::<DosageInformation>())
        .chain(ids::<IndicationForUse>())
        .chain(ids::<DrugReactionMatrix>())
        .chain(ids::<RelatednessAssessment>())
        .chain(ids::<AdditionalDrugInformation>())
        .chain(ids::<Narrative>())
        .chain(ids::<SenderDiagnosis>())
        .chain(ids::<ReporterCommentsNative>())
        .collect()
}
