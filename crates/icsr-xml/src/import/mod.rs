//! HL7 v3 XML to ICSR.
//!
//! Import walks the same layout export writes. Values that fail to decode do
//! not abort a record: the field is left unset and a structural issue is
//! recorded on the imported report. Only a fragment missing its investigation
//! event, assessment or primary role is rejected outright.

mod drug;
mod identification;
mod narrative;
mod patient;
mod reaction;
mod test_result;

use std::collections::HashMap;

use icsr_model::{Icsr, ReactionRef, ValidationIssue};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::codes::{OrganizerCode, WireCode};
use crate::common::Decoder;
use crate::error::{MappingError, Result};
use crate::export::{ASSESSMENT, EVENT_PATH, FRAGMENT, ROLE_PATH};
use crate::tree::{self, Element};

/// One report read from a fragment, with the problems met along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Imported {
    pub icsr: Icsr,
    pub issues: Vec<ValidationIssue>,
}

impl Imported {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Per-fragment outcome of a batch import.
#[derive(Debug)]
pub struct ImportRecord {
    pub index: usize,
    pub result: Result<Imported>,
}

/// Every fragment of a message, in document order.
#[derive(Debug, Default)]
pub struct BatchImport {
    pub records: Vec<ImportRecord>,
}

impl BatchImport {
    pub fn imported(&self) -> impl Iterator<Item = &Imported> {
        self.records
            .iter()
            .filter_map(|record| record.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &MappingError)> {
        self.records
            .iter()
            .filter_map(|record| record.result.as_ref().err().map(|error| (record.index, error)))
    }
}

/// Read every `PORR_IN049016UV` fragment of a message.
///
/// The document may be a full batch envelope or a bare fragment. A document
/// that does not parse, or holds no fragment at all, is an error; a fragment
/// that cannot be read fails only its own record.
pub fn import_many(xml: &str) -> Result<BatchImport> {
    let root = tree::parse(xml)?;
    let fragments: Vec<&Element> = if root.name == FRAGMENT {
        vec![&root]
    } else {
        root.all(FRAGMENT).collect()
    };
    if fragments.is_empty() {
        return Err(MappingError::malformed(format!(
            "no {FRAGMENT} element under <{}>",
            root.name
        )));
    }

    let mut records = Vec::with_capacity(fragments.len());
    for (index, fragment) in fragments.into_iter().enumerate() {
        let span = info_span!("import_fragment", index);
        let _guard = span.enter();
        let result = import_one(fragment);
        match &result {
            Ok(imported) if !imported.is_clean() => {
                warn!(issues = imported.issues.len(), "report imported with issues");
            }
            Ok(_) => {}
            Err(error) => warn!(%error, "report not imported"),
        }
        records.push(ImportRecord { index, result });
    }

    let batch = BatchImport { records };
    info!(
        imported = batch.imported().count(),
        failed = batch.failures().count(),
        "import finished"
    );
    Ok(batch)
}

/// Read one fragment into a report.
pub fn import_one(fragment: &Element) -> Result<Imported> {
    let event = fragment
        .find(EVENT_PATH)
        .ok_or_else(|| MappingError::malformed(format!("{FRAGMENT} without {EVENT_PATH}")))?;
    let assessment = event
        .all("component")
        .find_map(|component| component.first(ASSESSMENT))
        .ok_or_else(|| MappingError::malformed(format!("investigationEvent without {ASSESSMENT}")))?;
    let role = assessment
        .find(ROLE_PATH)
        .ok_or_else(|| MappingError::malformed(format!("{ASSESSMENT} without {ROLE_PATH}")))?;

    let mut decoder = Decoder::new();
    let mut icsr = Icsr::default();

    identification::read(&mut icsr, fragment, event, role, &mut decoder);
    patient::read(&mut icsr, role, &mut decoder);
    let reactions = reaction::read(&mut icsr, role, &mut decoder);
    test_result::read(&mut icsr, role, &mut decoder);
    drug::read(&mut icsr, role, assessment, &reactions, &mut decoder);
    narrative::read(&mut icsr, event, assessment, &mut decoder);

    debug!(
        reactions = icsr.e_i_reaction_event.len(),
        drugs = icsr.g_k_drug_information.len(),
        "fragment read"
    );
    Ok(Imported {
        icsr,
        issues: decoder.into_issues(),
    })
}

/// Patient level observations of the primary role.
fn role_observations(role: &Element) -> impl Iterator<Item = &Element> {
    role.all("subjectOf2")
        .filter_map(|subject| subject.first("observation"))
}

/// Components of the role's organizers with the given category.
fn organizer_components(role: &Element, code: OrganizerCode) -> impl Iterator<Item = &Element> {
    role.all("subjectOf2")
        .filter_map(|subject| subject.first("organizer"))
        .filter(move |organizer| {
            organizer.first("code").and_then(OrganizerCode::of) == Some(code)
        })
        .flat_map(|organizer| organizer.all("component"))
}

/// Maps `r-id` wire identifiers to the transient ids given to imported
/// reactions.
#[derive(Debug, Default)]
pub(crate) struct ReactionIds(HashMap<String, Uuid>);

impl ReactionIds {
    fn insert(&mut self, wire_id: &str, uuid: Uuid) {
        self.0.entry(wire_id.to_string()).or_insert(uuid);
    }

    /// Reference for a wire id. An id naming no reaction still yields a
    /// reference, one that resolves to nothing, so validation can report it.
    fn resolve(&self, wire_id: Option<&str>) -> Option<ReactionRef> {
        let wire_id = wire_id?;
        let uuid = self.0.get(wire_id).copied().unwrap_or_else(|| {
            debug!(wire_id, "reference to unknown reaction");
            Uuid::new_v4()
        });
        Some(ReactionRef::Uuid(uuid))
    }
}
