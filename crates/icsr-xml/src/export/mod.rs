//! ICSR to HL7 v3 XML.
//!
//! Every fragment starts as a clone of the template's `PORR_IN049016UV`
//! skeleton. Fixed slots (ids, timestamps, the patient `player1`) are filled in
//! place; everything driven by the report's content is built as fresh
//! subtrees and attached in schema order.

mod drug;
mod identification;
mod narrative;
mod patient;
mod reaction;
mod test_result;

use chrono::{Local, NaiveDateTime};
use icsr_model::{Icsr, ReactionRef, Scalar};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::codes::{ObservationCode, OrganizerCode};
use crate::common::{code_element, reaction_id};
use crate::error::{MappingError, Result};
use crate::tree::{self, Element, Node};

/// Built-in message template.
pub const TEMPLATE: &str = include_str!("../../templates/e2b_template.xml");

pub(crate) const FRAGMENT: &str = "PORR_IN049016UV";
pub(crate) const EVENT_PATH: &str = "controlActProcess/subject/investigationEvent";
pub(crate) const ASSESSMENT: &str = "adverseEventAssessment";
pub(crate) const ROLE_PATH: &str = "subject1/primaryRole";

const ENVELOPE_SLOTS: [(&str, &str); 4] = [
    ("id", "extension"),
    ("creationTime", "value"),
    ("receiver/device/id", "extension"),
    ("sender/device/id", "extension"),
];

/// Options for a batch export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Timestamp written to the envelope and fragments; defaults to now.
    pub creation_time: Option<NaiveDateTime>,
    /// Spaces per indentation level, zero for a single line.
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            creation_time: None,
            indent: 2,
        }
    }
}

impl ExportOptions {
    fn timestamp(&self) -> String {
        self.creation_time
            .unwrap_or_else(|| Local::now().naive_local())
            .format("%Y%m%d%H%M%S")
            .to_string()
    }
}

/// Parsed message template: the envelope and one fragment prototype.
#[derive(Debug, Clone)]
pub struct Template {
    envelope: Element,
    fragment: Element,
    /// Child position of the fragments inside the envelope.
    slot: usize,
}

impl Template {
    /// The template shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::parse(TEMPLATE)
    }

    /// Parse a template and check that every slot the mapper fills exists.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut envelope = tree::parse(xml)?;
        let slot = envelope
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(element) if element.name == FRAGMENT))
            .ok_or_else(|| MappingError::template(FRAGMENT))?;
        let mut fragments = envelope.take_all(FRAGMENT);
        let fragment = fragments.swap_remove(0);

        for (path, _) in ENVELOPE_SLOTS {
            envelope
                .find(path)
                .ok_or_else(|| MappingError::template(path))?;
            fragment
                .find(path)
                .ok_or_else(|| MappingError::template(format!("{FRAGMENT}/{path}")))?;
        }
        for path in [
            "controlActProcess/effectiveTime".to_string(),
            format!("{EVENT_PATH}/code"),
            format!("{EVENT_PATH}/statusCode"),
            format!("{EVENT_PATH}/component/{ASSESSMENT}/{ROLE_PATH}/player1"),
        ] {
            fragment
                .find(&path)
                .ok_or_else(|| MappingError::template(format!("{FRAGMENT}/{path}")))?;
        }

        Ok(Self {
            envelope,
            fragment,
            slot,
        })
    }

    /// The `PORR_IN049016UV` prototype.
    pub fn fragment(&self) -> &Element {
        &self.fragment
    }
}

/// Per-record outcome of a batch export.
#[derive(Debug)]
pub struct ExportRecord {
    pub index: usize,
    pub safety_report_id: Option<String>,
    pub error: Option<MappingError>,
}

impl ExportRecord {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A rendered document with the outcome of every input record.
#[derive(Debug)]
pub struct BatchExport {
    pub xml: String,
    pub records: Vec<ExportRecord>,
}

impl BatchExport {
    pub fn exported(&self) -> usize {
        self.records.iter().filter(|record| record.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExportRecord> {
        self.records.iter().filter(|record| !record.is_ok())
    }
}

/// Render reports into one message.
///
/// A report that cannot be mapped is left out of the document and recorded as
/// failed; the others are still exported. Only a broken template fails the
/// whole call.
pub fn export_many(icsrs: &[Icsr], options: &ExportOptions) -> Result<BatchExport> {
    let template = Template::builtin()?;
    let mut envelope = template.envelope.clone();
    fill_header(&mut envelope, &options.timestamp(), Uuid::new_v4().to_string())?;

    let mut fragments = Vec::new();
    let mut records = Vec::with_capacity(icsrs.len());
    for (index, icsr) in icsrs.iter().enumerate() {
        let span = info_span!("export_fragment", index);
        let _guard = span.enter();
        let safety_report_id = icsr.safety_report_id().map(str::to_string);
        match export_one(icsr, &template, options) {
            Ok(fragment) => {
                fragments.push(Node::Element(fragment));
                records.push(ExportRecord {
                    index,
                    safety_report_id,
                    error: None,
                });
            }
            Err(error) => {
                warn!(%error, "report not exported");
                records.push(ExportRecord {
                    index,
                    safety_report_id,
                    error: Some(error),
                });
            }
        }
    }

    let count = fragments.len();
    let tail = envelope.children.split_off(template.slot);
    envelope.children.extend(fragments);
    envelope.children.extend(tail);
    let xml = tree::write(&envelope, options.indent)?;
    info!(exported = count, failed = icsrs.len() - count, "export finished");
    Ok(BatchExport { xml, records })
}

/// Map one report onto a clone of the template fragment.
pub fn export_one(icsr: &Icsr, template: &Template, options: &ExportOptions) -> Result<Element> {
    let mut fragment = template.fragment.clone();
    let id = icsr
        .safety_report_id()
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
    fill_header(&mut fragment, &options.timestamp(), id)?;

    if let Some(date) = icsr
        .c_1_identification_case_safety_report
        .as_ref()
        .and_then(|c_1| c_1.c_1_2_date_creation.as_ref())
    {
        slot(&mut fragment, "controlActProcess/effectiveTime")?.set_attr("value", date.encode());
    }

    let ids = WireIds::new(icsr);
    let event = slot(&mut fragment, EVENT_PATH)?;
    fill_event(event, icsr, &ids)?;
    Ok(fragment)
}

fn slot<'a>(element: &'a mut Element, path: &str) -> Result<&'a mut Element> {
    element
        .find_mut(path)
        .ok_or_else(|| MappingError::template(path))
}

/// Fill the id, timestamp and device ids of an envelope or fragment.
fn fill_header(element: &mut Element, timestamp: &str, id: String) -> Result<()> {
    let values = [
        id,
        timestamp.to_string(),
        Uuid::new_v4().to_string(),
        Uuid::new_v4().to_string(),
    ];
    for ((path, key), value) in ENVELOPE_SLOTS.into_iter().zip(values) {
        slot(element, path)?.set_attr(key, value);
    }
    Ok(())
}

fn take_one(element: &mut Element, name: &str) -> Result<Element> {
    element
        .take_all(name)
        .into_iter()
        .next()
        .ok_or_else(|| MappingError::template(format!("{EVENT_PATH}/{name}")))
}

fn fill_event(event: &mut Element, icsr: &Icsr, ids: &WireIds<'_>) -> Result<()> {
    let code = take_one(event, "code")?;
    let status = take_one(event, "statusCode")?;
    let mut component = take_one(event, "component")?;

    let assessment = component
        .first_mut(ASSESSMENT)
        .ok_or_else(|| MappingError::template(format!("{EVENT_PATH}/component/{ASSESSMENT}")))?;
    let role = assessment.find_mut(ROLE_PATH).ok_or_else(|| {
        MappingError::template(format!("{EVENT_PATH}/component/{ASSESSMENT}/{ROLE_PATH}"))
    })?;
    fill_role(role, icsr, ids)?;
    assessment.extend(drug::causality(icsr, ids)?);
    assessment.extend(narrative::assessment_comments(icsr));

    let c_1 = icsr.c_1_identification_case_safety_report.as_ref();
    let mut children = identification::ids(c_1);
    children.push(code);
    children.extend(narrative::case_narrative(icsr));
    children.push(status);
    children.extend(identification::received_dates(c_1));
    children.extend(identification::references(icsr));
    children.push(component);
    children.extend(identification::case_observations(c_1));
    children.extend(narrative::summaries(icsr));
    children.extend(identification::related_investigations(icsr));
    children.extend(identification::sender(icsr));
    children.extend(identification::characteristics(c_1));

    event.children = children.into_iter().map(Node::Element).collect();
    debug!(
        reactions = icsr.e_i_reaction_event.len(),
        drugs = icsr.g_k_drug_information.len(),
        "investigation event mapped"
    );
    Ok(())
}

fn fill_role(role: &mut Element, icsr: &Icsr, ids: &WireIds<'_>) -> Result<()> {
    let patient = icsr.d_patient_characteristics.as_ref();
    let player = role
        .first_mut("player1")
        .ok_or_else(|| MappingError::template("primaryRole/player1"))?;
    if let Some(patient) = patient {
        patient::fill_person(player, patient);
    }

    role.extend(identification::study(icsr));
    if let Some(patient) = patient {
        role.extend(patient::observations(patient));
    }
    role.extend(reaction::observations(icsr));
    if let Some(patient) = patient {
        role.extend(patient::organizers(patient));
    }
    role.extend(test_result::results(icsr));
    role.extend(drug::drugs(icsr, ids)?);
    Ok(())
}

fn component(content: Element) -> Element {
    Element::new("component").attr("typeCode", "COMP").child(content)
}

/// Patient level `subjectOf2` wrapper.
fn subject(content: Element) -> Element {
    Element::new("subjectOf2").attr("typeCode", "SBJ").child(content)
}

fn relationship(name: &str, type_code: &str, content: Element) -> Element {
    Element::new(name).attr("typeCode", type_code).child(content)
}

fn observation_event(code: ObservationCode, value: Option<Element>) -> Element {
    Element::new("observationEvent")
        .attr("classCode", "OBS")
        .attr("moodCode", "EVN")
        .child(code_element(code))
        .maybe_child(value)
}

/// Category organizer, `None` without components.
fn organizer(code: OrganizerCode, components: Vec<Element>) -> Option<Element> {
    (!components.is_empty()).then(|| {
        subject(
            Element::new("organizer")
                .attr("classCode", "CATEGORY")
                .attr("moodCode", "EVN")
                .child(code_element(code))
                .with_children(components.into_iter().map(component)),
        )
    })
}

fn consumable(product: Element) -> Element {
    Element::new("consumable").attr("typeCode", "CSM").child(
        Element::new("instanceOfKind")
            .attr("classCode", "INST")
            .child(product),
    )
}

/// Positional wire identifiers for one report.
pub(crate) struct WireIds<'a> {
    icsr: &'a Icsr,
}

impl<'a> WireIds<'a> {
    fn new(icsr: &'a Icsr) -> Self {
        Self { icsr }
    }

    /// `r-id{n}` of the reaction a matrix row points at.
    pub(crate) fn reaction(&self, reference: Option<&ReactionRef>) -> Option<String> {
        reference
            .and_then(|reference| self.icsr.reaction_position(reference))
            .map(reaction_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use icsr_model::{CaseIdentification, DrugInformation, DrugReactionMatrix, ReactionEvent};

    fn options() -> ExportOptions {
        ExportOptions {
            creation_time: NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|date| date.and_hms_opt(12, 30, 0)),
            indent: 2,
        }
    }

    #[test]
    fn test_builtin_template_parses() {
        let template = Template::builtin().unwrap();
        assert_eq!(template.fragment().name, FRAGMENT);
        assert!(template.envelope.first(FRAGMENT).is_none());
    }

    #[test]
    fn test_template_missing_event_is_rejected() {
        let xml = TEMPLATE.replace("investigationEvent", "somethingElse");
        let error = Template::parse(&xml).unwrap_err();
        assert!(matches!(error, MappingError::TemplateMapping { .. }));
    }

    #[test]
    fn test_fragment_header() {
        let template = Template::builtin().unwrap();
        let icsr = Icsr {
            c_1_identification_case_safety_report: Some(CaseIdentification {
                c_1_1_sender_safety_report_unique_id: Some("DE-ACME-1".to_string()),
                c_1_2_date_creation: Some("20240301".parse().unwrap()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let fragment = export_one(&icsr, &template, &options()).unwrap();
        assert_eq!(fragment.find("id").and_then(|id| id.get("extension")), Some("DE-ACME-1"));
        assert_eq!(
            fragment.find("creationTime").and_then(|time| time.get("value")),
            Some("20240301123000")
        );
        assert_eq!(
            fragment
                .find("controlActProcess/effectiveTime")
                .and_then(|time| time.get("value")),
            Some("20240301")
        );
    }

    #[test]
    fn test_unresolved_matrix_row_fails_the_fragment() {
        let icsr = Icsr {
            e_i_reaction_event: vec![ReactionEvent {
                uuid: Some(Uuid::new_v4()),
                ..Default::default()
            }],
            g_k_drug_information: vec![DrugInformation {
                g_k_9_i_drug_reaction_matrix: vec![DrugReactionMatrix {
                    g_k_9_i_1_reaction_assessed: Some(ReactionRef::Uuid(Uuid::new_v4())),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let template = Template::builtin().unwrap();
        let error = export_one(&icsr, &template, &options()).unwrap_err();
        assert!(matches!(error, MappingError::UnresolvedReaction { drug: 0, row: 0 }));

        let batch = export_many(&[icsr, Icsr::default()], &options()).unwrap();
        assert_eq!(batch.exported(), 1);
        assert_eq!(batch.failures().map(|record| record.index).collect::<Vec<_>>(), vec![0]);
        assert_eq!(batch.xml.matches("<PORR_IN049016UV>").count(), 1);
    }
}
