//! Shared constants and the value helpers used by both mappers.

use icsr_model::codec::{decode_nullable, decode_plain, encode_nullable};
use icsr_model::{CodecError, FieldType, Location, Nullable, Scalar, ValidationIssue};

use crate::codes::{ObservationCode, WireCode, code_system};
use crate::tree::Element;

/// HL7 v3 namespace.
pub const HL7_NS: &str = "urn:hl7-org:v3";

/// XML Schema instance namespace (`xsi:type`).
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Identifier roots and code systems.
pub mod oid {
    macro_rules! ich {
        ($suffix:literal) => {
            concat!("2.16.840.1.113883.3.989.2.1", $suffix)
        };
    }

    pub const BATCH_ID: &str = ich!(".3.22");
    pub const BATCH_SENDER: &str = ich!(".3.13");
    pub const BATCH_RECEIVER: &str = ich!(".3.14");
    pub const MESSAGE_SENDER: &str = ich!(".3.11");
    pub const MESSAGE_RECEIVER: &str = ich!(".3.12");
    pub const REPORT_ID: &str = ich!(".3.1");
    pub const WORLDWIDE_ID: &str = ich!(".3.2");
    pub const SOURCE_CASE_ID: &str = ich!(".3.3");
    pub const AUTHORISATION: &str = ich!(".3.4");
    pub const SPONSOR_STUDY: &str = ich!(".3.5");
    pub const STUDY_REGISTRATION: &str = ich!(".3.6");
    pub const MEDICAL_RECORD: &str = ich!(".3.7");
    pub const LOCAL_ID: &str = ich!(".3.15");

    pub const CS_REPORT_TYPE: &str = ich!(".1.2");
    pub const CS_FIRST_SENDER: &str = ich!(".1.3");
    pub const CS_RECORD_SOURCE: &str = ich!(".1.4");
    pub const CS_NULLIFICATION: &str = ich!(".1.5");
    pub const CS_QUALIFICATION: &str = ich!(".1.6");
    pub const CS_SENDER_TYPE: &str = ich!(".1.7");
    pub const CS_STUDY_TYPE: &str = ich!(".1.8");
    pub const CS_AGE_GROUP: &str = ich!(".1.9");
    pub const CS_TERM_HIGHLIGHTED: &str = ich!(".1.10");
    pub const CS_OUTCOME: &str = ich!(".1.11");
    pub const CS_TEST_RESULT: &str = ich!(".1.12");
    pub const CS_DRUG_ROLE: &str = ich!(".1.13");
    pub const CS_REGULATORY_PURPOSE: &str = ich!(".1.14");
    pub const CS_ACTION_TAKEN: &str = ich!(".1.15");
    pub const CS_RECURRENCE: &str = ich!(".1.16");
    pub const CS_ADDITIONAL_INFO: &str = ich!(".1.17");
    pub const CS_PRODUCT_EVENT: &str = ich!(".1.18");
    pub const CS_OBSERVATION: &str = ich!(".1.19");
    pub const CS_ORGANIZER: &str = ich!(".1.20");
    pub const CS_COMMENT_AUTHOR: &str = ich!(".1.21");
    pub const CS_RELATED_INVESTIGATION: &str = ich!(".1.22");
    pub const CS_CHARACTERISTIC: &str = ich!(".1.23");
    pub const CS_DOCUMENT: &str = ich!(".1.27");

    pub const CS_MEDDRA: &str = "2.16.840.1.113883.6.163";
    pub const CS_COUNTRY: &str = "1.0.3166.1.2.2";
    pub const CS_SEX: &str = "1.0.5218";
    pub const CS_INTERACTION: &str = "2.16.840.1.113883.1.6";
    pub const CS_TRIGGER: &str = "2.16.840.1.113883.1.18";
    pub const CS_ROLE: &str = "2.16.840.1.113883.5.111";
    pub const CS_INTERPRETATION: &str = "2.16.840.1.113883.5.83";
}

/// Wire identifier of the reaction at `index` (`r-id1`, `r-id2`, ...).
pub(crate) fn reaction_id(index: usize) -> String {
    format!("r-id{}", index + 1)
}

/// Wire identifier of the drug at `index` (`d-id1`, `d-id2`, ...).
pub(crate) fn drug_id(index: usize) -> String {
    format!("d-id{}", index + 1)
}

// ---------------------------------------------------------------------------
// Export helpers
// ---------------------------------------------------------------------------

impl Element {
    /// Set `key` to the encoded value when present.
    pub(crate) fn value<T: Scalar>(self, key: &str, value: &Option<T>) -> Self {
        match value {
            Some(value) => self.attr(key, value.encode()),
            None => self,
        }
    }

    /// Set `key`, or `nullFlavor` for a sentinel, when present.
    pub(crate) fn nullable<T: Scalar>(self, key: &str, value: &Option<Nullable<T>>) -> Self {
        match value {
            Some(value) => {
                let (key, text) = encode_nullable(value, key);
                self.attr(key, text)
            }
            None => self,
        }
    }

    /// Add `codeSystem` for a code list field.
    pub(crate) fn code_system_of<T: Scalar>(self) -> Self {
        match T::FIELD_TYPE {
            FieldType::Code(list) => self.attr("codeSystem", code_system(list)),
            _ => self,
        }
    }

    pub(crate) fn xsi_type(self, data_type: &str) -> Self {
        self.attr("xsi:type", data_type)
    }
}

/// `<name>text</name>` when the value is present.
pub(crate) fn text_element<T: Scalar>(name: &str, value: &Option<T>) -> Option<Element> {
    value
        .as_ref()
        .map(|value| Element::new(name).with_text(value.encode()))
}

/// Text element, or an empty element carrying `nullFlavor`.
pub(crate) fn nullable_text_element<T: Scalar>(
    name: &str,
    value: &Option<Nullable<T>>,
) -> Option<Element> {
    value.as_ref().map(|value| match value {
        Nullable::Value(value) => Element::new(name).with_text(value.encode()),
        Nullable::NullFlavor(flavor) => Element::new(name).attr("nullFlavor", flavor.as_str()),
    })
}

/// `<code code=".." codeSystem=".."/>` for a structural code.
pub(crate) fn code_element<C: WireCode>(code: C) -> Element {
    Element::new("code")
        .attr("code", code.code().to_string())
        .attr("codeSystem", C::SYSTEM)
}

/// `<id root=".." extension=".."/>`.
pub(crate) fn id_element(root: &str, extension: impl Into<String>) -> Element {
    Element::new("id").attr("root", root).attr("extension", extension)
}

/// A coded observation with an optional value.
pub(crate) fn observation(code: ObservationCode, value: Option<Element>) -> Element {
    Element::new("observation")
        .attr("classCode", "OBS")
        .attr("moodCode", "EVN")
        .child(code_element(code))
        .maybe_child(value)
}

/// `<name code=".." codeSystem=".."/>` for a code list field.
pub(crate) fn coded<T: Scalar>(name: &str, value: &Option<T>) -> Option<Element> {
    value
        .is_some()
        .then(|| Element::new(name).value("code", value).code_system_of::<T>())
}

pub(crate) fn coded_nullable<T: Scalar>(name: &str, value: &Option<Nullable<T>>) -> Option<Element> {
    value
        .is_some()
        .then(|| Element::new(name).nullable("code", value).code_system_of::<T>())
}

/// `<value xsi:type="BL" value=".."/>`.
pub(crate) fn bl_value(value: &Option<bool>) -> Option<Element> {
    value
        .is_some()
        .then(|| Element::new("value").xsi_type("BL").value("value", value))
}

pub(crate) fn bl_nullable(value: &Option<Nullable<bool>>) -> Option<Element> {
    value
        .is_some()
        .then(|| Element::new("value").xsi_type("BL").nullable("value", value))
}

/// `<value xsi:type="CE" code=".." codeSystem=".."/>` for a code list field.
pub(crate) fn ce_value<T: Scalar>(value: &Option<T>) -> Option<Element> {
    value.is_some().then(|| {
        Element::new("value")
            .xsi_type("CE")
            .value("code", value)
            .code_system_of::<T>()
    })
}

pub(crate) fn ce_nullable<T: Scalar>(value: &Option<Nullable<T>>) -> Option<Element> {
    value.is_some().then(|| {
        Element::new("value")
            .xsi_type("CE")
            .nullable("code", value)
            .code_system_of::<T>()
    })
}

/// `<value xsi:type="PQ" value=".." unit=".."/>` when either side is set.
pub(crate) fn pq_value<T: Scalar>(number: &Option<T>, unit: &Option<String>) -> Option<Element> {
    (number.is_some() || unit.is_some()).then(|| {
        Element::new("value")
            .xsi_type("PQ")
            .value("value", number)
            .value("unit", unit)
    })
}

/// `<value xsi:type="TS" value=".."/>`.
pub(crate) fn ts_nullable<T: Scalar>(value: &Option<Nullable<T>>) -> Option<Element> {
    nullable_value_element("value", value).map(|element| element.xsi_type("TS"))
}

pub(crate) fn ts_value<T: Scalar>(value: &Option<T>) -> Option<Element> {
    value_element("value", value).map(|element| element.xsi_type("TS"))
}

/// `<value xsi:type="ED">text</value>`.
pub(crate) fn ed_value<T: Scalar>(value: &Option<T>) -> Option<Element> {
    text_element("value", value).map(|element| element.xsi_type("ED"))
}

pub(crate) fn ed_nullable<T: Scalar>(value: &Option<Nullable<T>>) -> Option<Element> {
    nullable_text_element("value", value).map(|element| element.xsi_type("ED"))
}

/// A MedDRA coded element (`code` + `codeSystemVersion`).
pub(crate) fn meddra(name: &str, version: &Option<String>, code: &Option<i64>) -> Element {
    Element::new(name)
        .value("code", code)
        .attr("codeSystem", oid::CS_MEDDRA)
        .value("codeSystemVersion", version)
}

/// MedDRA `CE` value with the reported term as `originalText`.
pub(crate) fn meddra_value(
    version: &Option<String>,
    code: &Option<i64>,
    original: Option<Element>,
) -> Element {
    meddra("value", version, code)
        .xsi_type("CE")
        .maybe_child(original)
}

/// A product or term id with its dictionary version, when either is set.
pub(crate) fn versioned_code(
    name: &str,
    version: &Option<String>,
    code: &Option<String>,
) -> Option<Element> {
    (version.is_some() || code.is_some()).then(|| {
        Element::new(name)
            .value("code", code)
            .value("codeSystemVersion", version)
    })
}

/// `<name value=".."/>` when present.
pub(crate) fn value_element<T: Scalar>(name: &str, value: &Option<T>) -> Option<Element> {
    value
        .is_some()
        .then(|| Element::new(name).value("value", value))
}

/// `<name value=".."/>` or `<name nullFlavor=".."/>` when present.
pub(crate) fn nullable_value_element<T: Scalar>(
    name: &str,
    value: &Option<Nullable<T>>,
) -> Option<Element> {
    value
        .is_some()
        .then(|| Element::new(name).nullable("value", value))
}

/// `PQ` value with a fixed unit.
pub(crate) fn quantity<T: Scalar>(value: &Option<T>, unit: &str) -> Option<Element> {
    value.is_some().then(|| {
        Element::new("value")
            .xsi_type("PQ")
            .value("value", value)
            .attr("unit", unit)
    })
}

/// `IVL_TS` interval with nullable bounds, when either is set.
pub(crate) fn interval<T: Scalar>(
    name: &str,
    low: &Option<Nullable<T>>,
    high: &Option<Nullable<T>>,
) -> Option<Element> {
    non_empty(
        Element::new(name)
            .xsi_type("IVL_TS")
            .maybe_child(nullable_value_element("low", low))
            .maybe_child(nullable_value_element("high", high)),
    )
}

/// `<code code=".." codeSystem=".."/>` wrapper for a country.
pub(crate) fn country_code(value: &Option<String>) -> Option<Element> {
    value.is_some().then(|| {
        Element::new("code")
            .value("code", value)
            .attr("codeSystem", oid::CS_COUNTRY)
    })
}

/// Keep a wrapper only when something was written into it.
pub(crate) fn non_empty(element: Element) -> Option<Element> {
    let has_children = element.elements().next().is_some();
    has_children.then_some(element)
}

// ---------------------------------------------------------------------------
// Import helpers
// ---------------------------------------------------------------------------

/// Collects field decode failures while an import runs.
#[derive(Debug, Default)]
pub(crate) struct Decoder {
    issues: Vec<ValidationIssue>,
}

impl Decoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn scope(&mut self, location: Location) -> Scope<'_> {
        Scope {
            decoder: self,
            location,
        }
    }

    pub(crate) fn report(&mut self, location: Location, message: impl Into<String>) {
        self.issues.push(ValidationIssue::structural(location, message));
    }

    pub(crate) fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub(crate) fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

/// Decoder bound to the location of the entity being built.
pub(crate) struct Scope<'d> {
    decoder: &'d mut Decoder,
    location: Location,
}

impl Scope<'_> {
    pub(crate) fn location(&self) -> &Location {
        &self.location
    }

    /// Scope for a nested entity.
    pub(crate) fn nested(&mut self, location: Location) -> Scope<'_> {
        Scope {
            decoder: &mut *self.decoder,
            location,
        }
    }

    fn settle<T>(&mut self, result: Result<Option<T>, CodecError>, field: &str) -> Option<T> {
        result.unwrap_or_else(|error| {
            self.decoder
                .report(self.location.field(field), error.to_string());
            None
        })
    }

    /// Plain field from a raw value and `nullFlavor`.
    pub(crate) fn plain<T: Scalar>(
        &mut self,
        field: &str,
        value: Option<&str>,
        null_flavor: Option<&str>,
    ) -> Option<T> {
        let result = decode_plain(value, null_flavor, field);
        self.settle(result, field)
    }

    /// Nullable field from a raw value and `nullFlavor`.
    pub(crate) fn nullable<T: Scalar>(
        &mut self,
        field: &str,
        value: Option<&str>,
        null_flavor: Option<&str>,
    ) -> Option<Nullable<T>> {
        let result = decode_nullable(value, null_flavor, field);
        self.settle(result, field)
    }

    /// Plain field from an attribute of `node`.
    pub(crate) fn attr<T: Scalar>(
        &mut self,
        field: &str,
        node: Option<&Element>,
        key: &str,
    ) -> Option<T> {
        let node = node?;
        self.plain(field, node.get(key), node.get("nullFlavor"))
    }

    /// Nullable field from an attribute of `node`.
    pub(crate) fn nullable_attr<T: Scalar>(
        &mut self,
        field: &str,
        node: Option<&Element>,
        key: &str,
    ) -> Option<Nullable<T>> {
        let node = node?;
        self.nullable(field, node.get(key), node.get("nullFlavor"))
    }

    /// Plain field from the text content of `node`.
    pub(crate) fn text<T: Scalar>(&mut self, field: &str, node: Option<&Element>) -> Option<T> {
        let node = node?;
        self.plain(field, node.text().as_deref(), node.get("nullFlavor"))
    }

    /// Nullable field from the text content of `node`.
    pub(crate) fn nullable_text<T: Scalar>(
        &mut self,
        field: &str,
        node: Option<&Element>,
    ) -> Option<Nullable<T>> {
        let node = node?;
        self.nullable(field, node.text().as_deref(), node.get("nullFlavor"))
    }
}

/// Structural code of an observation-like element.
pub(crate) fn code_of<C: WireCode>(element: &Element) -> Option<C> {
    element.first("code").and_then(C::of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{DrugRole, NullFlavor};

    #[test]
    fn test_nullable_attribute() {
        let unknown = Some(Nullable::<bool>::NullFlavor(NullFlavor::Unk));
        let element = Element::new("value").nullable("value", &unknown);
        assert_eq!(element.get("nullFlavor"), Some("UNK"));
        assert_eq!(element.get("value"), None);
    }

    #[test]
    fn test_ce_value_carries_code_system() {
        let element = ce_value(&Some(DrugRole::Interacting)).unwrap();
        assert_eq!(element.get("code"), Some("3"));
        assert_eq!(element.get("codeSystem"), Some(oid::CS_DRUG_ROLE));
        assert_eq!(element.get("xsi:type"), Some("CE"));
    }

    #[test]
    fn test_decoder_records_bad_values() {
        let mut decoder = Decoder::new();
        let node = Element::new("value").attr("value", "maybe");
        let mut scope = decoder.scope(Location::root().field("c_1_identification_case_safety_report"));
        let value: Option<bool> = scope.attr("c_1_6_1_additional_documents_available", Some(&node), "value");
        assert_eq!(value, None);
        let issues = decoder.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].location.to_string(),
            "c_1_identification_case_safety_report.c_1_6_1_additional_documents_available"
        );
    }

    #[test]
    fn test_null_flavor_wins_over_value() {
        let mut decoder = Decoder::new();
        let node = Element::new("value").attr("value", "5").attr("nullFlavor", "UNK");
        let value: Option<Nullable<i64>> =
            decoder.scope(Location::root()).nullable_attr("d_2_2a_age_onset_reaction_num", Some(&node), "value");
        assert_eq!(value, Some(Nullable::NullFlavor(NullFlavor::Unk)));
    }
}
