//! Section G: drugs, addressed by `d-id{k}`, and their causality assessments.

use std::collections::HashMap;

use icsr_model::{
    AdditionalDrugInformation, DosageInformation, DrugInformation, DrugReactionMatrix, Icsr,
    IndicationForUse, Location, RelatednessAssessment, SubstanceStrength, ValidationIssue,
};
use tracing::{debug, warn};

use crate::codes::{ObservationCode, OrganizerCode};
use crate::common::{Decoder, Scope, code_of};
use crate::tree::Element;

use super::{ReactionIds, organizer_components};

const DRUGS: &str = "g_k_drug_information";
const MATRIX: &str = "g_k_9_i_drug_reaction_matrix";

pub(super) fn read(
    icsr: &mut Icsr,
    role: &Element,
    assessment: &Element,
    reactions: &ReactionIds,
    decoder: &mut Decoder,
) {
    let mut reader = DrugReader::new(reactions);
    for administration in organizer_components(role, OrganizerCode::DrugInformation)
        .filter_map(|component| component.first("substanceAdministration"))
    {
        reader.administration(administration, decoder);
    }
    reader.causality(assessment, decoder);
    debug!(count = reader.drugs.len(), "drugs read");
    icsr.g_k_drug_information = reader.drugs;
}

fn extension(element: Option<&Element>) -> Option<&str> {
    element.and_then(|element| element.get("extension"))
}

/// Drugs under construction, with the wire ids that address them.
struct DrugReader<'r> {
    reactions: &'r ReactionIds,
    drugs: Vec<DrugInformation>,
    /// Matrix row position per `r-id`, one map per drug.
    rows: Vec<HashMap<String, usize>>,
    /// Drug position per `d-id`.
    wire_ids: HashMap<String, usize>,
}

impl<'r> DrugReader<'r> {
    fn new(reactions: &'r ReactionIds) -> Self {
        Self {
            reactions,
            drugs: Vec::new(),
            rows: Vec::new(),
            wire_ids: HashMap::new(),
        }
    }

    /// Matrix row of drug `k` for a reaction wire id, created on first use.
    ///
    /// The XML has no row identity beyond the reaction, so every link naming
    /// the same reaction lands in one row.
    fn row_index(&mut self, k: usize, reaction: Option<&str>) -> usize {
        if let Some(index) = reaction.and_then(|id| self.rows[k].get(id).copied()) {
            return index;
        }
        let rows = &mut self.drugs[k].g_k_9_i_drug_reaction_matrix;
        rows.push(DrugReactionMatrix {
            g_k_9_i_1_reaction_assessed: self.reactions.resolve(reaction),
            ..Default::default()
        });
        let index = rows.len() - 1;
        if let Some(id) = reaction {
            self.rows[k].insert(id.to_string(), index);
        }
        index
    }

    fn administration(&mut self, administration: &Element, decoder: &mut Decoder) {
        let k = self.drugs.len();
        if let Some(wire_id) = extension(administration.first("id")) {
            self.wire_ids.entry(wire_id.to_string()).or_insert(k);
        }
        let location = Location::root().item(DRUGS, k);
        let drug = drug_information(&mut decoder.scope(location.clone()), administration);
        self.drugs.push(drug);
        self.rows.push(HashMap::new());

        for link in administration.all("outboundRelationship1") {
            let start = match link.get("typeCode") {
                Some("SAS") => true,
                Some("SAE") => false,
                _ => continue,
            };
            let i = self.row_index(k, extension(link.find("actReference/id")));
            let mut scope = decoder.scope(location.item(MATRIX, i));
            let pause = link.first("pauseQuantity");
            let row = &mut self.drugs[k].g_k_9_i_drug_reaction_matrix[i];
            if start {
                row.g_k_9_i_3_1a_interval_drug_administration_reaction_num = scope.attr(
                    "g_k_9_i_3_1a_interval_drug_administration_reaction_num",
                    pause,
                    "value",
                );
                row.g_k_9_i_3_1b_interval_drug_administration_reaction_unit = scope.attr(
                    "g_k_9_i_3_1b_interval_drug_administration_reaction_unit",
                    pause,
                    "unit",
                );
            } else {
                row.g_k_9_i_3_2a_interval_last_dose_drug_reaction_num = scope.attr(
                    "g_k_9_i_3_2a_interval_last_dose_drug_reaction_num",
                    pause,
                    "value",
                );
                row.g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit = scope.attr(
                    "g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit",
                    pause,
                    "unit",
                );
            }
        }

        for recurrence in administration
            .all("outboundRelationship2")
            .filter_map(|link| link.first("observation"))
            .filter(|observation| {
                code_of::<ObservationCode>(observation) == Some(ObservationCode::Recurrence)
            })
        {
            let reaction = extension(recurrence.find("outboundRelationship1/actReference/id"));
            let i = self.row_index(k, reaction);
            let mut scope = decoder.scope(location.item(MATRIX, i));
            self.drugs[k].g_k_9_i_drug_reaction_matrix[i].g_k_9_i_4_reaction_recur_readministration =
                scope.attr(
                    "g_k_9_i_4_reaction_recur_readministration",
                    recurrence.first("value"),
                    "code",
                );
        }
    }

    /// Drug roles and relatedness assessments of the adverse event assessment.
    fn causality(&mut self, assessment: &Element, decoder: &mut Decoder) {
        for evaluation in assessment
            .all("component")
            .filter_map(|component| component.first("causalityAssessment"))
        {
            let wire_id = extension(evaluation.find("subject2/productUseReference/id"));
            let Some(k) = wire_id.and_then(|id| self.wire_ids.get(id).copied()) else {
                warn!(drug = ?wire_id, "causality assessment for an unknown drug dropped");
                decoder.push(ValidationIssue::referential(
                    Location::root().field(DRUGS),
                    format!(
                        "causality assessment references unknown drug {}",
                        wire_id.unwrap_or("<none>")
                    ),
                ));
                continue;
            };
            let location = Location::root().item(DRUGS, k);
            match code_of::<ObservationCode>(evaluation) {
                Some(ObservationCode::DrugRole) => {
                    let mut scope = decoder.scope(location);
                    self.drugs[k].g_k_1_characterisation_drug_role = scope.attr(
                        "g_k_1_characterisation_drug_role",
                        evaluation.first("value"),
                        "code",
                    );
                }
                Some(ObservationCode::Relatedness) => {
                    let reaction =
                        extension(evaluation.find("subject1/adverseEffectReference/id"));
                    let i = self.row_index(k, reaction);
                    let row = &mut self.drugs[k].g_k_9_i_drug_reaction_matrix[i];
                    let assessments = &mut row.g_k_9_i_2_r_assessment_relatedness_drug_reaction;
                    let mut scope = decoder.scope(location.item(MATRIX, i).item(
                        "g_k_9_i_2_r_assessment_relatedness_drug_reaction",
                        assessments.len(),
                    ));
                    assessments.push(RelatednessAssessment {
                        g_k_9_i_2_r_1_source_assessment: scope.text(
                            "g_k_9_i_2_r_1_source_assessment",
                            evaluation.find("author/assignedEntity/code/originalText"),
                        ),
                        g_k_9_i_2_r_2_method_assessment: scope.text(
                            "g_k_9_i_2_r_2_method_assessment",
                            evaluation.find("methodCode/originalText"),
                        ),
                        g_k_9_i_2_r_3_result_assessment: scope.text(
                            "g_k_9_i_2_r_3_result_assessment",
                            evaluation.first("value"),
                        ),
                        ..Default::default()
                    });
                }
                _ => {}
            }
        }
    }
}

fn drug_information(scope: &mut Scope<'_>, administration: &Element) -> DrugInformation {
    let instance = administration.find("consumable/instanceOfKind");
    let product = instance.and_then(|instance| instance.first("kindOfProduct"));
    let mpid = product.and_then(|product| product.first("code"));
    let phpid =
        product.and_then(|product| product.find("asSpecializedKind/generalizedMaterialKind/code"));
    let approval = product.and_then(|product| product.find("asManufacturedProduct/subjectOf/approval"));
    let action = administration
        .all("inboundRelationship")
        .filter_map(|link| link.first("act"))
        .find_map(|act| act.first("code"));

    let mut drug = DrugInformation {
        g_k_2_1_1a_mpid_version: scope.attr("g_k_2_1_1a_mpid_version", mpid, "codeSystemVersion"),
        g_k_2_1_1b_mpid: scope.attr("g_k_2_1_1b_mpid", mpid, "code"),
        g_k_2_1_2a_phpid_version: scope.attr("g_k_2_1_2a_phpid_version", phpid, "codeSystemVersion"),
        g_k_2_1_2b_phpid: scope.attr("g_k_2_1_2b_phpid", phpid, "code"),
        g_k_2_2_medicinal_product_name_primary_source: scope.text(
            "g_k_2_2_medicinal_product_name_primary_source",
            product.and_then(|product| product.first("name")),
        ),
        g_k_2_4_identification_country_drug_obtained: scope.text(
            "g_k_2_4_identification_country_drug_obtained",
            instance.and_then(|instance| {
                instance.find(
                    "subjectOf/productEvent/performer/assignedEntity/representedOrganization/addr/country",
                )
            }),
        ),
        g_k_3_1_authorisation_application_number: scope.attr(
            "g_k_3_1_authorisation_application_number",
            approval.and_then(|approval| approval.first("id")),
            "extension",
        ),
        g_k_3_2_country_authorisation_application: scope.attr(
            "g_k_3_2_country_authorisation_application",
            approval.and_then(|approval| approval.find("author/territorialAuthority/territory/code")),
            "code",
        ),
        g_k_3_3_name_holder_applicant: scope.text(
            "g_k_3_3_name_holder_applicant",
            approval.and_then(|approval| approval.find("holder/role/playingOrganization/name")),
        ),
        g_k_8_action_taken_drug: scope.attr("g_k_8_action_taken_drug", action, "code"),
        ..Default::default()
    };

    for ingredient in product
        .into_iter()
        .flat_map(|product| product.all("ingredient"))
    {
        let location = scope
            .location()
            .item("g_k_2_3_r_substance_id_strength", drug.g_k_2_3_r_substance_id_strength.len());
        let mut scope = scope.nested(location);
        let substance = ingredient.first("ingredientSubstance");
        let term = substance.and_then(|substance| substance.first("code"));
        let strength = ingredient.find("quantity/numerator");
        drug.g_k_2_3_r_substance_id_strength.push(SubstanceStrength {
            g_k_2_3_r_1_substance_name: scope.text(
                "g_k_2_3_r_1_substance_name",
                substance.and_then(|substance| substance.first("name")),
            ),
            g_k_2_3_r_2a_substance_termid_version: scope.attr(
                "g_k_2_3_r_2a_substance_termid_version",
                term,
                "codeSystemVersion",
            ),
            g_k_2_3_r_2b_substance_termid: scope.attr("g_k_2_3_r_2b_substance_termid", term, "code"),
            g_k_2_3_r_3a_strength_num: scope.attr("g_k_2_3_r_3a_strength_num", strength, "value"),
            g_k_2_3_r_3b_strength_unit: scope.attr("g_k_2_3_r_3b_strength_unit", strength, "unit"),
            ..Default::default()
        });
    }

    read_details(&mut drug, scope, administration);

    for indication in administration
        .all("inboundRelationship")
        .filter_map(|link| link.first("observation"))
        .filter(|observation| {
            code_of::<ObservationCode>(observation) == Some(ObservationCode::Indication)
        })
    {
        let location = scope
            .location()
            .item("g_k_7_r_indication_use_case", drug.g_k_7_r_indication_use_case.len());
        let mut scope = scope.nested(location);
        let value = indication.first("value");
        drug.g_k_7_r_indication_use_case.push(IndicationForUse {
            g_k_7_r_1_indication_primary_source: scope.nullable_text(
                "g_k_7_r_1_indication_primary_source",
                value.and_then(|value| value.first("originalText")),
            ),
            g_k_7_r_2a_meddra_version_indication: scope.attr(
                "g_k_7_r_2a_meddra_version_indication",
                value,
                "codeSystemVersion",
            ),
            g_k_7_r_2b_indication_meddra_code: scope.attr(
                "g_k_7_r_2b_indication_meddra_code",
                value,
                "code",
            ),
            ..Default::default()
        });
    }
    drug
}

/// Drug level observations and dosages under `outboundRelationship2`.
fn read_details(drug: &mut DrugInformation, scope: &mut Scope<'_>, administration: &Element) {
    for link in administration.all("outboundRelationship2") {
        if let Some(dosage) = link.first("substanceAdministration") {
            let location = scope
                .location()
                .item("g_k_4_r_dosage_information", drug.g_k_4_r_dosage_information.len());
            let entry = dosage_information(&mut scope.nested(location), dosage);
            drug.g_k_4_r_dosage_information.push(entry);
            continue;
        }
        let Some(observation) = link.first("observation") else {
            continue;
        };
        let value = observation.first("value");
        match code_of::<ObservationCode>(observation) {
            Some(ObservationCode::CumulativeDose) => {
                drug.g_k_5a_cumulative_dose_first_reaction_num =
                    scope.attr("g_k_5a_cumulative_dose_first_reaction_num", value, "value");
                drug.g_k_5b_cumulative_dose_first_reaction_unit =
                    scope.attr("g_k_5b_cumulative_dose_first_reaction_unit", value, "unit");
            }
            Some(ObservationCode::GestationPeriod) => {
                drug.g_k_6a_gestation_period_exposure_num =
                    scope.attr("g_k_6a_gestation_period_exposure_num", value, "value");
                drug.g_k_6b_gestation_period_exposure_unit =
                    scope.attr("g_k_6b_gestation_period_exposure_unit", value, "unit");
            }
            Some(ObservationCode::Blinded) => {
                drug.g_k_2_5_investigational_product_blinded =
                    scope.attr("g_k_2_5_investigational_product_blinded", value, "value");
            }
            Some(ObservationCode::Comment) => {
                drug.g_k_11_additional_information_drug =
                    scope.text("g_k_11_additional_information_drug", value);
            }
            Some(ObservationCode::CodedDrugInformation) => {
                let location = scope.location().item(
                    "g_k_10_r_additional_information_drug",
                    drug.g_k_10_r_additional_information_drug.len(),
                );
                let mut scope = scope.nested(location);
                drug.g_k_10_r_additional_information_drug
                    .push(AdditionalDrugInformation {
                        g_k_10_r_additional_information_drug: scope.attr(
                            "g_k_10_r_additional_information_drug",
                            value,
                            "code",
                        ),
                        ..Default::default()
                    });
            }
            _ => {}
        }
    }
}

fn original(element: Option<&Element>) -> Option<&Element> {
    element.and_then(|element| element.first("originalText"))
}

fn dosage_information(scope: &mut Scope<'_>, administration: &Element) -> DosageInformation {
    let route = administration.first("routeCode");
    let dose = administration.first("doseQuantity");
    let instance = administration.find("consumable/instanceOfKind");
    let form = instance.and_then(|instance| instance.find("kindOfProduct/formCode"));
    let parent_route = administration
        .all("inboundRelationship")
        .filter_map(|link| link.first("observation"))
        .find(|observation| {
            code_of::<ObservationCode>(observation) == Some(ObservationCode::ParentRoute)
        })
        .and_then(|observation| observation.first("value"));

    let mut dosage = DosageInformation {
        g_k_4_r_1a_dose_num: scope.attr("g_k_4_r_1a_dose_num", dose, "value"),
        g_k_4_r_1b_dose_unit: scope.attr("g_k_4_r_1b_dose_unit", dose, "unit"),
        g_k_4_r_7_batch_lot_number: scope.text(
            "g_k_4_r_7_batch_lot_number",
            instance.and_then(|instance| instance.find("productInstanceInstance/lotNumberText")),
        ),
        g_k_4_r_8_dosage_text: scope.text("g_k_4_r_8_dosage_text", administration.first("text")),
        g_k_4_r_9_1_pharmaceutical_dose_form: scope
            .nullable_text("g_k_4_r_9_1_pharmaceutical_dose_form", original(form)),
        g_k_4_r_9_2a_pharmaceutical_dose_form_termid_version: scope.attr(
            "g_k_4_r_9_2a_pharmaceutical_dose_form_termid_version",
            form,
            "codeSystemVersion",
        ),
        g_k_4_r_9_2b_pharmaceutical_dose_form_termid: scope.attr(
            "g_k_4_r_9_2b_pharmaceutical_dose_form_termid",
            form,
            "code",
        ),
        g_k_4_r_10_1_route_administration: scope
            .nullable_text("g_k_4_r_10_1_route_administration", original(route)),
        g_k_4_r_10_2a_route_administration_termid_version: scope.attr(
            "g_k_4_r_10_2a_route_administration_termid_version",
            route,
            "codeSystemVersion",
        ),
        g_k_4_r_10_2b_route_administration_termid: scope.attr(
            "g_k_4_r_10_2b_route_administration_termid",
            route,
            "code",
        ),
        g_k_4_r_11_1_parent_route_administration: scope.nullable_text(
            "g_k_4_r_11_1_parent_route_administration",
            original(parent_route),
        ),
        g_k_4_r_11_2a_parent_route_administration_termid_version: scope.attr(
            "g_k_4_r_11_2a_parent_route_administration_termid_version",
            parent_route,
            "codeSystemVersion",
        ),
        g_k_4_r_11_2b_parent_route_administration_termid: scope.attr(
            "g_k_4_r_11_2b_parent_route_administration_termid",
            parent_route,
            "code",
        ),
        ..Default::default()
    };

    for comp in administration
        .first("effectiveTime")
        .into_iter()
        .flat_map(|timing| timing.all("comp"))
    {
        match comp.get("xsi:type") {
            Some("PIVL_TS") => {
                let period = comp.first("period");
                dosage.g_k_4_r_2_number_units_interval =
                    scope.attr("g_k_4_r_2_number_units_interval", period, "value");
                dosage.g_k_4_r_3_definition_interval_unit =
                    scope.attr("g_k_4_r_3_definition_interval_unit", period, "unit");
            }
            Some("IVL_TS") => {
                let width = comp.first("width");
                dosage.g_k_4_r_4_date_time_drug =
                    scope.nullable_attr("g_k_4_r_4_date_time_drug", comp.first("low"), "value");
                dosage.g_k_4_r_5_date_time_last_administration = scope.nullable_attr(
                    "g_k_4_r_5_date_time_last_administration",
                    comp.first("high"),
                    "value",
                );
                dosage.g_k_4_r_6a_duration_drug_administration_num =
                    scope.attr("g_k_4_r_6a_duration_drug_administration_num", width, "value");
                dosage.g_k_4_r_6b_duration_drug_administration_unit =
                    scope.attr("g_k_4_r_6b_duration_drug_administration_unit", width, "unit");
            }
            _ => {}
        }
    }
    dosage
}
