//! Section G: drugs, addressed by `d-id{k}`, and their causality assessments.

use icsr_model::{DosageInformation, DrugInformation, DrugReactionMatrix, Icsr, Nullable, Scalar};
use tracing::debug;

use crate::codes::{ObservationCode, OrganizerCode};
use crate::common::{
    bl_value, ce_value, code_element, coded, country_code, drug_id, ed_value, id_element,
    interval, meddra_value, non_empty, nullable_text_element, observation, oid, pq_value,
    text_element, versioned_code,
};
use crate::error::{MappingError, Result};
use crate::tree::Element;

use super::{WireIds, component, organizer, relationship};

fn quantity_element<T: Scalar>(
    name: &str,
    value: &Option<T>,
    unit: &Option<String>,
) -> Option<Element> {
    (value.is_some() || unit.is_some())
        .then(|| Element::new(name).value("value", value).value("unit", unit))
}

fn reference(name: &str, class_code: &str, id: String) -> Element {
    Element::new(name)
        .attr("classCode", class_code)
        .attr("moodCode", "EVN")
        .child(id_element(oid::LOCAL_ID, id))
}

fn product(drug: &DrugInformation) -> Element {
    let approval = non_empty(
        Element::new("approval")
            .attr("classCode", "CNTRCT")
            .attr("moodCode", "EVN")
            .maybe_child(drug.g_k_3_1_authorisation_application_number.as_ref().map(
                |number| id_element(oid::AUTHORISATION, number.as_str()),
            ))
            .maybe_child(
                text_element("name", &drug.g_k_3_3_name_holder_applicant).map(|name| {
                    Element::new("holder").attr("typeCode", "HLD").child(
                        Element::new("role").attr("classCode", "HLD").child(
                            Element::new("playingOrganization")
                                .attr("classCode", "ORG")
                                .attr("determinerCode", "INSTANCE")
                                .child(name),
                        ),
                    )
                }),
            )
            .maybe_child(
                country_code(&drug.g_k_3_2_country_authorisation_application).map(|code| {
                    Element::new("author").attr("typeCode", "AUT").child(
                        Element::new("territorialAuthority")
                            .attr("classCode", "TERR")
                            .child(
                                Element::new("territory")
                                    .attr("classCode", "NAT")
                                    .attr("determinerCode", "INSTANCE")
                                    .child(code),
                            ),
                    )
                }),
            ),
    )
    .map(|approval| {
        Element::new("asManufacturedProduct")
            .attr("classCode", "MANU")
            .child(relationship("subjectOf", "SBJ", approval))
    });
    let generic = versioned_code("code", &drug.g_k_2_1_2a_phpid_version, &drug.g_k_2_1_2b_phpid)
        .map(|code| {
            Element::new("asSpecializedKind")
                .attr("classCode", "GRIC")
                .child(
                    Element::new("generalizedMaterialKind")
                        .attr("classCode", "MAT")
                        .attr("determinerCode", "KIND")
                        .child(code),
                )
        });
    let ingredients = drug.g_k_2_3_r_substance_id_strength.iter().map(|substance| {
        let strength = quantity_element(
            "numerator",
            &substance.g_k_2_3_r_3a_strength_num,
            &substance.g_k_2_3_r_3b_strength_unit,
        )
        .map(|numerator| {
            Element::new("quantity")
                .child(numerator)
                .child(Element::new("denominator").attr("value", "1"))
        });
        Element::new("ingredient")
            .attr("classCode", "ACTI")
            .maybe_child(strength)
            .child(
                Element::new("ingredientSubstance")
                    .attr("classCode", "MMAT")
                    .attr("determinerCode", "KIND")
                    .maybe_child(versioned_code(
                        "code",
                        &substance.g_k_2_3_r_2a_substance_termid_version,
                        &substance.g_k_2_3_r_2b_substance_termid,
                    ))
                    .maybe_child(text_element("name", &substance.g_k_2_3_r_1_substance_name)),
            )
    });

    Element::new("kindOfProduct")
        .attr("classCode", "MMAT")
        .attr("determinerCode", "KIND")
        .maybe_child(versioned_code(
            "code",
            &drug.g_k_2_1_1a_mpid_version,
            &drug.g_k_2_1_1b_mpid,
        ))
        .maybe_child(text_element(
            "name",
            &drug.g_k_2_2_medicinal_product_name_primary_source,
        ))
        .maybe_child(approval)
        .maybe_child(generic)
        .with_children(ingredients)
}

/// Country the drug was obtained in.
fn obtained_in(drug: &DrugInformation) -> Option<Element> {
    let country = drug.g_k_2_4_identification_country_drug_obtained.as_ref()?;
    let organization = Element::new("representedOrganization")
        .attr("classCode", "ORG")
        .attr("determinerCode", "INSTANCE")
        .child(Element::new("addr").child(Element::new("country").with_text(country.as_str())));
    Some(relationship(
        "subjectOf",
        "SBJ",
        Element::new("productEvent")
            .attr("classCode", "ACT")
            .attr("moodCode", "EVN")
            .child(
                Element::new("code")
                    .attr("code", "1")
                    .attr("codeSystem", oid::CS_PRODUCT_EVENT),
            )
            .child(relationship(
                "performer",
                "PRF",
                Element::new("assignedEntity")
                    .attr("classCode", "ASSIGNED")
                    .child(organization),
            )),
    ))
}

fn interval_to(type_code: &str, pause: Option<Element>, reaction: &str) -> Element {
    Element::new("outboundRelationship1")
        .attr("typeCode", type_code)
        .maybe_child(pause)
        .child(reference("actReference", "OBS", reaction.to_string()))
}

/// Start (always written, it carries the link) and last-dose intervals of a
/// matrix row.
fn intervals(row: &DrugReactionMatrix, reaction: &str) -> Vec<Element> {
    let start = quantity_element(
        "pauseQuantity",
        &row.g_k_9_i_3_1a_interval_drug_administration_reaction_num,
        &row.g_k_9_i_3_1b_interval_drug_administration_reaction_unit,
    );
    let last = quantity_element(
        "pauseQuantity",
        &row.g_k_9_i_3_2a_interval_last_dose_drug_reaction_num,
        &row.g_k_9_i_3_2b_interval_last_dose_drug_reaction_unit,
    );
    let mut relationships = vec![interval_to("SAS", start, reaction)];
    if last.is_some() {
        relationships.push(interval_to("SAE", last, reaction));
    }
    relationships
}

fn dosage(dosage: &DosageInformation) -> Element {
    let period = quantity_element(
        "period",
        &dosage.g_k_4_r_2_number_units_interval,
        &dosage.g_k_4_r_3_definition_interval_unit,
    )
    .map(|period| Element::new("comp").xsi_type("PIVL_TS").child(period));
    let duration = interval(
        "comp",
        &dosage.g_k_4_r_4_date_time_drug,
        &dosage.g_k_4_r_5_date_time_last_administration,
    )
    .unwrap_or_else(|| Element::new("comp").xsi_type("IVL_TS"))
    .maybe_child(quantity_element(
        "width",
        &dosage.g_k_4_r_6a_duration_drug_administration_num,
        &dosage.g_k_4_r_6b_duration_drug_administration_unit,
    ))
    .attr("operator", "A");
    let timing = non_empty(
        Element::new("effectiveTime")
            .xsi_type("SXPR_TS")
            .maybe_child(period)
            .maybe_child(non_empty(duration)),
    );

    let route = routed(
        "routeCode",
        &dosage.g_k_4_r_10_1_route_administration,
        &dosage.g_k_4_r_10_2a_route_administration_termid_version,
        &dosage.g_k_4_r_10_2b_route_administration_termid,
    );
    let form = routed(
        "formCode",
        &dosage.g_k_4_r_9_1_pharmaceutical_dose_form,
        &dosage.g_k_4_r_9_2a_pharmaceutical_dose_form_termid_version,
        &dosage.g_k_4_r_9_2b_pharmaceutical_dose_form_termid,
    );
    let batch = text_element("lotNumberText", &dosage.g_k_4_r_7_batch_lot_number).map(|lot| {
        Element::new("productInstanceInstance")
            .attr("classCode", "MMAT")
            .attr("determinerCode", "INSTANCE")
            .child(lot)
    });
    let instance = non_empty(
        Element::new("instanceOfKind")
            .attr("classCode", "INST")
            .maybe_child(batch)
            .maybe_child(form.map(|form| {
                Element::new("kindOfProduct")
                    .attr("classCode", "MMAT")
                    .attr("determinerCode", "KIND")
                    .child(form)
            })),
    );
    let parent_route = routed(
        "value",
        &dosage.g_k_4_r_11_1_parent_route_administration,
        &dosage.g_k_4_r_11_2a_parent_route_administration_termid_version,
        &dosage.g_k_4_r_11_2b_parent_route_administration_termid,
    )
    .map(|value| {
        relationship(
            "inboundRelationship",
            "REFR",
            observation(ObservationCode::ParentRoute, Some(value.xsi_type("CE"))),
        )
    });

    Element::new("substanceAdministration")
        .attr("classCode", "SBADM")
        .attr("moodCode", "EVN")
        .maybe_child(text_element("text", &dosage.g_k_4_r_8_dosage_text))
        .maybe_child(timing)
        .maybe_child(route)
        .maybe_child(quantity_element(
            "doseQuantity",
            &dosage.g_k_4_r_1a_dose_num,
            &dosage.g_k_4_r_1b_dose_unit,
        ))
        .maybe_child(instance.map(|instance| {
            Element::new("consumable").attr("typeCode", "CSM").child(instance)
        }))
        .maybe_child(parent_route)
}

/// A term id code with the free text as `originalText`.
fn routed(
    name: &str,
    text: &Option<Nullable<String>>,
    version: &Option<String>,
    code: &Option<String>,
) -> Option<Element> {
    let original = nullable_text_element("originalText", text);
    match versioned_code(name, version, code) {
        Some(element) => Some(element.maybe_child(original)),
        None => original.map(|original| Element::new(name).child(original)),
    }
}

fn drug_administration(k: usize, drug: &DrugInformation, ids: &WireIds<'_>) -> Result<Element> {
    let mut administration = Element::new("substanceAdministration")
        .attr("classCode", "SBADM")
        .attr("moodCode", "EVN")
        .child(id_element(oid::LOCAL_ID, drug_id(k)))
        .child(
            Element::new("consumable").attr("typeCode", "CSM").child(
                Element::new("instanceOfKind")
                    .attr("classCode", "INST")
                    .child(product(drug))
                    .maybe_child(obtained_in(drug)),
            ),
        );

    let mut recurrences = Vec::new();
    for (i, row) in drug.g_k_9_i_drug_reaction_matrix.iter().enumerate() {
        let reaction = ids
            .reaction(row.g_k_9_i_1_reaction_assessed.as_ref())
            .ok_or(MappingError::UnresolvedReaction { drug: k, row: i })?;
        administration.extend(intervals(row, &reaction));
        if let Some(value) = ce_value(&row.g_k_9_i_4_reaction_recur_readministration) {
            recurrences.push(
                observation(ObservationCode::Recurrence, Some(value)).child(relationship(
                    "outboundRelationship1",
                    "REFR",
                    reference("actReference", "OBS", reaction),
                )),
            );
        }
    }

    let mut details = vec![
        (
            ObservationCode::CumulativeDose,
            pq_value(
                &drug.g_k_5a_cumulative_dose_first_reaction_num,
                &drug.g_k_5b_cumulative_dose_first_reaction_unit,
            ),
        ),
        (
            ObservationCode::GestationPeriod,
            pq_value(
                &drug.g_k_6a_gestation_period_exposure_num,
                &drug.g_k_6b_gestation_period_exposure_unit,
            ),
        ),
        (
            ObservationCode::Blinded,
            bl_value(&drug.g_k_2_5_investigational_product_blinded),
        ),
        (
            ObservationCode::Comment,
            ed_value(&drug.g_k_11_additional_information_drug),
        ),
    ];
    details.extend(
        drug.g_k_10_r_additional_information_drug
            .iter()
            .map(|info| {
                (
                    ObservationCode::CodedDrugInformation,
                    ce_value(&info.g_k_10_r_additional_information_drug),
                )
            }),
    );
    administration.extend(details.into_iter().filter_map(|(code, value)| {
        value.map(|value| {
            relationship(
                "outboundRelationship2",
                "PERT",
                observation(code, Some(value)),
            )
        })
    }));
    administration.extend(
        recurrences
            .into_iter()
            .map(|recurrence| relationship("outboundRelationship2", "PERT", recurrence)),
    );
    administration.extend(
        drug.g_k_4_r_dosage_information
            .iter()
            .map(|entry| relationship("outboundRelationship2", "COMP", dosage(entry))),
    );

    administration.extend(drug.g_k_7_r_indication_use_case.iter().map(|indication| {
        relationship(
            "inboundRelationship",
            "RSON",
            observation(
                ObservationCode::Indication,
                Some(meddra_value(
                    &indication.g_k_7_r_2a_meddra_version_indication,
                    &indication.g_k_7_r_2b_indication_meddra_code,
                    nullable_text_element(
                        "originalText",
                        &indication.g_k_7_r_1_indication_primary_source,
                    ),
                )),
            ),
        )
    }));
    administration.extend(coded("code", &drug.g_k_8_action_taken_drug).map(|code| {
        relationship(
            "inboundRelationship",
            "CAUS",
            Element::new("act")
                .attr("classCode", "ACT")
                .attr("moodCode", "EVN")
                .child(code),
        )
    }));
    Ok(administration)
}

/// The drug information organizer.
///
/// Fails when a matrix row names a reaction the report does not contain.
pub(super) fn drugs(icsr: &Icsr, ids: &WireIds<'_>) -> Result<Option<Element>> {
    let administrations = icsr
        .g_k_drug_information
        .iter()
        .enumerate()
        .map(|(k, drug)| drug_administration(k, drug, ids))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = administrations.len(), "drugs mapped");
    Ok(organizer(OrganizerCode::DrugInformation, administrations))
}

fn assessment(code: ObservationCode) -> Element {
    Element::new("causalityAssessment")
        .attr("classCode", "OBS")
        .attr("moodCode", "EVN")
        .child(code_element(code))
}

fn product_use(k: usize) -> Element {
    relationship(
        "subject2",
        "SUBJ",
        reference("productUseReference", "SBADM", drug_id(k)),
    )
}

/// Drug roles (G.k.1) and relatedness assessments (G.k.9.i.2.r).
pub(super) fn causality(icsr: &Icsr, ids: &WireIds<'_>) -> Result<Vec<Element>> {
    let mut components = Vec::new();
    for (k, drug) in icsr.g_k_drug_information.iter().enumerate() {
        if let Some(value) = ce_value(&drug.g_k_1_characterisation_drug_role) {
            components.push(component(
                assessment(ObservationCode::DrugRole)
                    .child(value)
                    .child(product_use(k)),
            ));
        }
    }

    for (k, drug) in icsr.g_k_drug_information.iter().enumerate() {
        for (i, row) in drug.g_k_9_i_drug_reaction_matrix.iter().enumerate() {
            let reaction = ids
                .reaction(row.g_k_9_i_1_reaction_assessed.as_ref())
                .ok_or(MappingError::UnresolvedReaction { drug: k, row: i })?;
            for relatedness in &row.g_k_9_i_2_r_assessment_relatedness_drug_reaction {
                let result = text_element("value", &relatedness.g_k_9_i_2_r_3_result_assessment)
                    .map(|value| value.xsi_type("ST"));
                let method = text_element(
                    "originalText",
                    &relatedness.g_k_9_i_2_r_2_method_assessment,
                )
                .map(|text| Element::new("methodCode").child(text));
                let source = text_element(
                    "originalText",
                    &relatedness.g_k_9_i_2_r_1_source_assessment,
                )
                .map(|text| {
                    relationship(
                        "author",
                        "AUT",
                        Element::new("assignedEntity")
                            .attr("classCode", "ASSIGNED")
                            .child(Element::new("code").child(text)),
                    )
                });
                components.push(component(
                    assessment(ObservationCode::Relatedness)
                        .maybe_child(result)
                        .maybe_child(method)
                        .maybe_child(source)
                        .child(relationship(
                            "subject1",
                            "SUBJ",
                            reference("adverseEffectReference", "OBS", reaction.clone()),
                        ))
                        .child(product_use(k)),
                ));
            }
        }
    }
    Ok(components)
}
