use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use stria_model::Author;
use stria_model::CommunicationLink;
use stria_model::Confidentiality;
use stria_model::Criticality;
use stria_model::DataAsset;
use stria_model::DataBreachProbability;
use stria_model::DataFormat;
use stria_model::EncryptionStyle;
use stria_model::ParsedModel;
use stria_model::Protocol;
use stria_model::Quantity;
use stria_model::Risk;
use stria_model::RiskCategory;
use stria_model::RiskExploitationImpact;
use stria_model::RiskExploitationLikelihood;
use stria_model::RiskFunction;
use stria_model::RiskSeverity;
use stria_model::RiskStatus;
use stria_model::RiskTracking;
use stria_model::RisksByCategory;
use stria_model::SharedRuntime;
use stria_model::Stride;
use stria_model::TechnicalAsset;
use stria_model::TechnicalAssetMachine;
use stria_model::TechnicalAssetSize;
use stria_model::TechnicalAssetType;
use stria_model::Technology;
use stria_model::TrustBoundary;
use stria_model::TrustBoundaryType;
use stria_model::Usage;
use stria_model::calculate_severity;
use stria_model::parse_or_default;

use crate::error::Error;
use crate::error::Result;
use crate::input::IndividualRiskCategoryInput;
use crate::input::ModelInput;

#[allow(clippy::unwrap_used)]
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap());

/// Builds the typed model from the raw input document. Identifiers and tags
/// are normalised lowercase-trimmed, every enumeration value is parsed into
/// its variant, and all cross-references are resolved; any dangling
/// reference, duplicate id, or unknown enumeration value fails parsing.
///
/// Returns the model together with the manually identified risks of the
/// individual risk categories, which the engine seeds its by-category index
/// with.
pub fn parse_model(input: &ModelInput) -> Result<(ParsedModel, RisksByCategory)> {
    let mut model = ParsedModel {
        title: input.title.clone(),
        author: Author {
            name: input.author.name.clone(),
            homepage: input.author.homepage.clone(),
        },
        date: input.date.clone(),
        management_summary_comment: input.management_summary_comment.clone(),
        business_criticality: parse_business_criticality(&input.business_criticality)?,
        security_requirements: input.security_requirements.clone(),
        questions: input.questions.clone(),
        abuse_cases: input.abuse_cases.clone(),
        tags_available: normalize_tags(&input.tags_available),
        ..ParsedModel::default()
    };

    let data_asset_ids = collect_ids(input.data_assets.keys())?;
    let technical_asset_ids = collect_ids(input.technical_assets.keys())?;
    let trust_boundary_ids = collect_ids(input.trust_boundaries.keys())?;
    collect_ids(input.shared_runtimes.keys())?;
    collect_ids(input.individual_risk_categories.keys())?;

    for (key, data_input) in &input.data_assets {
        let id = normalize_id(key);
        let data_asset = DataAsset {
            id: id.clone(),
            title: title_or_id(&data_input.title, &id),
            description: data_input.description.clone(),
            usage: parse_field::<Usage>(&id, &data_input.usage)?,
            tags: normalize_tags(&data_input.tags),
            origin: data_input.origin.clone(),
            owner: data_input.owner.clone(),
            quantity: parse_strict_field::<Quantity>(&id, &data_input.quantity)?,
            confidentiality: parse_strict_field::<Confidentiality>(
                &id,
                &data_input.confidentiality,
            )?,
            integrity: parse_strict_field::<Criticality>(&id, &data_input.integrity)?,
            availability: parse_strict_field::<Criticality>(&id, &data_input.availability)?,
            justification_cia_rating: data_input.justification_cia_rating.clone(),
        };
        model.data_assets.insert(id, data_asset);
    }

    for (key, asset_input) in &input.technical_assets {
        let id = normalize_id(key);
        let mut communication_links = Vec::new();
        for (link_title, link_input) in &asset_input.communication_links {
            let target_id = normalize_id(&link_input.target);
            if !technical_asset_ids.contains(&target_id) {
                return Err(Error::DanglingReference {
                    kind: "technical asset",
                    referenced: target_id,
                    referencing: id.clone(),
                });
            }
            let link_id = CommunicationLink::synthesize_id(&id, &target_id, link_title);
            let link = CommunicationLink {
                id: link_id.clone(),
                source_id: id.clone(),
                target_id,
                title: link_title.clone(),
                description: link_input.description.clone(),
                protocol: parse_field::<Protocol>(&link_id, &link_input.protocol)?,
                tags: normalize_tags(&link_input.tags),
                vpn: link_input.vpn,
                ip_filtered: link_input.ip_filtered,
                readonly: link_input.readonly,
                authentication: parse_field(&link_id, &link_input.authentication)?,
                authorization: parse_field(&link_id, &link_input.authorization)?,
                usage: parse_field::<Usage>(&link_id, &link_input.usage)?,
                data_assets_sent: resolve_data_asset_refs(
                    &link_id,
                    &link_input.data_assets_sent,
                    &data_asset_ids,
                )?,
                data_assets_received: resolve_data_asset_refs(
                    &link_id,
                    &link_input.data_assets_received,
                    &data_asset_ids,
                )?,
            };
            communication_links.push(link);
        }
        communication_links.sort_by(|left, right| left.id.cmp(&right.id));

        let mut data_formats_accepted = Vec::new();
        for raw_format in &asset_input.data_formats_accepted {
            data_formats_accepted.push(parse_strict_field::<DataFormat>(&id, raw_format)?);
        }

        let asset = TechnicalAsset {
            id: id.clone(),
            title: title_or_id(&asset_input.title, &id),
            description: asset_input.description.clone(),
            usage: parse_field::<Usage>(&id, &asset_input.usage)?,
            asset_type: parse_strict_field::<TechnicalAssetType>(&id, &asset_input.asset_type)?,
            size: parse_strict_field::<TechnicalAssetSize>(&id, &asset_input.size)?,
            technology: parse_field::<Technology>(&id, &asset_input.technology)?,
            machine: parse_strict_field::<TechnicalAssetMachine>(&id, &asset_input.machine)?,
            internet: asset_input.internet,
            multi_tenant: asset_input.multi_tenant,
            redundant: asset_input.redundant,
            custom_developed_parts: asset_input.custom_developed_parts,
            out_of_scope: asset_input.out_of_scope,
            justification_out_of_scope: asset_input.justification_out_of_scope.clone(),
            used_as_client_by_human: asset_input.used_as_client_by_human,
            encryption: parse_field::<EncryptionStyle>(&id, &asset_input.encryption)?,
            owner: asset_input.owner.clone(),
            confidentiality: parse_strict_field::<Confidentiality>(
                &id,
                &asset_input.confidentiality,
            )?,
            integrity: parse_strict_field::<Criticality>(&id, &asset_input.integrity)?,
            availability: parse_strict_field::<Criticality>(&id, &asset_input.availability)?,
            justification_cia_rating: asset_input.justification_cia_rating.clone(),
            tags: normalize_tags(&asset_input.tags),
            data_assets_processed: resolve_data_asset_refs(
                &id,
                &asset_input.data_assets_processed,
                &data_asset_ids,
            )?,
            data_assets_stored: resolve_data_asset_refs(
                &id,
                &asset_input.data_assets_stored,
                &data_asset_ids,
            )?,
            data_formats_accepted,
            communication_links,
            diagram_tweak_order: asset_input.diagram_tweak_order,
            raa: 0.0,
        };
        model.technical_assets.insert(id, asset);
    }

    let mut containing_boundary_by_asset: BTreeMap<String, String> = BTreeMap::new();
    let mut parent_by_boundary: BTreeMap<String, String> = BTreeMap::new();
    for (key, boundary_input) in &input.trust_boundaries {
        let id = normalize_id(key);
        let mut technical_assets_inside = Vec::new();
        for raw_ref in &boundary_input.technical_assets_inside {
            let asset_id = normalize_id(raw_ref);
            if !technical_asset_ids.contains(&asset_id) {
                return Err(Error::DanglingReference {
                    kind: "technical asset",
                    referenced: asset_id,
                    referencing: id.clone(),
                });
            }
            if let Some(previous) = containing_boundary_by_asset.insert(asset_id.clone(), id.clone())
            {
                return Err(Error::Parse {
                    id: asset_id,
                    message: format!(
                        "technical asset is directly contained in both {previous} and {id}"
                    ),
                });
            }
            technical_assets_inside.push(asset_id);
        }
        let mut trust_boundaries_nested = Vec::new();
        for raw_ref in &boundary_input.trust_boundaries_nested {
            let nested_id = normalize_id(raw_ref);
            if !trust_boundary_ids.contains(&nested_id) {
                return Err(Error::DanglingReference {
                    kind: "trust boundary",
                    referenced: nested_id,
                    referencing: id.clone(),
                });
            }
            if let Some(previous) = parent_by_boundary.insert(nested_id.clone(), id.clone()) {
                return Err(Error::Parse {
                    id: nested_id,
                    message: format!("trust boundary is nested in both {previous} and {id}"),
                });
            }
            trust_boundaries_nested.push(nested_id);
        }
        let boundary = TrustBoundary {
            id: id.clone(),
            title: title_or_id(&boundary_input.title, &id),
            description: boundary_input.description.clone(),
            boundary_type: parse_strict_field::<TrustBoundaryType>(
                &id,
                &boundary_input.boundary_type,
            )?,
            tags: normalize_tags(&boundary_input.tags),
            technical_assets_inside,
            trust_boundaries_nested,
        };
        model.trust_boundaries.insert(id, boundary);
    }
    ensure_acyclic_nesting(&parent_by_boundary)?;

    for (key, runtime_input) in &input.shared_runtimes {
        let id = normalize_id(key);
        let mut technical_assets_running = Vec::new();
        for raw_ref in &runtime_input.technical_assets_running {
            let asset_id = normalize_id(raw_ref);
            if !technical_asset_ids.contains(&asset_id) {
                return Err(Error::DanglingReference {
                    kind: "technical asset",
                    referenced: asset_id,
                    referencing: id.clone(),
                });
            }
            technical_assets_running.push(asset_id);
        }
        let runtime = SharedRuntime {
            id: id.clone(),
            title: title_or_id(&runtime_input.title, &id),
            description: runtime_input.description.clone(),
            tags: normalize_tags(&runtime_input.tags),
            technical_assets_running,
        };
        model.shared_runtimes.insert(id, runtime);
    }

    // The communication-link index must exist before individual risks can
    // validate their most-relevant references.
    model.update_derived_indices();

    let mut individual_risks = RisksByCategory::new();
    for (key, category_input) in &input.individual_risk_categories {
        let id = normalize_id(key);
        let category = parse_individual_category(&id, category_input)?;
        let risks = parse_individual_risks(&model, &id, category_input)?;
        if !risks.is_empty() {
            individual_risks.insert(id.clone(), risks);
        }
        model.individual_risk_categories.insert(id, category);
    }

    for (key, tracking_input) in &input.risk_tracking {
        let synthetic_id = key.trim().to_lowercase();
        let tracking = RiskTracking {
            synthetic_risk_id: synthetic_id.clone(),
            status: parse_field::<RiskStatus>(&synthetic_id, &tracking_input.status)?,
            justification: tracking_input.justification.clone(),
            ticket: tracking_input.ticket.clone(),
            date: tracking_input.date.clone(),
            checked_by: tracking_input.checked_by.clone(),
        };
        model.risk_tracking.insert(synthetic_id, tracking);
    }

    Ok((model, individual_risks))
}

fn parse_business_criticality(raw: &str) -> Result<Criticality> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Criticality::Important);
    }
    trimmed.parse().map_err(|err| Error::Parse {
        id: "business_criticality".to_string(),
        message: format!("{err}"),
    })
}

fn normalize_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

fn title_or_id(title: &str, id: &str) -> String {
    if title.trim().is_empty() {
        id.to_string()
    } else {
        title.trim().to_string()
    }
}

fn collect_ids<'a>(keys: impl Iterator<Item = &'a String>) -> Result<BTreeSet<String>> {
    let mut ids = BTreeSet::new();
    for key in keys {
        if !ID_PATTERN.is_match(key.trim()) {
            return Err(Error::Parse {
                id: key.clone(),
                message: "identifier must match ^[A-Za-z0-9][A-Za-z0-9_-]*$".to_string(),
            });
        }
        let normalized = normalize_id(key);
        if !ids.insert(normalized.clone()) {
            return Err(Error::DuplicateId { id: normalized });
        }
    }
    Ok(ids)
}

fn parse_field<T>(id: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr<Err = stria_model::UnknownValueError> + Default,
{
    parse_or_default(raw).map_err(|err| Error::Parse {
        id: id.to_string(),
        message: format!("{err}"),
    })
}

fn parse_strict_field<T>(id: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr<Err = stria_model::UnknownValueError>,
{
    raw.parse().map_err(|err: stria_model::UnknownValueError| Error::Parse {
        id: id.to_string(),
        message: format!("{err}"),
    })
}

fn resolve_data_asset_refs(
    referencing: &str,
    raw_refs: &[String],
    data_asset_ids: &BTreeSet<String>,
) -> Result<Vec<String>> {
    let mut resolved = Vec::new();
    for raw_ref in raw_refs {
        let data_id = normalize_id(raw_ref);
        if !data_asset_ids.contains(&data_id) {
            return Err(Error::DanglingReference {
                kind: "data asset",
                referenced: data_id,
                referencing: referencing.to_string(),
            });
        }
        if !resolved.contains(&data_id) {
            resolved.push(data_id);
        }
    }
    Ok(resolved)
}

fn ensure_acyclic_nesting(parent_by_boundary: &BTreeMap<String, String>) -> Result<()> {
    for start in parent_by_boundary.keys() {
        let mut visited = BTreeSet::new();
        let mut current = start.clone();
        while let Some(parent) = parent_by_boundary.get(&current) {
            if !visited.insert(current.clone()) {
                return Err(Error::Parse {
                    id: start.clone(),
                    message: "trust boundary nesting forms a cycle".to_string(),
                });
            }
            current = parent.clone();
        }
    }
    Ok(())
}

fn parse_individual_category(
    id: &str,
    input: &IndividualRiskCategoryInput,
) -> Result<RiskCategory> {
    Ok(RiskCategory {
        id: id.to_string(),
        title: title_or_id(&input.title, id),
        description: input.description.clone(),
        impact: input.impact.clone(),
        asvs: input.asvs.clone(),
        cheat_sheet: input.cheat_sheet.clone(),
        action: input.action.clone(),
        mitigation: input.mitigation.clone(),
        check: input.check.clone(),
        detection_logic: input.detection_logic.clone(),
        risk_assessment: input.risk_assessment.clone(),
        false_positives: input.false_positives.clone(),
        function: parse_field::<RiskFunction>(id, &input.function)?,
        stride: parse_field::<Stride>(id, &input.stride)?,
        model_failure_possible_reason: input.model_failure_possible_reason,
        cwe: input.cwe,
    })
}

fn parse_individual_risks(
    model: &ParsedModel,
    category_id: &str,
    input: &IndividualRiskCategoryInput,
) -> Result<Vec<Risk>> {
    let mut risks = Vec::new();
    for (title, risk_input) in &input.risks_identified {
        let slug = title.trim().to_lowercase().replace(' ', "-");
        let synthetic_id = Risk::synthesize_id(category_id, &[&slug]);
        let likelihood = parse_field::<RiskExploitationLikelihood>(
            &synthetic_id,
            &risk_input.exploitation_likelihood,
        )?;
        let impact =
            parse_field::<RiskExploitationImpact>(&synthetic_id, &risk_input.exploitation_impact)?;
        let severity = if risk_input.severity.trim().is_empty() {
            calculate_severity(likelihood, impact)
        } else {
            parse_strict_field::<RiskSeverity>(&synthetic_id, &risk_input.severity)?
        };
        let mut data_breach_technical_asset_ids = Vec::new();
        for raw_ref in &risk_input.data_breach_technical_assets {
            let asset_id = normalize_id(raw_ref);
            if !model.technical_assets.contains_key(&asset_id) {
                return Err(Error::DanglingReference {
                    kind: "technical asset",
                    referenced: asset_id,
                    referencing: synthetic_id.clone(),
                });
            }
            data_breach_technical_asset_ids.push(asset_id);
        }
        risks.push(Risk {
            category_id: category_id.to_string(),
            synthetic_id: synthetic_id.clone(),
            title: title.trim().to_string(),
            severity,
            exploitation_likelihood: likelihood,
            exploitation_impact: impact,
            data_breach_probability: parse_field::<DataBreachProbability>(
                &synthetic_id,
                &risk_input.data_breach_probability,
            )?,
            data_breach_technical_asset_ids,
            most_relevant_data_asset_id: optional_ref(
                model.data_assets.keys(),
                &risk_input.most_relevant_data_asset,
                "data asset",
                &synthetic_id,
            )?,
            most_relevant_technical_asset_id: optional_ref(
                model.technical_assets.keys(),
                &risk_input.most_relevant_technical_asset,
                "technical asset",
                &synthetic_id,
            )?,
            most_relevant_trust_boundary_id: optional_ref(
                model.trust_boundaries.keys(),
                &risk_input.most_relevant_trust_boundary,
                "trust boundary",
                &synthetic_id,
            )?,
            most_relevant_shared_runtime_id: optional_ref(
                model.shared_runtimes.keys(),
                &risk_input.most_relevant_shared_runtime,
                "shared runtime",
                &synthetic_id,
            )?,
            most_relevant_communication_link_id: optional_ref(
                model.communication_links.keys(),
                &risk_input.most_relevant_communication_link,
                "communication link",
                &synthetic_id,
            )?,
        });
    }
    Ok(risks)
}

fn optional_ref<'a>(
    mut known: impl Iterator<Item = &'a String>,
    raw: &str,
    kind: &'static str,
    referencing: &str,
) -> Result<Option<String>> {
    let normalized = normalize_id(raw);
    if normalized.is_empty() {
        return Ok(None);
    }
    if known.any(|candidate| candidate == &normalized) {
        Ok(Some(normalized))
    } else {
        Err(Error::DanglingReference {
            kind,
            referenced: normalized,
            referencing: referencing.to_string(),
        })
    }
}
