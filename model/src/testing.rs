//! Fixture builders shared by the unit tests of this crate.

use crate::Authentication;
use crate::Authorization;
use crate::CommunicationLink;
use crate::Confidentiality;
use crate::Criticality;
use crate::DataAsset;
use crate::ParsedModel;
use crate::Protocol;
use crate::Quantity;
use crate::Risk;
use crate::RiskExploitationImpact;
use crate::RiskExploitationLikelihood;
use crate::SharedRuntime;
use crate::TechnicalAsset;
use crate::TechnicalAssetMachine;
use crate::TechnicalAssetSize;
use crate::TechnicalAssetType;
use crate::Technology;
use crate::TrustBoundary;
use crate::TrustBoundaryType;
use crate::Usage;
use crate::calculate_severity;

pub(crate) fn empty_model() -> ParsedModel {
    ParsedModel {
        title: "test model".to_string(),
        ..ParsedModel::default()
    }
}

pub(crate) fn add_data_asset(
    model: &mut ParsedModel,
    id: &str,
    configure: impl FnOnce(&mut DataAsset),
) {
    let mut data_asset = DataAsset {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        usage: Usage::Business,
        tags: Vec::new(),
        origin: String::new(),
        owner: String::new(),
        quantity: Quantity::Few,
        confidentiality: Confidentiality::Internal,
        integrity: Criticality::Operational,
        availability: Criticality::Operational,
        justification_cia_rating: String::new(),
    };
    configure(&mut data_asset);
    model.data_assets.insert(data_asset.id.clone(), data_asset);
}

pub(crate) fn add_technical_asset(
    model: &mut ParsedModel,
    id: &str,
    configure: impl FnOnce(&mut TechnicalAsset),
) {
    let mut asset = TechnicalAsset {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        usage: Usage::Business,
        asset_type: TechnicalAssetType::Process,
        size: TechnicalAssetSize::Application,
        technology: Technology::UnknownTechnology,
        machine: TechnicalAssetMachine::Virtual,
        internet: false,
        multi_tenant: false,
        redundant: false,
        custom_developed_parts: false,
        out_of_scope: false,
        justification_out_of_scope: String::new(),
        used_as_client_by_human: false,
        encryption: crate::EncryptionStyle::None,
        owner: String::new(),
        confidentiality: Confidentiality::Internal,
        integrity: Criticality::Operational,
        availability: Criticality::Operational,
        justification_cia_rating: String::new(),
        tags: Vec::new(),
        data_assets_processed: Vec::new(),
        data_assets_stored: Vec::new(),
        data_formats_accepted: Vec::new(),
        communication_links: Vec::new(),
        diagram_tweak_order: 0,
        raa: 0.0,
    };
    configure(&mut asset);
    model.technical_assets.insert(asset.id.clone(), asset);
}

pub(crate) fn add_trust_boundary(
    model: &mut ParsedModel,
    id: &str,
    technical_assets_inside: &[&str],
    trust_boundaries_nested: &[&str],
) {
    let boundary = TrustBoundary {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        boundary_type: TrustBoundaryType::NetworkVlan,
        tags: Vec::new(),
        technical_assets_inside: technical_assets_inside
            .iter()
            .map(|asset_id| asset_id.to_string())
            .collect(),
        trust_boundaries_nested: trust_boundaries_nested
            .iter()
            .map(|boundary_id| boundary_id.to_string())
            .collect(),
    };
    model.trust_boundaries.insert(boundary.id.clone(), boundary);
}

pub(crate) fn add_shared_runtime(
    model: &mut ParsedModel,
    id: &str,
    technical_assets_running: &[&str],
) {
    let runtime = SharedRuntime {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        tags: Vec::new(),
        technical_assets_running: technical_assets_running
            .iter()
            .map(|asset_id| asset_id.to_string())
            .collect(),
    };
    model.shared_runtimes.insert(runtime.id.clone(), runtime);
}

pub(crate) fn add_communication_link(
    model: &mut ParsedModel,
    source_id: &str,
    target_id: &str,
    title: &str,
    configure: impl FnOnce(&mut CommunicationLink),
) {
    let mut link = CommunicationLink {
        id: CommunicationLink::synthesize_id(source_id, target_id, title),
        source_id: source_id.to_string(),
        target_id: target_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        protocol: Protocol::Https,
        tags: Vec::new(),
        vpn: false,
        ip_filtered: false,
        readonly: false,
        authentication: Authentication::None,
        authorization: Authorization::None,
        usage: Usage::Business,
        data_assets_sent: Vec::new(),
        data_assets_received: Vec::new(),
    };
    configure(&mut link);
    if let Some(source) = model.technical_assets.get_mut(source_id) {
        source.communication_links.push(link);
    }
}

pub(crate) fn risk(
    category_id: &str,
    anchor_id: &str,
    likelihood: RiskExploitationLikelihood,
    impact: RiskExploitationImpact,
) -> Risk {
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[anchor_id]),
        title: format!("<b>Test risk</b> at <b>{anchor_id}</b>"),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: crate::DataBreachProbability::Possible,
        data_breach_technical_asset_ids: vec![anchor_id.to_string()],
        most_relevant_data_asset_id: None,
        most_relevant_technical_asset_id: Some(anchor_id.to_string()),
        most_relevant_trust_boundary_id: None,
        most_relevant_shared_runtime_id: None,
        most_relevant_communication_link_id: None,
    }
}
