//! Fixture builders for rule tests.

use stria_model::Authentication;
use stria_model::Authorization;
use stria_model::CommunicationLink;
use stria_model::Confidentiality;
use stria_model::Criticality;
use stria_model::DataAsset;
use stria_model::EncryptionStyle;
use stria_model::ParsedModel;
use stria_model::Protocol;
use stria_model::Quantity;
use stria_model::TechnicalAsset;
use stria_model::TechnicalAssetMachine;
use stria_model::TechnicalAssetSize;
use stria_model::TechnicalAssetType;
use stria_model::Technology;
use stria_model::TrustBoundary;
use stria_model::TrustBoundaryType;
use stria_model::Usage;

pub(crate) fn empty_model() -> ParsedModel {
    ParsedModel {
        title: "rule test model".to_string(),
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
        encryption: EncryptionStyle::None,
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
    boundary_type: TrustBoundaryType,
    technical_assets_inside: &[&str],
) {
    let boundary = TrustBoundary {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        boundary_type,
        tags: Vec::new(),
        technical_assets_inside: technical_assets_inside
            .iter()
            .map(|asset_id| asset_id.to_string())
            .collect(),
        trust_boundaries_nested: Vec::new(),
    };
    model.trust_boundaries.insert(boundary.id.clone(), boundary);
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
