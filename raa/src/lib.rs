//! Relative Attacker Attractiveness (RAA) calculation, shipped as the
//! default RAA plugin binary.
//!
//! Every in-scope technical asset receives an absolute attractiveness score
//! from the attacker-attractiveness projections of its own CIA rating and of
//! the data it processes or stores, raised by the most attractive neighbour
//! reachable within the same trust boundary (pivoting). The absolute scores
//! are then normalised against the maximum, so the most attractive asset
//! lands at 100 and out-of-scope assets stay at 0.

use std::collections::BTreeMap;

use stria_model::ParsedModel;

/// Computes and writes the RAA value of every technical asset. Returns the
/// human-readable introduction text for reporting.
pub fn calculate_raa(model: &mut ParsedModel) -> String {
    let mut absolute: BTreeMap<String, f64> = BTreeMap::new();
    for asset_id in model.technical_assets.keys() {
        let attractiveness = attacker_attractiveness(model, asset_id)
            + pivoting_neighbour_adjustment(model, asset_id);
        absolute.insert(asset_id.clone(), attractiveness);
    }

    let maximum = absolute.values().fold(0.0_f64, |max, value| max.max(*value));
    let in_scope = model
        .technical_assets
        .values()
        .filter(|asset| !asset.out_of_scope)
        .count();
    for (asset_id, attractiveness) in &absolute {
        if let Some(asset) = model.technical_assets.get_mut(asset_id) {
            asset.raa = if maximum > 0.0 {
                attractiveness / maximum * 100.0
            } else {
                0.0
            };
        }
    }

    format!(
        "For each of the {in_scope} in-scope technical assets the relative attacker \
         attractiveness was calculated from the sensitivity of the asset and of the data it \
         processes or stores, including a pivoting bonus for attractive neighbours within the \
         same trust boundary. The most attractive asset receives the value 100."
    )
}

/// Absolute attractiveness from the asset's own CIA rating plus every data
/// asset it processes or stores. Out-of-scope assets are not attack targets
/// and score zero.
fn attacker_attractiveness(model: &ParsedModel, asset_id: &str) -> f64 {
    let Some(asset) = model.technical_assets.get(asset_id) else {
        return 0.0;
    };
    if asset.out_of_scope {
        return 0.0;
    }
    let mut score = asset.confidentiality.attacker_attractiveness_for_asset()
        + asset.integrity.attacker_attractiveness_for_asset()
        + asset.availability.attacker_attractiveness_for_asset();
    for data_id in asset
        .data_assets_processed
        .iter()
        .chain(&asset.data_assets_stored)
    {
        if let Some(data_asset) = model.data_assets.get(data_id) {
            score += data_asset
                .confidentiality
                .attacker_attractiveness_for_processed_or_stored_data();
            score += data_asset
                .integrity
                .attacker_attractiveness_for_processed_or_stored_data();
            score += data_asset
                .availability
                .attacker_attractiveness_for_processed_or_stored_data();
        }
    }
    score
}

/// Half of the most attractive asset reachable via an outgoing communication
/// link within the same trust boundary: compromising this asset is a
/// stepping stone towards that neighbour.
fn pivoting_neighbour_adjustment(model: &ParsedModel, asset_id: &str) -> f64 {
    let Some(asset) = model.technical_assets.get(asset_id) else {
        return 0.0;
    };
    if asset.out_of_scope {
        return 0.0;
    }
    let mut adjustment = 0.0_f64;
    for link in &asset.communication_links {
        if model.is_same_trust_boundary(asset_id, &link.target_id) {
            adjustment = adjustment.max(attacker_attractiveness(model, &link.target_id) / 2.0);
        }
    }
    adjustment
}
