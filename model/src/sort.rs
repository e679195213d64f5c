use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::DataAsset;
use crate::DataBreachProbability;
use crate::ParsedModel;
use crate::Risk;
use crate::RiskCategory;
use crate::RisksByCategory;
use crate::TechnicalAsset;
use crate::filter::highest_severity;

/// Severity-first total order over risks: higher severity first, ties broken
/// by tracking status (unchecked before mitigated), then impact descending,
/// likelihood descending, title ascending.
pub fn sort_by_risk_severity(risks: &mut [Risk], model: &ParsedModel) {
    risks.sort_by(|left, right| {
        right
            .severity
            .cmp(&left.severity)
            .then_with(|| {
                model
                    .get_risk_tracking_status_defaulting_unchecked(left)
                    .cmp(&model.get_risk_tracking_status_defaulting_unchecked(right))
            })
            .then_with(|| right.exploitation_impact.cmp(&left.exploitation_impact))
            .then_with(|| {
                right
                    .exploitation_likelihood
                    .cmp(&left.exploitation_likelihood)
            })
            .then_with(|| left.title.cmp(&right.title))
    });
}

/// Higher data-breach probability first, ties by tracking status ascending,
/// then title.
pub fn sort_by_data_breach_probability(risks: &mut [Risk], model: &ParsedModel) {
    risks.sort_by(|left, right| {
        right
            .data_breach_probability
            .cmp(&left.data_breach_probability)
            .then_with(|| {
                model
                    .get_risk_tracking_status_defaulting_unchecked(left)
                    .cmp(&model.get_risk_tracking_status_defaulting_unchecked(right))
            })
            .then_with(|| left.title.cmp(&right.title))
    });
}

/// Categories ordered by the highest severity of their still-at-risk risks,
/// categories with still-at-risk content before fully-handled ones, then
/// title.
pub fn sorted_risk_categories_by_highest_severity_still_at_risk(
    model: &ParsedModel,
    categories: &BTreeMap<String, RiskCategory>,
    risks_by_category: &RisksByCategory,
) -> Vec<RiskCategory> {
    let mut sorted: Vec<RiskCategory> = risks_by_category
        .keys()
        .filter_map(|category_id| categories.get(category_id).cloned())
        .collect();
    sorted.sort_by(|left, right| {
        let left_risks = risks_by_category.get(&left.id).map(Vec::as_slice).unwrap_or_default();
        let right_risks = risks_by_category
            .get(&right.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let left_highest = highest_severity(model, left_risks, false);
        let right_highest = highest_severity(model, right_risks, false);
        right_highest
            .cmp(&left_highest)
            .then_with(|| left.title.cmp(&right.title))
    });
    sorted
}

fn risks_of_technical_asset(risks_by_category: &RisksByCategory, asset_id: &str) -> Vec<Risk> {
    risks_by_category
        .values()
        .flatten()
        .filter(|risk| risk.most_relevant_technical_asset_id.as_deref() == Some(asset_id))
        .cloned()
        .collect()
}

/// Technical assets by the severity of their still-at-risk generated risks:
/// higher first, assets without any generated risks last, out-of-scope
/// assets last among equals, then title.
pub fn sorted_technical_assets_by_risk_severity_and_title(
    model: &ParsedModel,
    risks_by_category: &RisksByCategory,
) -> Vec<TechnicalAsset> {
    let mut sorted: Vec<TechnicalAsset> = model.technical_assets.values().cloned().collect();
    sorted.sort_by(|left, right| {
        let left_risks = risks_of_technical_asset(risks_by_category, &left.id);
        let right_risks = risks_of_technical_asset(risks_by_category, &right.id);
        let left_highest = highest_severity(model, &left_risks, false);
        let right_highest = highest_severity(model, &right_risks, false);
        right_highest
            .cmp(&left_highest)
            .then_with(|| match (left_risks.is_empty(), right_risks.is_empty()) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => Ordering::Equal,
            })
            .then_with(|| left.out_of_scope.cmp(&right.out_of_scope))
            .then_with(|| left.title.cmp(&right.title))
    });
    sorted
}

/// Technical assets by RAA descending, then title.
pub fn sorted_technical_assets_by_raa_and_title(model: &ParsedModel) -> Vec<TechnicalAsset> {
    let mut sorted: Vec<TechnicalAsset> = model.technical_assets.values().cloned().collect();
    sorted.sort_by(|left, right| {
        right
            .raa
            .total_cmp(&left.raa)
            .then_with(|| left.title.cmp(&right.title))
    });
    sorted
}

fn identified_breach_probability_still_at_risk(
    model: &ParsedModel,
    risks_by_category: &RisksByCategory,
    data_asset: &DataAsset,
) -> Option<DataBreachProbability> {
    let mut touching: Vec<String> = data_asset.processed_by_sorted(model);
    touching.extend(data_asset.stored_by_sorted(model));
    risks_by_category
        .values()
        .flatten()
        .filter(|risk| {
            model
                .get_risk_tracking_status_defaulting_unchecked(risk)
                .is_still_at_risk()
        })
        .filter(|risk| {
            risk.data_breach_technical_asset_ids
                .iter()
                .any(|asset_id| touching.contains(asset_id))
        })
        .map(|risk| risk.data_breach_probability)
        .max()
}

/// Data assets by the highest data-breach probability of the still-at-risk
/// risks that could breach them; data assets without any such risk last,
/// then title.
pub fn sorted_data_assets_by_data_breach_probability_and_title(
    model: &ParsedModel,
    risks_by_category: &RisksByCategory,
) -> Vec<DataAsset> {
    let mut sorted: Vec<DataAsset> = model.data_assets.values().cloned().collect();
    sorted.sort_by(|left, right| {
        let left_probability =
            identified_breach_probability_still_at_risk(model, risks_by_category, left);
        let right_probability =
            identified_breach_probability_still_at_risk(model, risks_by_category, right);
        right_probability
            .cmp(&left_probability)
            .then_with(|| left.title.cmp(&right.title))
    });
    sorted
}

pub fn sorted_technical_assets_by_title(model: &ParsedModel) -> Vec<TechnicalAsset> {
    let mut sorted: Vec<TechnicalAsset> = model.technical_assets.values().cloned().collect();
    sorted.sort_by(|left, right| left.title.cmp(&right.title));
    sorted
}

pub fn sorted_data_assets_by_title(model: &ParsedModel) -> Vec<DataAsset> {
    let mut sorted: Vec<DataAsset> = model.data_assets.values().cloned().collect();
    sorted.sort_by(|left, right| left.title.cmp(&right.title));
    sorted
}

pub fn sorted_trust_boundaries_by_title(model: &ParsedModel) -> Vec<crate::TrustBoundary> {
    let mut sorted: Vec<crate::TrustBoundary> =
        model.trust_boundaries.values().cloned().collect();
    sorted.sort_by(|left, right| left.title.cmp(&right.title));
    sorted
}

pub fn sorted_shared_runtimes_by_title(model: &ParsedModel) -> Vec<crate::SharedRuntime> {
    let mut sorted: Vec<crate::SharedRuntime> =
        model.shared_runtimes.values().cloned().collect();
    sorted.sort_by(|left, right| left.title.cmp(&right.title));
    sorted
}

pub fn sorted_risk_categories_by_title(
    categories: &BTreeMap<String, RiskCategory>,
) -> Vec<RiskCategory> {
    let mut sorted: Vec<RiskCategory> = categories.values().cloned().collect();
    sorted.sort_by(|left, right| left.title.cmp(&right.title));
    sorted
}

pub fn sorted_keys_of_data_assets(model: &ParsedModel) -> Vec<String> {
    model.data_assets.keys().cloned().collect()
}

pub fn sorted_keys_of_technical_assets(model: &ParsedModel) -> Vec<String> {
    model.technical_assets.keys().cloned().collect()
}

pub fn sorted_keys_of_trust_boundaries(model: &ParsedModel) -> Vec<String> {
    model.trust_boundaries.keys().cloned().collect()
}

pub fn sorted_keys_of_shared_runtimes(model: &ParsedModel) -> Vec<String> {
    model.shared_runtimes.keys().cloned().collect()
}

pub fn sorted_keys_of_individual_risk_categories(model: &ParsedModel) -> Vec<String> {
    model.individual_risk_categories.keys().cloned().collect()
}
