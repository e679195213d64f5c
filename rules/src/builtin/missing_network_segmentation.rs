use stria_model::Confidentiality;
use stria_model::Criticality;
use stria_model::DataBreachProbability;
use stria_model::ParsedModel;
use stria_model::Risk;
use stria_model::RiskCategory;
use stria_model::RiskExploitationImpact;
use stria_model::RiskExploitationLikelihood;
use stria_model::RiskFunction;
use stria_model::Stride;
use stria_model::TechnicalAsset;
use stria_model::calculate_severity;

use crate::RiskRule;

const RAA_LIMIT: f64 = 50.0;

pub struct MissingNetworkSegmentationRule;

impl RiskRule for MissingNetworkSegmentationRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "missing-network-segmentation".to_string(),
            title: "Missing Network Segmentation".to_string(),
            description: "Sensitive or attractive targets should run in their own network \
                          segment separated from less protected neighbours."
                .to_string(),
            impact: "Attackers who compromised a neighbouring system can laterally move to the \
                     target without crossing any network boundary."
                .to_string(),
            asvs: "V1 - Architecture, Design and Threat Modeling Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Attack_Surface_Analysis_Cheat_Sheet.html".to_string(),
            action: "Network Segmentation".to_string(),
            mitigation: "Move the asset into its own network segment (VLAN, security group, or \
                         comparable) with restricted traffic."
                .to_string(),
            check: "Are sensitive assets separated in restricted network segments?".to_string(),
            detection_logic: "In-scope attractive or sensitive assets not contained in any \
                              network trust boundary."
                .to_string(),
            risk_assessment: "The risk rating depends on the sensitivity of the asset."
                .to_string(),
            false_positives: "Models that simply do not describe the network topology can \
                              produce this finding spuriously; mark it a false positive once \
                              the boundary is modeled."
                .to_string(),
            function: RiskFunction::Operations,
            stride: Stride::ElevationOfPrivilege,
            model_failure_possible_reason: true,
            cwe: 1008,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope
                || asset.technology.is_close_to_high_value_targets_tolerated()
            {
                continue;
            }
            let attractive = asset.raa >= RAA_LIMIT
                || asset.highest_confidentiality(model) >= Confidentiality::Confidential
                || asset.is_data_store();
            let segmented = model.network_trust_boundary_of(&asset.id).is_some();
            if attractive && !segmented {
                risks.push(create_risk(model, asset, &self.category().id));
            }
        }
        risks
    }
}

fn create_risk(model: &ParsedModel, asset: &TechnicalAsset, category_id: &str) -> Risk {
    let impact = if asset.highest_confidentiality(model) >= Confidentiality::Confidential
        || asset.highest_integrity(model) >= Criticality::Critical
    {
        RiskExploitationImpact::Medium
    } else {
        RiskExploitationImpact::Low
    };
    let likelihood = RiskExploitationLikelihood::Unlikely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id]),
        title: format!(
            "<b>Missing Network Segmentation</b> to further encapsulate <b>{}</b>",
            asset.title
        ),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Improbable,
        data_breach_technical_asset_ids: vec![asset.id.clone()],
        most_relevant_data_asset_id: None,
        most_relevant_technical_asset_id: Some(asset.id.clone()),
        most_relevant_trust_boundary_id: None,
        most_relevant_shared_runtime_id: None,
        most_relevant_communication_link_id: None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stria_model::TrustBoundaryType;

    use super::*;
    use crate::test_model;

    #[test]
    fn unsegmented_attractive_assets_are_flagged() {
        let mut model = test_model::empty_model();
        test_model::add_technical_asset(&mut model, "exposed", |asset| {
            asset.raa = 75.0;
        });
        test_model::add_technical_asset(&mut model, "tucked-away", |asset| {
            asset.raa = 75.0;
        });
        test_model::add_trust_boundary(
            &mut model,
            "backend",
            TrustBoundaryType::NetworkVlan,
            &["tucked-away"],
        );
        model.update_derived_indices();

        let risks = MissingNetworkSegmentationRule.generate_risks(&model);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].synthetic_id, "missing-network-segmentation@exposed");
    }

    #[test]
    fn execution_environment_containment_does_not_count_as_segmentation() {
        let mut model = test_model::empty_model();
        test_model::add_technical_asset(&mut model, "exposed", |asset| {
            asset.raa = 75.0;
        });
        test_model::add_trust_boundary(
            &mut model,
            "runtime-env",
            TrustBoundaryType::ExecutionEnvironment,
            &["exposed"],
        );
        model.update_derived_indices();

        assert_eq!(MissingNetworkSegmentationRule.generate_risks(&model).len(), 1);
    }
}
