use stria_model::CommunicationLink;
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

pub struct UnguardedDirectDatastoreAccessRule;

impl RiskRule for UnguardedDirectDatastoreAccessRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "unguarded-direct-datastore-access".to_string(),
            title: "Unguarded Direct Datastore Access".to_string(),
            description: "Data stores accessed directly across a network trust boundary \
                          without a guarding service in front increase the attack surface."
                .to_string(),
            impact: "Attackers in the caller's network segment can talk to the data store \
                     directly, bypassing the application layer and its access control."
                .to_string(),
            asvs: "V1 - Architecture, Design and Threat Modeling Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Attack_Surface_Analysis_Cheat_Sheet.html".to_string(),
            action: "Encapsulation of Datastore".to_string(),
            mitigation: "Put a guarding service layer in front of the data store or move the \
                         caller into the same protected segment."
                .to_string(),
            check: "Is every boundary-crossing datastore access mediated by a service layer?"
                .to_string(),
            detection_logic: "In-scope data stores with incoming communication links crossing \
                              a network trust boundary from non-traffic-forwarding in-scope \
                              callers."
                .to_string(),
            risk_assessment: "The risk rating depends on the sensitivity of the stored data."
                .to_string(),
            false_positives: "Dedicated file exchange stores meant to be reached from other \
                              segments can be considered false positives after individual \
                              review."
                .to_string(),
            function: RiskFunction::Architecture,
            stride: Stride::ElevationOfPrivilege,
            model_failure_possible_reason: false,
            cwe: 501,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope || !asset.is_data_store() {
                continue;
            }
            for link in model.incoming_communication_links(&asset.id) {
                let Some(caller) = model.technical_assets.get(&link.source_id) else {
                    continue;
                };
                if caller.out_of_scope || caller.is_traffic_forwarding() {
                    continue;
                }
                if link.is_across_trust_boundary_network_only(model) {
                    risks.push(create_risk(model, asset, link, &self.category().id));
                }
            }
        }
        risks
    }
}

fn create_risk(
    model: &ParsedModel,
    asset: &TechnicalAsset,
    link: &CommunicationLink,
    category_id: &str,
) -> Risk {
    let impact = if asset.highest_confidentiality(model) >= Confidentiality::Confidential
        || asset.highest_integrity(model) >= Criticality::Critical
    {
        RiskExploitationImpact::Medium
    } else {
        RiskExploitationImpact::Low
    };
    let likelihood = RiskExploitationLikelihood::Likely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id, &link.id]),
        title: format!(
            "<b>Unguarded Direct Datastore Access</b> of <b>{}</b> via <b>{}</b>",
            asset.title, link.title
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
        most_relevant_communication_link_id: Some(link.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stria_model::TechnicalAssetType;
    use stria_model::Technology;
    use stria_model::TrustBoundaryType;

    use super::*;
    use crate::test_model;

    fn segmented_model() -> ParsedModel {
        let mut model = test_model::empty_model();
        test_model::add_technical_asset(&mut model, "frontend", |_| {});
        test_model::add_technical_asset(&mut model, "db", |asset| {
            asset.asset_type = TechnicalAssetType::Datastore;
        });
        test_model::add_trust_boundary(
            &mut model,
            "dmz",
            TrustBoundaryType::NetworkVlan,
            &["frontend"],
        );
        test_model::add_trust_boundary(
            &mut model,
            "backend",
            TrustBoundaryType::NetworkVlan,
            &["db"],
        );
        model
    }

    #[test]
    fn boundary_crossing_datastore_access_is_flagged() {
        let mut model = segmented_model();
        test_model::add_communication_link(&mut model, "frontend", "db", "direct reads", |_| {});
        model.update_derived_indices();

        let risks = UnguardedDirectDatastoreAccessRule.generate_risks(&model);
        assert_eq!(risks.len(), 1);
        assert_eq!(
            risks[0].synthetic_id,
            "unguarded-direct-datastore-access@db@frontend>db@direct-reads"
        );
    }

    #[test]
    fn traffic_forwarders_are_allowed_to_cross() {
        let mut model = segmented_model();
        if let Some(frontend) = model.technical_assets.get_mut("frontend") {
            frontend.technology = Technology::LoadBalancer;
        }
        test_model::add_communication_link(&mut model, "frontend", "db", "direct reads", |_| {});
        model.update_derived_indices();

        assert!(
            UnguardedDirectDatastoreAccessRule
                .generate_risks(&model)
                .is_empty()
        );
    }
}
