use stria_model::CommunicationLink;
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
use stria_model::Usage;
use stria_model::calculate_severity;

use crate::RiskRule;

pub struct DosRiskyAccessAcrossTrustBoundaryRule;

impl RiskRule for DosRiskyAccessAcrossTrustBoundaryRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "dos-risky-access-across-trust-boundary".to_string(),
            title: "DoS-risky Access Across Trust-Boundary".to_string(),
            description: "Availability-critical assets reached across a network trust boundary \
                          are potential denial-of-service targets."
                .to_string(),
            impact: "Attackers might overload the asset from a less protected network segment \
                     and break the availability of dependent business processes."
                .to_string(),
            asvs: "V1 - Architecture, Design and Threat Modeling Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Denial_of_Service_Cheat_Sheet.html".to_string(),
            action: "Anti-DoS Measures".to_string(),
            mitigation: "Apply rate limiting and redundancy on the exposed path, or restrict \
                         access to the protected segment."
                .to_string(),
            check: "Are rate limits and redundancy in place for boundary-crossing access?"
                .to_string(),
            detection_logic: "In-scope availability-critical assets with incoming \
                              business-usage communication links crossing a network trust \
                              boundary."
                .to_string(),
            risk_assessment: "Medium impact when the asset is mission-critical without \
                              redundancy, low otherwise."
                .to_string(),
            false_positives: "Links from within the same protected perimeter, or assets with \
                              sufficient upstream protection, can be considered false \
                              positives after individual review."
                .to_string(),
            function: RiskFunction::Operations,
            stride: Stride::DenialOfService,
            model_failure_possible_reason: false,
            cwe: 400,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope || asset.highest_availability(model) < Criticality::Critical {
                continue;
            }
            for link in model.incoming_communication_links(&asset.id) {
                if link.usage != Usage::Business || link.protocol.is_process_local() {
                    continue;
                }
                if link.is_across_trust_boundary_network_only(model) {
                    risks.push(create_risk(asset, link, &self.category().id));
                }
            }
        }
        risks
    }
}

fn create_risk(asset: &TechnicalAsset, link: &CommunicationLink, category_id: &str) -> Risk {
    let impact = if asset.availability == Criticality::MissionCritical && !asset.redundant {
        RiskExploitationImpact::Medium
    } else {
        RiskExploitationImpact::Low
    };
    let likelihood = RiskExploitationLikelihood::Unlikely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id, &link.id]),
        title: format!(
            "<b>Denial-of-Service</b> risky access of <b>{}</b> via <b>{}</b>",
            asset.title, link.title
        ),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Improbable,
        data_breach_technical_asset_ids: Vec::new(),
        most_relevant_data_asset_id: None,
        most_relevant_technical_asset_id: Some(asset.id.clone()),
        most_relevant_trust_boundary_id: None,
        most_relevant_shared_runtime_id: None,
        most_relevant_communication_link_id: Some(link.id.clone()),
    }
}
