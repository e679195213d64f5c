use stria_model::CommunicationLink;
use stria_model::Confidentiality;
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

pub struct UnencryptedCommunicationRule;

impl RiskRule for UnencryptedCommunicationRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "unencrypted-communication".to_string(),
            title: "Unencrypted Communication".to_string(),
            description: "Communication links transferring sensitive data or crossing network \
                          trust boundaries should use transport-level encryption."
                .to_string(),
            impact: "Attackers positioned on the network path can eavesdrop on or modify the \
                     transferred data."
                .to_string(),
            asvs: "V9 - Communication Verification Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Transport_Layer_Protection_Cheat_Sheet.html".to_string(),
            action: "Encryption of Communication Links".to_string(),
            mitigation: "Apply transport-level encryption (TLS or a comparable channel) to the \
                         communication link."
                .to_string(),
            check: "Are all sensitive or boundary-crossing channels encrypted in transit?"
                .to_string(),
            detection_logic: "Unencrypted, non-process-local communication links transferring \
                              confidential data or crossing a network trust boundary, unless \
                              both endpoints tolerate unprotected communications."
                .to_string(),
            risk_assessment: "High impact when strictly confidential data is transferred, \
                              medium otherwise; VPN or IP-filtered channels reduce the \
                              likelihood."
                .to_string(),
            false_positives: "Links inside a fully controlled environment transferring only \
                              public data can be considered false positives after individual \
                              review."
                .to_string(),
            function: RiskFunction::Architecture,
            stride: Stride::InformationDisclosure,
            model_failure_possible_reason: false,
            cwe: 319,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            for link in &asset.communication_links {
                if link.protocol.is_encrypted() || link.protocol.is_process_local() {
                    continue;
                }
                let target_in_scope = model
                    .technical_assets
                    .get(&link.target_id)
                    .is_some_and(|target| !target.out_of_scope);
                if asset.out_of_scope && !target_in_scope {
                    continue;
                }
                let tolerated = asset.technology.is_unprotected_communications_tolerated()
                    && model
                        .technical_assets
                        .get(&link.target_id)
                        .is_some_and(|target| {
                            target.technology.is_unprotected_communications_tolerated()
                        });
                if tolerated {
                    continue;
                }
                let transferred = link.highest_confidentiality(model);
                // A VPN tunnel already encrypts the channel; only the most
                // sensitive payloads still warrant their own encryption layer.
                if link.vpn && transferred < Confidentiality::StrictlyConfidential {
                    continue;
                }
                let sensitive = transferred >= Confidentiality::Confidential
                    || (transferred >= Confidentiality::Internal
                        && link.is_across_trust_boundary_network_only(model));
                if sensitive {
                    risks.push(create_risk(model, asset, link, &self.category().id));
                }
            }
        }
        risks
    }
}

fn create_risk(
    model: &ParsedModel,
    source: &TechnicalAsset,
    link: &CommunicationLink,
    category_id: &str,
) -> Risk {
    let impact = if link.highest_confidentiality(model) == Confidentiality::StrictlyConfidential
    {
        RiskExploitationImpact::High
    } else {
        RiskExploitationImpact::Medium
    };
    let likelihood = if link.vpn || link.ip_filtered {
        RiskExploitationLikelihood::Unlikely
    } else {
        RiskExploitationLikelihood::Likely
    };
    let target_title = model
        .technical_assets
        .get(&link.target_id)
        .map(|target| target.title.clone())
        .unwrap_or_else(|| link.target_id.clone());
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&link.id, &source.id]),
        title: format!(
            "<b>Unencrypted Communication</b> named <b>{}</b> between <b>{}</b> and <b>{}</b>",
            link.title, source.title, target_title
        ),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Possible,
        data_breach_technical_asset_ids: vec![link.target_id.clone()],
        most_relevant_data_asset_id: None,
        most_relevant_technical_asset_id: Some(source.id.clone()),
        most_relevant_trust_boundary_id: None,
        most_relevant_shared_runtime_id: None,
        most_relevant_communication_link_id: Some(link.id.clone()),
    }
}
