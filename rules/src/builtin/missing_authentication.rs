use stria_model::Authentication;
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
use stria_model::Usage;
use stria_model::calculate_severity;

use crate::RiskRule;

pub struct MissingAuthenticationRule;

impl RiskRule for MissingAuthenticationRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "missing-authentication".to_string(),
            title: "Missing Authentication".to_string(),
            description: "Technical assets processing or storing sensitive data must not be \
                          accessible without authentication."
                .to_string(),
            impact: "Attackers might access or modify sensitive data without any credential \
                     check."
                .to_string(),
            asvs: "V2 - Authentication Verification Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Authentication_Cheat_Sheet.html".to_string(),
            action: "Authentication of Incoming Requests".to_string(),
            mitigation: "Apply an authentication method to the technical asset taking the \
                         sensitivity of the accessed data into account."
                .to_string(),
            check: "Do all incoming channels of sensitive assets authenticate their callers?"
                .to_string(),
            detection_logic: "In-scope assets processing confidential data (or with critical \
                              integrity) with unauthenticated incoming business-usage \
                              communication links from in-scope callers."
                .to_string(),
            risk_assessment: "High impact when strictly confidential data is reachable, \
                              medium otherwise."
                .to_string(),
            false_positives: "Fully public content behind the unauthenticated channel can be \
                              considered a false positive after individual review."
                .to_string(),
            function: RiskFunction::Architecture,
            stride: Stride::ElevationOfPrivilege,
            model_failure_possible_reason: false,
            cwe: 306,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope {
                continue;
            }
            let sensitive = asset.highest_confidentiality(model) >= Confidentiality::Confidential
                || asset.highest_integrity(model) >= Criticality::Critical;
            if !sensitive {
                continue;
            }
            for link in model.incoming_communication_links(&asset.id) {
                if link.authentication != Authentication::None
                    || link.usage != Usage::Business
                    || link.protocol.is_process_local()
                {
                    continue;
                }
                let caller_in_scope = model
                    .technical_assets
                    .get(&link.source_id)
                    .is_some_and(|caller| !caller.out_of_scope);
                if caller_in_scope {
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
    let impact =
        if asset.highest_confidentiality(model) == Confidentiality::StrictlyConfidential {
            RiskExploitationImpact::High
        } else {
            RiskExploitationImpact::Medium
        };
    let likelihood = RiskExploitationLikelihood::Likely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id, &link.id]),
        title: format!(
            "<b>Missing Authentication</b> covering communication link <b>{}</b> to <b>{}</b>",
            link.title, asset.title
        ),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Possible,
        data_breach_technical_asset_ids: vec![asset.id.clone()],
        most_relevant_data_asset_id: None,
        most_relevant_technical_asset_id: Some(asset.id.clone()),
        most_relevant_trust_boundary_id: None,
        most_relevant_shared_runtime_id: None,
        most_relevant_communication_link_id: Some(link.id.clone()),
    }
}
