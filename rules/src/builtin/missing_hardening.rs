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

const RAA_LIMIT: f64 = 55.0;
const RAA_LIMIT_REDUCED: f64 = 40.0;

pub struct MissingHardeningRule;

impl RiskRule for MissingHardeningRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "missing-hardening".to_string(),
            title: "Missing Hardening".to_string(),
            description: format!(
                "Technical assets with a Relative Attacker Attractiveness (RAA) value of \
                 {RAA_LIMIT} % or higher should be hardened more thoroughly ({RAA_LIMIT_REDUCED} % when they \
                 are data stores or identity-related)."
            ),
            impact: "Attackers might more easily compromise attractive targets that lack \
                     hardening."
                .to_string(),
            asvs: "V14 - Configuration Verification Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Attack_Surface_Analysis_Cheat_Sheet.html".to_string(),
            action: "System Hardening".to_string(),
            mitigation: "Apply hardening benchmarks (CIS or comparable) to the operating \
                         system and the application stack."
                .to_string(),
            check: "Are hardening benchmarks applied to the attractive targets?".to_string(),
            detection_logic: "In-scope assets whose RAA crosses the hardening thresholds."
                .to_string(),
            risk_assessment: "Medium impact when the asset handles confidential data, low \
                              otherwise."
                .to_string(),
            false_positives: "Assets already hardened to an equivalent level can be considered \
                              false positives after individual review."
                .to_string(),
            function: RiskFunction::Operations,
            stride: Stride::Tampering,
            model_failure_possible_reason: false,
            cwe: 16,
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
            let reduced_limit_applies =
                asset.is_data_store() || asset.technology.is_identity_related();
            if asset.raa >= RAA_LIMIT || (reduced_limit_applies && asset.raa >= RAA_LIMIT_REDUCED)
            {
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
    let likelihood = RiskExploitationLikelihood::Likely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id]),
        title: format!("<b>Missing Hardening</b> risk at <b>{}</b>", asset.title),
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
