use stria_model::Confidentiality;
use stria_model::Criticality;
use stria_model::DataBreachProbability;
use stria_model::ParsedModel;
use stria_model::Risk;
use stria_model::RiskCategory;
use stria_model::RiskExploitationImpact;
use stria_model::RiskExploitationLikelihood;
use stria_model::RiskFunction;
use stria_model::SharedRuntime;
use stria_model::Stride;
use stria_model::calculate_severity;

use crate::RiskRule;

pub struct SharedRuntimeCodeInjectionRule;

impl RiskRule for SharedRuntimeCodeInjectionRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "shared-runtime-code-injection".to_string(),
            title: "Shared Runtime Code Injection".to_string(),
            description: "Technical assets co-hosted on a shared runtime are exposed to code \
                          injection through the runtime they share."
                .to_string(),
            impact: "Attackers who compromised one co-hosted asset might inject code into the \
                     shared runtime and take over every other asset running on it."
                .to_string(),
            asvs: "V1 - Architecture, Design and Threat Modeling Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Attack_Surface_Analysis_Cheat_Sheet.html".to_string(),
            action: "Runtime Isolation".to_string(),
            mitigation: "Isolate sensitive workloads onto dedicated runtimes or strengthen the \
                         isolation between co-hosted assets."
                .to_string(),
            check: "Is the failure domain of the shared runtime acceptable for every co-hosted \
                    asset?"
                .to_string(),
            detection_logic: "Shared runtimes hosting more than one in-scope technical asset."
                .to_string(),
            risk_assessment: "The risk rating depends on the highest sensitivity of the \
                              co-hosted assets."
                .to_string(),
            false_positives: "Runtimes with strong tenant isolation guarantees can be \
                              considered false positives after individual review."
                .to_string(),
            function: RiskFunction::Architecture,
            stride: Stride::ElevationOfPrivilege,
            model_failure_possible_reason: false,
            cwe: 94,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for runtime in model.shared_runtimes.values() {
            let in_scope_running: Vec<&str> = runtime
                .technical_assets_running
                .iter()
                .filter(|asset_id| {
                    model
                        .technical_assets
                        .get(*asset_id)
                        .is_some_and(|asset| !asset.out_of_scope)
                })
                .map(String::as_str)
                .collect();
            if in_scope_running.len() > 1 {
                risks.push(create_risk(model, runtime, &self.category().id));
            }
        }
        risks
    }
}

fn create_risk(model: &ParsedModel, runtime: &SharedRuntime, category_id: &str) -> Risk {
    let impact = if runtime.highest_confidentiality(model)
        >= Confidentiality::Confidential
        || runtime.highest_integrity(model) >= Criticality::Critical
    {
        RiskExploitationImpact::High
    } else {
        RiskExploitationImpact::Medium
    };
    let likelihood = RiskExploitationLikelihood::Likely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&runtime.id]),
        title: format!(
            "<b>Shared Runtime Code Injection</b> risk at <b>{}</b>",
            runtime.title
        ),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Possible,
        data_breach_technical_asset_ids: runtime.technical_assets_running.clone(),
        most_relevant_data_asset_id: None,
        most_relevant_technical_asset_id: None,
        most_relevant_trust_boundary_id: None,
        most_relevant_shared_runtime_id: Some(runtime.id.clone()),
        most_relevant_communication_link_id: None,
    }
}
