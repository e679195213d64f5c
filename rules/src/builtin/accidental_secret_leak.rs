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
use stria_model::Technology;
use stria_model::calculate_severity;

use crate::RiskRule;

pub struct AccidentalSecretLeakRule;

impl RiskRule for AccidentalSecretLeakRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "accidental-secret-leak".to_string(),
            title: "Accidental Secret Leak".to_string(),
            description: "Sourcecode repositories and artifact registries can accidentally \
                          contain secrets checked in or packaged into their contents."
                .to_string(),
            impact: "Attackers who gain access to the repository history or artifacts might \
                     find leaked credentials and use them against backend systems."
                .to_string(),
            asvs: "V14 - Configuration Verification Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Attack_Surface_Analysis_Cheat_Sheet.html".to_string(),
            action: "Build Pipeline Hardening".to_string(),
            mitigation: "Scan repositories and artifacts for secrets, rewrite history where \
                         leaks happened, and rotate affected credentials."
                .to_string(),
            check: "Are repositories and registries free of secrets, also in their history?"
                .to_string(),
            detection_logic: "In-scope sourcecode repositories and artifact registries."
                .to_string(),
            risk_assessment: "The risk rating depends on the sensitivity of the data processed \
                              or stored by the repository or registry."
                .to_string(),
            false_positives: "Repositories proven to hold no secrets in any revision can be \
                              considered false positives after individual review."
                .to_string(),
            function: RiskFunction::Operations,
            stride: Stride::InformationDisclosure,
            model_failure_possible_reason: false,
            cwe: 200,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        vec!["git".to_string(), "nexus".to_string()]
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope {
                continue;
            }
            if matches!(
                asset.technology,
                Technology::SourcecodeRepository | Technology::ArtifactRegistry
            ) {
                risks.push(create_risk(model, asset, &self.category().id));
            }
        }
        risks
    }
}

fn create_risk(model: &ParsedModel, asset: &TechnicalAsset, category_id: &str) -> Risk {
    let sensitive = asset.highest_confidentiality(model) >= Confidentiality::Confidential
        || asset.highest_integrity(model) >= Criticality::Critical
        || asset.highest_availability(model) >= Criticality::Critical;
    let impact = if sensitive {
        RiskExploitationImpact::Medium
    } else {
        RiskExploitationImpact::Low
    };
    let likelihood = RiskExploitationLikelihood::Unlikely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id]),
        title: format!("<b>Accidental Secret Leak</b> risk at <b>{}</b>", asset.title),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Probable,
        data_breach_technical_asset_ids: vec![asset.id.clone()],
        most_relevant_data_asset_id: None,
        most_relevant_technical_asset_id: Some(asset.id.clone()),
        most_relevant_trust_boundary_id: None,
        most_relevant_shared_runtime_id: None,
        most_relevant_communication_link_id: None,
    }
}
