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

pub struct CrossSiteScriptingRule;

impl RiskRule for CrossSiteScriptingRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "cross-site-scripting".to_string(),
            title: "Cross-Site Scripting (XSS)".to_string(),
            description: "Web applications are potential targets of cross-site scripting \
                          unless all output is properly encoded."
                .to_string(),
            impact: "Attackers might access victim sessions and steal or modify the data the \
                     victim can reach through the web application."
                .to_string(),
            asvs: "V5 - Validation, Sanitization and Encoding Verification Requirements"
                .to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html".to_string(),
            action: "XSS Prevention".to_string(),
            mitigation: "Apply context-aware output encoding and set a restrictive \
                         Content-Security-Policy."
                .to_string(),
            check: "Is all dynamic output encoded for the context it is rendered in?"
                .to_string(),
            detection_logic: "In-scope web applications.".to_string(),
            risk_assessment: "The risk rating depends on the sensitivity of the data processed \
                              or stored by the web application."
                .to_string(),
            false_positives: "Applications not rendering any dynamic content can be considered \
                              false positives after individual review."
                .to_string(),
            function: RiskFunction::Development,
            stride: Stride::Tampering,
            model_failure_possible_reason: false,
            cwe: 79,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope || !asset.technology.is_web_application() {
                continue;
            }
            risks.push(create_risk(model, asset, &self.category().id));
        }
        risks
    }
}

fn create_risk(model: &ParsedModel, asset: &TechnicalAsset, category_id: &str) -> Risk {
    let sensitive = asset.highest_confidentiality(model) >= Confidentiality::Confidential
        || asset.highest_integrity(model) >= Criticality::Critical;
    let impact = if sensitive {
        RiskExploitationImpact::High
    } else {
        RiskExploitationImpact::Medium
    };
    let likelihood = RiskExploitationLikelihood::Likely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id]),
        title: format!("<b>Cross-Site Scripting (XSS)</b> risk at <b>{}</b>", asset.title),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Possible,
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
    use stria_model::RiskSeverity;
    use stria_model::Technology;

    use super::*;
    use crate::test_model;

    #[test]
    fn impact_scales_with_processed_data_sensitivity() {
        let mut model = test_model::empty_model();
        test_model::add_data_asset(&mut model, "card-numbers", |data| {
            data.confidentiality = Confidentiality::StrictlyConfidential;
        });
        test_model::add_technical_asset(&mut model, "shop", |asset| {
            asset.technology = Technology::WebApplication;
            asset.data_assets_processed = vec!["card-numbers".to_string()];
        });
        test_model::add_technical_asset(&mut model, "blog", |asset| {
            asset.technology = Technology::WebApplication;
        });
        model.update_derived_indices();

        let risks = CrossSiteScriptingRule.generate_risks(&model);
        assert_eq!(risks.len(), 2);
        let shop = risks
            .iter()
            .find(|risk| risk.synthetic_id.ends_with("@shop"))
            .expect("shop risk");
        let blog = risks
            .iter()
            .find(|risk| risk.synthetic_id.ends_with("@blog"))
            .expect("blog risk");
        assert_eq!(shop.exploitation_impact, RiskExploitationImpact::High);
        assert_eq!(shop.severity, RiskSeverity::Elevated);
        assert_eq!(blog.exploitation_impact, RiskExploitationImpact::Medium);
    }
}
