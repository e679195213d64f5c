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
use stria_model::Technology;
use stria_model::Usage;
use stria_model::calculate_severity;

use crate::RiskRule;

pub struct SqlNosqlInjectionRule;

impl RiskRule for SqlNosqlInjectionRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "sql-nosql-injection".to_string(),
            title: "SQL/NoSQL-Injection".to_string(),
            description: "Databases accessed via database access protocols are potential \
                          injection targets when queries are built from unsanitized input."
                .to_string(),
            impact: "Attackers might read or modify any data stored in the database, bypassing \
                     application-level access control."
                .to_string(),
            asvs: "V5 - Validation, Sanitization and Encoding Verification Requirements"
                .to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/SQL_Injection_Prevention_Cheat_Sheet.html".to_string(),
            action: "Injection Prevention".to_string(),
            mitigation: "Use parameterized queries or prepared statements and validate input \
                         against allow-lists."
                .to_string(),
            check: "Are all database queries built via parameterized bindings?".to_string(),
            detection_logic: "Database-access communication links towards in-scope databases."
                .to_string(),
            risk_assessment: "The risk rating depends on the sensitivity of the stored data."
                .to_string(),
            false_positives: "Links from components proven to only issue static queries can be \
                              considered false positives after individual review."
                .to_string(),
            function: RiskFunction::Development,
            stride: Stride::Tampering,
            model_failure_possible_reason: false,
            cwe: 89,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope
                || !matches!(
                    asset.technology,
                    Technology::Database | Technology::IdentityStoreDatabase
                )
            {
                continue;
            }
            // Plain databases are sometimes fronted by generic web/text
            // channels, so the lax protocol set applies to them.
            let lax = asset.technology == Technology::Database;
            for link in model.incoming_communication_links(&asset.id) {
                if link.protocol.is_potential_database_access_protocol(lax) {
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
        RiskExploitationImpact::High
    } else {
        RiskExploitationImpact::Medium
    };
    let likelihood = if link.usage == Usage::Devops {
        RiskExploitationLikelihood::Likely
    } else {
        RiskExploitationLikelihood::VeryLikely
    };
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id, &link.id]),
        title: format!(
            "<b>SQL/NoSQL-Injection</b> risk at <b>{}</b> against database <b>{}</b>",
            link.title, asset.title
        ),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: DataBreachProbability::Probable,
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
    use stria_model::Protocol;
    use stria_model::RiskSeverity;

    use super::*;
    use crate::test_model;

    #[test]
    fn jdbc_access_to_confidential_database_is_high_severity() {
        let mut model = test_model::empty_model();
        test_model::add_data_asset(&mut model, "customer-data", |data| {
            data.confidentiality = Confidentiality::Confidential;
        });
        test_model::add_technical_asset(&mut model, "backend", |_| {});
        test_model::add_technical_asset(&mut model, "db", |asset| {
            asset.technology = Technology::Database;
            asset.data_assets_stored = vec!["customer-data".to_string()];
        });
        test_model::add_communication_link(&mut model, "backend", "db", "queries", |link| {
            link.protocol = Protocol::Jdbc;
        });
        model.update_derived_indices();

        let risks = SqlNosqlInjectionRule.generate_risks(&model);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].severity, RiskSeverity::High);
        assert_eq!(risks[0].data_breach_probability, DataBreachProbability::Probable);
    }

    #[test]
    fn ssh_access_is_not_database_access() {
        let mut model = test_model::empty_model();
        test_model::add_technical_asset(&mut model, "admin", |_| {});
        test_model::add_technical_asset(&mut model, "db", |asset| {
            asset.technology = Technology::Database;
        });
        test_model::add_communication_link(&mut model, "admin", "db", "maintenance", |link| {
            link.protocol = Protocol::Ssh;
        });
        model.update_derived_indices();

        assert!(SqlNosqlInjectionRule.generate_risks(&model).is_empty());
    }
}
