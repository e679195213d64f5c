use stria_model::Confidentiality;
use stria_model::Criticality;
use stria_model::DataBreachProbability;
use stria_model::EncryptionStyle;
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

pub struct UnencryptedAssetRule;

impl RiskRule for UnencryptedAssetRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "unencrypted-asset".to_string(),
            title: "Unencrypted Technical Asset".to_string(),
            description: "Data stores holding sensitive data should be encrypted at rest."
                .to_string(),
            impact: "Attackers with access to the underlying storage (backups included) can \
                     read the sensitive data in the clear."
                .to_string(),
            asvs: "V6 - Stored Cryptography Verification Requirements".to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Cryptographic_Storage_Cheat_Sheet.html".to_string(),
            action: "Encryption of Technical Asset".to_string(),
            mitigation: "Apply encryption at rest, at least transparent disk encryption, to \
                         the data store."
                .to_string(),
            check: "Is the data store encrypted, including its backups?".to_string(),
            detection_logic: "In-scope unencrypted data stores storing or processing \
                              confidential data (or data with critical integrity), except \
                              embedded components."
                .to_string(),
            risk_assessment: "High impact for strictly confidential data, medium otherwise."
                .to_string(),
            false_positives: "Data stores holding only public data can be considered false \
                              positives after individual review."
                .to_string(),
            function: RiskFunction::Architecture,
            stride: Stride::InformationDisclosure,
            model_failure_possible_reason: false,
            cwe: 311,
        }
    }

    fn supported_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk> {
        let mut risks = Vec::new();
        for asset in model.technical_assets.values() {
            if asset.out_of_scope
                || !asset.is_data_store()
                || asset.technology.is_embedded_component()
                || asset.encryption != EncryptionStyle::None
            {
                continue;
            }
            let sensitive = asset.highest_confidentiality(model) >= Confidentiality::Confidential
                || asset.highest_integrity(model) >= Criticality::Critical;
            if sensitive {
                risks.push(create_risk(model, asset, &self.category().id));
            }
        }
        risks
    }
}

fn create_risk(model: &ParsedModel, asset: &TechnicalAsset, category_id: &str) -> Risk {
    let impact =
        if asset.highest_confidentiality(model) == Confidentiality::StrictlyConfidential
            || asset.highest_integrity(model) == Criticality::MissionCritical
        {
            RiskExploitationImpact::High
        } else {
            RiskExploitationImpact::Medium
        };
    let likelihood = RiskExploitationLikelihood::Unlikely;
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id]),
        title: format!("<b>Unencrypted Technical Asset</b> named <b>{}</b>", asset.title),
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
    use stria_model::TechnicalAssetType;

    use super::*;
    use crate::test_model;

    #[test]
    fn unencrypted_confidential_datastore_is_flagged() {
        let mut model = test_model::empty_model();
        test_model::add_data_asset(&mut model, "records", |data| {
            data.confidentiality = Confidentiality::Confidential;
        });
        test_model::add_technical_asset(&mut model, "db", |asset| {
            asset.asset_type = TechnicalAssetType::Datastore;
            asset.data_assets_stored = vec!["records".to_string()];
        });
        model.update_derived_indices();

        let risks = UnencryptedAssetRule.generate_risks(&model);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].synthetic_id, "unencrypted-asset@db");
    }

    #[test]
    fn transparent_encryption_suppresses_the_finding() {
        let mut model = test_model::empty_model();
        test_model::add_data_asset(&mut model, "records", |data| {
            data.confidentiality = Confidentiality::Confidential;
        });
        test_model::add_technical_asset(&mut model, "db", |asset| {
            asset.asset_type = TechnicalAssetType::Datastore;
            asset.encryption = EncryptionStyle::Transparent;
            asset.data_assets_stored = vec!["records".to_string()];
        });
        model.update_derived_indices();

        assert!(UnencryptedAssetRule.generate_risks(&model).is_empty());
    }
}
