use stria_model::Confidentiality;
use stria_model::Criticality;
use stria_model::DataBreachProbability;
use stria_model::DataFormat;
use stria_model::ParsedModel;
use stria_model::Protocol;
use stria_model::Risk;
use stria_model::RiskCategory;
use stria_model::RiskExploitationImpact;
use stria_model::RiskExploitationLikelihood;
use stria_model::RiskFunction;
use stria_model::Stride;
use stria_model::TechnicalAsset;
use stria_model::calculate_severity;

use crate::RiskRule;

pub struct UntrustedDeserializationRule;

impl RiskRule for UntrustedDeserializationRule {
    fn category(&self) -> RiskCategory {
        RiskCategory {
            id: "untrusted-deserialization".to_string(),
            title: "Untrusted Deserialization".to_string(),
            description: "Technical assets accepting serialized object data are exposed to \
                          deserialization attacks when the input is not trustworthy."
                .to_string(),
            impact: "Deserialization gadgets frequently allow full remote code execution on \
                     the deserializing asset."
                .to_string(),
            asvs: "V5 - Validation, Sanitization and Encoding Verification Requirements"
                .to_string(),
            cheat_sheet: "https://cheatsheetseries.owasp.org/cheatsheets/Deserialization_Cheat_Sheet.html".to_string(),
            action: "Prevention of Deserialization of Untrusted Data".to_string(),
            mitigation: "Avoid native serialization formats for untrusted input, or constrain \
                         deserialization with strict allow-lists and integrity checks."
                .to_string(),
            check: "Is serialized object input authenticated before deserialization?"
                .to_string(),
            detection_logic: "In-scope assets accepting the serialization data format or \
                              communicating over object-level remoting protocols."
                .to_string(),
            risk_assessment: "High impact in general, very high for internet-exposed assets."
                .to_string(),
            false_positives: "Deserialization of fully integrity-protected input can be \
                              considered a false positive after individual review."
                .to_string(),
            function: RiskFunction::Architecture,
            stride: Stride::Tampering,
            model_failure_possible_reason: false,
            cwe: 502,
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
            let mut accepts_serialization = asset
                .data_formats_accepted
                .contains(&DataFormat::Serialization);
            let remoting = |protocol: Protocol| {
                matches!(
                    protocol,
                    Protocol::Iiop
                        | Protocol::IiopEncrypted
                        | Protocol::Jrmp
                        | Protocol::JrmpEncrypted
                )
            };
            if model
                .incoming_communication_links(&asset.id)
                .iter()
                .any(|link| remoting(link.protocol))
            {
                accepts_serialization = true;
            }
            if accepts_serialization {
                risks.push(create_risk(model, asset, &self.category().id));
            }
        }
        risks
    }
}

fn create_risk(model: &ParsedModel, asset: &TechnicalAsset, category_id: &str) -> Risk {
    let impact = if asset.internet {
        RiskExploitationImpact::VeryHigh
    } else {
        RiskExploitationImpact::High
    };
    let likelihood = RiskExploitationLikelihood::Likely;
    let probability = if asset.highest_confidentiality(model) >= Confidentiality::Confidential
        || asset.highest_integrity(model) >= Criticality::Critical
    {
        DataBreachProbability::Probable
    } else {
        DataBreachProbability::Possible
    };
    Risk {
        category_id: category_id.to_string(),
        synthetic_id: Risk::synthesize_id(category_id, &[&asset.id]),
        title: format!("<b>Untrusted Deserialization</b> risk at <b>{}</b>", asset.title),
        severity: calculate_severity(likelihood, impact),
        exploitation_likelihood: likelihood,
        exploitation_impact: impact,
        data_breach_probability: probability,
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

    use super::*;
    use crate::test_model;

    #[test]
    fn serialization_format_triggers_the_rule() {
        let mut model = test_model::empty_model();
        test_model::add_technical_asset(&mut model, "legacy-api", |asset| {
            asset.data_formats_accepted = vec![DataFormat::Serialization];
        });
        test_model::add_technical_asset(&mut model, "json-api", |asset| {
            asset.data_formats_accepted = vec![DataFormat::Json];
        });
        model.update_derived_indices();

        let risks = UntrustedDeserializationRule.generate_risks(&model);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].synthetic_id, "untrusted-deserialization@legacy-api");
    }

    #[test]
    fn internet_exposure_raises_impact_to_very_high() {
        let mut model = test_model::empty_model();
        test_model::add_technical_asset(&mut model, "legacy-api", |asset| {
            asset.data_formats_accepted = vec![DataFormat::Serialization];
            asset.internet = true;
        });
        model.update_derived_indices();

        let risks = UntrustedDeserializationRule.generate_risks(&model);
        assert_eq!(risks[0].severity, RiskSeverity::Elevated);
        assert_eq!(risks[0].exploitation_impact, RiskExploitationImpact::VeryHigh);
    }

    #[test]
    fn jrmp_remoting_counts_as_serialization_input() {
        let mut model = test_model::empty_model();
        test_model::add_technical_asset(&mut model, "client", |_| {});
        test_model::add_technical_asset(&mut model, "ejb-server", |_| {});
        test_model::add_communication_link(&mut model, "client", "ejb-server", "remoting", |link| {
            link.protocol = Protocol::Jrmp;
        });
        model.update_derived_indices();

        let risks = UntrustedDeserializationRule.generate_risks(&model);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].synthetic_id, "untrusted-deserialization@ejb-server");
    }
}
