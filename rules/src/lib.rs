//! Risk rule protocol and the built-in rule library.
//!
//! A rule exposes its category descriptor, the tags it understands, and a
//! pure evaluation over the parsed model. Rules may inspect any part of the
//! model but never mutate it; the engine treats them as opaque.

mod builtin;
#[cfg(test)]
pub(crate) mod test_model;

use stria_model::ParsedModel;
use stria_model::Risk;
use stria_model::RiskCategory;

pub use builtin::accidental_secret_leak::AccidentalSecretLeakRule;
pub use builtin::cross_site_scripting::CrossSiteScriptingRule;
pub use builtin::dos_risky_access_across_trust_boundary::DosRiskyAccessAcrossTrustBoundaryRule;
pub use builtin::missing_authentication::MissingAuthenticationRule;
pub use builtin::missing_hardening::MissingHardeningRule;
pub use builtin::missing_network_segmentation::MissingNetworkSegmentationRule;
pub use builtin::shared_runtime_code_injection::SharedRuntimeCodeInjectionRule;
pub use builtin::sql_nosql_injection::SqlNosqlInjectionRule;
pub use builtin::unencrypted_asset::UnencryptedAssetRule;
pub use builtin::unencrypted_communication::UnencryptedCommunicationRule;
pub use builtin::unguarded_direct_datastore_access::UnguardedDirectDatastoreAccessRule;
pub use builtin::untrusted_deserialization::UntrustedDeserializationRule;

/// Uniform protocol every risk rule satisfies, built-in or plugin-loaded.
pub trait RiskRule {
    /// Descriptor of the kind of risk this rule identifies. The descriptor's
    /// id doubles as the rule id.
    fn category(&self) -> RiskCategory;

    /// Tags this rule understands, registered into the model's tag universe
    /// before evaluation.
    fn supported_tags(&self) -> Vec<String>;

    /// Pure evaluation: identified risks for the given model.
    fn generate_risks(&self, model: &ParsedModel) -> Vec<Risk>;
}

/// The built-in rules, in stable rule-id order.
pub fn built_in_risk_rules() -> Vec<Box<dyn RiskRule>> {
    vec![
        Box::new(AccidentalSecretLeakRule),
        Box::new(CrossSiteScriptingRule),
        Box::new(DosRiskyAccessAcrossTrustBoundaryRule),
        Box::new(MissingAuthenticationRule),
        Box::new(MissingHardeningRule),
        Box::new(MissingNetworkSegmentationRule),
        Box::new(SharedRuntimeCodeInjectionRule),
        Box::new(SqlNosqlInjectionRule),
        Box::new(UnencryptedAssetRule),
        Box::new(UnencryptedCommunicationRule),
        Box::new(UnguardedDirectDatastoreAccessRule),
        Box::new(UntrustedDeserializationRule),
    ]
}
