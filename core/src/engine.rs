use std::collections::BTreeMap;
use std::collections::BTreeSet;

use stria_model::ParsedModel;
use stria_model::Risk;
use stria_model::RiskCategory;
use stria_model::RisksByCategory;
use stria_model::sort_by_risk_severity;
use stria_rules::RiskRule;
use tracing::info;
use tracing::warn;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;
use crate::input::ModelInput;
use crate::parse::parse_model;
use crate::plugin::PluginRiskRule;
use crate::plugin::run_raa_plugin;
use crate::tracking::apply_wildcard_risk_tracking;

/// Built-in and custom rules keyed by rule id. Ids must be globally unique
/// across both sets; a collision is a configuration error.
pub struct RuleRegistry {
    builtin: BTreeMap<String, Box<dyn RiskRule>>,
    custom: BTreeMap<String, Box<dyn RiskRule>>,
}

impl RuleRegistry {
    pub fn with_built_in_rules(rules: Vec<Box<dyn RiskRule>>) -> Result<Self> {
        let mut builtin = BTreeMap::new();
        for rule in rules {
            let id = rule.category().id;
            if builtin.insert(id.clone(), rule).is_some() {
                return Err(Error::Config {
                    subject: id,
                    message: "duplicate built-in rule id".to_string(),
                });
            }
        }
        Ok(Self {
            builtin,
            custom: BTreeMap::new(),
        })
    }

    pub fn register_custom(&mut self, rule: Box<dyn RiskRule>) -> Result<()> {
        let id = rule.category().id;
        if self.builtin.contains_key(&id) || self.custom.contains_key(&id) {
            return Err(Error::Config {
                subject: id,
                message: "custom rule id collides with an already registered rule".to_string(),
            });
        }
        self.custom.insert(id, rule);
        Ok(())
    }

    pub fn built_in_rule_ids(&self) -> Vec<String> {
        self.builtin.keys().cloned().collect()
    }

    fn known(&self, id: &str) -> bool {
        self.builtin.contains_key(id) || self.custom.contains_key(id)
    }
}

/// Outcome of a full evaluation: the post-RAA model with the tracking
/// overlay applied, every category that can be referenced from a risk, and
/// the generated risks indexed both ways.
#[derive(Debug)]
pub struct Evaluation {
    pub model: ParsedModel,
    pub categories: BTreeMap<String, RiskCategory>,
    pub risks_by_category: RisksByCategory,
    pub risks_by_synthetic_id: BTreeMap<String, Risk>,
    pub intro_text_raa: String,
}

/// Loads the input document, parses it, loads the custom-rule plugins, runs
/// the RAA pre-pass, evaluates all rules, and applies the tracking overlay.
pub fn read_and_analyze_model(config: &Config) -> Result<Evaluation> {
    info!(input = %config.input_file.display(), "parsing model");
    let input = ModelInput::load(&config.input_file)?;
    let (model, individual_risks) = parse_model(&input)?;

    let mut registry = RuleRegistry::with_built_in_rules(stria_rules::built_in_risk_rules())?;
    for plugin_name in &config.risk_rules_plugins {
        match PluginRiskRule::load(&config.bin_folder, plugin_name) {
            Ok(rule) => registry.register_custom(Box::new(rule))?,
            Err(err) => {
                warn!(plugin = %plugin_name, "skipping custom risk rule: {err}");
            }
        }
    }

    analyze_parsed_model(model, individual_risks, &registry, config)
}

/// Evaluation over an already parsed model; separated from the I/O wrapper
/// so the whole pipeline stays testable without touching the filesystem.
pub fn analyze_parsed_model(
    mut model: ParsedModel,
    individual_risks: RisksByCategory,
    registry: &RuleRegistry,
    config: &Config,
) -> Result<Evaluation> {
    let intro_text_raa = apply_raa(&mut model, config);
    let mut evaluation = apply_risk_generation(
        model,
        individual_risks,
        registry,
        &config.skip_risk_rules,
    )?;
    evaluation.intro_text_raa = intro_text_raa;
    apply_wildcard_risk_tracking(
        &mut evaluation.model,
        &evaluation.risks_by_synthetic_id,
        config.ignore_orphaned_risk_tracking,
    )?;
    Ok(evaluation)
}

/// RAA pre-pass. Plugin failure is non-fatal: the run proceeds with
/// zero-filled RAA and an empty introduction text.
fn apply_raa(model: &mut ParsedModel, config: &Config) -> String {
    info!(plugin = %config.raa_plugin, "applying RAA calculation");
    match run_raa_plugin(&config.bin_folder, &config.raa_plugin, model) {
        Ok(output) => {
            for (asset_id, raa) in &output.raa {
                if let Some(asset) = model.technical_assets.get_mut(asset_id) {
                    asset.raa = raa.clamp(0.0, 100.0);
                }
            }
            output.intro_text
        }
        Err(err) => {
            warn!("RAA plugin not applied, proceeding with zero RAA: {err}");
            String::new()
        }
    }
}

fn apply_risk_generation(
    mut model: ParsedModel,
    individual_risks: RisksByCategory,
    registry: &RuleRegistry,
    skip_risk_rules: &[String],
) -> Result<Evaluation> {
    let skip: BTreeSet<&str> = skip_risk_rules.iter().map(String::as_str).collect();
    for unknown in skip.iter().filter(|id| !registry.known(id)) {
        warn!(rule = %unknown, "unknown risk rule in skip list");
    }

    let mut categories: BTreeMap<String, RiskCategory> =
        model.individual_risk_categories.clone();
    let mut risks_by_category = individual_risks;

    for rules in [&registry.builtin, &registry.custom] {
        for (rule_id, rule) in rules {
            let category = rule.category();
            categories.insert(category.id.clone(), category.clone());
            if skip.contains(rule_id.as_str()) {
                info!(rule = %rule_id, "skipping risk rule");
                continue;
            }
            model.add_to_supported_tags(&rule.supported_tags());
            let risks = rule.generate_risks(&model);
            for risk in &risks {
                if risk.category_id != *rule_id {
                    return Err(Error::Internal {
                        id: risk.synthetic_id.clone(),
                        message: format!(
                            "rule {rule_id} returned a risk of category {}",
                            risk.category_id
                        ),
                    });
                }
            }
            if !risks.is_empty() {
                risks_by_category.insert(category.id, risks);
            }
        }
    }

    for risks in risks_by_category.values_mut() {
        sort_by_risk_severity(risks, &model);
    }

    let mut risks_by_synthetic_id = BTreeMap::new();
    for risks in risks_by_category.values() {
        for risk in risks {
            let key = risk.synthetic_id.to_lowercase();
            if risks_by_synthetic_id.contains_key(&key) {
                warn!(synthetic_id = %key, "duplicate synthetic risk id, retaining the first");
                continue;
            }
            risks_by_synthetic_id.insert(key, risk.clone());
        }
    }

    Ok(Evaluation {
        model,
        categories,
        risks_by_category,
        risks_by_synthetic_id,
        intro_text_raa: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stria_model::DataBreachProbability;
    use stria_model::RiskExploitationImpact;
    use stria_model::RiskExploitationLikelihood;
    use stria_model::RiskSeverity;
    use stria_model::calculate_severity;

    use super::*;

    struct FakeRule {
        id: &'static str,
        risks: Vec<Risk>,
    }

    impl FakeRule {
        fn boxed(id: &'static str, risks: Vec<Risk>) -> Box<dyn RiskRule> {
            Box::new(FakeRule { id, risks })
        }
    }

    impl RiskRule for FakeRule {
        fn category(&self) -> RiskCategory {
            RiskCategory {
                id: self.id.to_string(),
                title: self.id.to_string(),
                ..RiskCategory::default()
            }
        }

        fn supported_tags(&self) -> Vec<String> {
            vec![format!("{}-tag", self.id)]
        }

        fn generate_risks(&self, _model: &ParsedModel) -> Vec<Risk> {
            self.risks.clone()
        }
    }

    fn fake_risk(category_id: &str, anchor: &str) -> Risk {
        let likelihood = RiskExploitationLikelihood::Likely;
        let impact = RiskExploitationImpact::Medium;
        Risk {
            category_id: category_id.to_string(),
            synthetic_id: Risk::synthesize_id(category_id, &[anchor]),
            title: format!("risk at {anchor}"),
            severity: calculate_severity(likelihood, impact),
            exploitation_likelihood: likelihood,
            exploitation_impact: impact,
            data_breach_probability: DataBreachProbability::Possible,
            data_breach_technical_asset_ids: Vec::new(),
            most_relevant_data_asset_id: None,
            most_relevant_technical_asset_id: None,
            most_relevant_trust_boundary_id: None,
            most_relevant_shared_runtime_id: None,
            most_relevant_communication_link_id: None,
        }
    }

    #[test]
    fn skip_list_suppresses_rules_and_tolerates_unknown_ids() {
        let registry = RuleRegistry::with_built_in_rules(vec![
            FakeRule::boxed("rule-a", vec![fake_risk("rule-a", "x")]),
            FakeRule::boxed("rule-b", vec![fake_risk("rule-b", "x")]),
        ])
        .expect("registry");

        let evaluation = apply_risk_generation(
            ParsedModel::default(),
            RisksByCategory::new(),
            &registry,
            &["rule-a".to_string(), "bogus".to_string()],
        )
        .expect("evaluation");

        assert!(!evaluation.risks_by_category.contains_key("rule-a"));
        assert!(evaluation.risks_by_category.contains_key("rule-b"));
        // Skipped rules still contribute their category descriptor.
        assert!(evaluation.categories.contains_key("rule-a"));
    }

    #[test]
    fn supported_tags_of_applied_rules_are_registered() {
        let registry = RuleRegistry::with_built_in_rules(vec![FakeRule::boxed(
            "rule-a",
            Vec::new(),
        )])
        .expect("registry");

        let evaluation = apply_risk_generation(
            ParsedModel::default(),
            RisksByCategory::new(),
            &registry,
            &[],
        )
        .expect("evaluation");

        assert!(evaluation.model.all_supported_tags.contains("rule-a-tag"));
    }

    #[test]
    fn synthetic_id_index_is_lowercased_and_keeps_the_first_duplicate() {
        let mut duplicated = fake_risk("rule-a", "Node");
        duplicated.synthetic_id = "rule-a@Node".to_string();
        let registry = RuleRegistry::with_built_in_rules(vec![FakeRule::boxed(
            "rule-a",
            vec![duplicated.clone(), duplicated.clone()],
        )])
        .expect("registry");

        let evaluation = apply_risk_generation(
            ParsedModel::default(),
            RisksByCategory::new(),
            &registry,
            &[],
        )
        .expect("evaluation");

        assert!(evaluation.risks_by_synthetic_id.contains_key("rule-a@node"));
        assert_eq!(evaluation.risks_by_synthetic_id.len(), 1);
        // The by-category list keeps both occurrences.
        assert_eq!(evaluation.risks_by_category["rule-a"].len(), 2);
    }

    #[test]
    fn rule_returning_foreign_category_is_an_internal_error() {
        let registry = RuleRegistry::with_built_in_rules(vec![FakeRule::boxed(
            "rule-a",
            vec![fake_risk("other-category", "x")],
        )])
        .expect("registry");

        let err = apply_risk_generation(
            ParsedModel::default(),
            RisksByCategory::new(),
            &registry,
            &[],
        )
        .expect_err("must fail");
        assert!(matches!(err, Error::Internal { .. }));
    }

    #[test]
    fn custom_rule_id_collision_is_a_config_error() {
        let mut registry = RuleRegistry::with_built_in_rules(vec![FakeRule::boxed(
            "rule-a",
            Vec::new(),
        )])
        .expect("registry");

        let err = registry
            .register_custom(FakeRule::boxed("rule-a", Vec::new()))
            .expect_err("collision");
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let build_registry = || {
            RuleRegistry::with_built_in_rules(vec![
                FakeRule::boxed(
                    "rule-a",
                    vec![fake_risk("rule-a", "b"), fake_risk("rule-a", "a")],
                ),
                FakeRule::boxed("rule-b", vec![fake_risk("rule-b", "x")]),
            ])
            .expect("registry")
        };

        let first = apply_risk_generation(
            ParsedModel::default(),
            RisksByCategory::new(),
            &build_registry(),
            &[],
        )
        .expect("evaluation");
        let second = apply_risk_generation(
            ParsedModel::default(),
            RisksByCategory::new(),
            &build_registry(),
            &[],
        )
        .expect("evaluation");

        assert_eq!(first.risks_by_category, second.risks_by_category);
        assert_eq!(first.risks_by_synthetic_id, second.risks_by_synthetic_id);
    }

    #[test]
    fn individual_risks_are_seeded_into_the_indices() {
        let registry = RuleRegistry::with_built_in_rules(Vec::new()).expect("registry");
        let mut individual = RisksByCategory::new();
        individual.insert(
            "contract-risk".to_string(),
            vec![fake_risk("contract-risk", "app")],
        );

        let evaluation = apply_risk_generation(
            ParsedModel::default(),
            individual,
            &registry,
            &[],
        )
        .expect("evaluation");

        assert!(evaluation.risks_by_synthetic_id.contains_key("contract-risk@app"));
        assert_eq!(
            evaluation.risks_by_category["contract-risk"][0].severity,
            RiskSeverity::Elevated
        );
    }
}
