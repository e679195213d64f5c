use std::collections::BTreeMap;

use stria_model::ParsedModel;
use stria_model::Risk;
use stria_model::RiskTracking;
use tracing::warn;
use wildmatch::WildMatchPattern;

use crate::error::Error;
use crate::error::Result;

/// Wildcard pattern over synthetic risk ids: `*` matches any run of
/// characters, everything else is literal.
type IdPattern = WildMatchPattern<'*', '\0'>;

/// Applies the user-supplied tracking entries to the generated risk set.
///
/// Literal entries bind directly. Entries containing `*` expand across the
/// generated synthetic ids, more specific patterns (fewer wildcards, then
/// lexicographically smaller) claiming contested risks first. After the
/// overlay the model's tracking map holds only concrete synthetic ids, so
/// every status lookup is a plain map access.
///
/// An entry matching no generated risk is orphaned: a warning when
/// `ignore_orphans` is set, a fatal tracking error otherwise.
pub fn apply_wildcard_risk_tracking(
    model: &mut ParsedModel,
    risks_by_synthetic_id: &BTreeMap<String, Risk>,
    ignore_orphans: bool,
) -> Result<()> {
    let mut literal_entries = Vec::new();
    let mut wildcard_entries = Vec::new();
    for (pattern, tracking) in &model.risk_tracking {
        if pattern.contains('*') {
            wildcard_entries.push((pattern.clone(), tracking.clone()));
        } else {
            literal_entries.push((pattern.clone(), tracking.clone()));
        }
    }
    wildcard_entries.sort_by(|(left, _), (right, _)| {
        let left_wildcards = left.matches('*').count();
        let right_wildcards = right.matches('*').count();
        left_wildcards
            .cmp(&right_wildcards)
            .then_with(|| left.cmp(right))
    });

    let mut expanded: BTreeMap<String, RiskTracking> = BTreeMap::new();
    let mut orphans = Vec::new();

    for (synthetic_id, tracking) in literal_entries {
        if risks_by_synthetic_id.contains_key(&synthetic_id) {
            expanded.insert(synthetic_id, tracking);
        } else {
            orphans.push(synthetic_id);
        }
    }

    for (pattern, tracking) in wildcard_entries {
        let matcher = IdPattern::new(&pattern);
        let mut matched_any = false;
        for synthetic_id in risks_by_synthetic_id.keys() {
            if !matcher.matches(synthetic_id) {
                continue;
            }
            matched_any = true;
            expanded
                .entry(synthetic_id.clone())
                .or_insert_with(|| RiskTracking {
                    synthetic_risk_id: synthetic_id.clone(),
                    ..tracking.clone()
                });
        }
        if !matched_any {
            orphans.push(pattern);
        }
    }

    for orphan in &orphans {
        if ignore_orphans {
            warn!(pattern = %orphan, "orphaned risk tracking entry matches no generated risk");
        } else {
            return Err(Error::OrphanedRiskTracking {
                synthetic_id: orphan.clone(),
            });
        }
    }

    model.risk_tracking = expanded;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stria_model::RiskStatus;

    use super::*;

    fn tracking_entry(pattern: &str, status: RiskStatus) -> RiskTracking {
        RiskTracking {
            synthetic_risk_id: pattern.to_string(),
            status,
            justification: String::new(),
            ticket: String::new(),
            date: String::new(),
            checked_by: String::new(),
        }
    }

    fn generated(ids: &[&str]) -> BTreeMap<String, Risk> {
        ids.iter()
            .map(|id| {
                let risk = Risk {
                    category_id: id.split('@').next().unwrap_or_default().to_string(),
                    synthetic_id: id.to_string(),
                    title: id.to_string(),
                    severity: stria_model::RiskSeverity::Medium,
                    exploitation_likelihood: stria_model::RiskExploitationLikelihood::Likely,
                    exploitation_impact: stria_model::RiskExploitationImpact::Medium,
                    data_breach_probability: stria_model::DataBreachProbability::Possible,
                    data_breach_technical_asset_ids: Vec::new(),
                    most_relevant_data_asset_id: None,
                    most_relevant_technical_asset_id: None,
                    most_relevant_trust_boundary_id: None,
                    most_relevant_shared_runtime_id: None,
                    most_relevant_communication_link_id: None,
                };
                (id.to_string(), risk)
            })
            .collect()
    }

    #[test]
    fn wildcard_expands_over_matching_risks_only() {
        let mut model = ParsedModel::default();
        model.risk_tracking.insert(
            "my-rule@*".to_string(),
            tracking_entry("my-rule@*", RiskStatus::Accepted),
        );
        let risks = generated(&["my-rule@a", "my-rule@b", "other@c"]);

        apply_wildcard_risk_tracking(&mut model, &risks, false).expect("no orphans");

        assert_eq!(model.risk_tracking.len(), 2);
        assert_eq!(model.risk_tracking["my-rule@a"].status, RiskStatus::Accepted);
        assert_eq!(model.risk_tracking["my-rule@b"].status, RiskStatus::Accepted);
        assert_eq!(
            model.get_risk_tracking_status_defaulting_unchecked(&risks["other@c"]),
            RiskStatus::Unchecked
        );
    }

    #[test]
    fn more_specific_pattern_wins_contested_risks() {
        let mut model = ParsedModel::default();
        model.risk_tracking.insert(
            "my-rule@*".to_string(),
            tracking_entry("my-rule@*", RiskStatus::Accepted),
        );
        model.risk_tracking.insert(
            "my-rule@db*".to_string(),
            tracking_entry("my-rule@db*", RiskStatus::InProgress),
        );
        let risks = generated(&["my-rule@db-main", "my-rule@web"]);

        apply_wildcard_risk_tracking(&mut model, &risks, false).expect("no orphans");

        assert_eq!(
            model.risk_tracking["my-rule@db-main"].status,
            RiskStatus::InProgress
        );
        assert_eq!(model.risk_tracking["my-rule@web"].status, RiskStatus::Accepted);
    }

    #[test]
    fn literal_entry_beats_any_wildcard() {
        let mut model = ParsedModel::default();
        model.risk_tracking.insert(
            "my-rule@*".to_string(),
            tracking_entry("my-rule@*", RiskStatus::Accepted),
        );
        model.risk_tracking.insert(
            "my-rule@a".to_string(),
            tracking_entry("my-rule@a", RiskStatus::FalsePositive),
        );
        let risks = generated(&["my-rule@a"]);

        apply_wildcard_risk_tracking(&mut model, &risks, false).expect("no orphans");

        assert_eq!(
            model.risk_tracking["my-rule@a"].status,
            RiskStatus::FalsePositive
        );
    }

    #[test]
    fn orphaned_entry_is_fatal_unless_ignored() {
        let risks = generated(&["present@a"]);

        let mut strict_model = ParsedModel::default();
        strict_model.risk_tracking.insert(
            "missing-rule@x".to_string(),
            tracking_entry("missing-rule@x", RiskStatus::Mitigated),
        );
        let err = apply_wildcard_risk_tracking(&mut strict_model, &risks, false)
            .expect_err("orphan must be fatal");
        assert!(matches!(err, Error::OrphanedRiskTracking { .. }));
        assert_eq!(err.exit_code(), 2);

        let mut lenient_model = ParsedModel::default();
        lenient_model.risk_tracking.insert(
            "missing-rule@x".to_string(),
            tracking_entry("missing-rule@x", RiskStatus::Mitigated),
        );
        apply_wildcard_risk_tracking(&mut lenient_model, &risks, true)
            .expect("orphan only warns when ignored");
        assert!(lenient_model.risk_tracking.is_empty());
    }

    #[test]
    fn question_mark_is_a_literal_character() {
        let mut model = ParsedModel::default();
        model.risk_tracking.insert(
            "my-rule@?*".to_string(),
            tracking_entry("my-rule@?*", RiskStatus::Accepted),
        );
        let risks = generated(&["my-rule@a", "my-rule@?suffix"]);

        apply_wildcard_risk_tracking(&mut model, &risks, false).expect("matches the literal '?'");

        assert_eq!(model.risk_tracking.len(), 1);
        assert_eq!(
            model.risk_tracking["my-rule@?suffix"].status,
            RiskStatus::Accepted
        );
    }
}
