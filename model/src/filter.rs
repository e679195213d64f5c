use std::collections::BTreeMap;

use crate::ParsedModel;
use crate::Risk;
use crate::RiskCategory;
use crate::RiskFunction;
use crate::RiskSeverity;
use crate::RiskStatus;
use crate::RisksByCategory;
use crate::Stride;

/// Risks whose tracking status has not reached a terminal state.
pub fn filtered_by_still_at_risk(model: &ParsedModel, risks: &[Risk]) -> Vec<Risk> {
    risks
        .iter()
        .filter(|risk| {
            model
                .get_risk_tracking_status_defaulting_unchecked(risk)
                .is_still_at_risk()
        })
        .cloned()
        .collect()
}

pub fn filtered_by_severity(risks: &[Risk], severity: RiskSeverity) -> Vec<Risk> {
    risks
        .iter()
        .filter(|risk| risk.severity == severity)
        .cloned()
        .collect()
}

pub fn filtered_by_status(model: &ParsedModel, risks: &[Risk], status: RiskStatus) -> Vec<Risk> {
    risks
        .iter()
        .filter(|risk| model.get_risk_tracking_status_defaulting_unchecked(risk) == status)
        .cloned()
        .collect()
}

pub fn filtered_by_stride(
    risks: &[Risk],
    categories: &BTreeMap<String, RiskCategory>,
    stride: Stride,
) -> Vec<Risk> {
    risks
        .iter()
        .filter(|risk| {
            categories
                .get(&risk.category_id)
                .is_some_and(|category| category.stride == stride)
        })
        .cloned()
        .collect()
}

pub fn filtered_by_function(
    risks: &[Risk],
    categories: &BTreeMap<String, RiskCategory>,
    function: RiskFunction,
) -> Vec<Risk> {
    risks
        .iter()
        .filter(|risk| {
            categories
                .get(&risk.category_id)
                .is_some_and(|category| category.function == function)
        })
        .cloned()
        .collect()
}

/// Risks whose category can also indicate a modeling mistake rather than a
/// real weakness.
pub fn filtered_by_model_failures(
    risks: &[Risk],
    categories: &BTreeMap<String, RiskCategory>,
) -> Vec<Risk> {
    risks
        .iter()
        .filter(|risk| {
            categories
                .get(&risk.category_id)
                .is_some_and(|category| category.model_failure_possible_reason)
        })
        .cloned()
        .collect()
}

/// Highest severity among the given risks; `initial_risks` considers every
/// risk, otherwise only those still at risk. `None` when nothing qualifies.
pub(crate) fn highest_severity(
    model: &ParsedModel,
    risks: &[Risk],
    initial_risks: bool,
) -> Option<RiskSeverity> {
    risks
        .iter()
        .filter(|risk| {
            initial_risks
                || model
                    .get_risk_tracking_status_defaulting_unchecked(risk)
                    .is_still_at_risk()
        })
        .map(|risk| risk.severity)
        .max()
}

fn categories_with_highest_severity(
    model: &ParsedModel,
    categories: &BTreeMap<String, RiskCategory>,
    risks_by_category: &RisksByCategory,
    severity: RiskSeverity,
    initial_risks: bool,
) -> Vec<RiskCategory> {
    let mut matching = Vec::new();
    for (category_id, risks) in risks_by_category {
        if highest_severity(model, risks, initial_risks) == Some(severity)
            && let Some(category) = categories.get(category_id)
        {
            matching.push(category.clone());
        }
    }
    matching
}

/// Categories whose highest contained severity is exactly critical.
pub fn categories_of_only_critical_risks(
    model: &ParsedModel,
    categories: &BTreeMap<String, RiskCategory>,
    risks_by_category: &RisksByCategory,
    initial_risks: bool,
) -> Vec<RiskCategory> {
    categories_with_highest_severity(
        model,
        categories,
        risks_by_category,
        RiskSeverity::Critical,
        initial_risks,
    )
}

/// Categories whose highest contained severity is exactly high, i.e. those
/// also containing critical risks are excluded.
pub fn categories_of_only_high_risks(
    model: &ParsedModel,
    categories: &BTreeMap<String, RiskCategory>,
    risks_by_category: &RisksByCategory,
    initial_risks: bool,
) -> Vec<RiskCategory> {
    categories_with_highest_severity(
        model,
        categories,
        risks_by_category,
        RiskSeverity::High,
        initial_risks,
    )
}

pub fn categories_of_only_elevated_risks(
    model: &ParsedModel,
    categories: &BTreeMap<String, RiskCategory>,
    risks_by_category: &RisksByCategory,
    initial_risks: bool,
) -> Vec<RiskCategory> {
    categories_with_highest_severity(
        model,
        categories,
        risks_by_category,
        RiskSeverity::Elevated,
        initial_risks,
    )
}

pub fn categories_of_only_medium_risks(
    model: &ParsedModel,
    categories: &BTreeMap<String, RiskCategory>,
    risks_by_category: &RisksByCategory,
    initial_risks: bool,
) -> Vec<RiskCategory> {
    categories_with_highest_severity(
        model,
        categories,
        risks_by_category,
        RiskSeverity::Medium,
        initial_risks,
    )
}

pub fn categories_of_only_low_risks(
    model: &ParsedModel,
    categories: &BTreeMap<String, RiskCategory>,
    risks_by_category: &RisksByCategory,
    initial_risks: bool,
) -> Vec<RiskCategory> {
    categories_with_highest_severity(
        model,
        categories,
        risks_by_category,
        RiskSeverity::Low,
        initial_risks,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::RiskExploitationImpact as Impact;
    use crate::RiskExploitationLikelihood as Likelihood;
    use crate::RiskTracking;
    use crate::testing;

    fn tracked(model: &mut ParsedModel, synthetic_id: &str, status: RiskStatus) {
        model.risk_tracking.insert(
            synthetic_id.to_string(),
            RiskTracking {
                synthetic_risk_id: synthetic_id.to_string(),
                status,
                justification: String::new(),
                ticket: String::new(),
                date: String::new(),
                checked_by: String::new(),
            },
        );
    }

    #[test]
    fn still_at_risk_filter_is_complement_of_terminal_statuses() {
        let mut model = testing::empty_model();
        let risks = vec![
            testing::risk("rule-a", "open", Likelihood::Likely, Impact::Medium),
            testing::risk("rule-a", "fixed", Likelihood::Likely, Impact::Medium),
            testing::risk("rule-a", "noise", Likelihood::Likely, Impact::Medium),
        ];
        tracked(&mut model, "rule-a@fixed", RiskStatus::Mitigated);
        tracked(&mut model, "rule-a@noise", RiskStatus::FalsePositive);

        let open = filtered_by_still_at_risk(&model, &risks);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].synthetic_id, "rule-a@open");

        let closed: Vec<Risk> = risks
            .iter()
            .filter(|risk| !open.contains(risk))
            .cloned()
            .collect();
        for risk in closed {
            assert!(
                !model
                    .get_risk_tracking_status_defaulting_unchecked(&risk)
                    .is_still_at_risk()
            );
        }
    }

    #[test]
    fn categories_of_only_high_excludes_critical_categories() {
        let model = testing::empty_model();
        let mut categories = BTreeMap::new();
        for id in ["only-high", "also-critical"] {
            categories.insert(
                id.to_string(),
                RiskCategory {
                    id: id.to_string(),
                    title: id.to_string(),
                    ..RiskCategory::default()
                },
            );
        }
        let mut risks_by_category = RisksByCategory::new();
        risks_by_category.insert(
            "only-high".to_string(),
            vec![testing::risk("only-high", "a", Likelihood::VeryLikely, Impact::High)],
        );
        risks_by_category.insert(
            "also-critical".to_string(),
            vec![
                testing::risk("also-critical", "a", Likelihood::VeryLikely, Impact::High),
                testing::risk("also-critical", "b", Likelihood::Frequent, Impact::VeryHigh),
            ],
        );

        let only_high =
            categories_of_only_high_risks(&model, &categories, &risks_by_category, true);
        assert_eq!(only_high.len(), 1);
        assert_eq!(only_high[0].id, "only-high");

        let only_critical =
            categories_of_only_critical_risks(&model, &categories, &risks_by_category, true);
        assert_eq!(only_critical.len(), 1);
        assert_eq!(only_critical[0].id, "also-critical");
    }

    #[test]
    fn mitigation_moves_category_out_of_still_at_risk_band() {
        let mut model = testing::empty_model();
        let mut categories = BTreeMap::new();
        categories.insert(
            "rule-a".to_string(),
            RiskCategory {
                id: "rule-a".to_string(),
                ..RiskCategory::default()
            },
        );
        let mut risks_by_category = RisksByCategory::new();
        risks_by_category.insert(
            "rule-a".to_string(),
            vec![testing::risk("rule-a", "a", Likelihood::Frequent, Impact::VeryHigh)],
        );
        tracked(&mut model, "rule-a@a", RiskStatus::Mitigated);

        let initial =
            categories_of_only_critical_risks(&model, &categories, &risks_by_category, true);
        assert_eq!(initial.len(), 1);
        let still_at_risk =
            categories_of_only_critical_risks(&model, &categories, &risks_by_category, false);
        assert!(still_at_risk.is_empty());
    }
}
