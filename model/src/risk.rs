use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

use crate::error::UnknownValueError;
use crate::error::parse_enum;

/// Generated risks grouped by their category id.
pub type RisksByCategory = BTreeMap<String, Vec<Risk>>;

/// The six-category STRIDE threat taxonomy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Stride {
    Spoofing,
    Tampering,
    Repudiation,
    InformationDisclosure,
    DenialOfService,
    ElevationOfPrivilege,
}

impl Stride {
    pub fn title(&self) -> &'static str {
        match self {
            Stride::Spoofing => "Spoofing",
            Stride::Tampering => "Tampering",
            Stride::Repudiation => "Repudiation",
            Stride::InformationDisclosure => "Information Disclosure",
            Stride::DenialOfService => "Denial of Service",
            Stride::ElevationOfPrivilege => "Elevation of Privilege",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Stride::Spoofing => "Authenticity violated by identity spoofing",
            Stride::Tampering => "Integrity violated by tampering",
            Stride::Repudiation => "Non-repudiability violated",
            Stride::InformationDisclosure => "Confidentiality violated by disclosure",
            Stride::DenialOfService => "Availability violated by denial of service",
            Stride::ElevationOfPrivilege => "Authorization violated by privilege elevation",
        }
    }
}

impl Default for Stride {
    fn default() -> Self {
        Stride::Tampering
    }
}

impl FromStr for Stride {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("STRIDE", value)
    }
}

/// Which function is responsible for mitigating risks of a category.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskFunction {
    BusinessSide,
    #[default]
    Architecture,
    Development,
    Operations,
}

impl RiskFunction {
    pub fn title(&self) -> &'static str {
        match self {
            RiskFunction::BusinessSide => "Business Side",
            RiskFunction::Architecture => "Architecture",
            RiskFunction::Development => "Development",
            RiskFunction::Operations => "Operations",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            RiskFunction::BusinessSide => "Requirements and risk acceptance",
            RiskFunction::Architecture => "Architectural design decisions",
            RiskFunction::Development => "Secure implementation",
            RiskFunction::Operations => "Secure operation and hardening",
        }
    }
}

impl FromStr for RiskFunction {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("risk function", value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskSeverity {
    Low,
    Medium,
    Elevated,
    High,
    Critical,
}

impl RiskSeverity {
    pub fn title(&self) -> &'static str {
        match self {
            RiskSeverity::Low => "Low",
            RiskSeverity::Medium => "Medium",
            RiskSeverity::Elevated => "Elevated",
            RiskSeverity::High => "High",
            RiskSeverity::Critical => "Critical",
        }
    }
}

impl FromStr for RiskSeverity {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("risk severity", value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskExploitationLikelihood {
    Unlikely,
    #[default]
    Likely,
    VeryLikely,
    Frequent,
}

impl RiskExploitationLikelihood {
    pub fn title(&self) -> &'static str {
        match self {
            RiskExploitationLikelihood::Unlikely => "Unlikely",
            RiskExploitationLikelihood::Likely => "Likely",
            RiskExploitationLikelihood::VeryLikely => "Very Likely",
            RiskExploitationLikelihood::Frequent => "Frequent",
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            RiskExploitationLikelihood::Unlikely => 1,
            RiskExploitationLikelihood::Likely => 2,
            RiskExploitationLikelihood::VeryLikely => 3,
            RiskExploitationLikelihood::Frequent => 4,
        }
    }
}

impl FromStr for RiskExploitationLikelihood {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("risk exploitation likelihood", value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskExploitationImpact {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl RiskExploitationImpact {
    pub fn title(&self) -> &'static str {
        match self {
            RiskExploitationImpact::Low => "Low",
            RiskExploitationImpact::Medium => "Medium",
            RiskExploitationImpact::High => "High",
            RiskExploitationImpact::VeryHigh => "Very High",
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            RiskExploitationImpact::Low => 1,
            RiskExploitationImpact::Medium => 2,
            RiskExploitationImpact::High => 3,
            RiskExploitationImpact::VeryHigh => 4,
        }
    }
}

impl FromStr for RiskExploitationImpact {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("risk exploitation impact", value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DataBreachProbability {
    Improbable,
    #[default]
    Possible,
    Probable,
}

impl DataBreachProbability {
    pub fn title(&self) -> &'static str {
        match self {
            DataBreachProbability::Improbable => "Improbable",
            DataBreachProbability::Possible => "Possible",
            DataBreachProbability::Probable => "Probable",
        }
    }
}

impl FromStr for DataBreachProbability {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("data breach probability", value)
    }
}

/// Tracking state of a risk. Declaration order is the tie-break order used
/// when sorting risks of equal severity (unchecked sorts before mitigated).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskStatus {
    #[default]
    Unchecked,
    InDiscussion,
    Accepted,
    InProgress,
    Mitigated,
    FalsePositive,
}

impl RiskStatus {
    pub fn title(&self) -> &'static str {
        match self {
            RiskStatus::Unchecked => "Unchecked",
            RiskStatus::InDiscussion => "In Discussion",
            RiskStatus::Accepted => "Accepted",
            RiskStatus::InProgress => "In Progress",
            RiskStatus::Mitigated => "Mitigated",
            RiskStatus::FalsePositive => "False Positive",
        }
    }

    /// Mitigated and false-positive are terminal; everything else still
    /// counts as at risk.
    pub fn is_still_at_risk(&self) -> bool {
        matches!(
            self,
            RiskStatus::Unchecked
                | RiskStatus::InDiscussion
                | RiskStatus::Accepted
                | RiskStatus::InProgress
        )
    }
}

impl FromStr for RiskStatus {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("risk status", value)
    }
}

/// Maps the product of likelihood and impact weights through the severity
/// band table.
pub fn calculate_severity(
    likelihood: RiskExploitationLikelihood,
    impact: RiskExploitationImpact,
) -> RiskSeverity {
    match likelihood.weight() * impact.weight() {
        0..=1 => RiskSeverity::Low,
        2..=3 => RiskSeverity::Medium,
        4..=8 => RiskSeverity::Elevated,
        9..=12 => RiskSeverity::High,
        _ => RiskSeverity::Critical,
    }
}

/// Descriptor of a kind of risk a rule (or individual category) can identify.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub asvs: String,
    pub cheat_sheet: String,
    pub action: String,
    pub mitigation: String,
    pub check: String,
    pub detection_logic: String,
    pub risk_assessment: String,
    pub false_positives: String,
    pub function: RiskFunction,
    pub stride: Stride,
    pub model_failure_possible_reason: bool,
    pub cwe: u32,
}

/// A single identified risk instance with traceability to the model elements
/// that caused the finding. The category is referenced by id only; callers
/// resolve it via the engine's indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub category_id: String,
    pub synthetic_id: String,
    pub title: String,
    pub severity: RiskSeverity,
    pub exploitation_likelihood: RiskExploitationLikelihood,
    pub exploitation_impact: RiskExploitationImpact,
    pub data_breach_probability: DataBreachProbability,
    pub data_breach_technical_asset_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub most_relevant_data_asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub most_relevant_technical_asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub most_relevant_trust_boundary_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub most_relevant_shared_runtime_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub most_relevant_communication_link_id: Option<String>,
}

impl Risk {
    /// Synthetic id from the category and the anchor element ids, most
    /// specific first. Stable for a given (category, anchors) pair across
    /// runs, which is what lets risk tracking survive re-evaluation.
    pub fn synthesize_id(category_id: &str, anchor_ids: &[&str]) -> String {
        let mut id = category_id.to_string();
        for anchor in anchor_ids {
            id.push('@');
            id.push_str(anchor);
        }
        id
    }
}

/// A user-supplied decision about an identified risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTracking {
    pub synthetic_risk_id: String,
    pub status: RiskStatus,
    pub justification: String,
    pub ticket: String,
    pub date: String,
    pub checked_by: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn severity_band_table() {
        use RiskExploitationImpact as Impact;
        use RiskExploitationLikelihood as Likelihood;

        assert_eq!(
            calculate_severity(Likelihood::Unlikely, Impact::Low),
            RiskSeverity::Low
        );
        assert_eq!(
            calculate_severity(Likelihood::Unlikely, Impact::Medium),
            RiskSeverity::Medium
        );
        assert_eq!(
            calculate_severity(Likelihood::VeryLikely, Impact::Medium),
            RiskSeverity::Elevated
        );
        assert_eq!(
            calculate_severity(Likelihood::VeryLikely, Impact::High),
            RiskSeverity::High
        );
        assert_eq!(
            calculate_severity(Likelihood::Frequent, Impact::VeryHigh),
            RiskSeverity::Critical
        );
    }

    #[test]
    fn severity_is_total_and_monotonic() {
        for likelihood in RiskExploitationLikelihood::iter() {
            for impact in RiskExploitationImpact::iter() {
                let severity = calculate_severity(likelihood, impact);
                for higher in RiskExploitationLikelihood::iter()
                    .filter(|candidate| candidate >= &likelihood)
                {
                    assert!(calculate_severity(higher, impact) >= severity);
                }
                for higher in
                    RiskExploitationImpact::iter().filter(|candidate| candidate >= &impact)
                {
                    assert!(calculate_severity(likelihood, higher) >= severity);
                }
            }
        }
    }

    #[test]
    fn still_at_risk_is_complement_of_terminal_states() {
        for status in RiskStatus::iter() {
            let terminal = matches!(status, RiskStatus::Mitigated | RiskStatus::FalsePositive);
            assert_eq!(status.is_still_at_risk(), !terminal);
        }
    }

    #[test]
    fn likelihood_parses_with_default_on_empty() {
        assert_eq!(
            crate::parse_or_default::<RiskExploitationLikelihood>(""),
            Ok(RiskExploitationLikelihood::Likely)
        );
        assert_eq!(
            crate::parse_or_default::<RiskExploitationImpact>(""),
            Ok(RiskExploitationImpact::Medium)
        );
        assert!("sometimes".parse::<RiskExploitationLikelihood>().is_err());
    }

    #[test]
    fn synthetic_id_concatenates_anchors() {
        assert_eq!(
            Risk::synthesize_id("sql-nosql-injection", &["web-app", "db"]),
            "sql-nosql-injection@web-app@db"
        );
        assert_eq!(Risk::synthesize_id("missing-hardening", &[]), "missing-hardening");
    }

    #[test]
    fn status_order_puts_open_states_first() {
        assert!(RiskStatus::Unchecked < RiskStatus::Mitigated);
        assert!(RiskStatus::InProgress < RiskStatus::FalsePositive);
    }
}
