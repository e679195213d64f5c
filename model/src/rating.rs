use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

use crate::error::UnknownValueError;
use crate::error::parse_enum;

/// Whether an element serves the business or the development/operations side.
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
pub enum Usage {
    #[default]
    Business,
    Devops,
}

impl Usage {
    pub fn title(&self) -> &'static str {
        match self {
            Usage::Business => "Business",
            Usage::Devops => "DevOps",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Usage::Business => "Used for business-related tasks or processes",
            Usage::Devops => "Used for development or operations of the system",
        }
    }
}

impl FromStr for Usage {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("usage", value)
    }
}

/// How much data of a kind is around; projects onto a Fibonacci factor used
/// by rules to scale probable data-breach magnitude.
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
pub enum Quantity {
    VeryFew,
    Few,
    Many,
    VeryMany,
}

impl Quantity {
    pub fn title(&self) -> &'static str {
        match self {
            Quantity::VeryFew => "Very Few",
            Quantity::Few => "Few",
            Quantity::Many => "Many",
            Quantity::VeryMany => "Very Many",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Quantity::VeryFew => "Very few data is processed or stored",
            Quantity::Few => "Few data is processed or stored",
            Quantity::Many => "Many data is processed or stored",
            Quantity::VeryMany => "Very many data is processed or stored",
        }
    }

    pub fn quantity_factor(&self) -> f64 {
        match self {
            Quantity::VeryFew => 1.0,
            Quantity::Few => 2.0,
            Quantity::Many => 3.0,
            Quantity::VeryMany => 5.0,
        }
    }
}

impl FromStr for Quantity {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("quantity", value)
    }
}

/// Confidentiality rating of data or of a technical asset. The declaration
/// order is the total order used for all "highest of" reductions.
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
pub enum Confidentiality {
    Public,
    Internal,
    Restricted,
    Confidential,
    StrictlyConfidential,
}

impl Confidentiality {
    pub fn title(&self) -> &'static str {
        match self {
            Confidentiality::Public => "Public",
            Confidentiality::Internal => "Internal",
            Confidentiality::Restricted => "Restricted",
            Confidentiality::Confidential => "Confidential",
            Confidentiality::StrictlyConfidential => "Strictly Confidential",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Confidentiality::Public => "Public available information",
            Confidentiality::Internal => "(Company) internal information",
            Confidentiality::Restricted => "Internal and with restricted access",
            Confidentiality::Confidential => "Confidential information",
            Confidentiality::StrictlyConfidential => "Strictly confidential information",
        }
    }

    pub fn attacker_attractiveness_for_asset(&self) -> f64 {
        match self {
            Confidentiality::Public => 8.0,
            Confidentiality::Internal => 13.0,
            Confidentiality::Restricted => 21.0,
            Confidentiality::Confidential => 34.0,
            Confidentiality::StrictlyConfidential => 55.0,
        }
    }

    pub fn attacker_attractiveness_for_processed_or_stored_data(&self) -> f64 {
        match self {
            Confidentiality::Public => 5.0,
            Confidentiality::Internal => 8.0,
            Confidentiality::Restricted => 13.0,
            Confidentiality::Confidential => 21.0,
            Confidentiality::StrictlyConfidential => 34.0,
        }
    }

    pub fn attacker_attractiveness_for_in_transit_data(&self) -> f64 {
        match self {
            Confidentiality::Public => 2.0,
            Confidentiality::Internal => 3.0,
            Confidentiality::Restricted => 5.0,
            Confidentiality::Confidential => 8.0,
            Confidentiality::StrictlyConfidential => 13.0,
        }
    }
}

impl FromStr for Confidentiality {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("confidentiality", value)
    }
}

/// Integrity/availability criticality scale, also used for the overall
/// business criticality of the modeled system.
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
pub enum Criticality {
    Archive,
    Operational,
    Important,
    Critical,
    MissionCritical,
}

impl Criticality {
    pub fn title(&self) -> &'static str {
        match self {
            Criticality::Archive => "Archive",
            Criticality::Operational => "Operational",
            Criticality::Important => "Important",
            Criticality::Critical => "Critical",
            Criticality::MissionCritical => "Mission Critical",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Criticality::Archive => "Stored only for archiving reasons",
            Criticality::Operational => "Regular operational processes depend on it",
            Criticality::Important => "Important parts of the system depend on it",
            Criticality::Critical => "Critical parts of the system depend on it",
            Criticality::MissionCritical => "The whole mission depends on it",
        }
    }

    pub fn attacker_attractiveness_for_asset(&self) -> f64 {
        match self {
            Criticality::Archive => 5.0,
            Criticality::Operational => 8.0,
            Criticality::Important => 13.0,
            Criticality::Critical => 21.0,
            Criticality::MissionCritical => 34.0,
        }
    }

    pub fn attacker_attractiveness_for_processed_or_stored_data(&self) -> f64 {
        match self {
            Criticality::Archive => 3.0,
            Criticality::Operational => 5.0,
            Criticality::Important => 8.0,
            Criticality::Critical => 13.0,
            Criticality::MissionCritical => 21.0,
        }
    }

    pub fn attacker_attractiveness_for_in_transit_data(&self) -> f64 {
        match self {
            Criticality::Archive => 1.0,
            Criticality::Operational => 2.0,
            Criticality::Important => 3.0,
            Criticality::Critical => 5.0,
            Criticality::MissionCritical => 8.0,
        }
    }
}

impl FromStr for Criticality {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("criticality", value)
    }
}
