use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

use crate::Confidentiality;
use crate::Criticality;
use crate::ParsedModel;
use crate::error::UnknownValueError;
use crate::error::parse_enum;

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
pub enum TrustBoundaryType {
    NetworkOnPrem,
    NetworkDedicatedHoster,
    NetworkVlan,
    NetworkCloudProvider,
    NetworkCloudSecurityGroup,
    NetworkPolicyNamespaceIsolation,
    ExecutionEnvironment,
}

impl TrustBoundaryType {
    pub fn explain(&self) -> &'static str {
        match self {
            TrustBoundaryType::NetworkOnPrem => "On-premises network",
            TrustBoundaryType::NetworkDedicatedHoster => "Network of a dedicated hoster",
            TrustBoundaryType::NetworkVlan => "Network VLAN",
            TrustBoundaryType::NetworkCloudProvider => "Network of a cloud provider",
            TrustBoundaryType::NetworkCloudSecurityGroup => "Cloud security group",
            TrustBoundaryType::NetworkPolicyNamespaceIsolation => {
                "Namespace isolation via network policies"
            }
            TrustBoundaryType::ExecutionEnvironment => "Execution environment (process boundary)",
        }
    }

    /// Execution-environment boundaries group processes, not networks; every
    /// other type separates networks.
    pub fn is_network_boundary(&self) -> bool {
        *self != TrustBoundaryType::ExecutionEnvironment
    }

    pub fn is_within_cloud(&self) -> bool {
        matches!(
            self,
            TrustBoundaryType::NetworkCloudProvider | TrustBoundaryType::NetworkCloudSecurityGroup
        )
    }
}

impl FromStr for TrustBoundaryType {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("trust boundary type", value)
    }
}

/// A network, cloud, or logical boundary grouping technical assets.
/// Boundaries form a forest via `trust_boundaries_nested`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustBoundary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub boundary_type: TrustBoundaryType,
    pub tags: Vec<String>,
    pub technical_assets_inside: Vec<String>,
    pub trust_boundaries_nested: Vec<String>,
}

impl TrustBoundary {
    pub fn is_tagged_with_any(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }

    /// Union of directly contained technical asset ids across the whole
    /// subtree, without duplicates. Terminates on any acyclic forest.
    pub fn recursively_all_technical_asset_ids_inside(&self, model: &ParsedModel) -> Vec<String> {
        let mut collected = BTreeSet::new();
        self.collect_asset_ids(model, &mut collected);
        collected.into_iter().collect()
    }

    fn collect_asset_ids(&self, model: &ParsedModel, collected: &mut BTreeSet<String>) {
        collected.extend(self.technical_assets_inside.iter().cloned());
        for nested_id in &self.trust_boundaries_nested {
            if let Some(nested) = model.trust_boundaries.get(nested_id) {
                nested.collect_asset_ids(model, collected);
            }
        }
    }

    /// Highest confidentiality over all technical assets reachable by
    /// recursive descent through nested boundaries.
    pub fn highest_confidentiality(&self, model: &ParsedModel) -> Confidentiality {
        let mut highest = Confidentiality::Public;
        for asset_id in self.recursively_all_technical_asset_ids_inside(model) {
            if let Some(asset) = model.technical_assets.get(&asset_id) {
                highest = highest.max(asset.highest_confidentiality(model));
            }
        }
        highest
    }

    pub fn highest_integrity(&self, model: &ParsedModel) -> Criticality {
        let mut highest = Criticality::Archive;
        for asset_id in self.recursively_all_technical_asset_ids_inside(model) {
            if let Some(asset) = model.technical_assets.get(&asset_id) {
                highest = highest.max(asset.highest_integrity(model));
            }
        }
        highest
    }

    pub fn highest_availability(&self, model: &ParsedModel) -> Criticality {
        let mut highest = Criticality::Archive;
        for asset_id in self.recursively_all_technical_asset_ids_inside(model) {
            if let Some(asset) = model.technical_assets.get(&asset_id) {
                highest = highest.max(asset.highest_availability(model));
            }
        }
        highest
    }

    /// Ancestor chain of this boundary, nearest parent first.
    pub fn all_parent_trust_boundary_ids(&self, model: &ParsedModel) -> Vec<String> {
        let mut parents = Vec::new();
        let mut current = self.id.clone();
        while let Some(parent) = model.parent_trust_boundary_of(&current) {
            parents.push(parent.id.clone());
            current = parent.id.clone();
        }
        parents
    }
}

/// Co-hosting relation: several technical assets sharing the same execution
/// substrate for failure-domain purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedRuntime {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub technical_assets_running: Vec<String>,
}

impl SharedRuntime {
    pub fn is_tagged_with_any(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }

    pub fn highest_confidentiality(&self, model: &ParsedModel) -> Confidentiality {
        let mut highest = Confidentiality::Public;
        for asset_id in &self.technical_assets_running {
            if let Some(asset) = model.technical_assets.get(asset_id) {
                highest = highest.max(asset.highest_confidentiality(model));
            }
        }
        highest
    }

    pub fn highest_integrity(&self, model: &ParsedModel) -> Criticality {
        let mut highest = Criticality::Archive;
        for asset_id in &self.technical_assets_running {
            if let Some(asset) = model.technical_assets.get(asset_id) {
                highest = highest.max(asset.highest_integrity(model));
            }
        }
        highest
    }

    pub fn highest_availability(&self, model: &ParsedModel) -> Criticality {
        let mut highest = Criticality::Archive;
        for asset_id in &self.technical_assets_running {
            if let Some(asset) = model.technical_assets.get(asset_id) {
                highest = highest.max(asset.highest_availability(model));
            }
        }
        highest
    }
}
