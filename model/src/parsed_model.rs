use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::CommunicationLink;
use crate::Criticality;
use crate::DataAsset;
use crate::Risk;
use crate::RiskCategory;
use crate::RiskStatus;
use crate::RiskTracking;
use crate::SharedRuntime;
use crate::TechnicalAsset;
use crate::TrustBoundary;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub homepage: String,
}

/// The canonical in-memory representation of a threat model.
///
/// Built once from the input document and treated as immutable by rule
/// evaluation, except for the per-technical-asset RAA field written by the
/// RAA pre-pass. The derived index fields are excluded from serialization
/// and rebuilt via [`ParsedModel::update_derived_indices`] whenever the
/// entity maps are replaced (including after deserializing on the plugin
/// side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedModel {
    pub title: String,
    pub author: Author,
    pub date: String,
    pub management_summary_comment: String,
    pub business_criticality: Criticality,
    pub security_requirements: BTreeMap<String, String>,
    pub questions: BTreeMap<String, String>,
    pub abuse_cases: BTreeMap<String, String>,
    pub tags_available: Vec<String>,
    pub data_assets: BTreeMap<String, DataAsset>,
    pub technical_assets: BTreeMap<String, TechnicalAsset>,
    pub trust_boundaries: BTreeMap<String, TrustBoundary>,
    pub shared_runtimes: BTreeMap<String, SharedRuntime>,
    pub individual_risk_categories: BTreeMap<String, RiskCategory>,
    pub risk_tracking: BTreeMap<String, RiskTracking>,

    #[serde(skip)]
    pub communication_links: BTreeMap<String, CommunicationLink>,
    #[serde(skip)]
    pub incoming_communication_links_by_target_id: BTreeMap<String, Vec<CommunicationLink>>,
    #[serde(skip)]
    pub trust_boundary_by_technical_asset_id: BTreeMap<String, String>,
    #[serde(skip)]
    pub shared_runtime_by_technical_asset_id: BTreeMap<String, String>,
    #[serde(skip)]
    pub all_supported_tags: BTreeSet<String>,
}

impl Default for ParsedModel {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: Author::default(),
            date: String::new(),
            management_summary_comment: String::new(),
            business_criticality: Criticality::Important,
            security_requirements: BTreeMap::new(),
            questions: BTreeMap::new(),
            abuse_cases: BTreeMap::new(),
            tags_available: Vec::new(),
            data_assets: BTreeMap::new(),
            technical_assets: BTreeMap::new(),
            trust_boundaries: BTreeMap::new(),
            shared_runtimes: BTreeMap::new(),
            individual_risk_categories: BTreeMap::new(),
            risk_tracking: BTreeMap::new(),
            communication_links: BTreeMap::new(),
            incoming_communication_links_by_target_id: BTreeMap::new(),
            trust_boundary_by_technical_asset_id: BTreeMap::new(),
            shared_runtime_by_technical_asset_id: BTreeMap::new(),
            all_supported_tags: BTreeSet::new(),
        }
    }
}

impl ParsedModel {
    /// Rebuilds the reverse maps: all communication links by id, incoming
    /// links per target, direct containment of technical assets in trust
    /// boundaries and shared runtimes, and the supported-tag universe.
    pub fn update_derived_indices(&mut self) {
        self.communication_links.clear();
        self.incoming_communication_links_by_target_id.clear();
        self.trust_boundary_by_technical_asset_id.clear();
        self.shared_runtime_by_technical_asset_id.clear();

        for asset in self.technical_assets.values() {
            for link in &asset.communication_links {
                self.communication_links.insert(link.id.clone(), link.clone());
                self.incoming_communication_links_by_target_id
                    .entry(link.target_id.clone())
                    .or_default()
                    .push(link.clone());
            }
        }
        for links in self.incoming_communication_links_by_target_id.values_mut() {
            links.sort_by(|left, right| left.id.cmp(&right.id));
        }

        for boundary in self.trust_boundaries.values() {
            for asset_id in &boundary.technical_assets_inside {
                self.trust_boundary_by_technical_asset_id
                    .insert(asset_id.clone(), boundary.id.clone());
            }
        }
        for runtime in self.shared_runtimes.values() {
            for asset_id in &runtime.technical_assets_running {
                self.shared_runtime_by_technical_asset_id
                    .insert(asset_id.clone(), runtime.id.clone());
            }
        }

        self.all_supported_tags
            .extend(self.tags_available.iter().cloned());
        for asset in self.technical_assets.values() {
            self.all_supported_tags.extend(asset.tags.iter().cloned());
        }
        for data_asset in self.data_assets.values() {
            self.all_supported_tags.extend(data_asset.tags.iter().cloned());
        }
    }

    pub fn add_to_supported_tags(&mut self, tags: &[String]) {
        self.all_supported_tags.extend(tags.iter().cloned());
    }

    pub fn incoming_communication_links(&self, target_id: &str) -> &[CommunicationLink] {
        self.incoming_communication_links_by_target_id
            .get(target_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The trust boundary directly containing the technical asset, if any.
    pub fn direct_containing_trust_boundary(&self, asset_id: &str) -> Option<&TrustBoundary> {
        let boundary_id = self.trust_boundary_by_technical_asset_id.get(asset_id)?;
        self.trust_boundaries.get(boundary_id)
    }

    pub fn direct_containing_shared_runtime(&self, asset_id: &str) -> Option<&SharedRuntime> {
        let runtime_id = self.shared_runtime_by_technical_asset_id.get(asset_id)?;
        self.shared_runtimes.get(runtime_id)
    }

    /// The boundary whose nested list names the given boundary. Nesting forms
    /// a forest, so there is at most one.
    pub fn parent_trust_boundary_of(&self, boundary_id: &str) -> Option<&TrustBoundary> {
        self.trust_boundaries.values().find(|candidate| {
            candidate
                .trust_boundaries_nested
                .iter()
                .any(|nested| nested == boundary_id)
        })
    }

    /// Nearest enclosing network-type boundary of a technical asset.
    /// Execution-environment boundaries are transparent for this walk.
    pub fn network_trust_boundary_of(&self, asset_id: &str) -> Option<&TrustBoundary> {
        let mut current = self.direct_containing_trust_boundary(asset_id);
        while let Some(boundary) = current {
            if boundary.boundary_type.is_network_boundary() {
                return Some(boundary);
            }
            current = self.parent_trust_boundary_of(&boundary.id);
        }
        None
    }

    /// True when both assets are directly contained in the same trust
    /// boundary (or both in none).
    pub fn is_same_trust_boundary(&self, left_id: &str, right_id: &str) -> bool {
        self.trust_boundary_by_technical_asset_id.get(left_id)
            == self.trust_boundary_by_technical_asset_id.get(right_id)
    }

    /// True when both assets resolve to the same nearest network boundary.
    pub fn is_same_trust_boundary_network_only(&self, left_id: &str, right_id: &str) -> bool {
        let left = self.network_trust_boundary_of(left_id).map(|boundary| &boundary.id);
        let right = self
            .network_trust_boundary_of(right_id)
            .map(|boundary| &boundary.id);
        left == right
    }

    /// True when both assets are boundary-less, or their boundary ancestor
    /// paths (including the direct boundary itself) share any id.
    pub fn is_sharing_same_parent_trust_boundary(&self, left_id: &str, right_id: &str) -> bool {
        let left_boundary = self.trust_boundary_by_technical_asset_id.get(left_id);
        let right_boundary = self.trust_boundary_by_technical_asset_id.get(right_id);
        match (left_boundary, right_boundary) {
            (None, None) => true,
            (None, Some(_)) | (Some(_), None) => false,
            (Some(left), Some(right)) => {
                let left_path = self.boundary_path_upwards(left);
                let right_path = self.boundary_path_upwards(right);
                left_path.iter().any(|id| right_path.contains(id))
            }
        }
    }

    fn boundary_path_upwards(&self, boundary_id: &str) -> Vec<String> {
        let mut path = vec![boundary_id.to_string()];
        if let Some(boundary) = self.trust_boundaries.get(boundary_id) {
            path.extend(boundary.all_parent_trust_boundary_ids(self));
        }
        path
    }

    /// Tracking status of a risk; risks without a tracking entry default to
    /// unchecked.
    pub fn get_risk_tracking_status_defaulting_unchecked(&self, risk: &Risk) -> RiskStatus {
        self.risk_tracking
            .get(&risk.synthetic_id)
            .map(|tracking| tracking.status)
            .unwrap_or_default()
    }

    pub fn is_risk_tracked(&self, risk: &Risk) -> bool {
        self.risk_tracking.contains_key(&risk.synthetic_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Confidentiality;
    use crate::testing;

    #[test]
    fn sensitivity_propagates_from_stored_data() {
        let mut model = testing::empty_model();
        testing::add_data_asset(&mut model, "customer-data", |data| {
            data.confidentiality = Confidentiality::StrictlyConfidential;
        });
        testing::add_technical_asset(&mut model, "app", |asset| {
            asset.confidentiality = Confidentiality::Internal;
            asset.data_assets_stored = vec!["customer-data".to_string()];
        });
        model.update_derived_indices();

        let app = &model.technical_assets["app"];
        assert_eq!(
            app.highest_confidentiality(&model),
            Confidentiality::StrictlyConfidential
        );
    }

    #[test]
    fn sensitivity_never_drops_below_own_rating() {
        let mut model = testing::empty_model();
        testing::add_data_asset(&mut model, "public-data", |data| {
            data.confidentiality = Confidentiality::Public;
        });
        testing::add_technical_asset(&mut model, "app", |asset| {
            asset.confidentiality = Confidentiality::Confidential;
            asset.data_assets_processed = vec!["public-data".to_string()];
        });
        model.update_derived_indices();

        let app = &model.technical_assets["app"];
        assert_eq!(
            app.highest_confidentiality(&model),
            Confidentiality::Confidential
        );
    }

    #[test]
    fn empty_trust_boundary_has_minimal_sensitivity() {
        let mut model = testing::empty_model();
        testing::add_trust_boundary(&mut model, "empty", &[], &[]);
        model.update_derived_indices();

        let boundary = &model.trust_boundaries["empty"];
        assert_eq!(
            boundary.highest_confidentiality(&model),
            Confidentiality::Public
        );
        assert_eq!(boundary.highest_integrity(&model), Criticality::Archive);
        assert_eq!(boundary.highest_availability(&model), Criticality::Archive);
    }

    #[test]
    fn recursive_asset_collection_dedupes_across_nesting() {
        let mut model = testing::empty_model();
        testing::add_technical_asset(&mut model, "a", |_| {});
        testing::add_technical_asset(&mut model, "b", |_| {});
        testing::add_trust_boundary(&mut model, "inner", &["a", "b"], &[]);
        testing::add_trust_boundary(&mut model, "outer", &["a"], &["inner"]);
        model.update_derived_indices();

        let outer = &model.trust_boundaries["outer"];
        assert_eq!(
            outer.recursively_all_technical_asset_ids_inside(&model),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn network_only_walk_skips_execution_environments() {
        use crate::TrustBoundaryType;

        let mut model = testing::empty_model();
        testing::add_technical_asset(&mut model, "service", |_| {});
        testing::add_technical_asset(&mut model, "peer", |_| {});
        testing::add_trust_boundary(&mut model, "vlan", &["peer"], &["runtime-env"]);
        testing::add_trust_boundary(&mut model, "runtime-env", &["service"], &[]);
        if let Some(boundary) = model.trust_boundaries.get_mut("runtime-env") {
            boundary.boundary_type = TrustBoundaryType::ExecutionEnvironment;
        }
        model.update_derived_indices();

        assert!(!model.is_same_trust_boundary("service", "peer"));
        assert!(model.is_same_trust_boundary_network_only("service", "peer"));
        assert!(model.is_sharing_same_parent_trust_boundary("service", "peer"));
    }

    #[test]
    fn boundary_less_assets_share_the_nowhere_boundary() {
        let mut model = testing::empty_model();
        testing::add_technical_asset(&mut model, "a", |_| {});
        testing::add_technical_asset(&mut model, "b", |_| {});
        model.update_derived_indices();

        assert!(model.is_same_trust_boundary("a", "b"));
        assert!(model.is_sharing_same_parent_trust_boundary("a", "b"));
    }

    #[test]
    fn shared_runtime_sensitivity_follows_the_running_assets() {
        let mut model = testing::empty_model();
        testing::add_data_asset(&mut model, "payroll", |data| {
            data.confidentiality = Confidentiality::StrictlyConfidential;
        });
        testing::add_technical_asset(&mut model, "hr-app", |asset| {
            asset.data_assets_processed = vec!["payroll".to_string()];
        });
        testing::add_technical_asset(&mut model, "wiki", |_| {});
        testing::add_shared_runtime(&mut model, "app-server-pool", &["hr-app", "wiki"]);
        model.update_derived_indices();

        let runtime = &model.shared_runtimes["app-server-pool"];
        assert_eq!(
            runtime.highest_confidentiality(&model),
            Confidentiality::StrictlyConfidential
        );
        assert_eq!(
            model
                .direct_containing_shared_runtime("wiki")
                .map(|runtime| runtime.id.as_str()),
            Some("app-server-pool")
        );
    }

    #[test]
    fn model_round_trips_through_serialization() {
        let mut model = testing::empty_model();
        testing::add_data_asset(&mut model, "customer-data", |data| {
            data.confidentiality = Confidentiality::Confidential;
        });
        testing::add_technical_asset(&mut model, "frontend", |_| {});
        testing::add_technical_asset(&mut model, "backend", |asset| {
            asset.data_assets_stored = vec!["customer-data".to_string()];
        });
        testing::add_communication_link(&mut model, "frontend", "backend", "api call", |_| {});
        testing::add_trust_boundary(&mut model, "backend-net", &["backend"], &[]);
        model.update_derived_indices();

        let json = serde_json::to_string(&model).expect("serializes");
        let mut restored: ParsedModel = serde_json::from_str(&json).expect("deserializes");
        restored.update_derived_indices();
        assert_eq!(restored, model);
    }

    #[test]
    fn incoming_links_are_indexed_per_target() {
        let mut model = testing::empty_model();
        testing::add_technical_asset(&mut model, "frontend", |_| {});
        testing::add_technical_asset(&mut model, "backend", |_| {});
        testing::add_communication_link(&mut model, "frontend", "backend", "api call", |_| {});
        model.update_derived_indices();

        let incoming = model.incoming_communication_links("backend");
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].source_id, "frontend");
        assert!(model.incoming_communication_links("frontend").is_empty());
    }
}
