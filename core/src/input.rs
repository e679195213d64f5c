use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::Error;
use crate::error::Result;

/// The raw input document as read from disk: identifiers and enumeration
/// values are still plain strings at this stage. Parsing into the typed
/// model happens in [`crate::parse`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ModelInput {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: AuthorInput,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub business_criticality: String,
    #[serde(default)]
    pub management_summary_comment: String,
    #[serde(default)]
    pub questions: BTreeMap<String, String>,
    #[serde(default)]
    pub abuse_cases: BTreeMap<String, String>,
    #[serde(default)]
    pub security_requirements: BTreeMap<String, String>,
    #[serde(default)]
    pub tags_available: Vec<String>,
    #[serde(default)]
    pub data_assets: BTreeMap<String, DataAssetInput>,
    #[serde(default)]
    pub technical_assets: BTreeMap<String, TechnicalAssetInput>,
    #[serde(default)]
    pub trust_boundaries: BTreeMap<String, TrustBoundaryInput>,
    #[serde(default)]
    pub shared_runtimes: BTreeMap<String, SharedRuntimeInput>,
    #[serde(default)]
    pub individual_risk_categories: BTreeMap<String, IndividualRiskCategoryInput>,
    #[serde(default)]
    pub risk_tracking: BTreeMap<String, RiskTrackingInput>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AuthorInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub homepage: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DataAssetInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub confidentiality: String,
    #[serde(default)]
    pub integrity: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub justification_cia_rating: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TechnicalAssetInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default, rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub machine: String,
    #[serde(default)]
    pub internet: bool,
    #[serde(default)]
    pub multi_tenant: bool,
    #[serde(default)]
    pub redundant: bool,
    #[serde(default)]
    pub custom_developed_parts: bool,
    #[serde(default)]
    pub out_of_scope: bool,
    #[serde(default)]
    pub justification_out_of_scope: String,
    #[serde(default)]
    pub used_as_client_by_human: bool,
    #[serde(default)]
    pub encryption: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub confidentiality: String,
    #[serde(default)]
    pub integrity: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub justification_cia_rating: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub data_assets_processed: Vec<String>,
    #[serde(default)]
    pub data_assets_stored: Vec<String>,
    #[serde(default)]
    pub data_formats_accepted: Vec<String>,
    #[serde(default)]
    pub diagram_tweak_order: i64,
    /// Keyed by link title; the stable link id is synthesized during parsing.
    #[serde(default)]
    pub communication_links: BTreeMap<String, CommunicationLinkInput>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CommunicationLinkInput {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub authentication: String,
    #[serde(default)]
    pub authorization: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub vpn: bool,
    #[serde(default)]
    pub ip_filtered: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub data_assets_sent: Vec<String>,
    #[serde(default)]
    pub data_assets_received: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TrustBoundaryInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub boundary_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub technical_assets_inside: Vec<String>,
    #[serde(default)]
    pub trust_boundaries_nested: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SharedRuntimeInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub technical_assets_running: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct IndividualRiskCategoryInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub asvs: String,
    #[serde(default)]
    pub cheat_sheet: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub mitigation: String,
    #[serde(default)]
    pub check: String,
    #[serde(default)]
    pub detection_logic: String,
    #[serde(default)]
    pub risk_assessment: String,
    #[serde(default)]
    pub false_positives: String,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub stride: String,
    #[serde(default)]
    pub model_failure_possible_reason: bool,
    #[serde(default)]
    pub cwe: u32,
    /// Manually identified risks of this category, keyed by title.
    #[serde(default)]
    pub risks_identified: BTreeMap<String, IndividualRiskInput>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct IndividualRiskInput {
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub exploitation_likelihood: String,
    #[serde(default)]
    pub exploitation_impact: String,
    #[serde(default)]
    pub data_breach_probability: String,
    #[serde(default)]
    pub data_breach_technical_assets: Vec<String>,
    #[serde(default)]
    pub most_relevant_data_asset: String,
    #[serde(default)]
    pub most_relevant_technical_asset: String,
    #[serde(default)]
    pub most_relevant_trust_boundary: String,
    #[serde(default)]
    pub most_relevant_shared_runtime: String,
    #[serde(default)]
    pub most_relevant_communication_link: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RiskTrackingInput {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub ticket: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub checked_by: String,
}

impl ModelInput {
    /// Reads the document at `path`, resolves its `includes` recursively
    /// (paths relative to the including file), and merges everything into a
    /// single document. Merge rules: scalars later wins, maps union by key
    /// with later winning, `tags_available` unions with deduplication, other
    /// sequences concatenate.
    pub fn load(path: &Path) -> Result<ModelInput> {
        let merged = load_merged_value(path)?;
        serde_yaml::from_value(merged).map_err(|source| Error::InputMalformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn load_merged_value(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| Error::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: Value = serde_yaml::from_str(&text).map_err(|source| {
        Error::InputMalformed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let includes = extract_includes(&document);
    let base_dir = path.parent().unwrap_or(Path::new("."));
    for include in includes {
        let included = load_merged_value(&base_dir.join(&include))?;
        merge_value(&mut document, included);
    }
    Ok(document)
}

fn extract_includes(document: &Value) -> Vec<String> {
    let Some(includes) = document.get("includes") else {
        return Vec::new();
    };
    let Some(sequence) = includes.as_sequence() else {
        return Vec::new();
    };
    sequence
        .iter()
        .filter_map(|entry| entry.as_str().map(str::to_string))
        .collect()
}

fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_entry) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_entry) => {
                        if key.as_str() == Some("tags_available") {
                            merge_tags(base_entry, overlay_entry);
                        } else {
                            merge_value(base_entry, overlay_entry);
                        }
                    }
                    None => {
                        base_map.insert(key, overlay_entry);
                    }
                }
            }
        }
        (Value::Sequence(base_seq), Value::Sequence(overlay_seq)) => {
            base_seq.extend(overlay_seq);
        }
        (base_slot, overlay_entry) => {
            *base_slot = overlay_entry;
        }
    }
}

fn merge_tags(base: &mut Value, overlay: Value) {
    let (Value::Sequence(base_seq), Value::Sequence(overlay_seq)) = (base, overlay) else {
        return;
    };
    let mut seen: BTreeSet<String> = base_seq
        .iter()
        .filter_map(|entry| entry.as_str().map(str::to_string))
        .collect();
    for entry in overlay_seq {
        if let Some(tag) = entry.as_str() {
            if seen.insert(tag.to_string()) {
                base_seq.push(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).expect("create fixture");
        file.write_all(content.as_bytes()).expect("write fixture");
    }

    #[test]
    fn loads_a_minimal_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "model.yaml",
            "title: Some Model\ndate: 2024-03-01\nbusiness_criticality: important\n",
        );

        let input = ModelInput::load(&dir.path().join("model.yaml")).expect("load");
        assert_eq!(input.title, "Some Model");
        assert_eq!(input.business_criticality, "important");
        assert!(input.data_assets.is_empty());
    }

    #[test]
    fn includes_merge_with_later_wins_and_tag_dedup() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "model.yaml",
            concat!(
                "title: Base\n",
                "includes:\n",
                "  - extra.yaml\n",
                "tags_available:\n",
                "  - linux\n",
                "  - docker\n",
                "data_assets:\n",
                "  base-data:\n",
                "    title: Base Data\n",
            ),
        );
        write_file(
            dir.path(),
            "extra.yaml",
            concat!(
                "title: Overridden\n",
                "tags_available:\n",
                "  - docker\n",
                "  - kubernetes\n",
                "data_assets:\n",
                "  extra-data:\n",
                "    title: Extra Data\n",
            ),
        );

        let input = ModelInput::load(&dir.path().join("model.yaml")).expect("load");
        assert_eq!(input.title, "Overridden");
        assert_eq!(
            input.tags_available,
            vec![
                "linux".to_string(),
                "docker".to_string(),
                "kubernetes".to_string()
            ]
        );
        assert_eq!(input.data_assets.len(), 2);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let result = ModelInput::load(Path::new("/nonexistent/model.yaml"));
        assert!(matches!(result, Err(Error::InputRead { .. })));
    }

    #[test]
    fn malformed_yaml_is_an_input_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "model.yaml", "title: [unclosed\n");

        let result = ModelInput::load(&dir.path().join("model.yaml"));
        assert!(matches!(result, Err(Error::InputMalformed { .. })));
    }
}
