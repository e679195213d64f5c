use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

use crate::CommunicationLink;
use crate::Confidentiality;
use crate::Criticality;
use crate::ParsedModel;
use crate::Quantity;
use crate::Technology;
use crate::Usage;
use crate::error::UnknownValueError;
use crate::error::parse_enum;

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
pub enum EncryptionStyle {
    #[default]
    None,
    Transparent,
    DataWithSymmetricSharedKey,
    DataWithAsymmetricSharedKey,
    DataWithEndUserIndividualKey,
}

impl EncryptionStyle {
    pub fn title(&self) -> &'static str {
        match self {
            EncryptionStyle::None => "None",
            EncryptionStyle::Transparent => "Transparent",
            EncryptionStyle::DataWithSymmetricSharedKey => "Data with Symmetric Shared Key",
            EncryptionStyle::DataWithAsymmetricSharedKey => "Data with Asymmetric Shared Key",
            EncryptionStyle::DataWithEndUserIndividualKey => "Data with End-User Individual Key",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            EncryptionStyle::None => "No encryption",
            EncryptionStyle::Transparent => "Encrypted data at rest (transparent disk encryption)",
            EncryptionStyle::DataWithSymmetricSharedKey => {
                "Data encrypted with a symmetric shared key"
            }
            EncryptionStyle::DataWithAsymmetricSharedKey => {
                "Data encrypted with an asymmetric shared key"
            }
            EncryptionStyle::DataWithEndUserIndividualKey => {
                "Data encrypted with a key individual per end user"
            }
        }
    }
}

impl FromStr for EncryptionStyle {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("encryption style", value)
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
pub enum DataFormat {
    Json,
    Xml,
    Serialization,
    File,
    Csv,
}

impl DataFormat {
    pub fn title(&self) -> &'static str {
        match self {
            DataFormat::Json => "JSON",
            DataFormat::Xml => "XML",
            DataFormat::Serialization => "Serialization",
            DataFormat::File => "File",
            DataFormat::Csv => "CSV",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            DataFormat::Json => "JSON data",
            DataFormat::Xml => "XML data",
            DataFormat::Serialization => "Serialized object data",
            DataFormat::File => "File input/uploads",
            DataFormat::Csv => "CSV data",
        }
    }
}

impl FromStr for DataFormat {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("data format", value)
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
pub enum TechnicalAssetType {
    ExternalEntity,
    Process,
    Datastore,
}

impl TechnicalAssetType {
    pub fn explain(&self) -> &'static str {
        match self {
            TechnicalAssetType::ExternalEntity => "External entity outside of modeling scope",
            TechnicalAssetType::Process => "Software executing at runtime",
            TechnicalAssetType::Datastore => "Data store of some kind",
        }
    }
}

impl FromStr for TechnicalAssetType {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("technical asset type", value)
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
pub enum TechnicalAssetSize {
    System,
    Service,
    Application,
    Component,
}

impl TechnicalAssetSize {
    pub fn explain(&self) -> &'static str {
        match self {
            TechnicalAssetSize::System => "A system consisting of several services",
            TechnicalAssetSize::Service => "A specific service (web, mail, ...)",
            TechnicalAssetSize::Application => "A single application",
            TechnicalAssetSize::Component => "A component of an application",
        }
    }
}

impl FromStr for TechnicalAssetSize {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("technical asset size", value)
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
pub enum TechnicalAssetMachine {
    Physical,
    Virtual,
    Container,
    Serverless,
}

impl TechnicalAssetMachine {
    pub fn explain(&self) -> &'static str {
        match self {
            TechnicalAssetMachine::Physical => "Runs on a physical machine",
            TechnicalAssetMachine::Virtual => "Runs on a virtual machine",
            TechnicalAssetMachine::Container => "Runs in a container",
            TechnicalAssetMachine::Serverless => "Runs as serverless function",
        }
    }
}

impl FromStr for TechnicalAssetMachine {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("technical asset machine", value)
    }
}

/// A kind of data processed, stored, or transferred in the modeled system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAsset {
    pub id: String,
    pub title: String,
    pub description: String,
    pub usage: Usage,
    pub tags: Vec<String>,
    pub origin: String,
    pub owner: String,
    pub quantity: Quantity,
    pub confidentiality: Confidentiality,
    pub integrity: Criticality,
    pub availability: Criticality,
    pub justification_cia_rating: String,
}

impl DataAsset {
    pub fn is_tagged_with_any(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }

    /// Ids of the technical assets that process this data asset, sorted.
    pub fn processed_by_sorted(&self, model: &ParsedModel) -> Vec<String> {
        let mut ids: Vec<String> = model
            .technical_assets
            .values()
            .filter(|asset| asset.data_assets_processed.contains(&self.id))
            .map(|asset| asset.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Ids of the technical assets that store this data asset, sorted.
    pub fn stored_by_sorted(&self, model: &ParsedModel) -> Vec<String> {
        let mut ids: Vec<String> = model
            .technical_assets
            .values()
            .filter(|asset| asset.data_assets_stored.contains(&self.id))
            .map(|asset| asset.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

/// A building block of the modeled architecture: external entity, process,
/// or data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAsset {
    pub id: String,
    pub title: String,
    pub description: String,
    pub usage: Usage,
    pub asset_type: TechnicalAssetType,
    pub size: TechnicalAssetSize,
    pub technology: Technology,
    pub machine: TechnicalAssetMachine,
    pub internet: bool,
    pub multi_tenant: bool,
    pub redundant: bool,
    pub custom_developed_parts: bool,
    pub out_of_scope: bool,
    pub justification_out_of_scope: String,
    pub used_as_client_by_human: bool,
    pub encryption: EncryptionStyle,
    pub owner: String,
    pub confidentiality: Confidentiality,
    pub integrity: Criticality,
    pub availability: Criticality,
    pub justification_cia_rating: String,
    pub tags: Vec<String>,
    pub data_assets_processed: Vec<String>,
    pub data_assets_stored: Vec<String>,
    pub data_formats_accepted: Vec<DataFormat>,
    pub communication_links: Vec<CommunicationLink>,
    pub diagram_tweak_order: i64,
    /// Relative attacker attractiveness 0..100, written by the RAA pre-pass.
    pub raa: f64,
}

impl TechnicalAsset {
    pub fn is_data_store(&self) -> bool {
        self.asset_type == TechnicalAssetType::Datastore
    }

    pub fn is_traffic_forwarding(&self) -> bool {
        self.technology.is_traffic_forwarding()
    }

    pub fn is_tagged_with_any(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }

    /// Highest confidentiality of the asset itself and of every data asset
    /// it processes or stores.
    pub fn highest_confidentiality(&self, model: &ParsedModel) -> Confidentiality {
        let mut highest = self.confidentiality;
        for data_id in self.data_assets_processed.iter().chain(&self.data_assets_stored) {
            if let Some(data_asset) = model.data_assets.get(data_id) {
                highest = highest.max(data_asset.confidentiality);
            }
        }
        highest
    }

    pub fn highest_integrity(&self, model: &ParsedModel) -> Criticality {
        let mut highest = self.integrity;
        for data_id in self.data_assets_processed.iter().chain(&self.data_assets_stored) {
            if let Some(data_asset) = model.data_assets.get(data_id) {
                highest = highest.max(data_asset.integrity);
            }
        }
        highest
    }

    pub fn highest_availability(&self, model: &ParsedModel) -> Criticality {
        let mut highest = self.availability;
        for data_id in self.data_assets_processed.iter().chain(&self.data_assets_stored) {
            if let Some(data_asset) = model.data_assets.get(data_id) {
                highest = highest.max(data_asset.availability);
            }
        }
        highest
    }

    /// Sum of the three "as asset" attacker-attractiveness projections of the
    /// asset's own CIA rating. Used for ranking, not for severity.
    pub fn highest_sensitivity_score(&self) -> f64 {
        self.confidentiality.attacker_attractiveness_for_asset()
            + self.integrity.attacker_attractiveness_for_asset()
            + self.availability.attacker_attractiveness_for_asset()
    }
}
