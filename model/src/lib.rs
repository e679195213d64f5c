//! Typed domain model for agile threat modeling.
//!
//! Everything in this crate is a pure, in-memory representation: closed
//! enumerations with their orderings and numeric projections, the parsed
//! model entities, derived indices, sensitivity propagation, and the
//! deterministic sort/filter library used by reporting. Parsing from the
//! input document and risk generation live in `stria-core`.

mod boundary;
mod communication;
mod error;
mod filter;
mod parsed_model;
mod rating;
mod risk;
mod sort;
mod technical_asset;
mod technology;
#[cfg(test)]
pub(crate) mod testing;

pub use boundary::SharedRuntime;
pub use boundary::TrustBoundary;
pub use boundary::TrustBoundaryType;
pub use communication::Authentication;
pub use communication::Authorization;
pub use communication::CommunicationLink;
pub use communication::Protocol;
pub use error::UnknownValueError;
pub use filter::categories_of_only_critical_risks;
pub use filter::categories_of_only_elevated_risks;
pub use filter::categories_of_only_high_risks;
pub use filter::categories_of_only_low_risks;
pub use filter::categories_of_only_medium_risks;
pub use filter::filtered_by_function;
pub use filter::filtered_by_model_failures;
pub use filter::filtered_by_severity;
pub use filter::filtered_by_status;
pub use filter::filtered_by_stride;
pub use filter::filtered_by_still_at_risk;
pub use parsed_model::Author;
pub use parsed_model::ParsedModel;
pub use rating::Confidentiality;
pub use rating::Criticality;
pub use rating::Quantity;
pub use rating::Usage;
pub use risk::DataBreachProbability;
pub use risk::Risk;
pub use risk::RiskCategory;
pub use risk::RiskExploitationImpact;
pub use risk::RiskExploitationLikelihood;
pub use risk::RiskFunction;
pub use risk::RiskSeverity;
pub use risk::RiskStatus;
pub use risk::RiskTracking;
pub use risk::RisksByCategory;
pub use risk::Stride;
pub use risk::calculate_severity;
pub use sort::sort_by_data_breach_probability;
pub use sort::sort_by_risk_severity;
pub use sort::sorted_data_assets_by_data_breach_probability_and_title;
pub use sort::sorted_data_assets_by_title;
pub use sort::sorted_keys_of_data_assets;
pub use sort::sorted_keys_of_individual_risk_categories;
pub use sort::sorted_keys_of_shared_runtimes;
pub use sort::sorted_keys_of_technical_assets;
pub use sort::sorted_keys_of_trust_boundaries;
pub use sort::sorted_risk_categories_by_highest_severity_still_at_risk;
pub use sort::sorted_risk_categories_by_title;
pub use sort::sorted_shared_runtimes_by_title;
pub use sort::sorted_technical_assets_by_raa_and_title;
pub use sort::sorted_technical_assets_by_risk_severity_and_title;
pub use sort::sorted_technical_assets_by_title;
pub use sort::sorted_trust_boundaries_by_title;
pub use technical_asset::DataAsset;
pub use technical_asset::DataFormat;
pub use technical_asset::EncryptionStyle;
pub use technical_asset::TechnicalAsset;
pub use technical_asset::TechnicalAssetMachine;
pub use technical_asset::TechnicalAssetSize;
pub use technical_asset::TechnicalAssetType;
pub use technology::Technology;

use std::str::FromStr;

/// Parses an enumeration value from the input document, falling back to the
/// type's default when the trimmed value is empty. Non-empty unknown values
/// are always an error.
pub fn parse_or_default<T>(value: &str) -> Result<T, UnknownValueError>
where
    T: FromStr<Err = UnknownValueError> + Default,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Ok(T::default())
    } else {
        trimmed.parse()
    }
}
