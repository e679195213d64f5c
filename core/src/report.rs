use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use strum::IntoEnumIterator;
use stria_model::ParsedModel;
use stria_model::Risk;
use stria_model::RiskCategory;
use stria_model::RiskSeverity;
use stria_model::RiskStatus;
use stria_model::RisksByCategory;
use stria_model::sort_by_risk_severity;

use crate::engine::Evaluation;
use crate::error::Error;
use crate::error::Result;

pub const REPORT_FILENAME: &str = "report.json";

/// The JSON report document: the parsed model, the full risk list in
/// severity order, both risk indices, and the statistics aggregate. All
/// enumeration fields marshal as their canonical kebab-case names.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub model: &'a ParsedModel,
    pub intro_text_raa: &'a str,
    pub risks: Vec<Risk>,
    pub risk_categories: &'a BTreeMap<String, RiskCategory>,
    pub risks_by_category: &'a RisksByCategory,
    pub risks_by_synthetic_id: &'a BTreeMap<String, Risk>,
    pub statistics: RiskStatistics,
}

/// Risk counts per severity and tracking status, fully zero-populated: every
/// severity × status cell is present even for an empty model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskStatistics {
    pub risks: BTreeMap<String, BTreeMap<String, usize>>,
}

impl RiskStatistics {
    pub fn count(&self, severity: RiskSeverity, status: RiskStatus) -> usize {
        self.risks
            .get(&severity.to_string())
            .and_then(|cells| cells.get(&status.to_string()))
            .copied()
            .unwrap_or_default()
    }
}

/// Aggregates the generated risks into the severity × status grid.
pub fn overall_risk_statistics(
    model: &ParsedModel,
    risks_by_category: &RisksByCategory,
) -> RiskStatistics {
    let mut risks: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for severity in RiskSeverity::iter() {
        let cells = risks.entry(severity.to_string()).or_default();
        for status in RiskStatus::iter() {
            cells.insert(status.to_string(), 0);
        }
    }
    for risk in risks_by_category.values().flatten() {
        let status = model.get_risk_tracking_status_defaulting_unchecked(risk);
        if let Some(count) = risks
            .get_mut(&risk.severity.to_string())
            .and_then(|cells| cells.get_mut(&status.to_string()))
        {
            *count += 1;
        }
    }
    RiskStatistics { risks }
}

impl<'a> Report<'a> {
    pub fn of(evaluation: &'a Evaluation) -> Self {
        let mut risks: Vec<Risk> = evaluation
            .risks_by_category
            .values()
            .flatten()
            .cloned()
            .collect();
        sort_by_risk_severity(&mut risks, &evaluation.model);
        Self {
            model: &evaluation.model,
            intro_text_raa: &evaluation.intro_text_raa,
            risks,
            risk_categories: &evaluation.categories,
            risks_by_category: &evaluation.risks_by_category,
            risks_by_synthetic_id: &evaluation.risks_by_synthetic_id,
            statistics: overall_risk_statistics(&evaluation.model, &evaluation.risks_by_category),
        }
    }
}

/// Writes the report document into the output folder, creating it if
/// necessary. Returns the path of the written file.
pub fn write_report(output_folder: &Path, evaluation: &Evaluation) -> Result<PathBuf> {
    fs::create_dir_all(output_folder).map_err(|source| Error::OutputWrite {
        path: output_folder.to_path_buf(),
        source,
    })?;
    let path = output_folder.join(REPORT_FILENAME);
    let report = Report::of(evaluation);
    let payload = serde_json::to_vec_pretty(&report).map_err(|err| Error::Internal {
        id: REPORT_FILENAME.to_string(),
        message: format!("unable to serialize report: {err}"),
    })?;
    fs::write(&path, payload).map_err(|source| Error::OutputWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
