//! JSON export of a normalized report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::types::{ApplicationRecommendation, NormalizedReport};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Fixed shape of the downloaded report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub filename: String,
    pub analysis_type: String,
    pub match_score: u8,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
    pub overall_assessment: Option<String>,
    pub application_recommendation: Option<ApplicationRecommendation>,
    pub experience_match: Option<String>,
    pub skills_match: Option<String>,
    pub generated_at: String, // RFC3339, UTC
}

impl ExportDocument {
    pub fn new(
        report: &NormalizedReport,
        filename: &str,
        analysis_mode: &str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            filename: filename.to_string(),
            analysis_type: analysis_mode.to_string(),
            match_score: report.match_score,
            strengths: report.strengths.clone(),
            gaps: report.gaps.clone(),
            matched_skills: report.matched_skills.clone(),
            missing_skills: report.missing_skills.clone(),
            recommendations: report.recommendations.clone(),
            overall_assessment: report.overall_assessment.clone(),
            application_recommendation: report.application_recommendation.clone(),
            experience_match: report.experience_match.clone(),
            skills_match: report.skills_match.clone(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn report(&self) -> NormalizedReport {
        NormalizedReport {
            match_score: self.match_score,
            matched_skills: self.matched_skills.clone(),
            missing_skills: self.missing_skills.clone(),
            strengths: self.strengths.clone(),
            gaps: self.gaps.clone(),
            recommendations: self.recommendations.clone(),
            overall_assessment: self.overall_assessment.clone(),
            application_recommendation: self.application_recommendation.clone(),
            experience_match: self.experience_match.clone(),
            skills_match: self.skills_match.clone(),
        }
    }
}

/// Serialize `report` as pretty JSON. Deterministic for a given `generated_at`.
pub fn export_report(
    report: &NormalizedReport,
    filename: &str,
    analysis_mode: &str,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let document = ExportDocument::new(report, filename, analysis_mode, generated_at);
    Ok(serde_json::to_vec_pretty(&document)?)
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("resume-analysis-{}.json", now.timestamp_millis())
}

/// Write the export into `out_dir`, creating it if needed. Returns the file path.
pub async fn write_report(
    out_dir: &Path,
    report: &NormalizedReport,
    filename: &str,
    analysis_mode: &str,
) -> Result<PathBuf, ExportError> {
    let now = Utc::now();
    let bytes = export_report(report, filename, analysis_mode, now)?;

    tokio::fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(export_file_name(now));
    tokio::fs::write(&path, bytes).await?;
    info!("Saved analysis report to {}", path.display());
    Ok(path)
}
