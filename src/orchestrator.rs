use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::client::Analyzer;
use crate::console::render;
use crate::export::write_report;
use crate::normalizer::normalize;
use crate::types::{AnalysisEnvelope, NormalizedReport, SubmissionInput};

/// What one analysis run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: NormalizedReport,
    pub envelope: AnalysisEnvelope,
    pub filename: String,
    pub analysis_type: String,
    pub export_path: Option<PathBuf>,
}

/// Submit → normalize → render, with an optional export.
pub struct Orchestrator<A: Analyzer> {
    analyzer: A,
}

impl<A: Analyzer> Orchestrator<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    pub async fn analyze(&self, input: &SubmissionInput) -> Result<AnalysisOutcome> {
        render::display_loading();
        let raw = self.analyzer.submit(input).await?;

        let envelope = AnalysisEnvelope::from_value(&raw);
        let report = normalize(&raw);
        info!(
            "Analysis complete: score {} ({} matched, {} missing skills)",
            report.match_score,
            report.matched_skills.len(),
            report.missing_skills.len()
        );

        let filename = envelope
            .filename
            .clone()
            .unwrap_or_else(|| input.file().file_name().to_string());
        let analysis_type = envelope
            .analysis_type
            .clone()
            .unwrap_or_else(|| input.mode().to_string());

        render::display_details(&AnalysisEnvelope {
            filename: Some(filename.clone()),
            analysis_type: Some(analysis_type.clone()),
            ..envelope.clone()
        });
        render::display_report(&report);

        Ok(AnalysisOutcome {
            report,
            envelope,
            filename,
            analysis_type,
            export_path: None,
        })
    }

    pub async fn export(&self, outcome: &mut AnalysisOutcome, out_dir: &Path) -> Result<PathBuf> {
        let path = write_report(out_dir, &outcome.report, &outcome.filename, &outcome.analysis_type).await?;
        render::display_export_saved(&path);
        outcome.export_path = Some(path.clone());
        Ok(path)
    }

    /// One full run. Exports when `export_dir` is given.
    pub async fn run(&self, input: &SubmissionInput, export_dir: Option<&Path>) -> Result<AnalysisOutcome> {
        let mut outcome = self.analyze(input).await?;
        if let Some(dir) = export_dir {
            self.export(&mut outcome, dir).await?;
        }
        Ok(outcome)
    }
}
