use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Which analysis endpoint a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AnalysisMode {
    /// Keyword/rule-based scoring, answered with a flat payload
    #[default]
    Basic,
    /// Model-backed scoring, answered with a nested `analysis` payload
    #[value(name = "ai")]
    AiAssisted,
}

impl AnalysisMode {
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            AnalysisMode::Basic => "/api/analyze",
            AnalysisMode::AiAssisted => "/api/analyze-ai",
        }
    }

    /// Extra form field attached to the multipart request for this mode.
    pub fn marker_field(&self) -> (&'static str, &'static str) {
        match self {
            AnalysisMode::Basic => ("analysis_type", "basic"),
            AnalysisMode::AiAssisted => ("model", "llama-free"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Basic => "basic",
            AnalysisMode::AiAssisted => "ai",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload your resume")]
    MissingFile,

    #[error("Please upload a PDF or DOCX file (got {file_name})")]
    UnsupportedFormat { file_name: String },

    #[error("Please paste the job description")]
    EmptyJobDescription,

    #[error("Failed to read resume file {path}: {message}")]
    Unreadable { path: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Doc,
    Docx,
}

impl ResumeFormat {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "doc" => Some(ResumeFormat::Doc),
            "docx" => Some(ResumeFormat::Docx),
            _ => None,
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::Doc => "application/msword",
            ResumeFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A résumé selected for upload.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    file_name: String,
    format: ResumeFormat,
    bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        let format = ResumeFormat::from_file_name(&file_name)
            .ok_or_else(|| ValidationError::UnsupportedFormat { file_name: file_name.clone() })?;
        Ok(Self { file_name, format, bytes })
    }

    /// Read a résumé from disk. The format is checked before the file is read.
    pub async fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or(ValidationError::MissingFile)?;
        if ResumeFormat::from_file_name(&file_name).is_none() {
            return Err(ValidationError::UnsupportedFormat { file_name });
        }
        let bytes = tokio::fs::read(path).await.map_err(|e| ValidationError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }
}

/// Everything needed for one analysis request. Only constructible in a valid state.
#[derive(Debug, Clone)]
pub struct SubmissionInput {
    file: ResumeFile,
    job_description: String,
    mode: AnalysisMode,
}

impl SubmissionInput {
    pub fn new(
        file: Option<ResumeFile>,
        job_description: impl Into<String>,
        mode: AnalysisMode,
    ) -> Result<Self, ValidationError> {
        let file = file.ok_or(ValidationError::MissingFile)?;
        let job_description = job_description.into();
        if job_description.trim().is_empty() {
            return Err(ValidationError::EmptyJobDescription);
        }
        Ok(Self { file, job_description, mode })
    }

    pub fn file(&self) -> &ResumeFile {
        &self.file
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }
}

/// The analysis API's hiring verdict. Unknown literals are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationRecommendation {
    Apply,
    Consider,
    NotRecommended,
    Other(String),
}

impl ApplicationRecommendation {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationRecommendation::Apply => "APPLY",
            ApplicationRecommendation::Consider => "CONSIDER",
            ApplicationRecommendation::NotRecommended => "NOT_RECOMMENDED",
            ApplicationRecommendation::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ApplicationRecommendation::Apply => "APPLY - Strong Match!",
            ApplicationRecommendation::Consider => "CONSIDER - Review Carefully",
            ApplicationRecommendation::NotRecommended => "NOT RECOMMENDED - Significant Gaps",
            ApplicationRecommendation::Other(s) => s,
        }
    }
}

impl From<String> for ApplicationRecommendation {
    fn from(value: String) -> Self {
        match value.as_str() {
            "APPLY" => ApplicationRecommendation::Apply,
            "CONSIDER" => ApplicationRecommendation::Consider,
            "NOT_RECOMMENDED" => ApplicationRecommendation::NotRecommended,
            _ => ApplicationRecommendation::Other(value),
        }
    }
}

impl From<ApplicationRecommendation> for String {
    fn from(value: ApplicationRecommendation) -> Self {
        match value {
            ApplicationRecommendation::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ApplicationRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical display model produced by [`crate::normalizer::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReport {
    pub match_score: u8, // [0, 100]
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub overall_assessment: Option<String>,
    pub application_recommendation: Option<ApplicationRecommendation>,
    pub experience_match: Option<String>,
    pub skills_match: Option<String>,
}

/// Metadata wrapped around the analysis payload by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisEnvelope {
    pub success: Option<bool>,
    pub filename: Option<String>,
    pub analysis_type: Option<String>,
}

impl AnalysisEnvelope {
    pub fn from_value(raw: &JsonValue) -> Self {
        Self {
            success: raw.get("success").and_then(JsonValue::as_bool),
            filename: raw.get("filename").and_then(JsonValue::as_str).map(str::to_string),
            analysis_type: raw
                .get("analysis_type")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
        }
    }
}
