use std::fmt;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::types::{AnalysisEnvelope, SubmissionInput, ValidationError};

const GENERIC_FAILURE: &str = "Analysis failed";

/// Error types for analysis API interactions
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Network connection failed: {message}")]
    NetworkError { message: String },

    #[error("Analysis failed (HTTP {status})")]
    Status { status: u16 },

    #[error("Server error: {message}")]
    ServerError { status: Option<u16>, message: String },

    #[error("Failed to parse response: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl AnalyzeError {
    pub fn is_network_error(&self) -> bool {
        matches!(self, AnalyzeError::NetworkError { .. } | AnalyzeError::Status { .. })
    }

    /// Message shown to the user; the server's own detail when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            AnalyzeError::Validation(e) => format!("⚠️ {}", e),
            AnalyzeError::NetworkError { .. } => {
                "🌐 Failed to analyze resume. Please check that the analysis service is reachable."
                    .to_string()
            }
            AnalyzeError::Status { status } => format!("❌ {} (HTTP {}).", GENERIC_FAILURE, status),
            AnalyzeError::ServerError { message, .. } => format!("❌ {}", message),
            AnalyzeError::ParseError { .. } => {
                "⚠️ Failed to parse server response. Please try again.".to_string()
            }
            AnalyzeError::ConfigError { message } => format!("⚙️ Configuration error: {}", message),
        }
    }
}

/// Anything that can turn a submission into a raw analysis response.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn submit(&self, input: &SubmissionInput) -> Result<JsonValue, AnalyzeError>;
}

/// HTTP client for the résumé analysis API
#[derive(Clone)]
pub struct AnalyzerClient {
    client: Client,
    config: Config,
}

impl fmt::Debug for AnalyzerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerClient")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl AnalyzerClient {
    pub fn new(config: Config) -> Result<Self, AnalyzeError> {
        config.validate().map_err(|e| AnalyzeError::ConfigError {
            message: e.to_string(),
        })?;

        // No request timeout: the analysis may take as long as the server needs.
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AnalyzeError::ConfigError {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    fn build_form(input: &SubmissionInput) -> Result<Form, AnalyzeError> {
        let file = input.file();
        let resume = Part::bytes(file.bytes().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.media_type())
            .map_err(|e| AnalyzeError::ConfigError {
                message: format!("Failed to create multipart: {}", e),
            })?;
        let (marker_key, marker_value) = input.mode().marker_field();

        Ok(Form::new()
            .part("resume", resume)
            .text("job_description", input.job_description().to_string())
            .text(marker_key, marker_value))
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> AnalyzeError {
        if error.is_connect() {
            return AnalyzeError::NetworkError {
                message: "Failed to connect to server".to_string(),
            };
        }

        if error.is_request() {
            return AnalyzeError::NetworkError {
                message: format!("Request failed: {}", error),
            };
        }

        AnalyzeError::NetworkError {
            message: format!("Request error: {}", error),
        }
    }

    /// Non-success statuses carry `{"detail": "..."}` when the server knows what went wrong.
    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> AnalyzeError {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "analysis request rejected");
        debug!("error body: {}", body);

        match serde_json::from_str::<JsonValue>(&body).ok().as_ref().and_then(detail_of) {
            Some(message) => AnalyzeError::ServerError {
                status: Some(status.as_u16()),
                message,
            },
            None => AnalyzeError::Status {
                status: status.as_u16(),
            },
        }
    }
}

#[async_trait]
impl Analyzer for AnalyzerClient {
    /// Send exactly one multipart request for the given submission. Never retried.
    async fn submit(&self, input: &SubmissionInput) -> Result<JsonValue, AnalyzeError> {
        let mode = input.mode();
        let url = self.config.endpoint_url(mode.endpoint_path());
        let form = Self::build_form(input)?;

        info!(
            "Submitting {} ({:.2} KB) for {} analysis to {}",
            input.file().file_name(),
            input.file().size_kb(),
            mode,
            url
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let body: JsonValue = response.json().await.map_err(|e| AnalyzeError::ParseError {
            message: format!("Failed to parse API response: {}", e),
        })?;

        if let Some(message) = reported_failure(&body) {
            warn!("analysis service reported failure: {}", message);
            return Err(AnalyzeError::ServerError { status: None, message });
        }

        info!("Received analysis response ({})", status);
        Ok(body)
    }
}

/// The failure message of an envelope that says `success: false`.
fn reported_failure(body: &JsonValue) -> Option<String> {
    if AnalysisEnvelope::from_value(body).success != Some(false) {
        return None;
    }
    Some(
        detail_of(body)
            .or_else(|| body.get("error").and_then(JsonValue::as_str).map(str::to_string))
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
    )
}

fn detail_of(body: &JsonValue) -> Option<String> {
    body.get("detail")
        .and_then(JsonValue::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
