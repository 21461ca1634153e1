use anyhow::{bail, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_USER_AGENT: &str = "resume_matcher/0.1.0";

/// Client settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Build from `API_BASE_URL` and `RESUME_MATCHER_USER_AGENT`.
    pub fn load() -> Result<Self> {
        let cfg = Self::from_vars(
            std::env::var("API_BASE_URL").ok(),
            std::env::var("RESUME_MATCHER_USER_AGENT").ok(),
        );
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_vars(base_url: Option<String>, user_agent: Option<String>) -> Self {
        let defaults = Self::default();
        let base_url = base_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.base_url);
        let user_agent = user_agent
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.user_agent);
        Self { base_url, user_agent }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("API_BASE_URL must start with http:// or https:// (got '{}')", self.base_url);
        }
        Ok(())
    }

    /// Join the base URL and an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
