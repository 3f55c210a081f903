//! Research backend configuration.
//!
//! Variables:
//! - `SALESTAX_API_URL` (default: `http://localhost:8000/api/v1`)
//! - `SALESTAX_API_TIMEOUT_SECS` (default: 30)

use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchConfig {
    /// Everything up to and including the API version segment
    pub base_url: Url,
    pub timeout_secs: u64,
}

impl ResearchConfig {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        Ok(ResearchConfig {
            base_url,
            timeout_secs,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("SALESTAX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = std::env::var("SALESTAX_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(&url, timeout_secs)
    }

    /// `{base}/{path}`, regardless of a trailing slash on the base
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}
