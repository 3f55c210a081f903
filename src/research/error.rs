/// Errors from research backend calls
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    /// Backend answered with a non-2xx status
    #[error("{endpoint} returned {status} {status_text}")]
    Api {
        endpoint: &'static str,
        status: u16,
        status_text: String,
    },
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
