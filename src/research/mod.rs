//! Client for the sales-tax research backend.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/langchain/states/` | States with researched documents |
//! | GET    | `/langchain/status/` | Vector store and agent status |
//! | POST   | `/langchain/chat/` | Ask a question, optionally scoped to a state |
//!
//! Each call is a single attempt. Failures are returned to the caller as-is.

pub mod config;
pub mod error;
pub mod prompts;
pub mod types;

pub use config::{ConfigError, ResearchConfig};
pub use error::ResearchError;
pub use prompts::{default_state, example_questions, EMPTY_KNOWLEDGE_BASE};
pub use types::{ChatRequest, ChatResponse, StatesResponse, StatusResponse};

use serde::de::DeserializeOwned;
use std::time::Duration;

/// Shown when the state list cannot be fetched
pub const STATES_FAILED: &str = "Failed to load researched states. Make sure the backend is running.";
/// Shown when a chat request fails
pub const CHAT_FAILED: &str = "Failed to get response. Please try again.";

#[derive(Debug, Clone)]
pub struct ResearchClient {
    http: reqwest::Client,
    config: ResearchConfig,
}

impl ResearchClient {
    pub fn new(config: ResearchConfig) -> Result<Self, ResearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ResearchError::Http {
                endpoint: "client_init",
                source: e,
            })?;
        Ok(ResearchClient { http, config })
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Calls `GET {base}/langchain/states/`.
    pub async fn researched_states(&self) -> Result<StatesResponse, ResearchError> {
        let endpoint = "GET /langchain/states/";
        let url = self.config.endpoint("langchain/states/");
        log::debug!("{} -> {}", endpoint, url);
        let resp = self.http.get(&url).send().await;
        decode(endpoint, resp).await
    }

    /// Calls `GET {base}/langchain/status/`.
    pub async fn status(&self) -> Result<StatusResponse, ResearchError> {
        let endpoint = "GET /langchain/status/";
        let url = self.config.endpoint("langchain/status/");
        log::debug!("{} -> {}", endpoint, url);
        let resp = self.http.get(&url).send().await;
        decode(endpoint, resp).await
    }

    /// Calls `POST {base}/langchain/chat/`. `None` sends an empty state code.
    pub async fn chat(&self, query: &str, state_code: Option<&str>) -> Result<ChatResponse, ResearchError> {
        let endpoint = "POST /langchain/chat/";
        let url = self.config.endpoint("langchain/chat/");
        let body = ChatRequest {
            query,
            state_code: state_code.unwrap_or(""),
        };
        log::debug!("{} -> {} (state: {:?})", endpoint, url, body.state_code);
        let resp = self.http.post(&url).json(&body).send().await;
        decode(endpoint, resp).await
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    resp: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, ResearchError> {
    let resp = resp.map_err(|e| {
        log::warn!("{} failed: {}", endpoint, e);
        ResearchError::Http {
            endpoint,
            source: e,
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        log::warn!("{} returned {}", endpoint, status);
        return Err(ResearchError::Api {
            endpoint,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    resp.json()
        .await
        .map_err(|e| ResearchError::Deserialization {
            endpoint,
            source: e,
        })
}
