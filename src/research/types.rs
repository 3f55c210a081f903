use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchedState {
    pub code: String,
    pub name: String,
    pub document_count: u64,
    pub has_sales_tax: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingState {
    pub code: String,
    pub name: String,
}

/// `GET /langchain/states/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatesResponse {
    pub total_documents: u64,
    pub states_researched: u64,
    pub states: Vec<ResearchedState>,
    #[serde(default)]
    pub states_not_researched: Vec<PendingState>,
}

/// `POST /langchain/chat/` body; an empty `state_code` means no state filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest<'a> {
    pub query: &'a str,
    pub state_code: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStatus {
    #[serde(default)]
    pub llm_provider: String,
    #[serde(default)]
    pub vector_store_type: String,
    #[serde(default)]
    pub conversation_length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub query: String,
    #[serde(default)]
    pub state_code: Option<String>,
    pub response: String,
    #[serde(default)]
    pub status: Option<ConversationStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorStoreInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub document_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub llm_provider: String,
    pub vector_store_type: String,
    #[serde(default)]
    pub available_providers: Vec<String>,
    #[serde(default)]
    pub conversation_length: u64,
}

/// `GET /langchain/status/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub vector_store: VectorStoreInfo,
    pub agent: AgentInfo,
}
