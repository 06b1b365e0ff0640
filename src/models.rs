//! Core data types shared across retrieval and orchestration

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Languages a query may arrive in.
///
/// English is the corpus language; Spanish queries are translated to English
/// before retrieval so keyword extraction and vector search operate on the
/// same language as the stored passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryLanguage {
    English,
    Spanish,
}

impl QueryLanguage {
    /// Human-readable label used in response payloads
    pub fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
        }
    }

    /// Whether the query text must be translated before retrieval
    pub fn needs_translation(self) -> bool {
        matches!(self, Self::Spanish)
    }
}

/// Per-request query state, discarded when the request completes
#[derive(Debug, Clone)]
pub struct Query {
    pub raw_text: String,
    pub language: QueryLanguage,
    /// Text used for retrieval and generation: `raw_text` for English
    /// queries, the English translation otherwise.
    pub search_text: String,
}

/// A retrieved document plus its scores, produced mid-pipeline
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: i64,
    pub content: String,
    pub metadata: Value,
    /// Store-side blend of keyword rank and vector similarity
    pub hybrid_score: f64,
    /// Hybrid score after client-side re-ranking multipliers
    pub final_score: f64,
}

/// Source summary surfaced to the caller, one per retrieved candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceInfo {
    pub heading: String,
    pub source: String,
    pub url: Option<String>,
    pub page: Option<i64>,
}

impl SourceInfo {
    /// Read the known metadata keys, tolerating anything else in the value
    pub fn from_metadata(metadata: &Value) -> Self {
        Self {
            heading: metadata
                .get("heading")
                .and_then(Value::as_str)
                .unwrap_or("Unknown Title")
                .to_string(),
            source: metadata
                .get("source")
                .and_then(Value::as_str)
                .unwrap_or("None")
                .to_string(),
            url: metadata
                .get("url")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            page: metadata.get("page").and_then(Value::as_i64),
        }
    }
}

/// Successful answer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceInfo>,
    /// `[detected language label, search text]`
    pub language_info: (String, String),
}

/// What the caller always receives: a structured result, never a raw fault
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Answer(QueryResponse),
    Error { error: String },
}

impl QueryOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

impl From<QueryResponse> for QueryOutcome {
    fn from(response: QueryResponse) -> Self {
        Self::Answer(response)
    }
}
