//! Shared types for backend communication

use serde::{Deserialize, Serialize};

/// Question submitted to the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub use_llm: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            use_llm: false,
        }
    }

    pub fn with_llm(mut self, use_llm: bool) -> Self {
        self.use_llm = use_llm;
        self
    }
}

/// Answer returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// One cited document fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(default)]
    pub chunk: String,
    /// Similarity to the query in [0, 1]
    pub similarity: f64,
}

impl Source {
    /// Similarity as a whole percentage, rounded half away from zero
    pub fn match_percent(&self) -> i64 {
        (self.similarity * 100.0).round() as i64
    }
}
