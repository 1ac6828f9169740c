//! HTTP client for the question-answering backend

use reqwest::Client;

use super::error::ApiError;
use super::retry::{with_retry, RetryPolicy};
use super::types::{SearchRequest, SearchResponse};
use crate::config::Config;

/// Client for communicating with the Python search backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    search_url: String,
    health_url: String,
    retry: RetryPolicy,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("legal-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            search_url: config.search_url(),
            health_url: config.health_url(),
            retry: config.retry,
        })
    }

    /// Send one question to the backend. Single attempt, no retry.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        tracing::debug!("POST {} (use_llm={})", self.search_url, request.use_llm);

        let response = self.client.post(&self.search_url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Search, retrying transient failures with the configured policy
    pub async fn search_with_retry(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        with_retry(&self.retry, || self.search(request)).await
    }

    /// Replace the retry policy, e.g. from a command-line override
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check if backend is healthy. Never fails; any error means unhealthy.
    pub async fn health_check(&self) -> bool {
        match self.client.get(&self.health_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}
