//! Backend connection diagnostic
//!
//! Sends one sample question and reports everything useful for figuring out
//! why a deployment is not answering.

use std::time::Duration;

use serde_json::Value;

use crate::backend::SearchRequest;
use crate::config::Config;

pub const SAMPLE_QUESTION: &str = "What are the requirements for H1B visa?";

/// Cold starts on free hosting tiers can take most of a minute
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(60);

const PREVIEW_CHARS: usize = 100;

/// What the backend sent back
#[derive(Debug)]
pub struct CheckReport {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: CheckBody,
}

#[derive(Debug, PartialEq)]
pub enum CheckBody {
    Json(Value),
    /// Body that failed to parse as JSON, verbatim
    Raw(String),
}

impl CheckReport {
    /// First characters of the `answer` field, if the body has one
    pub fn answer_preview(&self) -> Option<String> {
        match &self.body {
            CheckBody::Json(value) => value
                .get("answer")
                .and_then(Value::as_str)
                .filter(|a| !a.is_empty())
                .map(|a| a.chars().take(PREVIEW_CHARS).collect()),
            CheckBody::Raw(_) => None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        (200..300).contains(&self.status) && self.answer_preview().is_some()
    }
}

/// POST the sample question to the search endpoint
pub async fn run(config: &Config, timeout: Duration) -> Result<CheckReport, reqwest::Error> {
    let url = config.search_url();
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    tracing::info!("Checking backend at {}", url);
    let response = client
        .post(&url)
        .json(&SearchRequest::new(SAMPLE_QUESTION))
        .send()
        .await?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let text = response.text().await?;
    let body = match serde_json::from_str(&text) {
        Ok(value) => CheckBody::Json(value),
        Err(_) => CheckBody::Raw(text),
    };

    Ok(CheckReport {
        url,
        status,
        headers,
        body,
    })
}

/// Human-readable hints for a failed check
pub fn troubleshooting(err: &reqwest::Error) -> Vec<&'static str> {
    if err.is_timeout() {
        vec![
            "The backend may be cold starting (free hosting tiers sleep when idle)",
            "The backend may be overloaded",
            "There may be network connectivity issues",
        ]
    } else {
        vec![
            "Make sure the backend is running and reachable",
            "Check API_URL (or NEXT_PUBLIC_API_URL) in .env.local",
            "A sleeping backend can take 30-60 seconds to wake up; try again",
            "Verify the backend's CORS settings",
            "Check the backend logs",
        ]
    }
}
