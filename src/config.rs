//! Runtime configuration
//!
//! Resolved once at startup from the environment (plus optional env files)
//! and passed by reference to everything that talks to the backend.

use std::path::PathBuf;
use std::time::Duration;

use crate::backend::retry::RetryPolicy;

/// Backend base URL used when neither `API_URL` nor `NEXT_PUBLIC_API_URL` is set
pub const DEFAULT_API_URL: &str = "http://localhost:8081";

/// Search endpoint, relative to the base URL
pub const SEARCH_PATH: &str = "/search";

/// Health endpoint, relative to the base URL
pub const HEALTH_PATH: &str = "/api/health";

/// Answer endpoint served by the proxy and forwarded to the Python backend
pub const ANSWER_PATH: &str = "/api/answer";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;
const DEFAULT_PROXY_HOST: &str = "127.0.0.1";
const DEFAULT_PROXY_PORT: u16 = 3000;

/// Env files tried in order; variables already present in the process win.
const ENV_FILES: [&str; 2] = [".env.local", ".env"];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root address of the question-answering backend, without trailing slash
    pub api_url: String,
    /// Per-request deadline applied to every backend call
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Backend the answer proxy forwards to
    pub python_backend_url: String,
    pub proxy_host: String,
    pub proxy_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::new(
                DEFAULT_RETRY_ATTEMPTS,
                Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            ),
            python_backend_url: DEFAULT_API_URL.to_string(),
            proxy_host: DEFAULT_PROXY_HOST.to_string(),
            proxy_port: DEFAULT_PROXY_PORT,
        }
    }
}

impl Config {
    /// Load env files, then read the process environment.
    pub fn from_env() -> Self {
        load_env_files();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults
    /// for missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("API_URL")
            .or_else(|| get("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let python_backend_url =
            get("PYTHON_BACKEND_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_ms = parse_or(get("API_TIMEOUT_MS"), "API_TIMEOUT_MS", DEFAULT_TIMEOUT_MS);
        let attempts = parse_or(
            get("API_RETRY_ATTEMPTS"),
            "API_RETRY_ATTEMPTS",
            DEFAULT_RETRY_ATTEMPTS,
        );
        let delay_ms = parse_or(
            get("API_RETRY_DELAY_MS"),
            "API_RETRY_DELAY_MS",
            DEFAULT_RETRY_DELAY_MS,
        );

        Self {
            api_url: normalize_url(&api_url),
            timeout: Duration::from_millis(timeout_ms),
            retry: RetryPolicy::new(attempts, Duration::from_millis(delay_ms)),
            python_backend_url: normalize_url(&python_backend_url),
            proxy_host: get("HOST").unwrap_or_else(|| DEFAULT_PROXY_HOST.to_string()),
            proxy_port: parse_or(get("PORT"), "PORT", DEFAULT_PROXY_PORT),
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.api_url, SEARCH_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.api_url, HEALTH_PATH)
    }

    /// Upstream URL the proxy forwards answer requests to
    pub fn answer_upstream_url(&self) -> String {
        format!("{}{}", self.python_backend_url, ANSWER_PATH)
    }

    /// Returns the `"host:port"` bind address of the proxy
    pub fn proxy_addr(&self) -> String {
        format!("{}:{}", self.proxy_host, self.proxy_port)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Per-user env file, e.g. `~/.config/legal-search/env` on Linux
fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("legal-search").join("env"))
}

fn load_env_files() {
    for name in ENV_FILES {
        if let Ok(path) = dotenvy::from_filename(name) {
            tracing::debug!("Loaded environment from {:?}", path);
        }
    }

    if let Some(path) = user_env_file().filter(|p| p.exists()) {
        match dotenvy::from_path(&path) {
            Ok(()) => tracing::debug!("Loaded environment from {:?}", path),
            Err(e) => tracing::warn!("Could not read {:?}: {}", path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:8081");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_millis(2000));
        assert_eq!(config.proxy_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_api_url_prefers_api_url_over_next_public() {
        let config = Config::from_lookup(lookup(&[
            ("API_URL", "https://primary.example"),
            ("NEXT_PUBLIC_API_URL", "https://legacy.example"),
        ]));
        assert_eq!(config.api_url, "https://primary.example");

        let config = Config::from_lookup(lookup(&[("NEXT_PUBLIC_API_URL", "https://legacy.example/")]));
        assert_eq!(config.api_url, "https://legacy.example");
    }

    #[test]
    fn test_endpoint_urls() {
        let config = Config::from_lookup(lookup(&[
            ("API_URL", "http://backend:9000/"),
            ("PYTHON_BACKEND_URL", "http://python:8000"),
        ]));
        assert_eq!(config.search_url(), "http://backend:9000/search");
        assert_eq!(config.health_url(), "http://backend:9000/api/health");
        assert_eq!(config.answer_upstream_url(), "http://python:8000/api/answer");
    }

    #[test]
    fn test_numeric_overrides_and_invalid_values() {
        let config = Config::from_lookup(lookup(&[
            ("API_TIMEOUT_MS", "5000"),
            ("API_RETRY_ATTEMPTS", "five"),
            ("API_RETRY_DELAY_MS", " 250 "),
            ("PORT", "99999"),
        ]));
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_millis(250));
        assert_eq!(config.proxy_port, 3000);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = Config::from_lookup(lookup(&[("API_URL", "  "), ("HOST", "")]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.proxy_host, DEFAULT_PROXY_HOST);
    }
}
