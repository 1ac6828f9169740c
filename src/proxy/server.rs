//! HTTP server for the answer proxy
//!
//! Relays `POST /api/answer` to the Python backend.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::{Config, ANSWER_PATH};

/// Shared state for the proxy handlers
#[derive(Debug)]
pub struct ProxyState {
    client: reqwest::Client,
    upstream_url: String,
}

impl ProxyState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            upstream_url: config.answer_upstream_url(),
        })
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(StatusCode),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!("Error proxying to Python backend: {}", self);
        let body = serde_json::json!({ "error": "Failed to process request" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the proxy router
pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route(ANSWER_PATH, post(answer))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// POST /api/answer: forward the JSON body verbatim, relay the JSON reply
async fn answer(State(state): State<Arc<ProxyState>>, body: Bytes) -> Result<Json<Value>, ProxyError> {
    let payload: Value = serde_json::from_slice(&body)?;

    let response = state
        .client
        .post(&state.upstream_url)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::UpstreamStatus(status));
    }

    Ok(Json(response.json::<Value>().await?))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Start the proxy and serve until SIGINT/SIGTERM
pub async fn start_server(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = config.proxy_addr();
    let state = Arc::new(ProxyState::new(config)?);

    tracing::info!("Starting answer proxy on {} -> {}", addr, state.upstream_url);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Answer proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install SIGINT handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(upstream: &str) -> Router {
        let config = Config {
            python_backend_url: upstream.to_string(),
            timeout: Duration::from_secs(5),
            ..Config::default()
        };
        router(Arc::new(ProxyState::new(&config).unwrap()))
    }

    fn answer_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/answer")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_answer_relays_backend_json() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/answer"))
            .and(body_json(json!({"query": "What is DACA?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "Deferred Action for Childhood Arrivals.",
                "sources": []
            })))
            .expect(1)
            .mount(&upstream)
            .await;

        let response = app_for(&upstream.uri())
            .oneshot(answer_request(r#"{"query":"What is DACA?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "Deferred Action for Childhood Arrivals.");
    }

    #[tokio::test]
    async fn test_answer_maps_upstream_status_to_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/answer"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&upstream)
            .await;

        let response = app_for(&upstream.uri())
            .oneshot(answer_request(r#"{"query":"q"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "Failed to process request"}));
    }

    #[tokio::test]
    async fn test_answer_rejects_invalid_json_with_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let response = app_for(&upstream.uri())
            .oneshot(answer_request("query=q"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "Failed to process request");
    }

    #[tokio::test]
    async fn test_answer_maps_non_json_upstream_body_to_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/answer"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Service waking up"))
            .mount(&upstream)
            .await;

        let response = app_for(&upstream.uri())
            .oneshot(answer_request(r#"{"query":"q"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_answer_maps_unreachable_backend_to_500() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let upstream = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let response = app_for(&upstream)
            .oneshot(answer_request(r#"{"query":"q"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app_for("http://127.0.0.1:9")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }
}
