//! HTTP endpoint layer for the precis summarization service.
//!
//! Exposes a two-route surface: `/health` reports whether a summarization
//! pipeline was loaded at startup, and `/summarize` runs the
//! clean → adjust → summarize flow over a JSON request body. The pipeline
//! handle is built once at process start and shared immutably with every
//! request; there is no re-initialization path, so a process that starts
//! without a model stays degraded (503 on `/summarize`) for its lifetime.

pub mod error;

pub use error::{Result, ServerError};

use axum::extract::{Json as AxumJson, State};
use axum::http::{header, Method, StatusCode};
use axum::response::Json;
use axum::routing::{get, options, post};
use axum::{middleware, Router};
use precis_core::pipeline::{generate_summary, SummarizationPipeline};
use precis_core::{clean_html, PipelineError};
use serde::Serialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub summarizer_status: &'static str,
}

/// Configuration for the precis server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
    /// Enable request logging
    pub enable_logging: bool,
    /// Pass sampling through to the model instead of greedy decoding
    pub do_sample: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            enable_cors: true,
            enable_logging: true,
            do_sample: false,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Parse and set the bind address from a string.
    pub fn with_bind_addr_str(mut self, addr: &str) -> Result<Self> {
        self.bind_addr = addr
            .parse()
            .map_err(|e| ServerError::config_error(format!("Invalid bind address: {}", e)))?;
        Ok(self)
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    /// Enable or disable request logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Enable or disable sampling on the model call.
    pub fn with_sampling(mut self, enable: bool) -> Self {
        self.do_sample = enable;
        self
    }
}

/// Shared application state: the pipeline handle and configuration.
///
/// `pipeline` is `None` when the model failed to load at startup. Nothing
/// mutates it afterwards, so no synchronization is needed.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Option<Arc<dyn SummarizationPipeline>>,
    pub config: ServerConfig,
}

/// Handler for the /health GET endpoint.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.pipeline.is_some() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK",
                summarizer_status: "Loaded",
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "Error",
                summarizer_status: "Not Loaded",
            }),
        )
    }
}

/// Handler for the /summarize POST endpoint.
async fn summarize_handler(
    State(state): State<AppState>,
    AxumJson(body): AxumJson<Value>,
) -> std::result::Result<Json<Value>, (StatusCode, Json<Value>)> {
    let raw_text = match body.get("text").and_then(|v| v.as_str()) {
        Some(text) => text,
        None => {
            log::warn!("Summarize request without a text field");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "No text provided"})),
            ));
        }
    };

    let text = clean_html(raw_text);
    if text.is_empty() {
        log::warn!("Summarize request empty after HTML cleaning");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Text content is empty after cleaning HTML"})),
        ));
    }

    let pipeline = match &state.pipeline {
        Some(pipeline) => pipeline,
        None => {
            log::error!("Summarize request received but no pipeline is loaded");
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "Summarizer service is not available"})),
            ));
        }
    };

    match generate_summary(pipeline.as_ref(), &text, state.config.do_sample).await {
        Ok(summary) => Ok(Json(json!({"summary": summary}))),
        Err(err @ PipelineError::NotInitialized) => {
            log::error!("Pipeline reported itself uninitialized mid-request");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": err.to_string()})),
            ))
        }
        Err(err) => {
            log::error!("Unexpected summarization failure: {}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": err.to_string()})),
            ))
        }
    }
}

/// The main precis HTTP server.
pub struct PrecisServer {
    pipeline: Option<Arc<dyn SummarizationPipeline>>,
    config: ServerConfig,
}

impl PrecisServer {
    /// Create a new server with the given pipeline handle and default
    /// configuration.
    pub fn new(pipeline: Option<Arc<dyn SummarizationPipeline>>) -> Self {
        Self {
            pipeline,
            config: ServerConfig::default(),
        }
    }

    /// Create a new server with custom configuration.
    pub fn with_config(
        pipeline: Option<Arc<dyn SummarizationPipeline>>,
        config: ServerConfig,
    ) -> Self {
        Self { pipeline, config }
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let state = AppState {
            pipeline: self.pipeline.clone(),
            config: self.config.clone(),
        };

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/summarize", post(summarize_handler))
            // CORS preflight
            .route("/summarize", options(|| async { StatusCode::OK }))
            .with_state(state);

        if self.config.enable_logging {
            router =
                router.layer(middleware::from_fn(
                    |request: axum::http::Request<axum::body::Body>,
                     next: axum::middleware::Next| async {
                        let request_id = uuid::Uuid::new_v4().to_string();
                        let method = request.method().clone();
                        let uri = request.uri().clone();

                        log::info!("Request {} {} {}", request_id, method, uri);

                        let start = std::time::Instant::now();
                        let response = next.run(request).await;
                        let duration = start.elapsed();

                        log::info!("Response {} completed in {:?}", request_id, duration);

                        response
                    },
                ));
        }

        router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
            );
        }

        router
    }

    /// Start the server and listen for connections.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| {
                ServerError::config_error(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;

        log::info!("precis server starting on {}", self.config.bind_addr);
        log::info!("Health check: http://{}/health", self.config.bind_addr);
        log::info!("Summarize: http://{}/summarize", self.config.bind_addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided shutdown signal is received.
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| {
                ServerError::config_error(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;

        log::info!(
            "precis server starting on {} with graceful shutdown",
            self.config.bind_addr
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)))?;

        log::info!("precis server shut down gracefully");
        Ok(())
    }
}

/// Utility function to create a shutdown signal from Ctrl+C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt; // for `oneshot`

    struct MockPipeline {
        summary: String,
        seen_bounds: Arc<Mutex<Option<(usize, usize)>>>,
    }

    impl MockPipeline {
        fn new(summary: &str) -> Self {
            Self {
                summary: summary.to_string(),
                seen_bounds: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl SummarizationPipeline for MockPipeline {
        async fn summarize(
            &self,
            _text: &str,
            min_length: usize,
            max_length: usize,
            _do_sample: bool,
        ) -> std::result::Result<String, PipelineError> {
            *self.seen_bounds.lock().unwrap() = Some((min_length, max_length));
            Ok(self.summary.clone())
        }
    }

    fn router_with(pipeline: Option<Arc<dyn SummarizationPipeline>>) -> Router {
        let config = ServerConfig::default().with_logging(false);
        PrecisServer::with_config(pipeline, config).build_router()
    }

    fn summarize_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/summarize")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_loaded_pipeline() {
        let app = router_with(Some(Arc::new(MockPipeline::new("ok"))));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["summarizer_status"], "Loaded");
    }

    #[tokio::test]
    async fn health_reports_missing_pipeline() {
        let app = router_with(None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["status"], "Error");
        assert_eq!(body["summarizer_status"], "Not Loaded");
    }

    #[tokio::test]
    async fn summarize_rejects_missing_text() {
        let app = router_with(Some(Arc::new(MockPipeline::new("ok"))));

        let response = app.oneshot(summarize_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No text provided");
    }

    #[tokio::test]
    async fn summarize_rejects_text_that_cleans_to_empty() {
        let app = router_with(Some(Arc::new(MockPipeline::new("ok"))));

        let response = app
            .oneshot(summarize_request(
                "{\"text\": \"<iframe>only an embed</iframe>\"}",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Text content is empty after cleaning HTML");
    }

    #[tokio::test]
    async fn summarize_without_pipeline_is_unavailable() {
        let app = router_with(None);
        let text = vec!["word"; 50].join(" ");

        let response = app
            .oneshot(summarize_request(&format!("{{\"text\": \"{}\"}}", text)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Summarizer service is not available");
    }

    #[tokio::test]
    async fn short_input_returns_sentinel_without_model_call() {
        let mock = MockPipeline::new("unused");
        let seen_bounds = mock.seen_bounds.clone();
        let app = router_with(Some(Arc::new(mock)));

        let response = app
            .oneshot(summarize_request("{\"text\": \"<p>Hello world</p>\"}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body["summary"],
            "Input text is too short to generate a meaningful summary."
        );
        assert!(seen_bounds.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn summarize_passes_adjusted_bounds_to_model() {
        let mock = MockPipeline::new("A fine summary.");
        let seen_bounds = mock.seen_bounds.clone();
        let app = router_with(Some(Arc::new(mock)));
        let text = vec!["word"; 50].join(" ");

        let response = app
            .oneshot(summarize_request(&format!("{{\"text\": \"{}\"}}", text)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["summary"], "A fine summary.");
        // 50 words: min scales to 25, max to 40.
        assert_eq!(*seen_bounds.lock().unwrap(), Some((25, 40)));
    }
}
