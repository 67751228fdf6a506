//! HTTP client for a remote summarization model endpoint.

use crate::errors::PipelineError;
use crate::pipeline::SummarizationPipeline;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-call timeout; remote inference on long inputs is slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(240);
/// Timeout for the startup health probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A summarization model hosted behind an HTTP endpoint.
///
/// The endpoint is expected to expose `POST /summarize` accepting
/// `{"text", "min_length", "max_length", "do_sample"}` and returning
/// `{"summary": ...}`, plus `GET /health` for liveness.
pub struct HttpPipeline {
    endpoint_url: String,
    auth_token: Option<String>,
    client: Client,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    min_length: usize,
    max_length: usize,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: Option<String>,
    error: Option<String>,
}

impl HttpPipeline {
    /// Creates a client for the model at `endpoint_url`, sending `auth_token`
    /// as the `Authorization` header when present.
    pub fn new(
        endpoint_url: String,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint_url: endpoint_url.trim_end_matches('/').to_string(),
            auth_token,
            client,
        })
    }

    /// Pings the model endpoint's health route. Returns false on any failure;
    /// callers decide whether to start degraded or abort.
    pub async fn probe(&self) -> bool {
        let request_url = format!("{}/health", self.endpoint_url);
        log::info!("Probing model endpoint health at {}", request_url);

        let mut request = self.client.get(&request_url).timeout(PROBE_TIMEOUT);
        if let Some(token) = &self.auth_token {
            request = request.header("Authorization", token);
        }

        match request.send().await {
            Ok(response) => {
                let healthy = response.status().is_success();
                log::info!("Model endpoint healthy: {}", healthy);
                healthy
            }
            Err(err) => {
                log::error!("Error probing model endpoint: {}", err);
                false
            }
        }
    }
}

#[async_trait]
impl SummarizationPipeline for HttpPipeline {
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
        do_sample: bool,
    ) -> Result<String, PipelineError> {
        let payload = SummarizeRequest {
            text,
            min_length,
            max_length,
            do_sample,
        };

        let request_url = format!("{}/summarize", self.endpoint_url);
        log::debug!("HttpPipeline sending request to {}", request_url);

        let mut request = self.client.post(&request_url).json(&payload);
        if let Some(token) = &self.auth_token {
            request = request.header("Authorization", token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Model(format!(
                "Summarizer service error: {} - {}",
                status, body
            )));
        }

        let body: SummarizeResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Model(format!("Malformed model response: {}", e)))?;

        match body.summary {
            Some(summary) => Ok(summary),
            None => Err(PipelineError::Model(
                body.error
                    .unwrap_or_else(|| "No summary in model response".to_string()),
            )),
        }
    }
}
