//! Web server exposing a pretrained summarization model over HTTP
//!
//! This binary hosts the precis summarization endpoints as a network service.
//! The model itself runs behind a separate HTTP endpoint; this process is the
//! glue that cleans incoming text, derives safe length bounds, and relays the
//! call. The pipeline handle is constructed once at startup: if the model
//! endpoint is unconfigured or fails its health probe, the server still comes
//! up and reports the degraded state through `/health`.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use precis_core::pipeline::{http::DEFAULT_TIMEOUT, HttpPipeline, SummarizationPipeline};
use precis_server::{shutdown_signal, PrecisServer, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "precis - HTTP text summarization service")]
struct Cli {
    #[clap(long, default_value = "127.0.0.1:3000")]
    bind_addr: String,

    #[clap(
        long,
        help = "Base URL of the summarization model endpoint (falls back to the PRECIS_MODEL_URL environment variable)"
    )]
    model_url: Option<String>,

    #[clap(
        long,
        help = "Authorization token for the model endpoint (falls back to PRECIS_MODEL_TOKEN)"
    )]
    model_token: Option<String>,

    #[clap(long, help = "Per-call model timeout in seconds")]
    model_timeout_secs: Option<u64>,

    #[clap(long, help = "Skip the startup health probe of the model endpoint")]
    skip_probe: bool,

    #[clap(long, short, default_value = "info")]
    log_level: String,

    #[clap(long, help = "Ask the model to sample instead of decoding greedily")]
    do_sample: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let model_url = cli
        .model_url
        .or_else(|| std::env::var("PRECIS_MODEL_URL").ok());
    let model_token = cli
        .model_token
        .or_else(|| std::env::var("PRECIS_MODEL_TOKEN").ok());
    let timeout = cli
        .model_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    let pipeline: Option<Arc<dyn SummarizationPipeline>> = match model_url {
        Some(url) => {
            let pipeline = HttpPipeline::new(url.clone(), model_token, timeout)?;
            if cli.skip_probe || pipeline.probe().await {
                log::info!("Summarization pipeline ready at {}", url);
                Some(Arc::new(pipeline))
            } else {
                log::error!(
                    "Model endpoint at {} failed its health probe; starting without a pipeline",
                    url
                );
                None
            }
        }
        None => {
            log::warn!("No model URL configured; /summarize will return 503");
            None
        }
    };

    let bind_socket_addr: SocketAddr = cli
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cli.bind_addr, e))?;

    let server_config = ServerConfig::default()
        .with_bind_addr(bind_socket_addr)
        .with_sampling(cli.do_sample);

    log::info!("Starting precis server on {}...", bind_socket_addr);

    let server = PrecisServer::with_config(pipeline, server_config);

    if let Err(e) = server.serve_with_shutdown(shutdown_signal()).await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    log::info!("precis server shut down gracefully.");
    Ok(())
}
