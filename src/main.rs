//! Prediction Server (v1)
//!
//! Exposes a pretrained scoring model over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                  PREDICTION SERVER                    │
//!                        │                                                       │
//!   POST /predict        │  ┌─────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ─────────────────────┼─▶│  http   │──▶│  json    │──▶│   prediction     │   │
//!                        │  │ server  │   │ decode   │   │   projector      │   │
//!                        │  └─────────┘   └──────────┘   └────────┬─────────┘   │
//!                        │                                        │             │
//!                        │                                        ▼             │
//!                        │                               ┌──────────────────┐   │
//!                        │                               │ scoring engine   │   │
//!                        │                               │ (loaded once)    │   │
//!                        │                               └────────┬─────────┘   │
//!                        │                                        │             │
//!                        │                                        ▼             │
//!   200 / 4xx / 5xx      │  ┌─────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ◀────────────────────┼──│response │◀──│  json    │◀──│   prediction     │   │
//!                        │  │         │   │ encode   │   │   normalizer     │   │
//!                        │  └─────────┘   └──────────┘   └──────────────────┘   │
//!                        │                                                       │
//!                        │   config · observability · lifecycle                 │
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use prediction_server::config::load_config;
use prediction_server::lifecycle;
use prediction_server::observability::logging;

#[derive(Parser)]
#[command(name = "prediction-server")]
#[command(about = "Serve a pretrained scoring model over HTTP", long_about = None)]
struct Args {
    /// Optional TOML configuration file. MODEL_PATH and PORT override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "prediction-server starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        model_path = %config.model.path,
        max_body_bytes = config.limits.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
