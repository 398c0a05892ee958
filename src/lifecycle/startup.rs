//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the model artifact and build the engine
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last (traffic only when the model is ready)

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ModelConfig, ServerConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::scoring::{LinearEngine, LoadError, ScoringEngine};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load model: {0}")]
    Model(#[from] LoadError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Load the configured model artifact.
pub fn load_engine(config: &ModelConfig) -> Result<Arc<dyn ScoringEngine>, LoadError> {
    tracing::info!(path = %config.path, "Loading model artifact");
    let engine = LinearEngine::load(Path::new(&config.path), config.scoring_options())?;
    tracing::info!(
        category = %engine.category(),
        features = engine.feature_count(),
        response_names = ?engine.response_names(),
        "Model loaded"
    );
    Ok(Arc::new(engine))
}

/// Start the server and block until shutdown.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let engine = load_engine(&config.model)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e| StartupError::Metrics(format!("{}", e)))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!(address = %address, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(&config, engine);
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_fails_fast() {
        let config = ModelConfig {
            path: "/nonexistent/model.toml".into(),
            ..ModelConfig::default()
        };
        assert!(matches!(load_engine(&config), Err(LoadError::Io { .. })));
    }

    #[tokio::test]
    async fn test_run_aborts_before_binding() {
        let mut config = ServerConfig::default();
        config.model.path = "/nonexistent/model.toml".into();
        let err = run(config).await.unwrap_err();
        assert!(matches!(err, StartupError::Model(_)));
        assert!(err.to_string().starts_with("failed to load model"));
    }

    #[test]
    fn test_bundled_model_loads() {
        let config = ModelConfig {
            path: concat!(env!("CARGO_MANIFEST_DIR"), "/models/churn.toml").into(),
            ..ModelConfig::default()
        };
        let engine = load_engine(&config).unwrap();
        assert_eq!(engine.category().name(), "Binomial");
        assert_eq!(
            engine.response_names(),
            Some(&["No".to_string(), "Yes".to_string()][..])
        );
    }
}
