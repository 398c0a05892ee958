//! Prediction Server Library
//!
//! Serves a pretrained scoring model over HTTP: a flat JSON record goes in,
//! a normalized JSON document describing the prediction comes out.

pub mod config;
pub mod http;
pub mod json;
pub mod lifecycle;
pub mod observability;
pub mod prediction;
pub mod scoring;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use scoring::ScoringEngine;
