//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, method routing)
//!     → request.rs (request ID)
//!     → handlers.rs (/health, /metadata, /predict)
//!         → json::decode → prediction::project → ScoringEngine::score
//!         → prediction::normalize
//!     → response.rs (json::encode, status mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, JSON_CONTENT_TYPE};
pub use server::{build_router, AppState, HttpServer};
