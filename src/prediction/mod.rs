//! Prediction pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! decoded Object
//!     → projector.rs (drop nulls, stringify → InputRecord)
//!     → ScoringEngine::score (external)
//!     → PredictionResult
//!     → normalizer.rs (→ response document Object)
//! ```
//!
//! # Design Decisions
//! - Both steps are pure functions with no state across calls
//! - Label selection belongs to the engine, never the normalizer
//! - The decoded request is echoed back unmodified under `input`

pub mod normalizer;
pub mod projector;

pub use normalizer::{normalize, UNHANDLED_WARNING};
pub use projector::project;
