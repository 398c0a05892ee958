//! Scoring engine subsystem.
//!
//! # Data Flow
//! ```text
//! model artifact (TOML)
//!     → artifact.rs (parse & shape checks)
//!     → engine.rs (LinearEngine, immutable once loaded)
//!     → shared as Arc<dyn ScoringEngine> to every request
//!
//! Per request:
//!     InputRecord → features.rs (encode to a numeric row)
//!                 → engine.rs (category-specific scoring)
//!                 → PredictionResult
//! ```
//!
//! # Design Decisions
//! - The HTTP layer only sees the `ScoringEngine` trait
//! - Engines are loaded once at startup and never mutated
//! - Scoring is synchronous and CPU bound

pub mod artifact;
pub mod engine;
pub mod features;

use std::fmt;

use thiserror::Error;

pub use artifact::{FeatureSpec, LoadError, ModelArtifact};
pub use engine::LinearEngine;

/// A loaded model that turns one input record into one prediction.
pub trait ScoringEngine: Send + Sync {
    /// The outcome category this model produces.
    fn category(&self) -> &OutcomeCategory;

    /// Declared class names, in probability order. `None` for models
    /// without a categorical response.
    fn response_names(&self) -> Option<&[String]>;

    /// Score a single record.
    fn score(&self, record: &InputRecord) -> Result<PredictionResult, ScoringError>;
}

/// Discriminator naming which [`PredictionResult`] variant a model produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeCategory {
    Binomial,
    Multinomial,
    Regression,
    Ordinal,
    Clustering,
    AutoEncoder,
    AnomalyDetection,
    CoxPH,
    DimReduction,
    /// Any category the service does not shape explicitly.
    Other(String),
}

impl OutcomeCategory {
    /// Parse a category name. Unrecognised names become [`OutcomeCategory::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Binomial" => Self::Binomial,
            "Multinomial" => Self::Multinomial,
            "Regression" => Self::Regression,
            "Ordinal" => Self::Ordinal,
            "Clustering" => Self::Clustering,
            "AutoEncoder" => Self::AutoEncoder,
            "AnomalyDetection" => Self::AnomalyDetection,
            "CoxPH" => Self::CoxPH,
            "DimReduction" => Self::DimReduction,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Binomial => "Binomial",
            Self::Multinomial => "Multinomial",
            Self::Regression => "Regression",
            Self::Ordinal => "Ordinal",
            Self::Clustering => "Clustering",
            Self::AutoEncoder => "AutoEncoder",
            Self::AnomalyDetection => "AnomalyDetection",
            Self::CoxPH => "CoxPH",
            Self::DimReduction => "DimReduction",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One model outcome. Produced once per request, consumed by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    /// Class probabilities are in the order of the engine's response names.
    Binomial { label: String, class_probabilities: Vec<f64> },
    Multinomial { label: String, class_probabilities: Vec<f64> },
    Regression { value: f64 },
    Ordinal { label: String, label_index: i64 },
    Clustering { cluster: i64 },
    AutoEncoder { reconstructed: Vec<f64> },
    AnomalyDetection { normalized_score: f64, score: f64, is_anomaly: bool },
    SurvivalValue { value: f64 },
    DimensionVector { dimensions: Vec<f64> },
    Unhandled { category_name: String },
}

/// The engine's native input: field name → textual value, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    fields: Vec<(String, String)>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping the first position of the key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// How the engine treats values outside a column's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringOptions {
    /// Treat an unknown categorical level as missing instead of failing.
    pub convert_unknown_levels_to_na: bool,
    /// Treat an unparseable numeric value as missing instead of failing.
    pub convert_invalid_numbers_to_na: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            convert_unknown_levels_to_na: true,
            convert_invalid_numbers_to_na: true,
        }
    }
}

/// Errors raised while scoring a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// A categorical column received a level the model was not trained on.
    #[error("Unknown categorical level '{level}' for column '{column}'")]
    UnknownLevel { column: String, level: String },

    /// A numeric column received text that is not a number.
    #[error("Invalid numeric value '{value}' for column '{column}'")]
    InvalidNumber { column: String, value: String },
}
