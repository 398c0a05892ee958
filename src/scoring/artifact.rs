//! Model artifact schema.
//!
//! An artifact is a TOML document describing a generalized linear scorer:
//! the input columns, a weight matrix over the expanded (one-hot) columns,
//! and the parameters specific to the model's outcome category.
//!
//! ```toml
//! category = "Binomial"
//! response_names = ["No", "Yes"]
//! weights = [[0.04, -0.8, 0.3]]
//! intercepts = [-1.2]
//!
//! [[features]]
//! name = "tenure"
//! default = 12.0
//!
//! [[features]]
//! name = "plan"
//! levels = ["basic", "premium"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::scoring::OutcomeCategory;

/// Errors raised while loading a model artifact.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

fn invalid(msg: impl Into<String>) -> LoadError {
    LoadError::Invalid(msg.into())
}

/// Root of a model artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Outcome category name, e.g. "Binomial" or "Regression".
    pub category: String,

    /// Class names, in probability order.
    #[serde(default)]
    pub response_names: Option<Vec<String>>,

    /// Input columns, in the order their expanded values appear in `weights`.
    #[serde(default)]
    pub features: Vec<FeatureSpec>,

    /// One row per linear output, each as wide as the expanded features.
    #[serde(default)]
    pub weights: Vec<Vec<f64>>,

    /// Per-row intercepts. Empty means zero.
    #[serde(default)]
    pub intercepts: Vec<f64>,

    /// Decision threshold for Binomial labels and anomaly flags.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Ascending ordinal cut-points, one fewer than the classes.
    #[serde(default)]
    pub thresholds: Vec<f64>,

    /// Cluster centres over the expanded features.
    #[serde(default)]
    pub centroids: Vec<Vec<f64>>,

    /// `[min, max]` raw anomaly score used for min-max normalisation.
    #[serde(default)]
    pub score_range: Option<[f64; 2]>,
}

fn default_threshold() -> f64 {
    0.5
}

/// A single input column.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureSpec {
    pub name: String,

    /// Categorical levels. Absent for numeric columns.
    #[serde(default)]
    pub levels: Option<Vec<String>>,

    /// Imputed value for a missing numeric entry (0.0 when absent).
    #[serde(default)]
    pub default: Option<f64>,
}

impl FeatureSpec {
    /// Number of expanded columns this feature occupies.
    pub fn width(&self) -> usize {
        self.levels.as_ref().map_or(1, Vec::len)
    }
}

impl ModelArtifact {
    /// Read, parse and validate an artifact file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate an artifact from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let artifact: ModelArtifact = toml::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn outcome_category(&self) -> OutcomeCategory {
        OutcomeCategory::from_name(&self.category)
    }

    /// Total width of the expanded feature row.
    pub fn width(&self) -> usize {
        self.features.iter().map(FeatureSpec::width).sum()
    }

    /// Check that every matrix agrees with the feature layout and that the
    /// category has the parameters it needs.
    pub fn validate(&self) -> Result<(), LoadError> {
        self.validate_features()?;

        let width = self.width();
        if let Some(row) = self.weights.iter().position(|r| r.len() != width) {
            return Err(invalid(format!(
                "weights row {} has {} columns, expected {}",
                row,
                self.weights[row].len(),
                width
            )));
        }
        if let Some(row) = self.centroids.iter().position(|r| r.len() != width) {
            return Err(invalid(format!(
                "centroid {} has {} columns, expected {}",
                row,
                self.centroids[row].len(),
                width
            )));
        }
        if !self.intercepts.is_empty() && self.intercepts.len() != self.weights.len() {
            return Err(invalid(format!(
                "{} intercepts for {} weight rows",
                self.intercepts.len(),
                self.weights.len()
            )));
        }

        let names = self.response_names.as_deref().unwrap_or(&[]);
        match self.outcome_category() {
            OutcomeCategory::Regression | OutcomeCategory::CoxPH => self.expect_rows(1),
            OutcomeCategory::Binomial => {
                self.expect_rows(1)?;
                if names.len() != 2 {
                    return Err(invalid("Binomial models need exactly 2 response names"));
                }
                self.expect_probability_threshold()
            }
            OutcomeCategory::Multinomial => {
                if names.len() < 2 {
                    return Err(invalid("Multinomial models need at least 2 response names"));
                }
                self.expect_rows(names.len())
            }
            OutcomeCategory::Ordinal => {
                self.expect_rows(1)?;
                if names.len() < 2 {
                    return Err(invalid("Ordinal models need at least 2 response names"));
                }
                if self.thresholds.len() != names.len() - 1 {
                    return Err(invalid(format!(
                        "Ordinal models need {} thresholds, got {}",
                        names.len() - 1,
                        self.thresholds.len()
                    )));
                }
                if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(invalid("Ordinal thresholds must be strictly ascending"));
                }
                Ok(())
            }
            OutcomeCategory::Clustering => {
                if self.centroids.is_empty() {
                    return Err(invalid("Clustering models need at least one centroid"));
                }
                Ok(())
            }
            OutcomeCategory::AutoEncoder | OutcomeCategory::DimReduction => {
                if self.weights.is_empty() {
                    return Err(invalid(format!(
                        "{} models need at least one weights row",
                        self.category
                    )));
                }
                Ok(())
            }
            OutcomeCategory::AnomalyDetection => {
                self.expect_rows(1)?;
                if let Some([min, max]) = self.score_range {
                    if !(max > min) {
                        return Err(invalid("score_range must be [min, max] with max > min"));
                    }
                }
                self.expect_probability_threshold()
            }
            OutcomeCategory::Other(_) => Ok(()),
        }
    }

    fn validate_features(&self) -> Result<(), LoadError> {
        let mut seen = HashSet::new();
        for feature in &self.features {
            if feature.name.is_empty() {
                return Err(invalid("feature names must not be empty"));
            }
            if !seen.insert(feature.name.as_str()) {
                return Err(invalid(format!("duplicate feature '{}'", feature.name)));
            }
            if matches!(&feature.levels, Some(levels) if levels.is_empty()) {
                return Err(invalid(format!(
                    "categorical feature '{}' has no levels",
                    feature.name
                )));
            }
        }
        Ok(())
    }

    fn expect_rows(&self, rows: usize) -> Result<(), LoadError> {
        if self.weights.len() != rows {
            return Err(invalid(format!(
                "{} models need {} weights row(s), got {}",
                self.category,
                rows,
                self.weights.len()
            )));
        }
        Ok(())
    }

    fn expect_probability_threshold(&self) -> Result<(), LoadError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(invalid(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}
