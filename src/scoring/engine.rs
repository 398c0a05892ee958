//! Generalized linear scoring engine.
//!
//! Every category starts from the same linear step, `Wx + b` over the
//! encoded feature row, and then applies its own link:
//!
//! | Category           | Output                                          |
//! |--------------------|-------------------------------------------------|
//! | Regression, CoxPH  | linear predictor                                |
//! | Binomial           | logistic, label chosen by `threshold`           |
//! | Multinomial        | softmax over one row per class, argmax label    |
//! | Ordinal            | cumulative logit over cut-points, argmax class  |
//! | Clustering         | nearest centroid (squared Euclidean)            |
//! | AutoEncoder        | `Wᵀ(Wx + b)`                                    |
//! | AnomalyDetection   | min-max (or logistic) normalised linear score   |
//! | DimReduction       | `Wx + b`                                        |

use std::path::Path;

use crate::scoring::features::FeatureEncoder;
use crate::scoring::{
    InputRecord, LoadError, ModelArtifact, OutcomeCategory, PredictionResult, ScoringEngine,
    ScoringError, ScoringOptions,
};

/// A scoring engine built from a [`ModelArtifact`].
#[derive(Debug, Clone)]
pub struct LinearEngine {
    category: OutcomeCategory,
    response_names: Option<Vec<String>>,
    encoder: FeatureEncoder,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    threshold: f64,
    thresholds: Vec<f64>,
    centroids: Vec<Vec<f64>>,
    score_range: Option<[f64; 2]>,
}

impl LinearEngine {
    /// Load an engine from an artifact file.
    pub fn load(path: &Path, options: ScoringOptions) -> Result<Self, LoadError> {
        let artifact = ModelArtifact::load(path)?;
        Ok(Self::from_artifact(artifact, options))
    }

    /// Build an engine from an already validated artifact.
    pub fn from_artifact(artifact: ModelArtifact, options: ScoringOptions) -> Self {
        let category = artifact.outcome_category();
        let intercepts = if artifact.intercepts.is_empty() {
            vec![0.0; artifact.weights.len()]
        } else {
            artifact.intercepts
        };
        Self {
            category,
            response_names: artifact.response_names,
            encoder: FeatureEncoder::new(artifact.features, options),
            weights: artifact.weights,
            intercepts,
            threshold: artifact.threshold,
            thresholds: artifact.thresholds,
            centroids: artifact.centroids,
            score_range: artifact.score_range,
        }
    }

    /// Number of input columns the model reads.
    pub fn feature_count(&self) -> usize {
        self.encoder.feature_count()
    }

    fn linear(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| dot(row, x) + b)
            .collect()
    }

    fn names(&self) -> &[String] {
        self.response_names.as_deref().unwrap_or(&[])
    }

    fn label(&self, idx: usize) -> String {
        self.names().get(idx).cloned().unwrap_or_else(|| idx.to_string())
    }

    fn binomial(&self, eta: f64) -> PredictionResult {
        let p = sigmoid(eta);
        let idx = usize::from(p >= self.threshold);
        PredictionResult::Binomial {
            label: self.label(idx),
            class_probabilities: vec![1.0 - p, p],
        }
    }

    fn multinomial(&self, etas: &[f64]) -> PredictionResult {
        let probs = softmax(etas);
        PredictionResult::Multinomial {
            label: self.label(argmax(&probs)),
            class_probabilities: probs,
        }
    }

    fn ordinal(&self, eta: f64) -> PredictionResult {
        let mut probs = Vec::with_capacity(self.thresholds.len() + 1);
        let mut previous = 0.0;
        for theta in &self.thresholds {
            let cumulative = sigmoid(theta - eta);
            probs.push(cumulative - previous);
            previous = cumulative;
        }
        probs.push(1.0 - previous);

        let idx = argmax(&probs);
        PredictionResult::Ordinal {
            label: self.label(idx),
            label_index: idx as i64,
        }
    }

    fn clustering(&self, x: &[f64]) -> PredictionResult {
        let distances: Vec<f64> = self
            .centroids
            .iter()
            .map(|c| c.iter().zip(x).map(|(a, b)| (a - b) * (a - b)).sum())
            .collect();
        PredictionResult::Clustering {
            cluster: argmin(&distances) as i64,
        }
    }

    fn auto_encoder(&self, x: &[f64]) -> PredictionResult {
        let hidden = self.linear(x);
        let reconstructed = (0..x.len())
            .map(|col| {
                self.weights
                    .iter()
                    .zip(&hidden)
                    .map(|(row, h)| row[col] * h)
                    .sum()
            })
            .collect();
        PredictionResult::AutoEncoder { reconstructed }
    }

    fn anomaly(&self, score: f64) -> PredictionResult {
        let normalized_score = match self.score_range {
            Some([min, max]) => (score - min) / (max - min),
            None => sigmoid(score),
        };
        PredictionResult::AnomalyDetection {
            normalized_score,
            score,
            is_anomaly: normalized_score >= self.threshold,
        }
    }
}

impl ScoringEngine for LinearEngine {
    fn category(&self) -> &OutcomeCategory {
        &self.category
    }

    fn response_names(&self) -> Option<&[String]> {
        self.response_names.as_deref()
    }

    fn score(&self, record: &InputRecord) -> Result<PredictionResult, ScoringError> {
        if let OutcomeCategory::Other(name) = &self.category {
            return Ok(PredictionResult::Unhandled {
                category_name: name.clone(),
            });
        }

        let x = self.encoder.encode(record)?;
        let result = match &self.category {
            OutcomeCategory::Regression => PredictionResult::Regression {
                value: self.linear(&x)[0],
            },
            OutcomeCategory::CoxPH => PredictionResult::SurvivalValue {
                value: self.linear(&x)[0],
            },
            OutcomeCategory::Binomial => self.binomial(self.linear(&x)[0]),
            OutcomeCategory::Multinomial => self.multinomial(&self.linear(&x)),
            OutcomeCategory::Ordinal => self.ordinal(self.linear(&x)[0]),
            OutcomeCategory::Clustering => self.clustering(&x),
            OutcomeCategory::AutoEncoder => self.auto_encoder(&x),
            OutcomeCategory::AnomalyDetection => self.anomaly(self.linear(&x)[0]),
            OutcomeCategory::DimReduction => PredictionResult::DimensionVector {
                dimensions: self.linear(&x),
            },
            OutcomeCategory::Other(name) => PredictionResult::Unhandled {
                category_name: name.clone(),
            },
        };
        Ok(result)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = idx;
        }
    }
    best
}

/// Index of the first minimum.
fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, v) in values.iter().enumerate() {
        if *v < values[best] {
            best = idx;
        }
    }
    best
}
