//! Shaping of prediction results into the response document.
//!
//! Every document starts with `model_category` and the echoed `input`,
//! followed by the fields of the result variant:
//!
//! | Result              | Fields                                   |
//! |---------------------|------------------------------------------|
//! | Binomial/Multinomial| `predicted_label`, `class_probabilities` |
//! | Regression          | `predicted_value`                        |
//! | Ordinal             | `predicted_label`, `label_index`         |
//! | Clustering          | `cluster`                                |
//! | AutoEncoder         | `reconstructed`                          |
//! | AnomalyDetection    | `normalized_score`, `score`, `is_anomaly`|
//! | SurvivalValue       | `value`                                  |
//! | DimensionVector     | `dimensions`                             |
//! | Unhandled           | `warning`                                |

use crate::json::{Object, Value};
use crate::scoring::{OutcomeCategory, PredictionResult};

/// Warning attached to documents for categories without a shape.
pub const UNHANDLED_WARNING: &str = "Model category not explicitly handled.";

/// Build the response document for one prediction.
///
/// `response_names` are the engine's declared class names; class
/// probabilities are paired with them by index. A length mismatch is
/// logged and the extra entries on either side are left out.
pub fn normalize(
    category: &OutcomeCategory,
    response_names: Option<&[String]>,
    result: PredictionResult,
    input: Object,
) -> Object {
    let mut doc = Object::new();
    doc.insert("model_category", category.name());
    doc.insert("input", input);

    match result {
        PredictionResult::Binomial {
            label,
            class_probabilities,
        }
        | PredictionResult::Multinomial {
            label,
            class_probabilities,
        } => {
            doc.insert("predicted_label", label);
            doc.insert(
                "class_probabilities",
                class_probability_map(response_names.unwrap_or(&[]), &class_probabilities),
            );
        }
        PredictionResult::Regression { value } => {
            doc.insert("predicted_value", value);
        }
        PredictionResult::Ordinal { label, label_index } => {
            doc.insert("predicted_label", label);
            doc.insert("label_index", label_index);
        }
        PredictionResult::Clustering { cluster } => {
            doc.insert("cluster", cluster);
        }
        PredictionResult::AutoEncoder { reconstructed } => {
            doc.insert("reconstructed", reconstructed);
        }
        PredictionResult::AnomalyDetection {
            normalized_score,
            score,
            is_anomaly,
        } => {
            doc.insert("normalized_score", normalized_score);
            doc.insert("score", score);
            doc.insert("is_anomaly", is_anomaly);
        }
        PredictionResult::SurvivalValue { value } => {
            doc.insert("value", value);
        }
        PredictionResult::DimensionVector { dimensions } => {
            doc.insert("dimensions", dimensions);
        }
        PredictionResult::Unhandled { .. } => {
            doc.insert("warning", UNHANDLED_WARNING);
        }
    }

    doc
}

fn class_probability_map(names: &[String], probabilities: &[f64]) -> Value {
    // Pairs stop at the shorter list; unpaired entries are dropped.
    if names.len() != probabilities.len() {
        tracing::warn!(
            response_names = names.len(),
            class_probabilities = probabilities.len(),
            "Class probability count does not match response names"
        );
    }
    names
        .iter()
        .zip(probabilities)
        .map(|(name, p)| (name.clone(), *p))
        .collect::<Object>()
        .into()
}
