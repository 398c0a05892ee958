//! Encoding of input records into numeric feature rows.
//!
//! Numeric columns parse their text as `f64`; categorical columns are
//! one-hot encoded over their declared levels. Missing values (absent
//! fields, and out-of-domain values when the options allow it) are
//! imputed: the column default for numerics, all zeros for categoricals.
//! Fields the model does not know are ignored.

use crate::scoring::{FeatureSpec, InputRecord, ScoringError, ScoringOptions};

/// Maps an [`InputRecord`] onto the expanded feature row of a model.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    features: Vec<FeatureSpec>,
    options: ScoringOptions,
    width: usize,
}

impl FeatureEncoder {
    pub fn new(features: Vec<FeatureSpec>, options: ScoringOptions) -> Self {
        let width = features.iter().map(FeatureSpec::width).sum();
        Self {
            features,
            options,
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn encode(&self, record: &InputRecord) -> Result<Vec<f64>, ScoringError> {
        let mut row = Vec::with_capacity(self.width);
        for feature in &self.features {
            let raw = record.get(&feature.name);
            match &feature.levels {
                Some(levels) => self.encode_categorical(feature, levels, raw, &mut row)?,
                None => row.push(self.encode_numeric(feature, raw)?),
            }
        }
        Ok(row)
    }

    fn encode_numeric(&self, feature: &FeatureSpec, raw: Option<&str>) -> Result<f64, ScoringError> {
        let na = feature.default.unwrap_or(0.0);
        let Some(text) = raw else {
            return Ok(na);
        };
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ if self.options.convert_invalid_numbers_to_na => Ok(na),
            _ => Err(ScoringError::InvalidNumber {
                column: feature.name.clone(),
                value: text.to_string(),
            }),
        }
    }

    fn encode_categorical(
        &self,
        feature: &FeatureSpec,
        levels: &[String],
        raw: Option<&str>,
        row: &mut Vec<f64>,
    ) -> Result<(), ScoringError> {
        let start = row.len();
        row.resize(start + levels.len(), 0.0);

        let Some(level) = raw else {
            return Ok(());
        };
        match levels.iter().position(|l| l == level) {
            Some(idx) => row[start + idx] = 1.0,
            None if self.options.convert_unknown_levels_to_na => {}
            None => {
                return Err(ScoringError::UnknownLevel {
                    column: feature.name.clone(),
                    level: level.to_string(),
                })
            }
        }
        Ok(())
    }
}
