//! Form values to diagnosis: parse, scale, classify.

use std::collections::HashSet;
use std::path::Path;

use ndarray::ArrayView1;
use tracing::debug;

use crate::artifacts::{load_classifier, Classifier, Scaler};
use crate::error::{ArtifactError, PredictError, PredictResult};
use crate::models::{Diagnosis, FeatureVector};

/// Converts submitted `(field, value)` pairs, in order, into a feature vector.
///
/// A repeated field contributes only its first value.
pub fn parse_features<K, V>(pairs: &[(K, V)]) -> PredictResult<FeatureVector>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut values = Vec::with_capacity(pairs.len());
    for (field, value) in pairs {
        let field = field.as_ref();
        if !seen.insert(field) {
            continue;
        }
        let value = value.as_ref();
        let parsed = value
            .trim()
            .parse::<f64>()
            .map_err(|_| PredictError::InvalidFeature {
                field: field.to_string(),
                value: value.to_string(),
            })?;
        values.push(parsed);
    }

    if values.is_empty() {
        return Err(PredictError::NoFeatures);
    }
    Ok(FeatureVector::new(values))
}

/// Scaler and classifier loaded together; read-only once built.
pub struct Predictor {
    scaler: Scaler,
    classifier: Box<dyn Classifier>,
}

impl Predictor {
    pub fn new(scaler: Scaler, classifier: Box<dyn Classifier>) -> Result<Self, ArtifactError> {
        if let Some(expected) = classifier.n_features() {
            if expected != scaler.n_features() {
                return Err(ArtifactError::FeatureCountMismatch {
                    scaler: scaler.n_features(),
                    classifier: expected,
                });
            }
        }
        Ok(Self { scaler, classifier })
    }

    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactError> {
        let classifier = load_classifier(model_path)?;
        let scaler = Scaler::load(scaler_path)?;
        Self::new(scaler, classifier)
    }

    pub fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    pub fn predict(&self, features: &FeatureVector) -> PredictResult<Diagnosis> {
        let scaled = self
            .scaler
            .transform(ArrayView1::from(features.as_slice()))?;
        let class = self.classifier.predict(scaled.view())?;
        debug!(class, "classifier output");
        Ok(Diagnosis::from_class(class))
    }
}
