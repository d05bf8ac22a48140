//! Binary classifiers applied to an already-scaled row.

use std::fs;
use std::path::Path;

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;
use tract_onnx::prelude::*;

use crate::error::{ArtifactError, PredictError, PredictResult};

pub trait Classifier: Send + Sync {
    /// Input width the classifier was trained on, when the artifact records it.
    fn n_features(&self) -> Option<usize>;

    /// Predicted class for a single scaled sample.
    fn predict(&self, row: ArrayView1<f64>) -> PredictResult<i64>;
}

/// Picks the classifier implementation from the artifact's extension.
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("onnx") => Ok(Box::new(OnnxClassifier::load(path)?)),
        Some("json") => Ok(Box::new(LinearClassifier::load(path)?)),
        _ => Err(ArtifactError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// An exported graph (e.g. skl2onnx with `zipmap=False`) executed by tract.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    n_features: Option<usize>,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let onnx_err = |e: TractError| ArtifactError::Onnx {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let raw = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = tract_onnx::onnx()
            .model_for_read(&mut raw.as_slice())
            .map_err(onnx_err)?
            .into_optimized()
            .map_err(onnx_err)?;
        Self::from_typed(model).map_err(onnx_err)
    }

    /// Wraps an already typed graph whose first input is `[batch, features]`.
    pub fn from_typed(model: TypedModel) -> TractResult<Self> {
        // the batch axis is usually symbolic, the feature axis concrete
        let n_features = model
            .input_fact(0)
            .ok()
            .and_then(|fact| fact.shape.get(1).and_then(|dim| dim.to_i64().ok()))
            .and_then(|n| usize::try_from(n).ok());
        let plan = model.into_runnable()?;
        Ok(Self { plan, n_features })
    }
}

impl Classifier for OnnxClassifier {
    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict(&self, row: ArrayView1<f64>) -> PredictResult<i64> {
        let input: Vec<f32> = row.iter().map(|&v| v as f32).collect();
        let tensor = tract_ndarray::Array::from_shape_vec((1, input.len()), input)
            .map_err(|e| PredictError::Inference(e.to_string()))?
            .into_tensor();

        let result = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let output = result
            .first()
            .ok_or_else(|| PredictError::Inference("model produced no outputs".to_string()))?;

        // Label tensor from a classifier export, or raw class scores from anything else.
        if let Ok(labels) = output.to_array_view::<i64>() {
            return labels
                .iter()
                .next()
                .copied()
                .ok_or_else(|| PredictError::Inference("empty label output".to_string()));
        }
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        scores
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index as i64)
            .ok_or_else(|| PredictError::Inference("empty score output".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct LinearFile {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Linear decision function `w·x + b`, positive class when the score is above zero.
///
/// Covers logistic regression and linear SVMs exported as plain coefficients.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients: Array1::from(coefficients),
            intercept,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LinearFile =
            serde_json::from_slice(&raw).map_err(|source| ArtifactError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        if file.coefficients.is_empty() {
            return Err(ArtifactError::Invalid {
                path: path.to_path_buf(),
                reason: "no coefficients".to_string(),
            });
        }
        Ok(Self::new(file.coefficients, file.intercept))
    }

    pub fn decision_function(&self, row: ArrayView1<f64>) -> PredictResult<f64> {
        if row.len() != self.coefficients.len() {
            return Err(PredictError::ShapeMismatch {
                estimator: "LinearClassifier",
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        Ok(self.coefficients.dot(&row) + self.intercept)
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict(&self, row: ArrayView1<f64>) -> PredictResult<i64> {
        let score = self.decision_function(row)?;
        Ok(if score > 0.0 { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tract_core::ops::cast::cast;

    #[test]
    fn linear_sign_decides_class() {
        let clf = LinearClassifier::new(vec![1.0, -1.0], 0.5);
        assert_eq!(clf.predict(array![2.0, 1.0].view()), Ok(1));
        assert_eq!(clf.predict(array![0.0, 1.0].view()), Ok(0));
        // score exactly zero falls on the negative side
        assert_eq!(clf.predict(array![0.0, 0.5].view()), Ok(0));
    }

    #[test]
    fn linear_rejects_wrong_width() {
        let clf = LinearClassifier::new(vec![1.0; 4], 0.0);
        let err = clf.predict(array![1.0].view()).unwrap_err();
        assert!(matches!(
            err,
            PredictError::ShapeMismatch { expected: 4, got: 1, .. }
        ));
    }

    #[test]
    fn format_is_chosen_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("model.json");
        let mut f = std::fs::File::create(&json).unwrap();
        f.write_all(br#"{"coefficients":[0.5,0.5],"intercept":-1.0}"#)
            .unwrap();
        let clf = load_classifier(&json).unwrap();
        assert_eq!(clf.n_features(), Some(2));

        let pkl = dir.path().join("model.pkl");
        std::fs::write(&pkl, b"\x80\x04").unwrap();
        assert!(matches!(
            load_classifier(&pkl),
            Err(ArtifactError::UnsupportedFormat(_))
        ));
    }

    fn passthrough_graph(width: usize, label_output: bool) -> OnnxClassifier {
        let mut model = TypedModel::default();
        let input = model
            .add_source("input", f32::fact([1, width]))
            .unwrap();
        let dt = if label_output {
            i64::datum_type()
        } else {
            f32::datum_type()
        };
        let output = model.wire_node("output", cast(dt), &[input]).unwrap()[0];
        model.set_output_outlets(&[output]).unwrap();
        OnnxClassifier::from_typed(model).unwrap()
    }

    #[test]
    fn onnx_label_output_is_read_as_class() {
        let clf = passthrough_graph(3, true);
        assert_eq!(clf.n_features(), Some(3));
        assert_eq!(clf.predict(array![1.0, 0.0, 0.0].view()), Ok(1));
        assert_eq!(clf.predict(array![0.0, 5.0, 7.0].view()), Ok(0));
    }

    #[test]
    fn onnx_score_output_uses_argmax() {
        let clf = passthrough_graph(2, false);
        assert_eq!(clf.n_features(), Some(2));
        assert_eq!(clf.predict(array![0.2, 0.8].view()), Ok(1));
        assert_eq!(clf.predict(array![0.9, 0.1].view()), Ok(0));
    }

    #[test]
    fn corrupt_onnx_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"not a protobuf graph").unwrap();
        assert!(matches!(
            OnnxClassifier::load(&path),
            Err(ArtifactError::Onnx { .. })
        ));
    }
}
