use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading the scaler or classifier at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load ONNX model {path}: {message}")]
    Onnx { path: PathBuf, message: String },

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("scaler expects {scaler} features but classifier expects {classifier}")]
    FeatureCountMismatch { scaler: usize, classifier: usize },
}

/// Failure while turning one form submission into a diagnosis.
///
/// The `Display` text is shown to the user after the error prefix.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("could not convert string to float: '{value}'")]
    InvalidFeature { field: String, value: String },

    #[error("malformed form data: {0}")]
    MalformedForm(String),

    #[error("Found array with 0 feature(s) (shape=(1, 0)) while a minimum of 1 is required.")]
    NoFeatures,

    #[error("X has {got} features, but {estimator} is expecting {expected} features as input.")]
    ShapeMismatch {
        estimator: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Input X contains NaN.")]
    NotANumber,

    #[error("Input X contains infinity or a value too large for dtype('float64').")]
    Infinite,

    #[error("inference failed: {0}")]
    Inference(String),
}

pub type PredictResult<T> = Result<T, PredictError>;
