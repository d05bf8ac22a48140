mod classifier;
mod scaler;

pub use classifier::{load_classifier, Classifier, LinearClassifier, OnnxClassifier};
pub use scaler::Scaler;
