use crate::error::PredictError;

/// One sample, in the order the form fields were submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Malignant,
    Benign,
}

impl Diagnosis {
    /// Maps the classifier's output class. Only class 1 is malignant.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::Malignant => "Malignant (Cancer Detected)",
            Diagnosis::Benign => "Benign (No Cancer Detected)",
        }
    }
}

/// Text rendered into the page after a `POST /predict`.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionText {
    Diagnosis(Diagnosis),
    Failed(PredictError),
    ArtifactsUnavailable,
}

impl PredictionText {
    pub fn render(&self) -> String {
        match self {
            PredictionText::Diagnosis(d) => format!("🩺 Cancer Prediction: {}", d.label()),
            PredictionText::Failed(e) => format!("⚠️ Error: {}", e),
            PredictionText::ArtifactsUnavailable => "Error: Model or Scaler not loaded.".to_string(),
        }
    }
}

impl From<Result<Diagnosis, PredictError>> for PredictionText {
    fn from(outcome: Result<Diagnosis, PredictError>) -> Self {
        match outcome {
            Ok(d) => PredictionText::Diagnosis(d),
            Err(e) => PredictionText::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_class_one_is_malignant() {
        assert_eq!(Diagnosis::from_class(1), Diagnosis::Malignant);
        assert_eq!(Diagnosis::from_class(0), Diagnosis::Benign);
        assert_eq!(Diagnosis::from_class(2), Diagnosis::Benign);
    }

    #[test]
    fn renders_user_messages() {
        let ok = PredictionText::Diagnosis(Diagnosis::Benign).render();
        assert_eq!(ok, "🩺 Cancer Prediction: Benign (No Cancer Detected)");

        let failed = PredictionText::Failed(PredictError::InvalidFeature {
            field: "radius_mean".into(),
            value: "abc".into(),
        })
        .render();
        assert_eq!(failed, "⚠️ Error: could not convert string to float: 'abc'");

        assert_eq!(
            PredictionText::ArtifactsUnavailable.render(),
            "Error: Model or Scaler not loaded."
        );
    }
}
