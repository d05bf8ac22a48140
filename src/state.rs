use tracing::{error, info};

use crate::config::Config;
use crate::inference::Predictor;

/// Outcome of the one-time artifact load. The cause of a failure is logged, not kept.
enum Artifacts {
    Ready(Predictor),
    Unavailable,
}

/// Shared, read-only application context handed to every request.
pub struct AppState {
    artifacts: Artifacts,
}

impl AppState {
    /// Never fails: a load error leaves the server running without a predictor.
    pub fn load(cfg: &Config) -> Self {
        match Predictor::load(&cfg.model_path, &cfg.scaler_path) {
            Ok(predictor) => {
                info!(
                    model = %cfg.model_path.display(),
                    scaler = %cfg.scaler_path.display(),
                    n_features = predictor.n_features(),
                    "model and scaler loaded"
                );
                Self::ready(predictor)
            }
            Err(e) => {
                error!(error = %e, "failed to load model or scaler");
                Self::unavailable()
            }
        }
    }

    fn ready(predictor: Predictor) -> Self {
        Self {
            artifacts: Artifacts::Ready(predictor),
        }
    }

    fn unavailable() -> Self {
        Self {
            artifacts: Artifacts::Unavailable,
        }
    }

    pub fn predictor(&self) -> Option<&Predictor> {
        match &self.artifacts {
            Artifacts::Ready(p) => Some(p),
            Artifacts::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArtifactError;
    use std::path::Path;

    #[test]
    fn missing_files_leave_state_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::load(&Config::with_artifact_dir(dir.path()));
        assert!(state.predictor().is_none());
        assert!(matches!(state.artifacts, Artifacts::Unavailable));

        let cfg = Config::with_artifact_dir(dir.path());
        assert!(matches!(
            Predictor::load(&cfg.model_path, &cfg.scaler_path),
            Err(ArtifactError::Io { .. })
        ));
    }

    #[test]
    fn linear_artifacts_load() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        let scaler = dir.path().join("scaler.json");
        std::fs::write(&model, r#"{"coefficients":[1.0,2.0],"intercept":0.0}"#).unwrap();
        std::fs::write(&scaler, r#"{"kind":"standard","mean":[0,0],"scale":[1,1]}"#).unwrap();

        let cfg = Config {
            model_path: model,
            scaler_path: scaler,
            ..Config::with_artifact_dir(Path::new("."))
        };
        let state = AppState::load(&cfg);
        assert_eq!(state.predictor().map(Predictor::n_features), Some(2));
    }
}
