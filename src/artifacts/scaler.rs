//! Feature scaling fitted at training time.
//!
//! The JSON file carries the fitted attributes of the scikit-learn scaler:
//! `mean`/`scale` for `StandardScaler`, `min`/`scale` for `MinMaxScaler`.

use std::fs;
use std::path::Path;

use ndarray::{Array1, ArrayView1, Zip};
use serde::Deserialize;

use crate::error::{ArtifactError, PredictError, PredictResult};

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerFile {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalerKind {
    Standard,
    MinMax,
}

impl ScalerKind {
    fn estimator_name(self) -> &'static str {
        match self {
            ScalerKind::Standard => "StandardScaler",
            ScalerKind::MinMax => "MinMaxScaler",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scaler {
    kind: ScalerKind,
    offset: Array1<f64>,
    scale: Array1<f64>,
}

impl Scaler {
    pub fn standard(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        // sklearn replaces zero variance with 1 so constant columns pass through centered
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Self {
            kind: ScalerKind::Standard,
            offset: Array1::from(mean),
            scale,
        }
    }

    pub fn min_max(min: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            kind: ScalerKind::MinMax,
            offset: Array1::from(min),
            scale: Array1::from(scale),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ScalerFile =
            serde_json::from_slice(&raw).map_err(|source| ArtifactError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let scaler = match file {
            ScalerFile::Standard { mean, scale } => {
                check_widths(path, mean.len(), scale.len())?;
                Scaler::standard(mean, scale)
            }
            ScalerFile::MinMax { min, scale } => {
                check_widths(path, min.len(), scale.len())?;
                Scaler::min_max(min, scale)
            }
        };
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        self.scale.len()
    }

    pub fn transform(&self, row: ArrayView1<f64>) -> PredictResult<Array1<f64>> {
        if row.len() != self.n_features() {
            return Err(PredictError::ShapeMismatch {
                estimator: self.kind.estimator_name(),
                expected: self.n_features(),
                got: row.len(),
            });
        }
        if row.iter().any(|v| v.is_nan()) {
            return Err(PredictError::NotANumber);
        }
        if row.iter().any(|v| v.is_infinite()) {
            return Err(PredictError::Infinite);
        }

        let out = match self.kind {
            ScalerKind::Standard => Zip::from(&row)
                .and(&self.offset)
                .and(&self.scale)
                .map_collect(|&x, &mean, &scale| (x - mean) / scale),
            ScalerKind::MinMax => Zip::from(&row)
                .and(&self.offset)
                .and(&self.scale)
                .map_collect(|&x, &min, &scale| x * scale + min),
        };
        Ok(out)
    }
}

fn check_widths(path: &Path, offset: usize, scale: usize) -> Result<(), ArtifactError> {
    if offset == 0 || offset != scale {
        return Err(ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason: format!("scaler parameter lengths {} and {} do not match", offset, scale),
        });
    }
    Ok(())
}
