//! Runtime configuration: fixed defaults with optional environment overrides.

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const MODEL_FILE: &str = "BreastCancerPredictionModel.onnx";
pub const SCALER_FILE: &str = "scaler.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: String,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Config {
    /// Artifacts live next to the executable unless overridden.
    pub fn load() -> Self {
        let mut cfg = Self::with_artifact_dir(&program_dir());
        cfg.apply_env_overrides();
        cfg
    }

    pub fn with_artifact_dir(dir: &Path) -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            model_path: dir.join(MODEL_FILE),
            scaler_path: dir.join(SCALER_FILE),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    /// Applies `BCP_*` overrides from `lookup`; blank values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("BCP_BIND") {
            self.bind_addr = v;
        }
        if let Some(dir) = get("BCP_ARTIFACT_DIR") {
            let dir = PathBuf::from(dir);
            self.model_path = dir.join(MODEL_FILE);
            self.scaler_path = dir.join(SCALER_FILE);
        }
        if let Some(v) = get("BCP_MODEL_PATH") {
            self.model_path = PathBuf::from(v);
        }
        if let Some(v) = get("BCP_SCALER_PATH") {
            self.scaler_path = PathBuf::from(v);
        }
    }
}

fn program_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn artifact_dir_sets_both_default_file_names() {
        let cfg = Config::with_artifact_dir(Path::new("/srv/model"));
        assert_eq!(cfg.bind_addr, "127.0.0.1:5000");
        assert_eq!(
            cfg.model_path,
            PathBuf::from("/srv/model/BreastCancerPredictionModel.onnx")
        );
        assert_eq!(cfg.scaler_path, PathBuf::from("/srv/model/scaler.json"));
    }

    #[test]
    fn explicit_paths_override_artifact_dir() {
        let vars = HashMap::from([
            ("BCP_ARTIFACT_DIR", "/opt/a"),
            ("BCP_MODEL_PATH", "/opt/b/linear.json"),
            ("BCP_BIND", "   "),
        ]);
        let mut cfg = Config::with_artifact_dir(Path::new("/srv/model"));
        cfg.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(cfg.model_path, PathBuf::from("/opt/b/linear.json"));
        assert_eq!(cfg.scaler_path, PathBuf::from("/opt/a/scaler.json"));
        assert_eq!(cfg.bind_addr, DEFAULT_BIND);
    }
}
