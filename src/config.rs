//! Run configuration: a JSON file, optionally overridden from the environment.
//!
//! Keys are read once into [`RunConfig`], which is then passed by reference
//! to every stage. Stage-specific keys are validated by the accessor that
//! needs them, so a KNN run does not require the perceptron keys and vice
//! versa.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json};
use figment::Figment;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::knn::classifier::DistanceMetric;
use crate::network::spec::MlpSpec;
use crate::train::train_config::TrainConfig;

/// Environment variables with this prefix override file values; nested keys
/// use `__`, e.g. `DEFECT_MLP__HIDDEN_SIZE=64`.
pub const ENV_PREFIX: &str = "DEFECT_";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MlpOptions {
    pub hidden_size: usize,
    #[serde(default)]
    pub dropout: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct KnnOptions {
    pub k: usize,
    #[serde(default)]
    pub metric: DistanceMetric,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    #[serde(rename = "type")]
    pub model_type: String,
    #[serde(default)]
    pub load: bool,
    pub seed: Option<u64>,
    pub lr: Option<f64>,
    pub num_epochs: Option<usize>,
    #[serde(default = "default_input_size")]
    pub input_size: usize,
    #[serde(default = "default_num_labels")]
    pub num_labels: usize,
    pub mlp: Option<MlpOptions>,
    pub knn: Option<KnnOptions>,
    /// Saved model to evaluate when `load` is set.
    pub model: Option<PathBuf>,
    #[serde(default = "default_data")]
    pub data: PathBuf,
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_split_seed")]
    pub split_seed: u64,
    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

fn default_input_size() -> usize {
    6
}

fn default_num_labels() -> usize {
    2
}

fn default_data() -> PathBuf {
    PathBuf::from("features/rescaling.csv")
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("save_model")
}

fn default_test_size() -> f64 {
    0.2
}

fn default_split_seed() -> u64 {
    1
}

fn default_log_every() -> usize {
    50
}

/// Which model a run uses, from the `type` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    Mlp,
    Knn,
    Unrecognized(String),
}

/// Reads `path` and applies `DEFECT_*` environment overrides.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    Figment::new()
        .merge(Json::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::Invalid(Box::new(e)))
}

impl RunConfig {
    /// Parses a JSON document without environment overrides.
    pub fn from_json(json: &str) -> Result<RunConfig, ConfigError> {
        Figment::from(Json::string(json))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    pub fn kind(&self) -> ModelKind {
        match self.model_type.as_str() {
            "mlp" => ModelKind::Mlp,
            "knn" => ModelKind::Knn,
            other => ModelKind::Unrecognized(other.to_string()),
        }
    }

    /// Checks the keys every model path depends on.
    pub fn validate_data(&self) -> Result<(), ConfigError> {
        if self.input_size == 0 {
            return Err(invalid("input_size", "must be at least 1"));
        }
        if self.num_labels != 2 {
            return Err(invalid(
                "num_labels",
                format!("the data has 2 classes, got {}", self.num_labels),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(invalid("test_size", "must lie strictly between 0 and 1"));
        }
        Ok(())
    }

    pub fn mlp_spec(&self) -> Result<MlpSpec, ConfigError> {
        let mlp = self
            .mlp
            .as_ref()
            .ok_or(ConfigError::MissingKey { key: "mlp" })?;
        if mlp.hidden_size == 0 {
            return Err(invalid("mlp.hidden_size", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&mlp.dropout) {
            return Err(invalid("mlp.dropout", "must lie in [0, 1)"));
        }

        Ok(MlpSpec {
            input_size: self.input_size,
            hidden_size: mlp.hidden_size,
            num_labels: self.num_labels,
            dropout: mlp.dropout,
        })
    }

    pub fn train_config(&self) -> Result<TrainConfig, ConfigError> {
        let seed = self.seed.ok_or(ConfigError::MissingKey { key: "seed" })?;
        let lr = self.lr.ok_or(ConfigError::MissingKey { key: "lr" })?;
        let epochs = self
            .num_epochs
            .ok_or(ConfigError::MissingKey { key: "num_epochs" })?;

        if !(lr.is_finite() && lr > 0.0) {
            return Err(invalid("lr", "must be a positive number"));
        }
        if epochs == 0 {
            return Err(invalid("num_epochs", "must be at least 1"));
        }

        Ok(TrainConfig {
            epochs,
            learning_rate: lr,
            seed,
            log_every: self.log_every,
        })
    }

    pub fn model_path(&self) -> Result<&Path, ConfigError> {
        self.model
            .as_deref()
            .ok_or(ConfigError::MissingKey { key: "model" })
    }

    pub fn knn_options(&self) -> Result<KnnOptions, ConfigError> {
        let knn = self.knn.ok_or(ConfigError::MissingKey { key: "knn" })?;
        if knn.k == 0 {
            return Err(invalid("knn.k", "must be at least 1"));
        }
        Ok(knn)
    }
}

fn invalid(key: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        message: message.into(),
    }
}
