//! Dispatches a run on the `type` and `load` configuration keys.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{ModelKind, RunConfig};
use crate::data::{load_dataset, train_test_split, Split};
use crate::error::{Error, KnnError};
use crate::eval::accuracy::accuracy;
use crate::knn::classifier::KnnClassifier;
use crate::train::trainer::{evaluate_saved, Trainer};

/// What a run did and how well it scored.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// A perceptron was trained and saved.
    Trained { accuracy: f64, artifact: PathBuf },
    /// A saved perceptron was evaluated.
    Evaluated { accuracy: f64 },
    /// A nearest-neighbour classifier was fitted and evaluated.
    Knn { accuracy: f64 },
    /// `type` named no known model; nothing ran.
    Skipped { model_type: String },
}

impl RunOutcome {
    pub fn accuracy(&self) -> Option<f64> {
        match self {
            RunOutcome::Trained { accuracy, .. }
            | RunOutcome::Evaluated { accuracy }
            | RunOutcome::Knn { accuracy } => Some(*accuracy),
            RunOutcome::Skipped { .. } => None,
        }
    }
}

/// Runs the model selected by `config`.
///
/// An unrecognized `type` does nothing and is not an error; it only logs a
/// warning.
pub fn run(config: &RunConfig) -> Result<RunOutcome, Error> {
    match config.kind() {
        ModelKind::Mlp if config.load => load_mlp(config),
        ModelKind::Mlp => train_mlp(config),
        ModelKind::Knn => knn(config),
        ModelKind::Unrecognized(model_type) => {
            warn!(%model_type, "unrecognized model type, nothing to do");
            Ok(RunOutcome::Skipped { model_type })
        }
    }
}

fn load_split(config: &RunConfig) -> Result<Split, Error> {
    config.validate_data()?;
    let dataset = load_dataset(&config.data, config.input_size)?;
    Ok(train_test_split(&dataset, config.test_size, config.split_seed)?)
}

fn train_mlp(config: &RunConfig) -> Result<RunOutcome, Error> {
    let spec = config.mlp_spec()?;
    let train_config = config.train_config()?;
    let split = load_split(config)?;

    let run = Trainer::new(spec, train_config, &split).run();
    info!(accuracy = run.test_accuracy, "MLP evaluated");

    let artifact = run.persist(&config.save_dir)?;
    Ok(RunOutcome::Trained {
        accuracy: run.test_accuracy,
        artifact,
    })
}

fn load_mlp(config: &RunConfig) -> Result<RunOutcome, Error> {
    let path = config.model_path()?;
    let split = load_split(config)?;

    let accuracy = evaluate_saved(path, &split.test, config.input_size, config.num_labels)?;
    info!(accuracy, "saved MLP evaluated");
    Ok(RunOutcome::Evaluated { accuracy })
}

fn knn(config: &RunConfig) -> Result<RunOutcome, Error> {
    let options = config.knn_options()?;
    let split = load_split(config)?;

    let train_x = split.train.feature_array().map_err(KnnError::from)?;
    let test_x = split.test.feature_array().map_err(KnnError::from)?;

    let classifier = KnnClassifier::fit(train_x, split.train.classes(), options.k, options.metric)?;
    let predictions = classifier.predict(&test_x)?;
    let accuracy = accuracy(&predictions, &split.test.classes());

    info!(k = options.k, metric = ?options.metric, accuracy, "KNN evaluated");
    Ok(RunOutcome::Knn { accuracy })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_type_is_a_no_op() {
        let config = RunConfig::from_json(
            r#"{ "type": "svm", "data": "/nonexistent/never-read.csv" }"#,
        )
        .unwrap();
        assert_eq!(
            run(&config).unwrap(),
            RunOutcome::Skipped {
                model_type: "svm".into()
            }
        );
    }

    #[test]
    fn missing_data_file_aborts() {
        let config = RunConfig::from_json(
            r#"{ "type": "knn", "knn": { "k": 1 }, "data": "/nonexistent/rescaling.csv" }"#,
        )
        .unwrap();
        assert!(matches!(run(&config), Err(Error::Data(_))));
    }
}
