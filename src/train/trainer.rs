use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::{
    data::{label::DefectClass, split::Partition, split::Split},
    error::{Error, ModelLoadError},
    eval::accuracy::accuracy,
    network::{checkpoint, metadata::ModelMetadata, mlp::Mlp, spec::MlpSpec},
    optim::adam::Adam,
    train::{epoch_stats::EpochStats, loop_fn::train_loop, train_config::TrainConfig},
};

/// A run that has its model and optimizer built but has not trained yet.
pub struct Trainer<'a> {
    network: Mlp,
    optimizer: Adam,
    config: TrainConfig,
    split: &'a Split,
}

/// A finished run: the trained network and its final test evaluation.
#[derive(Debug, Clone)]
pub struct Evaluated {
    pub network: Mlp,
    pub config: TrainConfig,
    pub history: Vec<EpochStats>,
    pub predictions: Vec<usize>,
    pub test_accuracy: f64,
}

impl<'a> Trainer<'a> {
    /// Seeds the run's RNG and builds the network and optimizer from it.
    pub fn new(spec: MlpSpec, config: TrainConfig, split: &'a Split) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = Mlp::new(spec, &mut rng);
        let optimizer = Adam::new(config.learning_rate, &network.layers);

        Trainer {
            network,
            optimizer,
            config,
            split,
        }
    }

    /// Runs every epoch, then evaluates the final network on the test partition.
    pub fn run(mut self) -> Evaluated {
        info!(
            epochs = self.config.epochs,
            lr = self.config.learning_rate,
            hidden_size = self.network.spec().hidden_size,
            "start training"
        );

        let history = train_loop(
            &mut self.network,
            &mut self.optimizer,
            &self.split.train,
            &self.split.test,
            &self.config,
        );

        info!("training end");

        let (test_accuracy, predictions) = evaluate(&self.network, &self.split.test);
        Evaluated {
            network: self.network,
            config: self.config,
            history,
            predictions,
            test_accuracy,
        }
    }
}

impl Evaluated {
    pub fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            test_accuracy: self.test_accuracy,
            learning_rate: self.config.learning_rate,
            num_epochs: self.config.epochs,
            seed: self.config.seed,
            output_labels: DefectClass::names(),
        }
    }

    /// Writes the model into `dir` (created if missing) and returns the file path.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf, Error> {
        let path = checkpoint::artifact_path(
            dir,
            self.test_accuracy,
            self.network.spec().hidden_size,
            self.config.learning_rate,
        );
        let persist_err = |source| Error::Persist {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(persist_err)?;
        self.network
            .save_json(&path, &self.metadata())
            .map_err(persist_err)?;

        info!(path = %path.display(), "model saved");
        Ok(path)
    }
}

/// Test accuracy and predicted classes for `network` on `test`.
pub fn evaluate(network: &Mlp, test: &Partition) -> (f64, Vec<usize>) {
    let predictions = network.predict(&test.feature_matrix());
    (accuracy(&predictions, &test.classes()), predictions)
}

/// Loads a saved model, checks it fits the data, and scores it on `test`.
pub fn evaluate_saved(
    path: &Path,
    test: &Partition,
    input_size: usize,
    num_labels: usize,
) -> Result<f64, ModelLoadError> {
    let (network, metadata) = Mlp::load_json(path)?;
    let spec = network.spec();

    if spec.input_size != input_size || spec.num_labels != num_labels {
        return Err(ModelLoadError::Incompatible {
            message: format!(
                "model expects {} inputs and {} labels, data has {} and {}",
                spec.input_size, spec.num_labels, input_size, num_labels
            ),
        });
    }

    info!(
        path = %path.display(),
        saved_accuracy = metadata.test_accuracy,
        "model loaded"
    );

    let (test_accuracy, _) = evaluate(&network, test);
    Ok(test_accuracy)
}
