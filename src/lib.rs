pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod knn;
pub mod eval;
pub mod config;
pub mod driver;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Mlp, MlpSpec, ModelMetadata};
pub use loss::CrossEntropyLoss;
pub use optim::adam::Adam;
pub use train::{train_loop, EpochStats, TrainConfig, Trainer};
pub use data::{load_dataset, train_test_split, DefectClass, Dataset, Split};
pub use knn::{DistanceMetric, KnnClassifier};
pub use config::{load_config, ModelKind, RunConfig};
pub use driver::{run, RunOutcome};
pub use error::{ConfigError, DataError, Error, KnnError, ModelLoadError};
