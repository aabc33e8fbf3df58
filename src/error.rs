//! Error types for every stage of a run.

use std::path::PathBuf;

/// Crate-level error; each stage contributes its own variant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Knn(#[from] KnnError),

    #[error("failed to write model to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Missing or malformed configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("missing configuration key `{key}`")]
    MissingKey { key: &'static str },

    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Problems reading or splitting the feature file.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("data file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data file has no `label` column")]
    MissingLabelColumn,

    #[error("expected at least {expected} feature columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("row {row}: unknown label `{label}` (expected `patches` or `scratches`)")]
    UnknownLabel { row: usize, label: String },

    #[error("row {row}, column `{column}`: `{value}` is not a finite number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("data file contains no rows")]
    Empty,

    #[error("cannot split {rows} rows with test size {test_size}")]
    InvalidSplit { rows: usize, test_size: f64 },
}

/// A persisted model that is missing or cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("incompatible model: {message}")]
    Incompatible { message: String },
}

/// Nearest-neighbour fitting and querying failures.
#[derive(Debug, thiserror::Error)]
pub enum KnnError {
    #[error("k = {k} is invalid for {samples} training samples")]
    InvalidK { k: usize, samples: usize },

    #[error("failed to build neighbour index: {0}")]
    Build(#[from] linfa_nn::BuildError),

    #[error("neighbour query failed: {0}")]
    Query(#[from] linfa_nn::NnError),

    #[error("feature rows have inconsistent widths")]
    Shape(#[from] ndarray::ShapeError),
}
