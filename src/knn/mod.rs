pub mod classifier;

pub use classifier::{DistanceMetric, KnnClassifier};
