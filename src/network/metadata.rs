use serde::{Deserialize, Serialize};

/// Run annotations stored next to the weights in a saved model.
/// Every field has a default so hand-written checkpoints still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    /// Test accuracy measured right before the model was saved.
    #[serde(default)]
    pub test_accuracy: f64,
    #[serde(default)]
    pub learning_rate: f64,
    #[serde(default)]
    pub num_epochs: usize,
    #[serde(default)]
    pub seed: u64,
    /// Class names for the output layer, indexed by class.
    #[serde(default)]
    pub output_labels: Vec<String>,
}
