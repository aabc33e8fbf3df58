use serde::{Deserialize, Serialize};

/// Architecture of the two-hidden-layer perceptron.
///
/// Both hidden layers share `hidden_size`. `dropout` is carried with the
/// architecture and persisted, but the forward pass never applies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MlpSpec {
    pub input_size: usize,
    pub hidden_size: usize,
    pub num_labels: usize,
    pub dropout: f64,
}

impl MlpSpec {
    /// `(fan_in, fan_out)` for each of the three linear layers, input → output.
    pub fn layer_shapes(&self) -> [(usize, usize); 3] {
        [
            (self.input_size, self.hidden_size),
            (self.hidden_size, self.hidden_size),
            (self.hidden_size, self.num_labels),
        ]
    }
}
