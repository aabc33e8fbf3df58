/// Hyperparameters of one training run.
///
/// # Fields
/// - `epochs`        — number of full-batch passes over the training set
/// - `learning_rate` — Adam step size
/// - `seed`          — seeds the RNG used for weight initialisation
/// - `log_every`     — a progress line is logged every `log_every` epochs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub seed: u64,
    pub log_every: usize,
}

impl TrainConfig {
    /// Creates a config that logs progress every 50 epochs.
    pub fn new(epochs: usize, learning_rate: f64, seed: u64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            seed,
            log_every: 50,
        }
    }
}
