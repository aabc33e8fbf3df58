use serde::{Deserialize, Serialize};

/// Per-epoch training statistics produced by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean cross-entropy over the training set, before this epoch's update.
    pub loss: f64,
    /// Training accuracy of the outputs the update was computed from.
    pub train_accuracy: f64,
    /// Test accuracy after the update.
    pub test_accuracy: f64,
}
