use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    /// Softmax is a row-wise activation; it is applied at the layer level
    /// (not element-wise) in `Layer::activate()`.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` never reaches this path because the
    /// layer handles it over whole rows; it passes values through unchanged.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            ActivationFunction::Softmax => x,
        }
    }

    /// Element-wise derivative of the activation.
    ///
    /// For `Softmax`, the output layer is paired with cross-entropy and the
    /// combined gradient is `predicted - expected` (already computed by
    /// `CrossEntropyLoss::derivative()`). Returning `1.0` here passes that
    /// delta through unchanged without double-applying the Jacobian.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::Softmax => 1.0,
        }
    }
}
