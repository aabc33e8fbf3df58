use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

/// Fully connected layer: `a = activation(x · W + b)`.
///
/// `weights` has shape `(input_size, size)` and `biases` shape `(1, size)`,
/// so a batch of row vectors multiplies on the left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    #[serde(skip)]
    input: Matrix, // batch fed to the last training forward pass
    #[serde(skip)]
    pre_activation: Matrix, // z = xW + b, needed for the activation derivative
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let bound = 1.0 / (input_size as f64).sqrt();
        let weights = Matrix::uniform(input_size, size, bound, rng);
        let biases = Matrix::uniform(1, size, bound, rng);

        Layer {
            size,
            weights,
            biases,
            activator: activation,
            input: Matrix::default(),
            pre_activation: Matrix::default(),
        }
    }

    /// Training forward pass; caches the input and pre-activation for backprop.
    pub fn feed_from(&mut self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights).add_row(&self.biases);
        let a = self.activate(&z);
        self.input = input.clone();
        self.pre_activation = z;
        a
    }

    /// Inference forward pass; leaves the cached state untouched.
    pub fn infer(&self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights).add_row(&self.biases);
        self.activate(&z)
    }

    fn activate(&self, z: &Matrix) -> Matrix {
        match self.activator {
            ActivationFunction::Softmax => z.softmax_rows(),
            activator => z.map(|x| activator.function(x)),
        }
    }

    /// Computes gradients for the batch seen by the last `feed_from` call.
    ///
    /// `delta` is ∂L/∂a for this layer's output. Returns
    /// `(weights_grad, biases_grad, input_delta)` where `input_delta` is
    /// ∂L/∂x, the delta for the previous layer.
    pub fn compute_gradients(&self, delta: &Matrix) -> (Matrix, Matrix, Matrix) {
        let act_derivative = self.pre_activation.map(|x| self.activator.derivative(x));
        // δ = error ⊙ σ'(z)
        let layer_delta = delta.hadamard(&act_derivative);

        let weights_grad = &self.input.transpose() * &layer_delta;
        let biases_grad = layer_delta.sum_rows();
        let input_delta = &layer_delta * &self.weights.transpose();

        (weights_grad, biases_grad, input_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn init_is_bounded_by_fan_in() {
        let mut rng = StdRng::seed_from_u64(3);
        let layer = Layer::new(8, 4, ActivationFunction::ReLU, &mut rng);
        assert_eq!((layer.weights.rows, layer.weights.cols), (4, 8));
        assert_eq!((layer.biases.rows, layer.biases.cols), (1, 8));
        assert!(layer.weights.data.iter().flatten().all(|w| w.abs() <= 0.5));
    }

    #[test]
    fn feed_and_infer_agree() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut layer = Layer::new(3, 2, ActivationFunction::ReLU, &mut rng);
        let x = Matrix::from_data(vec![vec![0.3, -1.2], vec![2.0, 0.5]]);
        assert_eq!(layer.feed_from(&x), layer.infer(&x));
    }

    #[test]
    fn gradients_have_parameter_shapes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut layer = Layer::new(3, 2, ActivationFunction::ReLU, &mut rng);
        let x = Matrix::from_data(vec![vec![1.0, 2.0], vec![-1.0, 0.5], vec![0.0, 1.0]]);
        let out = layer.feed_from(&x);

        let (w, b, dx) = layer.compute_gradients(&out.map(|_| 1.0));
        assert_eq!((w.rows, w.cols), (2, 3));
        assert_eq!((b.rows, b.cols), (1, 3));
        assert_eq!((dx.rows, dx.cols), (3, 2));
    }
}
