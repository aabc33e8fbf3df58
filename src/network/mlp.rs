use rand::Rng;

use crate::{
    activation::activation::ActivationFunction,
    layers::dense::Layer,
    loss::cross_entropy::CrossEntropyLoss,
    math::matrix::Matrix,
    network::spec::MlpSpec,
};

/// Multilayer perceptron: two ReLU hidden layers and a softmax output.
#[derive(Debug, Clone)]
pub struct Mlp {
    spec: MlpSpec,
    pub layers: Vec<Layer>,
}

impl Mlp {
    /// Builds a freshly initialised network; all randomness comes from `rng`.
    pub fn new<R: Rng + ?Sized>(spec: MlpSpec, rng: &mut R) -> Mlp {
        let activations = [
            ActivationFunction::ReLU,
            ActivationFunction::ReLU,
            ActivationFunction::Softmax,
        ];
        let layers = spec
            .layer_shapes()
            .into_iter()
            .zip(activations)
            .map(|((input_size, size), activation)| Layer::new(size, input_size, activation, rng))
            .collect();

        Mlp { spec, layers }
    }

    /// Reassembles a network from stored layers. Shapes are checked by the caller.
    pub(crate) fn from_parts(spec: MlpSpec, layers: Vec<Layer>) -> Mlp {
        Mlp { spec, layers }
    }

    pub fn spec(&self) -> &MlpSpec {
        &self.spec
    }

    /// Training forward pass; stores activations in each layer for backprop.
    /// Returns one probability row per input row.
    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        current
    }

    /// Inference forward pass.
    pub fn predict_proba(&self, input: &Matrix) -> Matrix {
        self.layers
            .iter()
            .fold(input.clone(), |current, layer| layer.infer(&current))
    }

    /// Most probable class per input row.
    pub fn predict(&self, input: &Matrix) -> Vec<usize> {
        self.predict_proba(input).argmax_rows()
    }

    /// Backward pass for the batch seen by the last `forward` call.
    ///
    /// `predicted` is that call's output and `expected` the one-hot targets.
    /// Returns `(weights_grad, biases_grad)` per layer, input → output order.
    pub fn backward(&self, predicted: &Matrix, expected: &Matrix) -> Vec<(Matrix, Matrix)> {
        let mut delta = CrossEntropyLoss::derivative(predicted, expected);
        let mut grads = Vec::with_capacity(self.layers.len());

        for layer in self.layers.iter().rev() {
            let (w_grad, b_grad, input_delta) = layer.compute_gradients(&delta);
            grads.push((w_grad, b_grad));
            delta = input_delta;
        }

        grads.reverse();
        grads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec() -> MlpSpec {
        MlpSpec {
            input_size: 6,
            hidden_size: 5,
            num_labels: 2,
            dropout: 0.3,
        }
    }

    fn batch() -> Matrix {
        Matrix::from_data(vec![
            vec![0.1, -0.4, 2.0, 0.0, 1.5, -3.0],
            vec![1.0, 2.0, -3.0, 0.5, 0.0, 1.0],
            vec![0.0; 6],
        ])
    }

    #[test]
    fn output_is_row_stochastic() {
        let mut rng = StdRng::seed_from_u64(1);
        let mlp = Mlp::new(spec(), &mut rng);
        let probs = mlp.predict_proba(&batch());

        assert_eq!((probs.rows, probs.cols), (3, 2));
        for row in &probs.data {
            assert!(row.iter().all(|&p| p >= 0.0));
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn dropout_does_not_change_the_forward_pass() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut mlp = Mlp::new(spec(), &mut rng);
        let x = batch();
        let first = mlp.forward(&x);
        let second = mlp.forward(&x);
        assert_eq!(first, second);
        assert_eq!(first, mlp.predict_proba(&x));
    }

    #[test]
    fn same_seed_builds_same_network() {
        let a = Mlp::new(spec(), &mut StdRng::seed_from_u64(42));
        let b = Mlp::new(spec(), &mut StdRng::seed_from_u64(42));
        for (la, lb) in a.layers.iter().zip(&b.layers) {
            assert_eq!(la.weights, lb.weights);
            assert_eq!(la.biases, lb.biases);
        }
    }

    #[test]
    fn backward_matches_finite_differences() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut mlp = Mlp::new(spec(), &mut rng);
        let x = batch();
        let y = Matrix::one_hot(&[0, 1, 1], 2);

        let probs = mlp.forward(&x);
        let grads = mlp.backward(&probs, &y);

        let h = 1e-6;
        for (layer_idx, (w_grad, b_grad)) in grads.iter().enumerate() {
            for &(i, j) in &[(0, 0), (1, 1)] {
                let mut plus = mlp.clone();
                plus.layers[layer_idx].weights.data[i][j] += h;
                let mut minus = mlp.clone();
                minus.layers[layer_idx].weights.data[i][j] -= h;

                let numeric = (CrossEntropyLoss::loss(&plus.predict_proba(&x), &y)
                    - CrossEntropyLoss::loss(&minus.predict_proba(&x), &y))
                    / (2.0 * h);
                assert!(
                    (numeric - w_grad.data[i][j]).abs() < 1e-5,
                    "layer {layer_idx} w[{i}][{j}]: numeric {numeric} vs analytic {}",
                    w_grad.data[i][j]
                );
            }

            let mut plus = mlp.clone();
            plus.layers[layer_idx].biases.data[0][0] += h;
            let mut minus = mlp.clone();
            minus.layers[layer_idx].biases.data[0][0] -= h;
            let numeric = (CrossEntropyLoss::loss(&plus.predict_proba(&x), &y)
                - CrossEntropyLoss::loss(&minus.predict_proba(&x), &y))
                / (2.0 * h);
            assert!((numeric - b_grad.data[0][0]).abs() < 1e-5);
        }
    }
}
