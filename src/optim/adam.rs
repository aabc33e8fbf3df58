use crate::{layers::dense::Layer, math::matrix::Matrix};

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const EPSILON: f64 = 1e-8;

/// First and second moment estimates for one layer's weights and biases.
#[derive(Debug, Clone)]
struct Moments {
    m_weights: Matrix,
    v_weights: Matrix,
    m_biases: Matrix,
    v_biases: Matrix,
}

/// Adam optimizer (Kingma & Ba) with bias-corrected moment estimates.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    step: u32,
    moments: Vec<Moments>,
}

impl Adam {
    /// Creates zeroed moment buffers shaped like `layers`.
    pub fn new(learning_rate: f64, layers: &[Layer]) -> Adam {
        let moments = layers
            .iter()
            .map(|layer| Moments {
                m_weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
                v_weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
                m_biases: Matrix::zeros(layer.biases.rows, layer.biases.cols),
                v_biases: Matrix::zeros(layer.biases.rows, layer.biases.cols),
            })
            .collect();

        Adam {
            learning_rate,
            step: 0,
            moments,
        }
    }

    /// Number of updates applied so far.
    pub fn steps(&self) -> u32 {
        self.step
    }

    /// Applies one Adam update to every layer.
    /// `grads[i]` is the `(weights_grad, biases_grad)` pair for `layers[i]`.
    pub fn step(&mut self, layers: &mut [Layer], grads: &[(Matrix, Matrix)]) {
        assert_eq!(layers.len(), self.moments.len(), "optimizer built for a different network");
        assert_eq!(layers.len(), grads.len(), "one gradient pair per layer");

        self.step += 1;
        let t = self.step as i32;
        let correction1 = 1.0 - BETA1.powi(t);
        let correction2 = 1.0 - BETA2.powi(t);
        let lr = self.learning_rate;

        for ((layer, moments), (w_grad, b_grad)) in
            layers.iter_mut().zip(&mut self.moments).zip(grads)
        {
            update(
                &mut layer.weights,
                &mut moments.m_weights,
                &mut moments.v_weights,
                w_grad,
                lr,
                correction1,
                correction2,
            );
            update(
                &mut layer.biases,
                &mut moments.m_biases,
                &mut moments.v_biases,
                b_grad,
                lr,
                correction1,
                correction2,
            );
        }
    }
}

fn update(
    param: &mut Matrix,
    m: &mut Matrix,
    v: &mut Matrix,
    grad: &Matrix,
    lr: f64,
    correction1: f64,
    correction2: f64,
) {
    assert_eq!((param.rows, param.cols), (grad.rows, grad.cols), "gradient shape mismatch");

    for i in 0..param.rows {
        for j in 0..param.cols {
            let g = grad.data[i][j];
            let m_ij = BETA1 * m.data[i][j] + (1.0 - BETA1) * g;
            let v_ij = BETA2 * v.data[i][j] + (1.0 - BETA2) * g * g;
            m.data[i][j] = m_ij;
            v.data[i][j] = v_ij;

            let m_hat = m_ij / correction1;
            let v_hat = v_ij / correction2;
            param.data[i][j] -= lr * m_hat / (v_hat.sqrt() + EPSILON);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_step_moves_each_parameter_by_lr() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut layers = vec![Layer::new(2, 2, ActivationFunction::ReLU, &mut rng)];
        let before = layers[0].weights.clone();

        let w_grad = Matrix::from_data(vec![vec![0.3, -2.0], vec![5.0, -0.01]]);
        let b_grad = Matrix::from_data(vec![vec![1.0, -1.0]]);

        let mut adam = Adam::new(0.01, &layers);
        adam.step(&mut layers, &[(w_grad.clone(), b_grad)]);

        assert_eq!(adam.steps(), 1);
        for i in 0..2 {
            for j in 0..2 {
                let moved = before.data[i][j] - layers[0].weights.data[i][j];
                assert!((moved - 0.01 * w_grad.data[i][j].signum()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn zero_gradient_leaves_parameters() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut layers = vec![Layer::new(3, 2, ActivationFunction::ReLU, &mut rng)];
        let before = layers[0].clone();

        let mut adam = Adam::new(0.1, &layers);
        adam.step(&mut layers, &[(Matrix::zeros(2, 3), Matrix::zeros(1, 3))]);

        assert_eq!(layers[0].weights, before.weights);
        assert_eq!(layers[0].biases, before.biases);
    }
}
