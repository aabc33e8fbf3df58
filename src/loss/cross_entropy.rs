use crate::math::matrix::Matrix;

/// Categorical cross-entropy loss for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Mean cross-entropy over a batch:
    ///   L = -(1/n) · Σ_rows Σ_i expected[i] · log(predicted[i] + eps)
    ///
    /// `predicted` — softmax probabilities, shape (n, n_classes)
    /// `expected`  — one-hot targets, same shape
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        assert_eq!((predicted.rows, predicted.cols), (expected.rows, expected.cols));
        if predicted.rows == 0 {
            return 0.0;
        }

        let total: f64 = predicted
            .data
            .iter()
            .zip(&expected.data)
            .map(|(p_row, e_row)| {
                p_row
                    .iter()
                    .zip(e_row)
                    .map(|(p, e)| -e * (p + EPS).ln())
                    .sum::<f64>()
            })
            .sum();
        total / predicted.rows as f64
    }

    /// Gradient of the batch-mean Softmax + cross-entropy w.r.t. the
    /// pre-softmax logits:
    ///   ∂L/∂z = (predicted - expected) / n
    ///
    /// This is the initial delta passed into the backward pass. The Softmax
    /// layer's own derivative is identity (1.0), so the combined gradient is
    /// not double-applied.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let n = predicted.rows.max(1) as f64;
        (predicted - expected).map(|x| x / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_prediction_has_near_zero_loss() {
        let p = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(CrossEntropyLoss::loss(&p, &p) < 1e-9);
    }

    #[test]
    fn uniform_prediction_costs_ln2() {
        let p = Matrix::from_data(vec![vec![0.5, 0.5]; 4]);
        let y = Matrix::one_hot(&[0, 1, 1, 0], 2);
        let loss = CrossEntropyLoss::loss(&p, &y);
        assert!((loss - std::f64::consts::LN_2).abs() < 1e-9);
    }

    #[test]
    fn derivative_is_scaled_difference() {
        let p = Matrix::from_data(vec![vec![0.25, 0.75], vec![0.5, 0.5]]);
        let y = Matrix::one_hot(&[1, 0], 2);
        let d = CrossEntropyLoss::derivative(&p, &y);
        assert_eq!(d.data, vec![vec![0.125, -0.125], vec![-0.25, 0.25]]);
    }
}
