use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Mul, Sub};

/// Dense row-major matrix of `f64`.
///
/// Shape mismatches in the arithmetic operators are programming errors and
/// panic, the same way slice indexing does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Samples every entry from U(-bound, bound).
    ///
    /// Used for layer initialisation with `bound = 1 / sqrt(fan_in)`, which
    /// keeps the pre-activation variance independent of the input width.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, bound: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        if bound <= 0.0 {
            return res;
        }

        for row in res.data.iter_mut() {
            for value in row.iter_mut() {
                *value = rng.gen_range(-bound..bound);
            }
        }

        res
    }

    /// Builds a matrix from row vectors. All rows must share one length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, Vec::len);
        assert!(
            data.iter().all(|row| row.len() == cols),
            "all rows must have the same length"
        );
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    /// One-hot encodes class indices into a `(classes.len(), num_classes)` matrix.
    pub fn one_hot(classes: &[usize], num_classes: usize) -> Matrix {
        let mut res = Matrix::zeros(classes.len(), num_classes);
        for (row, &class) in res.data.iter_mut().zip(classes) {
            row[class] = 1.0;
        }
        res
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols), "Matrices are of incorrect sizes");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| a.iter().zip(b).map(|(x, y)| x * y).collect())
                .collect(),
        }
    }

    /// Adds a `(1, cols)` row vector to every row.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        assert!(row.rows == 1 && row.cols == self.cols, "Matrices are of incorrect sizes");
        let bias = &row.data[0];
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|r| r.iter().zip(bias).map(|(x, b)| x + b).collect())
                .collect(),
        }
    }

    /// Column sums as a `(1, cols)` row vector.
    pub fn sum_rows(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (acc, x) in sums.iter_mut().zip(row) {
                *acc += x;
            }
        }
        Matrix {
            rows: 1,
            cols: self.cols,
            data: vec![sums],
        }
    }

    /// Row-wise softmax. Each row is shifted by its maximum before
    /// exponentiation so large logits do not overflow.
    pub fn softmax_rows(&self) -> Matrix {
        let data = self
            .data
            .iter()
            .map(|row| {
                let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let exps: Vec<f64> = row.iter().map(|x| (x - max).exp()).collect();
                let sum: f64 = exps.iter().sum();
                exps.into_iter().map(|e| e / sum).collect()
            })
            .collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Index of the largest entry in each row. Ties resolve to the lowest index.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter().map(|row| argmax(row)).collect()
    }
}

/// Index of the maximum element in a slice; the first one wins on ties.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                if a == 0.0 {
                    continue;
                }
                for j in 0..res.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        res
    }
}
