use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::data::label::DefectClass;
use crate::data::loader::Dataset;
use crate::error::DataError;
use crate::math::matrix::Matrix;

/// One side of a train/test split.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Row positions in the source dataset, in partition order.
    pub indices: Vec<usize>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<DefectClass>,
}

impl Partition {
    fn gather(dataset: &Dataset, indices: Vec<usize>) -> Partition {
        let features = indices.iter().map(|&i| dataset.features[i].clone()).collect();
        let labels = indices.iter().map(|&i| dataset.labels[i]).collect();
        Partition {
            indices,
            features,
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Class index per row.
    pub fn classes(&self) -> Vec<usize> {
        self.labels.iter().map(|l| l.index()).collect()
    }

    /// Features as a `(rows, feature_count)` matrix for the perceptron.
    pub fn feature_matrix(&self) -> Matrix {
        Matrix::from_data(self.features.clone())
    }

    /// One-hot targets as a `(rows, num_labels)` matrix.
    pub fn one_hot_labels(&self, num_labels: usize) -> Matrix {
        Matrix::one_hot(&self.classes(), num_labels)
    }

    /// Features as an ndarray for the neighbour index.
    pub fn feature_array(&self) -> Result<Array2<f64>, ndarray::ShapeError> {
        let cols = self.features.first().map_or(0, Vec::len);
        let flat: Vec<f64> = self.features.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.features.len(), cols), flat)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Partition,
    pub test: Partition,
}

/// Deterministic shuffled split.
///
/// `ceil(test_size * n)` rows go to the test partition and the rest to
/// training. Both partitions must end up non-empty.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<Split, DataError> {
    let n = dataset.len();
    let invalid = || DataError::InvalidSplit { rows: n, test_size };

    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(invalid());
    }
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(invalid());
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let train_idx = order.split_off(n_test);

    let split = Split {
        train: Partition::gather(dataset, train_idx),
        test: Partition::gather(dataset, order),
    };

    info!(
        total = n,
        train = split.train.len(),
        test = split.test.len(),
        "data loaded"
    );

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dataset(n: usize) -> Dataset {
        Dataset {
            feature_names: (1..=6).map(|i| format!("f{i}")).collect(),
            features: (0..n).map(|i| vec![i as f64; 6]).collect(),
            labels: (0..n)
                .map(|i| if i < n / 2 { DefectClass::Patches } else { DefectClass::Scratches })
                .collect(),
        }
    }

    #[test]
    fn hundred_rows_split_eighty_twenty() {
        let split = train_test_split(&dataset(100), 0.2, 1).unwrap();
        assert_eq!(split.train.len(), 80);
        assert_eq!(split.test.len(), 20);
        assert!(split
            .train
            .classes()
            .iter()
            .chain(&split.test.classes())
            .all(|&c| c == 0 || c == 1));
    }

    #[test]
    fn partitions_are_disjoint_and_cover_the_dataset() {
        for n in [2, 3, 7, 10, 101] {
            let data = dataset(n);
            let split = train_test_split(&data, 0.2, 5).unwrap();
            assert_eq!(split.train.len() + split.test.len(), n);

            let train: HashSet<_> = split.train.indices.iter().copied().collect();
            let test: HashSet<_> = split.test.indices.iter().copied().collect();
            assert!(train.is_disjoint(&test));
            assert_eq!(train.union(&test).count(), n);

            for (pos, &idx) in split.test.indices.iter().enumerate() {
                assert_eq!(split.test.features[pos], data.features[idx]);
                assert_eq!(split.test.labels[pos], data.labels[idx]);
            }
        }
    }

    #[test]
    fn same_seed_same_split() {
        let data = dataset(50);
        assert_eq!(
            train_test_split(&data, 0.2, 1).unwrap(),
            train_test_split(&data, 0.2, 1).unwrap()
        );
        assert_ne!(
            train_test_split(&data, 0.2, 1).unwrap().test.indices,
            train_test_split(&data, 0.2, 2).unwrap().test.indices
        );
    }

    #[test]
    fn degenerate_splits_are_rejected() {
        assert!(matches!(
            train_test_split(&dataset(1), 0.2, 1),
            Err(DataError::InvalidSplit { rows: 1, .. })
        ));
        assert!(train_test_split(&dataset(10), 0.0, 1).is_err());
        assert!(train_test_split(&dataset(10), 1.0, 1).is_err());
    }

    #[test]
    fn partition_converts_to_numeric_arrays() {
        let split = train_test_split(&dataset(10), 0.2, 3).unwrap();
        let m = split.train.feature_matrix();
        assert_eq!((m.rows, m.cols), (8, 6));
        let y = split.train.one_hot_labels(2);
        assert_eq!((y.rows, y.cols), (8, 2));
        assert!(y.data.iter().all(|row| row.iter().sum::<f64>() == 1.0));
        let a = split.test.feature_array().unwrap();
        assert_eq!(a.dim(), (2, 6));
    }
}
