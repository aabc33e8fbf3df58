//! k-nearest-neighbours classification with exhaustive neighbour search.

use linfa_nn::distance::{Distance, L1Dist, L2Dist, LInfDist};
use linfa_nn::{LinearSearch, NearestNeighbour};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::KnnError;

/// Distance used to rank neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
}

/// Stores the training set; all work happens at prediction time.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    metric: DistanceMetric,
    features: Array2<f64>,
    labels: Vec<usize>,
}

impl KnnClassifier {
    pub fn fit(
        features: Array2<f64>,
        labels: Vec<usize>,
        k: usize,
        metric: DistanceMetric,
    ) -> Result<Self, KnnError> {
        let samples = features.nrows();
        if k == 0 || k > samples || labels.len() != samples {
            return Err(KnnError::InvalidK { k, samples });
        }

        Ok(Self {
            k,
            metric,
            features,
            labels,
        })
    }

    /// Majority label among the `k` nearest training rows, per query row.
    pub fn predict(&self, queries: &Array2<f64>) -> Result<Vec<usize>, KnnError> {
        match self.metric {
            DistanceMetric::Euclidean => self.predict_with(queries, L2Dist),
            DistanceMetric::Manhattan => self.predict_with(queries, L1Dist),
            DistanceMetric::Chebyshev => self.predict_with(queries, LInfDist),
        }
    }

    fn predict_with<D: Distance<f64> + 'static>(
        &self,
        queries: &Array2<f64>,
        dist: D,
    ) -> Result<Vec<usize>, KnnError> {
        let index = LinearSearch::new().from_batch(&self.features, dist)?;

        queries
            .rows()
            .into_iter()
            .map(|query| {
                let neighbours = index.k_nearest(query, self.k)?;
                Ok(majority(neighbours.iter().map(|(_, idx)| self.labels[*idx])))
            })
            .collect()
    }
}

/// Most frequent label; ties go to the smallest label.
fn majority(labels: impl Iterator<Item = usize>) -> usize {
    let mut counts: Vec<usize> = Vec::new();
    for label in labels {
        if label >= counts.len() {
            counts.resize(label + 1, 0);
        }
        counts[label] += 1;
    }

    let mut best = 0;
    for (label, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = label;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn training_set() -> (Array2<f64>, Vec<usize>) {
        (
            array![
                [0.0, 0.0],
                [0.1, 0.0],
                [0.0, 0.1],
                [5.0, 5.0],
                [5.1, 5.0],
                [5.0, 5.1],
            ],
            vec![0, 0, 0, 1, 1, 1],
        )
    }

    #[test]
    fn k1_on_duplicated_points_is_exact() {
        let (x, y) = training_set();
        let knn = KnnClassifier::fit(x.clone(), y.clone(), 1, DistanceMetric::Euclidean).unwrap();
        assert_eq!(knn.predict(&x).unwrap(), y);
    }

    #[test]
    fn majority_vote_over_k_neighbours() {
        let (x, y) = training_set();
        let queries = array![[0.2, 0.2], [4.8, 4.9]];
        let metrics = [
            DistanceMetric::Euclidean,
            DistanceMetric::Manhattan,
            DistanceMetric::Chebyshev,
        ];
        for metric in metrics {
            let knn = KnnClassifier::fit(x.clone(), y.clone(), 3, metric).unwrap();
            assert_eq!(knn.predict(&queries).unwrap(), vec![0, 1]);
        }
    }

    #[test]
    fn invalid_k_is_rejected() {
        let (x, y) = training_set();
        assert!(matches!(
            KnnClassifier::fit(x.clone(), y.clone(), 0, DistanceMetric::Euclidean),
            Err(KnnError::InvalidK { k: 0, samples: 6 })
        ));
        assert!(KnnClassifier::fit(x, y, 7, DistanceMetric::Euclidean).is_err());
    }

    #[test]
    fn ties_go_to_the_smaller_label() {
        assert_eq!(majority([1, 0].into_iter()), 0);
        assert_eq!(majority([1, 1, 0].into_iter()), 1);
        assert_eq!(majority(std::iter::empty()), 0);
    }
}
