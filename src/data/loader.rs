use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::data::label::DefectClass;
use crate::error::DataError;

/// Name of the column holding the defect category.
pub const LABEL_COLUMN: &str = "label";

/// Rows of the feature file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<DefectClass>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }
}

/// Reads a CSV feature file with a header row.
///
/// The features are the first `feature_count` columns other than `label`,
/// in file order; any further columns are ignored. Labels are mapped to
/// classes before anything else sees them, so every returned row carries a
/// known class.
pub fn load_dataset(path: &Path, feature_count: usize) -> Result<Dataset, DataError> {
    if !path.is_file() {
        return Err(DataError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let label_idx = headers
        .iter()
        .position(|h| h == LABEL_COLUMN)
        .ok_or(DataError::MissingLabelColumn)?;

    let feature_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != label_idx)
        .take(feature_count)
        .collect();
    if feature_idx.len() < feature_count {
        return Err(DataError::TooFewColumns {
            expected: feature_count,
            found: feature_idx.len(),
        });
    }
    let feature_names: Vec<String> = feature_idx.iter().map(|&i| headers[i].to_string()).collect();

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_idx + 1;

        let raw_label = record.get(label_idx).unwrap_or_default();
        let label = raw_label
            .parse::<DefectClass>()
            .map_err(|unknown| DataError::UnknownLabel { row, label: unknown.0 })?;

        let values = feature_idx
            .iter()
            .zip(&feature_names)
            .map(|(&col, name)| {
                let cell = record.get(col).unwrap_or_default();
                // `NaN` and `inf` parse as f64; only finite values are accepted.
                cell.parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| DataError::InvalidValue {
                        row,
                        column: name.clone(),
                        value: cell.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, DataError>>()?;

        features.push(values);
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(DataError::Empty);
    }

    debug!(path = %path.display(), rows = labels.len(), "read feature file");

    Ok(Dataset {
        feature_names,
        features,
        labels,
    })
}
