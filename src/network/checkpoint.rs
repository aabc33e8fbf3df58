use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    activation::activation::ActivationFunction,
    error::ModelLoadError,
    layers::dense::Layer,
    network::{metadata::ModelMetadata, mlp::Mlp, spec::MlpSpec},
};

/// Bumped whenever the on-disk layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk form of a trained network: architecture, run annotations and the
/// ordered list of layers (input → output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    pub format_version: u32,
    pub spec: MlpSpec,
    #[serde(default)]
    pub metadata: ModelMetadata,
    pub layers: Vec<Layer>,
}

/// File name for a trained model: accuracy, hidden size and learning rate
/// are embedded so runs can be compared from a directory listing.
pub fn artifact_name(test_accuracy: f64, hidden_size: usize, learning_rate: f64) -> String {
    format!(
        "rescaling_mlp_{}_{hidden_size}_{}.json",
        decimal(test_accuracy),
        decimal(learning_rate)
    )
}

/// Plain decimal form that keeps a trailing `.0` on whole numbers (`1.0`, not `1`).
fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

impl Mlp {
    /// Serializes the network and its metadata to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path, metadata: &ModelMetadata) -> std::io::Result<()> {
        let saved = SavedModel {
            format_version: FORMAT_VERSION,
            spec: *self.spec(),
            metadata: metadata.clone(),
            layers: self.layers.clone(),
        };
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &saved).map_err(std::io::Error::other)
    }

    /// Deserializes a network written by `save_json`, checking that the
    /// stored layers match the stored architecture.
    pub fn load_json(path: &Path) -> Result<(Mlp, ModelMetadata), ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        let saved: SavedModel = serde_json::from_reader(BufReader::new(file))?;
        saved.into_model()
    }
}

impl SavedModel {
    pub fn into_model(self) -> Result<(Mlp, ModelMetadata), ModelLoadError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let shapes = self.spec.layer_shapes();
        if self.layers.len() != shapes.len() {
            return Err(incompatible(format!(
                "expected {} layers, found {}",
                shapes.len(),
                self.layers.len()
            )));
        }

        for (idx, (layer, &(fan_in, fan_out))) in self.layers.iter().zip(&shapes).enumerate() {
            let weights_ok = layer.weights.rows == fan_in
                && layer.weights.cols == fan_out
                && layer.weights.data.len() == fan_in
                && layer.weights.data.iter().all(|row| row.len() == fan_out);
            let biases_ok = layer.biases.rows == 1
                && layer.biases.cols == fan_out
                && layer.biases.data.len() == 1
                && layer.biases.data[0].len() == fan_out;
            if !weights_ok || !biases_ok || layer.size != fan_out {
                return Err(incompatible(format!(
                    "layer {idx} does not have shape {fan_in}x{fan_out}"
                )));
            }

            let expected = if idx + 1 == shapes.len() {
                ActivationFunction::Softmax
            } else {
                ActivationFunction::ReLU
            };
            if layer.activator != expected {
                return Err(incompatible(format!(
                    "layer {idx} uses {:?}, expected {expected:?}",
                    layer.activator
                )));
            }
        }

        Ok((Mlp::from_parts(self.spec, self.layers), self.metadata))
    }
}

fn incompatible(message: String) -> ModelLoadError {
    ModelLoadError::Incompatible { message }
}

/// Full path of the artifact for a run inside `dir`.
pub fn artifact_path(
    dir: &Path,
    test_accuracy: f64,
    hidden_size: usize,
    learning_rate: f64,
) -> PathBuf {
    dir.join(artifact_name(test_accuracy, hidden_size, learning_rate))
}
