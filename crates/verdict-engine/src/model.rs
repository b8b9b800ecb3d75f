use std::path::Path;

use serde::{Deserialize, Serialize};
use verdict_core::{DealClassifier, DealFeatureVector, DealResult, VerdictError};

/// Standard-scaler parameters exported alongside the model weights.
/// Restates the original prototypes' import-time scaler global as explicit,
/// immutable artifact state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

/// JSON export of the trained logistic-regression deal model.
///
/// `feature_names` declares the exact input schema — names and order — the
/// model was trained against. The artifact is produced by the training
/// environment and is opaque to this crate beyond these declared fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<ScalerParams>,
}

/// Pre-trained binary classifier over deal feature vectors.
///
/// Pure inference wrapper: no training, no re-fitting, no online learning,
/// no randomness. The same vector always yields the same probability.
pub struct LogisticModel {
    artifact: ModelArtifact,
}

impl LogisticModel {
    /// Read and validate an artifact from disk. Called once at startup.
    pub fn load(path: &Path) -> DealResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VerdictError::ModelLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&raw).map_err(|e| {
            VerdictError::ModelLoad(format!("invalid model artifact {}: {e}", path.display()))
        })?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> DealResult<Self> {
        if artifact.feature_names.is_empty() {
            return Err(VerdictError::ModelLoad(
                "artifact declares no features".to_string(),
            ));
        }
        if artifact.coefficients.len() != artifact.feature_names.len() {
            return Err(VerdictError::ModelLoad(format!(
                "artifact declares {} features but carries {} coefficients",
                artifact.feature_names.len(),
                artifact.coefficients.len()
            )));
        }
        if let Some(scaler) = &artifact.scaler {
            if scaler.means.len() != artifact.feature_names.len()
                || scaler.stds.len() != artifact.feature_names.len()
            {
                return Err(VerdictError::ModelLoad(
                    "scaler parameter lengths do not match the feature count".to_string(),
                ));
            }
        }
        Ok(Self { artifact })
    }

    fn standardized(&self, values: &[f64]) -> Vec<f64> {
        match &self.artifact.scaler {
            Some(scaler) => values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let centered = v - scaler.means[i];
                    if scaler.stds[i] > 0.0 {
                        centered / scaler.stds[i]
                    } else {
                        centered
                    }
                })
                .collect(),
            None => values.to_vec(),
        }
    }
}

impl DealClassifier for LogisticModel {
    fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    fn predict_probability(&self, vector: &DealFeatureVector) -> DealResult<f64> {
        if vector.feature_names() != self.artifact.feature_names.as_slice() {
            return Err(VerdictError::FeatureOrderMismatch(format!(
                "vector features {:?} do not match the model's declared schema {:?}",
                vector.feature_names(),
                self.artifact.feature_names
            )));
        }

        let x = self.standardized(vector.values());
        let z: f64 = x
            .iter()
            .zip(&self.artifact.coefficients)
            .map(|(v, c)| v * c)
            .sum::<f64>()
            + self.artifact.intercept;

        Ok(sigmoid(z))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
