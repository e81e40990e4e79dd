//! Classifier adapter over the exported model artifact
//!
//! The trained classifier is an external dependency: a binary artifact
//! exporting the calibrated coefficient form of the model. The adapter
//! loads it lazily, exactly once per process, and exposes the model's
//! `predict`/`predict_proba` pair as a single [`ModelScore`].

use crate::error::{Error, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Binary label plus calibrated fraud-class probability for one vector
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelScore {
    /// 1 when the model's own decision rule lands on fraud, else 0
    pub label: u8,

    /// Probability of the fraud class, in [0, 1]
    pub fraud_probability: f64,
}

/// Scores feature vectors with the trained classifier. Implementations
/// must be shareable across concurrently executing requests.
pub trait Classifier: Send + Sync {
    /// Run the model on one feature vector.
    fn classify(&self, features: &FeatureVector) -> Result<ModelScore>;
}

/// On-disk export of the trained classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Version tag recorded at export time
    pub version: String,

    /// Per-feature coefficients, in classifier feature order
    pub weights: Vec<f64>,

    /// Intercept term
    pub intercept: f64,
}

/// Loaded, validated model ready to score
#[derive(Debug, Clone)]
pub struct LogisticModel {
    version: String,
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticModel {
    /// Validate an artifact into a scoreable model. An artifact whose
    /// coefficient count differs from [`FEATURE_COUNT`] is unusable.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        if artifact.weights.len() != FEATURE_COUNT {
            return Err(Error::ModelUnavailable(format!(
                "artifact carries {} coefficients, expected {}",
                artifact.weights.len(),
                FEATURE_COUNT
            )));
        }
        let mut weights = [0.0; FEATURE_COUNT];
        weights.copy_from_slice(&artifact.weights);
        Ok(Self {
            version: artifact.version,
            weights,
            intercept: artifact.intercept,
        })
    }

    /// Version tag from the artifact
    pub fn version(&self) -> &str {
        &self.version
    }

    fn fraud_probability(&self, features: &FeatureVector) -> f64 {
        let z: f64 = features
            .as_slice()
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

/// Lazily-initialized classifier handle, safe to share across requests.
/// The artifact is read on first use; exactly one load occurs even under
/// concurrent first-use, and a failed load surfaces as
/// [`Error::ModelUnavailable`] on every scoring call.
pub struct LogisticClassifier {
    path: PathBuf,
    model: OnceCell<LogisticModel>,
}

impl LogisticClassifier {
    /// Handle over an artifact on disk
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            model: OnceCell::new(),
        }
    }

    /// Handle over an already-loaded model (tests, embedded deployments)
    pub fn with_model(model: LogisticModel) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(model);
        Self {
            path: PathBuf::new(),
            model: cell,
        }
    }

    fn model(&self) -> Result<&LogisticModel> {
        self.model.get_or_try_init(|| {
            let model = load_artifact(&self.path)?;
            info!(
                version = model.version(),
                path = %self.path.display(),
                "fraud model loaded"
            );
            Ok(model)
        })
    }
}

impl Classifier for LogisticClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<ModelScore> {
        let model = self.model()?;
        let fraud_probability = model.fraud_probability(features);
        Ok(ModelScore {
            label: u8::from(fraud_probability >= 0.5),
            fraud_probability,
        })
    }
}

fn load_artifact(path: &Path) -> Result<LogisticModel> {
    let file = File::open(path).map_err(|e| {
        Error::ModelUnavailable(format!("cannot open {}: {}", path.display(), e))
    })?;
    let artifact: ModelArtifact = bincode::deserialize_from(BufReader::new(file))
        .map_err(|e| Error::ModelUnavailable(format!("cannot decode {}: {}", path.display(), e)))?;
    LogisticModel::from_artifact(artifact)
}
