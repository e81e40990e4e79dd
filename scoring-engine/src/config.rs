//! Configuration for the scoring engine

use crate::error::{Error, Result};
use crate::telemetry::{FixedTelemetry, RandomTelemetry, TelemetryProvider};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Telemetry provider selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TelemetryMode {
    /// Sample bounded random values (degraded-mode default)
    Random,
    /// Pin both synthesized features, making scoring deterministic
    Fixed {
        /// Behavioral-biometric proxy value
        behavioral_biometrics: f64,
        /// Context-anomaly proxy value
        context_anomalies: f64,
    },
}

/// Scoring engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Path to the exported classifier artifact
    pub model_path: PathBuf,

    /// Telemetry synthesis mode
    pub telemetry: TelemetryMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./data/fraud_model.bin"),
            telemetry: TelemetryMode::Random,
        }
    }
}

impl ScoringConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("cannot read config: {}", e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("cannot parse config: {}", e)))
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("SAFEPAY_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Build the configured telemetry provider
    pub fn telemetry_provider(&self) -> Arc<dyn TelemetryProvider> {
        match self.telemetry {
            TelemetryMode::Random => Arc::new(RandomTelemetry),
            TelemetryMode::Fixed {
                behavioral_biometrics,
                context_anomalies,
            } => Arc::new(FixedTelemetry {
                behavioral_biometrics,
                context_anomalies,
            }),
        }
    }
}
