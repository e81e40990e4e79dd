//! Stand-in telemetry for the two device/behavioral features
//!
//! The demo deployment has no real device fingerprinting or behavioral
//! capture, so the biometric and context-anomaly features are synthesized.
//! The random provider is the degraded-mode default; under it, scoring the
//! same transaction twice can differ near the decision boundary. Replays
//! that must be identical construct the engine with [`FixedTelemetry`].

use rand::Rng;

/// Supplies the two synthesized continuous features, on their raw scale
pub trait TelemetryProvider: Send + Sync {
    /// Behavioral-biometric anomaly proxy
    fn behavioral_biometrics(&self) -> f64;

    /// Context-anomaly proxy
    fn context_anomalies(&self) -> f64;
}

/// Degraded-mode provider sampling bounded uniform noise
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTelemetry;

impl TelemetryProvider for RandomTelemetry {
    fn behavioral_biometrics(&self) -> f64 {
        rand::thread_rng().gen_range(0.1..=1.0)
    }

    fn context_anomalies(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..=1.0)
    }
}

/// Deterministic provider with caller-pinned values
#[derive(Debug, Clone, Copy)]
pub struct FixedTelemetry {
    /// Pinned biometric proxy value
    pub behavioral_biometrics: f64,
    /// Pinned context-anomaly proxy value
    pub context_anomalies: f64,
}

impl FixedTelemetry {
    /// Mid-range values, useful as a neutral deterministic default
    pub fn neutral() -> Self {
        Self {
            behavioral_biometrics: 0.5,
            context_anomalies: 0.5,
        }
    }
}

impl TelemetryProvider for FixedTelemetry {
    fn behavioral_biometrics(&self) -> f64 {
        self.behavioral_biometrics
    }

    fn context_anomalies(&self) -> f64 {
        self.context_anomalies
    }
}
