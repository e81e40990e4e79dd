//! Fixed-order feature construction for the fraud classifier
//!
//! Feature position is a wire contract with the trained model: the order
//! below must never change without a retrain.

use crate::error::{Error, Result};
use crate::normalize::{normalize, ranges};
use crate::telemetry::TelemetryProvider;
use crate::types::{ActivitySignal, GeoFlag, PartyProfile, VerificationStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Number of features the classifier was trained on
pub const FEATURE_COUNT: usize = 22;

/// Amount above which the very-high-value indicator fires
pub const VERY_HIGH_VALUE_AMOUNT: f64 = 100_000.0;

/// Amount above which the high-value indicator fires
pub const HIGH_VALUE_AMOUNT: f64 = 50_000.0;

/// Divisor for the capped-amount feature
const CAPPED_AMOUNT_DIVISOR: f64 = 5_000.0;

/// Cap for the capped-amount feature
const CAPPED_AMOUNT_CEILING: f64 = 1.26;

/// True for the late-night hours (23:00 through 05:59) treated as
/// high-risk.
pub fn is_high_risk_hour(hour: u32) -> bool {
    hour >= 23 || hour <= 5
}

/// Ordered feature vector handed to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Validate an externally supplied slice into a vector. Any length
    /// other than [`FEATURE_COUNT`] is a contract violation.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(Error::Validation(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                values.len()
            )));
        }
        let mut features = [0.0; FEATURE_COUNT];
        features.copy_from_slice(values);
        Ok(Self(features))
    }

    /// Feature values in classifier order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Assembles feature vectors from resolved profiles and activity signals.
/// Shared by every call site so the feature semantics cannot drift apart.
pub struct FeatureBuilder {
    telemetry: Arc<dyn TelemetryProvider>,
}

impl FeatureBuilder {
    /// Builder over the given telemetry provider
    pub fn new(telemetry: Arc<dyn TelemetryProvider>) -> Self {
        Self { telemetry }
    }

    /// Assemble the 22 features for one transaction.
    pub fn build(
        &self,
        amount: f64,
        hour: u32,
        profile: &PartyProfile,
        activity: &ActivitySignal,
    ) -> FeatureVector {
        let biometrics = self.telemetry.behavioral_biometrics();
        let context_anomalies = self.telemetry.context_anomalies();

        let location_inconsistent = profile.geo_flag == GeoFlag::Unusual;
        let capped_amount = (amount / CAPPED_AMOUNT_DIVISOR).min(CAPPED_AMOUNT_CEILING);

        FeatureVector([
            // 1-5: amount, frequency, blacklist, device, VPN
            normalize(amount, ranges::AMOUNT),
            normalize(f64::from(activity.frequency_24h), ranges::FREQUENCY),
            flag(profile.blacklist),
            flag(profile.device_mismatch),
            flag(profile.vpn_proxy),
            // 6-9: biometrics, recency, trust, account age
            normalize(biometrics, ranges::BIOMETRICS),
            normalize(activity.hours_since_last, ranges::HOURS_SINCE_LAST),
            normalize(profile.trust_score, ranges::TRUST_SCORE),
            normalize(profile.account_age_years, ranges::ACCOUNT_AGE),
            // 10-12: high-risk hour, past fraud, location
            flag(is_high_risk_hour(hour)),
            flag(profile.fraud_flags > 0),
            flag(location_inconsistent),
            // 13-15: capped amount, context anomalies, complaints
            normalize(capped_amount, ranges::CAPPED_AMOUNT),
            normalize(context_anomalies, ranges::CONTEXT_ANOMALIES),
            normalize(f64::from(profile.fraud_complaints), ranges::COMPLAINTS),
            // 16-18: merchant mismatch, amount thresholds
            flag(profile.merchant_mismatch),
            flag(amount > VERY_HIGH_VALUE_AMOUNT),
            flag(amount > HIGH_VALUE_AMOUNT),
            // 19-22: verification and geo one-hot indicators
            flag(profile.verification.is_suspicious()),
            flag(profile.verification == VerificationStatus::Verified),
            flag(profile.geo_flag == GeoFlag::Normal),
            flag(profile.geo_flag == GeoFlag::Unusual),
        ])
    }
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}
