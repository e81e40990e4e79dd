//! Core types for the scoring engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Party identifier in payment-address form (e.g. "amit.sharma@safepay")
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyId(String);

impl PartyId {
    /// Create a party identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Geo-location flag on a party's risk record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeoFlag {
    /// Activity from the party's usual locations
    Normal,
    /// Activity from an unexpected location
    Unusual,
    /// Activity from a known high-risk region
    HighRisk,
}

impl GeoFlag {
    /// Parse a source label. Unknown labels map to `Normal`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "unusual" => GeoFlag::Unusual,
            "high-risk" | "high_risk" => GeoFlag::HighRisk,
            _ => GeoFlag::Normal,
        }
    }
}

/// Account verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Verification not yet completed
    Pending,
    /// Identity verified
    Verified,
    /// Flagged suspicious in the historical directory
    Suspicious,
    /// Suspended by an administrator
    Suspended,
}

impl VerificationStatus {
    /// Parse a source label. Unknown labels map to `Pending`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "verified" => VerificationStatus::Verified,
            "suspicious" => VerificationStatus::Suspicious,
            "suspended" => VerificationStatus::Suspended,
            _ => VerificationStatus::Pending,
        }
    }

    /// True for the suspicious/suspended statuses that feed the
    /// suspicious-verification indicator feature.
    pub fn is_suspicious(&self) -> bool {
        matches!(
            self,
            VerificationStatus::Suspicious | VerificationStatus::Suspended
        )
    }
}

/// Canonical resolved view of one party's risk attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyProfile {
    /// Social trust score, 0-100
    pub trust_score: f64,

    /// Past fraud flags on the account
    pub fraud_flags: u32,

    /// Fraud complaints received from counterparties
    pub fraud_complaints: u32,

    /// Blacklist membership
    pub blacklist: bool,

    /// Geo-location flag
    pub geo_flag: GeoFlag,

    /// Account age in years
    pub account_age_years: f64,

    /// Verification status
    pub verification: VerificationStatus,

    /// Device fingerprint did not match the known devices
    pub device_mismatch: bool,

    /// Session arrived through a VPN or proxy
    pub vpn_proxy: bool,

    /// Merchant category inconsistent with the party's history
    pub merchant_mismatch: bool,
}

impl Default for PartyProfile {
    /// Safe default used when a source has the party but no risk record.
    fn default() -> Self {
        Self {
            trust_score: 50.0,
            fraud_flags: 0,
            fraud_complaints: 0,
            blacklist: false,
            geo_flag: GeoFlag::Normal,
            account_age_years: 1.0,
            verification: VerificationStatus::Pending,
            device_mismatch: false,
            vpn_proxy: false,
            merchant_mismatch: false,
        }
    }
}

/// Time-windowed behavioral signals for one party
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivitySignal {
    /// Transactions involving the party in the trailing 24 hours
    pub frequency_24h: u32,

    /// Hours elapsed since the party's most recent transaction
    pub hours_since_last: f64,
}

/// Human-readable risk band derived from the fraud probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Probability below 0.4
    Low,
    /// Probability in [0.4, 0.7)
    Medium,
    /// Probability at or above 0.7
    High,
}

impl RiskLevel {
    /// Band a fraud probability
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.7 {
            RiskLevel::High
        } else if probability >= 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Final verdict for one scored transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Fraud verdict after overrides, threshold, and model label
    pub is_fraud: bool,

    /// Calibrated probability of the fraud class
    pub fraud_probability: f64,

    /// Risk band for the probability
    pub risk_level: RiskLevel,

    /// Explanation strings in fixed priority order
    pub risk_factors: Vec<String>,

    /// When the verdict was produced
    pub assessed_at: DateTime<Utc>,
}
