//! Row shapes for the directory's CSV exports

use crate::error::{DirectoryError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use scoring_engine::{GeoFlag, PartyProfile, VerificationStatus};
use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: f64 = 12.0;

/// One party row from the users export. Sparse columns decode to `None`
/// and fall back to the safe defaults when mapped into a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyRecord {
    /// Payment address, the directory key
    pub upi_id: String,

    /// Display name
    pub display_name: String,

    /// Verification status label (pending/verified/suspicious/suspended)
    #[serde(default)]
    pub verification_status: Option<String>,

    /// Coarse risk category assigned at export time (safe/medium/high)
    #[serde(default)]
    pub risk_category: Option<String>,

    /// Account age in months
    #[serde(default)]
    pub account_age_months: Option<f64>,

    /// Social trust score, 0-100
    #[serde(default)]
    pub social_trust_score: Option<f64>,

    /// Blacklist membership (0/1)
    #[serde(default)]
    pub blacklist_status: Option<u8>,

    /// Past fraud flags
    #[serde(default)]
    pub past_fraud_flags: Option<u32>,

    /// Fraud complaints received
    #[serde(default)]
    pub fraud_complaints_count: Option<u32>,

    /// Geo-location flag label (normal/unusual/high-risk)
    #[serde(default)]
    pub geo_location_flag: Option<String>,

    /// Merchant-category mismatch indicator (0/1)
    #[serde(default)]
    pub merchant_category_mismatch: Option<u8>,
}

impl PartyRecord {
    /// Map this row into the engine's canonical profile shape.
    pub fn to_profile(&self) -> PartyProfile {
        PartyProfile {
            trust_score: self.social_trust_score.unwrap_or(50.0),
            fraud_flags: self.past_fraud_flags.unwrap_or(0),
            fraud_complaints: self.fraud_complaints_count.unwrap_or(0),
            blacklist: self.blacklist_status.unwrap_or(0) == 1,
            geo_flag: self
                .geo_location_flag
                .as_deref()
                .map(GeoFlag::from_label)
                .unwrap_or(GeoFlag::Normal),
            account_age_years: self.account_age_months.unwrap_or(MONTHS_PER_YEAR)
                / MONTHS_PER_YEAR,
            verification: self
                .verification_status
                .as_deref()
                .map(VerificationStatus::from_label)
                .unwrap_or(VerificationStatus::Verified),
            device_mismatch: false,
            vpn_proxy: false,
            merchant_mismatch: self.merchant_category_mismatch.unwrap_or(0) == 1,
        }
    }
}

/// One row from the historical transaction export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction reference
    #[serde(default)]
    pub transaction_id: Option<String>,

    /// Sending party
    pub sender_upi_id: String,

    /// Receiving party
    pub receiver_upi_id: String,

    /// Amount
    pub amount: f64,

    /// Timestamp, either `YYYY-MM-DD HH:MM:SS` or RFC 3339
    pub timestamp: String,
}

impl TransactionRecord {
    /// Parse the row's timestamp.
    pub fn parsed_timestamp(&self) -> Result<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                DirectoryError::Parse(format!("bad timestamp '{}': {}", self.timestamp, e))
            })
    }
}
