//! Two-layer decision policy: model threshold plus deterministic overrides

use crate::classifier::ModelScore;
use crate::features::{is_high_risk_hour, HIGH_VALUE_AMOUNT};
use crate::types::{PartyProfile, RiskLevel, ScoringResult};
use chrono::Utc;

/// Probability at or above which the model alone flags a transaction.
/// Deliberately below the model's natural midpoint: the demo prefers
/// catching more fraud at the cost of false positives.
pub const FRAUD_THRESHOLD: f64 = 0.30;

/// Trust score below which fraud is forced
pub const FORCE_TRUST_SCORE: f64 = 15.0;

/// Fraud-flag count at or above which fraud is forced
pub const FORCE_FRAUD_FLAGS: u32 = 3;

/// Complaint count at or above which fraud is forced
pub const FORCE_COMPLAINTS: u32 = 5;

const LOW_TRUST_SCORE: f64 = 30.0;
const NEW_ACCOUNT_YEARS: f64 = 0.25;
const COMPLAINT_FACTOR_MIN: u32 = 2;

/// Deterministic override predicates, evaluated independently of the
/// model.
pub fn force_fraud(profile: &PartyProfile) -> bool {
    profile.blacklist
        || profile.trust_score < FORCE_TRUST_SCORE
        || profile.fraud_flags >= FORCE_FRAUD_FLAGS
        || profile.fraud_complaints >= FORCE_COMPLAINTS
}

/// Hybrid verdict: overrides first, then the probability threshold, then
/// the model's own label.
pub fn decide(profile: &PartyProfile, score: &ModelScore) -> bool {
    force_fraud(profile) || score.fraud_probability >= FRAUD_THRESHOLD || score.label == 1
}

/// Assemble the explanation list. Order is a fixed priority ranking and
/// must not be re-sorted; each satisfied predicate contributes exactly
/// one string.
pub fn risk_factors(
    profile: &PartyProfile,
    amount: f64,
    hour: u32,
    score: &ModelScore,
) -> Vec<String> {
    let mut factors = Vec::new();

    if profile.blacklist {
        factors.push("Recipient is on blacklist".to_string());
    }
    if profile.verification.is_suspicious() {
        factors.push("Recipient has suspicious verification status".to_string());
    }
    if profile.fraud_flags > 0 {
        factors.push("Recipient has past fraud flags".to_string());
    }
    if profile.fraud_complaints >= COMPLAINT_FACTOR_MIN {
        factors.push(format!(
            "Recipient has {} fraud complaints",
            profile.fraud_complaints
        ));
    }
    if is_high_risk_hour(hour) {
        factors.push("Transaction at high-risk hours".to_string());
    }
    if amount > HIGH_VALUE_AMOUNT {
        factors.push("High transaction amount".to_string());
    }
    if profile.account_age_years < NEW_ACCOUNT_YEARS {
        factors.push("Recipient account is recently created".to_string());
    }
    if profile.trust_score < LOW_TRUST_SCORE {
        factors.push("Recipient has low trust score".to_string());
    }
    if score.fraud_probability >= FRAUD_THRESHOLD {
        factors.push(format!(
            "Model flagged with {:.1}% probability",
            score.fraud_probability * 100.0
        ));
    }

    factors
}

/// Full hybrid evaluation producing the final result
pub fn evaluate(
    profile: &PartyProfile,
    amount: f64,
    hour: u32,
    score: &ModelScore,
) -> ScoringResult {
    ScoringResult {
        is_fraud: decide(profile, score),
        fraud_probability: score.fraud_probability,
        risk_level: RiskLevel::from_probability(score.fraud_probability),
        risk_factors: risk_factors(profile, amount, hour, score),
        assessed_at: Utc::now(),
    }
}

/// Rule-free evaluation: the model's label alone decides, and factors are
/// withheld entirely unless the transaction is flagged.
pub fn evaluate_model_only(
    profile: &PartyProfile,
    amount: f64,
    hour: u32,
    score: &ModelScore,
) -> ScoringResult {
    let is_fraud = score.label == 1;
    ScoringResult {
        is_fraud,
        fraud_probability: score.fraud_probability,
        risk_level: RiskLevel::from_probability(score.fraud_probability),
        risk_factors: if is_fraud {
            risk_factors(profile, amount, hour, score)
        } else {
            Vec::new()
        },
        assessed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VerificationStatus;

    fn quiet_score() -> ModelScore {
        ModelScore {
            label: 0,
            fraud_probability: 0.05,
        }
    }

    #[test]
    fn test_blacklist_forces_fraud() {
        let profile = PartyProfile {
            blacklist: true,
            ..PartyProfile::default()
        };
        assert!(force_fraud(&profile));
        assert!(decide(&profile, &quiet_score()));
    }

    #[test]
    fn test_low_trust_forces_fraud() {
        let profile = PartyProfile {
            trust_score: 14.9,
            ..PartyProfile::default()
        };
        assert!(force_fraud(&profile));
    }

    #[test]
    fn test_repeat_offenders_force_fraud() {
        let flagged = PartyProfile {
            fraud_flags: 3,
            ..PartyProfile::default()
        };
        assert!(force_fraud(&flagged));

        let complained = PartyProfile {
            fraud_complaints: 5,
            ..PartyProfile::default()
        };
        assert!(force_fraud(&complained));
    }

    #[test]
    fn test_clean_profile_below_threshold_passes() {
        let profile = PartyProfile {
            trust_score: 90.0,
            ..PartyProfile::default()
        };
        assert!(!force_fraud(&profile));
        assert!(!decide(&profile, &quiet_score()));
    }

    #[test]
    fn test_threshold_flags_without_overrides() {
        let profile = PartyProfile::default();
        let score = ModelScore {
            label: 0,
            fraud_probability: 0.30,
        };
        assert!(decide(&profile, &score));
    }

    #[test]
    fn test_model_label_flags_below_threshold() {
        // A label of 1 with a sub-threshold probability still flags.
        let profile = PartyProfile::default();
        let score = ModelScore {
            label: 1,
            fraud_probability: 0.1,
        };
        assert!(decide(&profile, &score));
    }

    #[test]
    fn test_factor_priority_order() {
        let profile = PartyProfile {
            blacklist: true,
            verification: VerificationStatus::Suspicious,
            fraud_flags: 2,
            fraud_complaints: 4,
            trust_score: 10.0,
            account_age_years: 0.1,
            ..PartyProfile::default()
        };
        let score = ModelScore {
            label: 1,
            fraud_probability: 0.85,
        };

        let factors = risk_factors(&profile, 60_000.0, 2, &score);
        assert_eq!(
            factors,
            vec![
                "Recipient is on blacklist".to_string(),
                "Recipient has suspicious verification status".to_string(),
                "Recipient has past fraud flags".to_string(),
                "Recipient has 4 fraud complaints".to_string(),
                "Transaction at high-risk hours".to_string(),
                "High transaction amount".to_string(),
                "Recipient account is recently created".to_string(),
                "Recipient has low trust score".to_string(),
                "Model flagged with 85.0% probability".to_string(),
            ]
        );
    }

    #[test]
    fn test_clean_daytime_transaction_has_no_factors() {
        let profile = PartyProfile {
            trust_score: 90.0,
            verification: VerificationStatus::Verified,
            ..PartyProfile::default()
        };
        let factors = risk_factors(&profile, 500.0, 14, &quiet_score());
        assert!(factors.is_empty());
    }

    #[test]
    fn test_single_complaint_is_not_a_factor() {
        let profile = PartyProfile {
            fraud_complaints: 1,
            ..PartyProfile::default()
        };
        let factors = risk_factors(&profile, 500.0, 14, &quiet_score());
        assert!(factors.is_empty());

        let profile = PartyProfile {
            fraud_complaints: 2,
            ..PartyProfile::default()
        };
        let factors = risk_factors(&profile, 500.0, 14, &quiet_score());
        assert_eq!(factors, vec!["Recipient has 2 fraud complaints".to_string()]);
    }

    #[test]
    fn test_model_only_suppresses_factors_when_clean() {
        let profile = PartyProfile {
            blacklist: true,
            ..PartyProfile::default()
        };

        // Label 0: verdict is clean and factors are withheld even though
        // the blacklist predicate holds.
        let clean = evaluate_model_only(&profile, 60_000.0, 2, &quiet_score());
        assert!(!clean.is_fraud);
        assert!(clean.risk_factors.is_empty());

        let flagged_score = ModelScore {
            label: 1,
            fraud_probability: 0.9,
        };
        let flagged = evaluate_model_only(&profile, 60_000.0, 2, &flagged_score);
        assert!(flagged.is_fraud);
        assert_eq!(flagged.risk_factors[0], "Recipient is on blacklist");
    }

    #[test]
    fn test_hybrid_evaluation_reports_factors_regardless() {
        // The transaction path keeps satisfied factors even on a clean
        // verdict; callers display them as advisories.
        let profile = PartyProfile {
            trust_score: 90.0,
            ..PartyProfile::default()
        };
        let result = evaluate(&profile, 60_000.0, 14, &quiet_score());
        assert!(!result.is_fraud);
        assert_eq!(result.risk_factors, vec!["High transaction amount".to_string()]);
    }
}
