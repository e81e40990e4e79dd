//! End-to-end pipeline tests over the real collaborators: the CSV-loaded
//! historical directory, the in-memory live store, and a disk-loaded
//! classifier artifact.

use chrono::{Duration, Utc};
use live_store::LiveStore;
use party_directory::PartyDirectory;
use rust_decimal::Decimal;
use scoring_engine::{
    ActivityLookup, Error, FixedTelemetry, LogisticClassifier, LogisticModel, ModelArtifact,
    PartyId, PartyProfile, ScoringEngine, FEATURE_COUNT,
};
use std::sync::Arc;

const USERS_CSV: &str = "\
upi_id,display_name,verification_status,risk_category,account_age_months,social_trust_score,blacklist_status,past_fraud_flags,fraud_complaints_count,geo_location_flag,merchant_category_mismatch
amit.sharma@safepay,Amit Sharma,verified,safe,36,90,0,0,0,normal,0
scam.artist@safepay,Scam Artist,suspicious,high,1,5,1,5,10,unusual,0
";

fn test_artifact() -> ModelArtifact {
    let mut weights = vec![0.0; FEATURE_COUNT];
    weights[2] = 6.0; // blacklist
    weights[17] = 2.0; // amount > 50k
    ModelArtifact {
        version: "pipeline-test".to_string(),
        weights,
        intercept: -3.0,
    }
}

fn classifier() -> Arc<LogisticClassifier> {
    let model = LogisticModel::from_artifact(test_artifact()).unwrap();
    Arc::new(LogisticClassifier::with_model(model))
}

fn directory() -> Arc<PartyDirectory> {
    let directory = PartyDirectory::new();
    directory
        .load_parties_from_reader(USERS_CSV.as_bytes())
        .unwrap();
    Arc::new(directory)
}

fn engine(directory: Arc<PartyDirectory>) -> ScoringEngine {
    ScoringEngine::new(
        directory.clone(),
        directory,
        classifier(),
        Arc::new(FixedTelemetry::neutral()),
    )
}

#[test]
fn test_safe_transaction_is_authorized() {
    let engine = engine(directory());
    let receiver = PartyId::new("amit.sharma@safepay");

    let result = engine
        .score_transaction(Decimal::from(500), &receiver, 14)
        .unwrap();

    assert!(!result.is_fraud);
    assert!(result.fraud_probability < 0.30);
    assert!(result.risk_factors.is_empty());
}

#[test]
fn test_blacklisted_party_is_blocked_end_to_end() {
    let engine = engine(directory());
    let receiver = PartyId::new("scam.artist@safepay");

    let result = engine
        .score_transaction(Decimal::from(60_000), &receiver, 2)
        .unwrap();

    assert!(result.is_fraud);
    assert_eq!(result.risk_factors[0], "Recipient is on blacklist");
    assert!(result
        .risk_factors
        .iter()
        .any(|f| f == "High transaction amount"));
    assert!(result
        .risk_factors
        .iter()
        .any(|f| f == "Transaction at high-risk hours"));
}

#[test]
fn test_predict_variant_agrees_and_explains_when_flagged() {
    let engine = engine(directory());
    let receiver = PartyId::new("scam.artist@safepay");

    let scored = engine
        .score_transaction(Decimal::from(60_000), &receiver, 2)
        .unwrap();
    let predicted = engine
        .predict_transaction(Decimal::from(60_000), &receiver, 2)
        .unwrap();

    // Same sources, same pinned telemetry: the two call sites agree.
    assert_eq!(scored.fraud_probability, predicted.fraud_probability);
    assert!(predicted.is_fraud);
    assert_eq!(predicted.risk_factors[0], "Recipient is on blacklist");
}

#[test]
fn test_predict_variant_suppresses_factors_when_clean() {
    let engine = engine(directory());
    let receiver = PartyId::new("amit.sharma@safepay");

    // Late-night high-value transfer to a clean recipient: the high-amount
    // and high-risk-hour predicates hold, but the rule-free variant stays
    // silent unless the model flags.
    let predicted = engine
        .predict_transaction(Decimal::from(60_000), &receiver, 2)
        .unwrap();
    assert!(!predicted.is_fraud);
    assert!(predicted.risk_factors.is_empty());

    // The hybrid path reports the same satisfied predicates as advisories.
    let scored = engine
        .score_transaction(Decimal::from(60_000), &receiver, 2)
        .unwrap();
    assert!(scored
        .risk_factors
        .iter()
        .any(|f| f == "High transaction amount"));
}

#[test]
fn test_live_record_overrides_directory() {
    let directory = directory();
    let live = Arc::new(LiveStore::new());
    let receiver = PartyId::new("amit.sharma@safepay");

    // The directory says clean; the live store has since blacklisted the
    // party. Live wins.
    live.upsert_party(
        &receiver,
        PartyProfile {
            blacklist: true,
            ..PartyProfile::default()
        },
        None,
    );

    let engine = engine(directory).with_live_store(live.clone(), live);
    let result = engine
        .score_transaction(Decimal::from(500), &receiver, 14)
        .unwrap();

    assert!(result.is_fraud);
    assert_eq!(result.risk_factors[0], "Recipient is on blacklist");
}

#[test]
fn test_live_activity_contributes_to_frequency() {
    let directory = directory();
    let live = Arc::new(LiveStore::new());
    let receiver = PartyId::new("amit.sharma@safepay");

    for _ in 0..3 {
        live.record_transaction(&receiver, Decimal::from(100), Utc::now() - Duration::hours(1));
    }

    let engine = engine(directory).with_live_store(live.clone(), live.clone());
    let result = engine
        .score_transaction(Decimal::from(500), &receiver, 14)
        .unwrap();

    // Frequency alone should not flag a clean recipient with these
    // coefficients, but the pipeline must consume the live signal without
    // error.
    assert!(!result.is_fraud);
    assert_eq!(
        live.transaction_count(&receiver, Duration::hours(24)).unwrap(),
        3
    );
}

#[test]
fn test_unknown_receiver_is_not_found() {
    let engine = engine(directory());
    let receiver = PartyId::new("ghost@safepay");

    let err = engine
        .score_transaction(Decimal::from(500), &receiver, 14)
        .unwrap_err();
    assert!(matches!(err, Error::PartyNotFound(_)));
}

#[test]
fn test_classifier_loads_artifact_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fraud_model.bin");
    std::fs::write(&path, bincode::serialize(&test_artifact()).unwrap()).unwrap();

    let directory = directory();
    let engine = ScoringEngine::new(
        directory.clone(),
        directory,
        Arc::new(LogisticClassifier::open(&path)),
        Arc::new(FixedTelemetry::neutral()),
    );

    let result = engine
        .score_transaction(Decimal::from(500), &PartyId::new("amit.sharma@safepay"), 14)
        .unwrap();
    assert!(!result.is_fraud);
}

#[test]
fn test_missing_artifact_is_fatal_per_call() {
    let directory = directory();
    let engine = ScoringEngine::new(
        directory.clone(),
        directory,
        Arc::new(LogisticClassifier::open("/nonexistent/fraud_model.bin")),
        Arc::new(FixedTelemetry::neutral()),
    );

    let err = engine
        .score_transaction(Decimal::from(500), &PartyId::new("amit.sharma@safepay"), 14)
        .unwrap_err();
    assert!(matches!(err, Error::ModelUnavailable(_)));
}
