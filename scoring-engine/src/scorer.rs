//! End-to-end scoring pipeline
//!
//! One [`ScoringEngine`] serves both call sites: the authenticated
//! transaction path (live store preferred, historical fallback, hybrid
//! policy) and the demo prediction path (historical directory only,
//! rule-free verdict). Both run the same resolver → aggregator → feature
//! builder → classifier pipeline, so the call sites cannot drift apart.

use crate::activity::ActivityAggregator;
use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::features::{FeatureBuilder, FeatureVector};
use crate::policy;
use crate::resolver::ProfileResolver;
use crate::source::{ActivityLookup, ProfileLookup};
use crate::telemetry::TelemetryProvider;
use crate::types::{PartyId, RiskLevel, ScoringResult};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Fraud scoring engine over injected data sources and classifier
pub struct ScoringEngine {
    resolver: ProfileResolver,
    activity: ActivityAggregator,
    features: FeatureBuilder,
    classifier: Arc<dyn Classifier>,
}

impl ScoringEngine {
    /// Engine over the historical directory alone (the demo/prediction
    /// wiring).
    pub fn new(
        historical_profiles: Arc<dyn ProfileLookup>,
        historical_activity: Arc<dyn ActivityLookup>,
        classifier: Arc<dyn Classifier>,
        telemetry: Arc<dyn TelemetryProvider>,
    ) -> Self {
        Self {
            resolver: ProfileResolver::new(historical_profiles),
            activity: ActivityAggregator::new(historical_activity),
            features: FeatureBuilder::new(telemetry),
            classifier,
        }
    }

    /// Attach the live transactional store (the authenticated-transaction
    /// wiring). Live records take precedence on profile resolution and
    /// contribute to the activity signal.
    pub fn with_live_store(
        mut self,
        live_profiles: Arc<dyn ProfileLookup>,
        live_activity: Arc<dyn ActivityLookup>,
    ) -> Self {
        self.resolver = self.resolver.with_live(live_profiles);
        self.activity = self.activity.with_live(live_activity);
        self
    }

    /// Score an authenticated transaction with the full hybrid policy:
    /// deterministic overrides, the 0.30 probability threshold, and the
    /// model's own label.
    pub fn score_transaction(
        &self,
        amount: Decimal,
        receiver: &PartyId,
        hour: u32,
    ) -> Result<ScoringResult> {
        let (features, profile, amount_f64) = self.prepare(amount, receiver, hour)?;
        let score = self.classifier.classify(&features)?;
        let result = policy::evaluate(&profile, amount_f64, hour, &score);

        info!(
            receiver = %receiver,
            is_fraud = result.is_fraud,
            probability = result.fraud_probability,
            factors = result.risk_factors.len(),
            "transaction scored"
        );
        Ok(result)
    }

    /// Rule-free prediction over the same pipeline: the verdict is the
    /// model's label alone, and risk factors are withheld unless the
    /// transaction is flagged.
    pub fn predict_transaction(
        &self,
        amount: Decimal,
        receiver: &PartyId,
        hour: u32,
    ) -> Result<ScoringResult> {
        let (features, profile, amount_f64) = self.prepare(amount, receiver, hour)?;
        let score = self.classifier.classify(&features)?;
        let result = policy::evaluate_model_only(&profile, amount_f64, hour, &score);

        info!(
            receiver = %receiver,
            is_fraud = result.is_fraud,
            probability = result.fraud_probability,
            "prediction scored"
        );
        Ok(result)
    }

    /// Score a caller-assembled feature slice directly. The slice must
    /// hold exactly the classifier's feature count, in wire order; no
    /// factor synthesis happens on this path.
    pub fn score_features(&self, features: &[f64]) -> Result<ScoringResult> {
        let vector = FeatureVector::from_slice(features)?;
        let score = self.classifier.classify(&vector)?;
        Ok(ScoringResult {
            is_fraud: score.label == 1,
            fraud_probability: score.fraud_probability,
            risk_level: RiskLevel::from_probability(score.fraud_probability),
            risk_factors: Vec::new(),
            assessed_at: Utc::now(),
        })
    }

    fn prepare(
        &self,
        amount: Decimal,
        receiver: &PartyId,
        hour: u32,
    ) -> Result<(FeatureVector, crate::types::PartyProfile, f64)> {
        let amount_f64 = validate_request(amount, hour)?;
        let profile = self.resolver.resolve(receiver)?;
        let activity = self.activity.aggregate(receiver)?;

        debug!(
            receiver = %receiver,
            frequency_24h = activity.frequency_24h,
            hours_since_last = activity.hours_since_last,
            "activity aggregated"
        );

        let features = self.features.build(amount_f64, hour, &profile, &activity);
        Ok((features, profile, amount_f64))
    }
}

fn validate_request(amount: Decimal, hour: u32) -> Result<f64> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "amount must be positive, got {amount}"
        )));
    }
    if hour > 23 {
        return Err(Error::Validation(format!(
            "hour must be in 0..=23, got {hour}"
        )));
    }
    amount
        .to_f64()
        .ok_or_else(|| Error::Validation(format!("amount {amount} is not representable")))
}
