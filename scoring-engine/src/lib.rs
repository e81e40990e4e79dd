//! SafePay fraud-risk scoring engine
//!
//! Scores payment transactions by fusing the receiver's risk profile from
//! two sources (a historical batch directory and a live transactional
//! store), building a fixed-order 22-feature vector normalized against
//! training-time ranges, running the trained classifier, and layering
//! deterministic override rules on top of the model's probability.
//!
//! The pipeline is a single synchronous evaluation per transaction. The
//! only cross-request state is the lazily-loaded, read-only classifier
//! handle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod activity;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod normalize;
pub mod policy;
pub mod resolver;
pub mod scorer;
pub mod source;
pub mod telemetry;
pub mod types;

pub use activity::ActivityAggregator;
pub use classifier::{Classifier, LogisticClassifier, LogisticModel, ModelArtifact, ModelScore};
pub use config::{ScoringConfig, TelemetryMode};
pub use error::{Error, Result};
pub use features::{FeatureBuilder, FeatureVector, FEATURE_COUNT};
pub use resolver::ProfileResolver;
pub use scorer::ScoringEngine;
pub use source::{ActivityLookup, ProfileLookup};
pub use telemetry::{FixedTelemetry, RandomTelemetry, TelemetryProvider};
pub use types::*;
