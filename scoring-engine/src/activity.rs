//! Time-windowed behavioral signal aggregation

use crate::error::Result;
use crate::source::ActivityLookup;
use crate::types::{ActivitySignal, PartyId};
use chrono::Duration;
use std::sync::Arc;

/// Width of the transaction-frequency window, in hours
pub const ACTIVITY_WINDOW_HOURS: i64 = 24;

/// Recency assumed when neither source has any history for the party.
/// Calibrated as "moderately inactive" rather than "brand new" so absent
/// data is not over-penalized.
pub const DEFAULT_HOURS_SINCE_LAST: f64 = 24.0;

/// Combines behavioral signals from the historical directory and the live
/// store. Frequencies sum (the stores hold disjoint transaction sets
/// partitioned by time); recency takes the more conservative, smaller
/// value.
pub struct ActivityAggregator {
    historical: Arc<dyn ActivityLookup>,
    live: Option<Arc<dyn ActivityLookup>>,
}

impl ActivityAggregator {
    /// Aggregator over the historical source alone
    pub fn new(historical: Arc<dyn ActivityLookup>) -> Self {
        Self {
            historical,
            live: None,
        }
    }

    /// Attach the live source
    pub fn with_live(mut self, live: Arc<dyn ActivityLookup>) -> Self {
        self.live = Some(live);
        self
    }

    /// Compute the party's activity signal across both sources.
    pub fn aggregate(&self, party: &PartyId) -> Result<ActivitySignal> {
        let window = Duration::hours(ACTIVITY_WINDOW_HOURS);

        let mut frequency = self.historical.transaction_count(party, window)?;
        let mut hours_since = self.historical.hours_since_last(party)?;

        if let Some(live) = &self.live {
            frequency = frequency.saturating_add(live.transaction_count(party, window)?);
            hours_since = match (hours_since, live.hours_since_last(party)?) {
                (Some(historical), Some(live)) => Some(historical.min(live)),
                (Some(historical), None) => Some(historical),
                (None, live) => live,
            };
        }

        Ok(ActivitySignal {
            frequency_24h: frequency,
            hours_since_last: hours_since.unwrap_or(DEFAULT_HOURS_SINCE_LAST),
        })
    }
}
