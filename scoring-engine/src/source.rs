//! Capability traits for the engine's data collaborators
//!
//! The engine never talks to a store directly; both the historical batch
//! directory and the live transactional store are injected behind these
//! traits. All lookups are pure reads.

use crate::error::Result;
use crate::types::{PartyId, PartyProfile};
use chrono::Duration;

/// Read-only profile lookup
pub trait ProfileLookup: Send + Sync {
    /// Fetch the party's risk profile, or `None` when this source has no
    /// record of the party.
    fn profile(&self, party: &PartyId) -> Result<Option<PartyProfile>>;
}

/// Read-only behavioral activity lookup
pub trait ActivityLookup: Send + Sync {
    /// Number of transactions involving the party within the trailing
    /// window.
    fn transaction_count(&self, party: &PartyId, window: Duration) -> Result<u32>;

    /// Hours since the party's most recent transaction, or `None` when
    /// this source has no history for the party.
    fn hours_since_last(&self, party: &PartyId) -> Result<Option<f64>>;
}
