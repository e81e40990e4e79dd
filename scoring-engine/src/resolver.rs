//! Profile resolution across the live and historical sources

use crate::error::{Error, Result};
use crate::source::ProfileLookup;
use crate::types::{PartyId, PartyProfile};
use std::sync::Arc;

/// Produces one canonical [`PartyProfile`] per party from up to two
/// sources. A live record wins over the historical record on every field;
/// there is no field-level merge.
pub struct ProfileResolver {
    historical: Arc<dyn ProfileLookup>,
    live: Option<Arc<dyn ProfileLookup>>,
}

impl ProfileResolver {
    /// Resolver over the historical source alone
    pub fn new(historical: Arc<dyn ProfileLookup>) -> Self {
        Self {
            historical,
            live: None,
        }
    }

    /// Attach the live source, which takes precedence on every lookup
    pub fn with_live(mut self, live: Arc<dyn ProfileLookup>) -> Self {
        self.live = Some(live);
        self
    }

    /// Resolve the party's profile, or fail with
    /// [`Error::PartyNotFound`] when no source has a record.
    pub fn resolve(&self, party: &PartyId) -> Result<PartyProfile> {
        if let Some(live) = &self.live {
            if let Some(profile) = live.profile(party)? {
                return Ok(profile);
            }
        }

        if let Some(profile) = self.historical.profile(party)? {
            return Ok(profile);
        }

        Err(Error::PartyNotFound(party.to_string()))
    }
}
