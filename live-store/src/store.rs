//! Live party records and sliding-window transaction tracking

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use scoring_engine::{ActivityLookup, PartyId, PartyProfile, ProfileLookup};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// How long transactions stay in the window log. The per-party
/// `last_seen` marker survives cleanup, so recency queries still work
/// for parties whose last transaction has aged out.
const RETENTION_HOURS: i64 = 48;

const DAYS_PER_YEAR: f64 = 365.0;

/// Transaction record for window tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveTransaction {
    /// Transaction reference
    pub transaction_id: Uuid,
    /// Amount
    pub amount: Decimal,
    /// When the transaction happened
    pub timestamp: DateTime<Utc>,
}

struct PartyEntry {
    profile: PartyProfile,
    created_at: Option<DateTime<Utc>>,
}

struct PartyActivity {
    transactions: Vec<LiveTransaction>,
    last_seen: Option<DateTime<Utc>>,
}

impl PartyActivity {
    fn new() -> Self {
        Self {
            transactions: Vec::new(),
            last_seen: None,
        }
    }

    fn cleanup(&mut self, retention_start: DateTime<Utc>) {
        self.transactions
            .retain(|tx| tx.timestamp >= retention_start);
    }

    fn record(&mut self, transaction: LiveTransaction) {
        self.last_seen = Some(match self.last_seen {
            Some(seen) => seen.max(transaction.timestamp),
            None => transaction.timestamp,
        });
        self.transactions.push(transaction);
    }

    fn count_in_window(&self, window_start: DateTime<Utc>) -> u32 {
        self.transactions
            .iter()
            .filter(|tx| tx.timestamp >= window_start)
            .count() as u32
    }
}

/// In-memory live store: mutable party records plus per-party recent
/// transactions. Safe to share across concurrently scoring requests.
pub struct LiveStore {
    parties: DashMap<String, PartyEntry>,
    activity: DashMap<String, PartyActivity>,
}

impl LiveStore {
    /// Empty store
    pub fn new() -> Self {
        Self {
            parties: DashMap::new(),
            activity: DashMap::new(),
        }
    }

    /// Insert or replace a party's live record. `created_at`, when known,
    /// drives the account-age recomputation on every profile lookup.
    pub fn upsert_party(
        &self,
        party: &PartyId,
        profile: PartyProfile,
        created_at: Option<DateTime<Utc>>,
    ) {
        debug!(party = %party, "live party record upserted");
        self.parties.insert(
            party.as_str().to_string(),
            PartyEntry {
                profile,
                created_at,
            },
        );
    }

    /// Record a transaction involving the party. Entries older than the
    /// retention horizon are dropped on the way in.
    pub fn record_transaction(
        &self,
        party: &PartyId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Uuid {
        let transaction_id = Uuid::new_v4();
        let retention_start = Utc::now() - Duration::hours(RETENTION_HOURS);

        let mut entry = self
            .activity
            .entry(party.as_str().to_string())
            .or_insert_with(PartyActivity::new);
        let activity = entry.value_mut();
        activity.cleanup(retention_start);
        activity.record(LiveTransaction {
            transaction_id,
            amount,
            timestamp,
        });

        transaction_id
    }

    /// Most recent transactions for the party, newest first
    pub fn recent_transactions(&self, party: &PartyId, limit: usize) -> Vec<LiveTransaction> {
        self.activity
            .get(party.as_str())
            .map(|activity| {
                let mut transactions = activity.transactions.clone();
                transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                transactions.truncate(limit);
                transactions
            })
            .unwrap_or_default()
    }

    /// Number of parties with a live record
    pub fn tracked_parties(&self) -> usize {
        self.parties.len()
    }

    /// Drop a party's record and history (manual reset)
    pub fn remove_party(&self, party: &PartyId) {
        self.parties.remove(party.as_str());
        self.activity.remove(party.as_str());
    }

    /// Average amount over the party's retained transactions, 0 with none
    pub fn average_amount(&self, party: &PartyId) -> f64 {
        self.activity
            .get(party.as_str())
            .map(|activity| {
                if activity.transactions.is_empty() {
                    return 0.0;
                }
                let total: f64 = activity
                    .transactions
                    .iter()
                    .map(|tx| tx.amount.to_f64().unwrap_or(0.0))
                    .sum();
                total / activity.transactions.len() as f64
            })
            .unwrap_or(0.0)
    }
}

impl Default for LiveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileLookup for LiveStore {
    fn profile(&self, party: &PartyId) -> scoring_engine::Result<Option<PartyProfile>> {
        Ok(self.parties.get(party.as_str()).map(|entry| {
            let mut profile = entry.profile.clone();
            if let Some(created_at) = entry.created_at {
                let days = (Utc::now() - created_at).num_days();
                profile.account_age_years = (days as f64 / DAYS_PER_YEAR).max(0.0);
            }
            profile
        }))
    }
}

impl ActivityLookup for LiveStore {
    fn transaction_count(&self, party: &PartyId, window: Duration) -> scoring_engine::Result<u32> {
        let window_start = Utc::now() - window;
        Ok(self
            .activity
            .get(party.as_str())
            .map(|activity| activity.count_in_window(window_start))
            .unwrap_or(0))
    }

    fn hours_since_last(&self, party: &PartyId) -> scoring_engine::Result<Option<f64>> {
        let last_seen = self
            .activity
            .get(party.as_str())
            .and_then(|activity| activity.last_seen);

        Ok(last_seen.map(|t| ((Utc::now() - t).num_seconds() as f64 / 3600.0).max(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours_ago(hours: i64) -> DateTime<Utc> {
        Utc::now() - Duration::hours(hours)
    }

    #[test]
    fn test_window_counting() {
        let store = LiveStore::new();
        let party = PartyId::new("busy@safepay");

        store.record_transaction(&party, Decimal::from(100), hours_ago(1));
        store.record_transaction(&party, Decimal::from(200), hours_ago(5));
        store.record_transaction(&party, Decimal::from(300), hours_ago(30));

        let count = store
            .transaction_count(&party, Duration::hours(24))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_recency_survives_retention_cleanup() {
        let store = LiveStore::new();
        let party = PartyId::new("dormant@safepay");

        // Older than the retention horizon: dropped from the window log,
        // but the last-seen marker keeps the recency signal.
        store.record_transaction(&party, Decimal::from(100), hours_ago(72));
        store.record_transaction(&party, Decimal::from(50), hours_ago(71));

        let count = store
            .transaction_count(&party, Duration::hours(24))
            .unwrap();
        assert_eq!(count, 0);

        let hours = store.hours_since_last(&party).unwrap().unwrap();
        assert!((70.5..71.5).contains(&hours));
    }

    #[test]
    fn test_unknown_party_has_no_signal() {
        let store = LiveStore::new();
        let party = PartyId::new("ghost@safepay");

        assert!(store.profile(&party).unwrap().is_none());
        assert!(store.hours_since_last(&party).unwrap().is_none());
        assert_eq!(
            store.transaction_count(&party, Duration::hours(24)).unwrap(),
            0
        );
    }

    #[test]
    fn test_profile_age_recomputes_from_created_at() {
        let store = LiveStore::new();
        let party = PartyId::new("newbie@safepay");

        let created_at = Utc::now() - Duration::days(73); // ~0.2 years
        store.upsert_party(&party, PartyProfile::default(), Some(created_at));

        let profile = store.profile(&party).unwrap().unwrap();
        assert!((0.19..0.21).contains(&profile.account_age_years));
    }

    #[test]
    fn test_upsert_replaces_record() {
        let store = LiveStore::new();
        let party = PartyId::new("party@safepay");

        store.upsert_party(&party, PartyProfile::default(), None);
        let updated = PartyProfile {
            blacklist: true,
            ..PartyProfile::default()
        };
        store.upsert_party(&party, updated, None);

        assert_eq!(store.tracked_parties(), 1);
        assert!(store.profile(&party).unwrap().unwrap().blacklist);
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let store = LiveStore::new();
        let party = PartyId::new("busy@safepay");

        store.record_transaction(&party, Decimal::from(100), hours_ago(5));
        store.record_transaction(&party, Decimal::from(200), hours_ago(1));
        store.record_transaction(&party, Decimal::from(300), hours_ago(3));

        let recent = store.recent_transactions(&party, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount, Decimal::from(200));
        assert_eq!(recent[1].amount, Decimal::from(300));

        assert_eq!(store.average_amount(&party), 200.0);
    }

    #[test]
    fn test_remove_party() {
        let store = LiveStore::new();
        let party = PartyId::new("gone@safepay");

        store.upsert_party(&party, PartyProfile::default(), None);
        store.record_transaction(&party, Decimal::from(100), Utc::now());
        store.remove_party(&party);

        assert_eq!(store.tracked_parties(), 0);
        assert!(store.hours_since_last(&party).unwrap().is_none());
    }
}
