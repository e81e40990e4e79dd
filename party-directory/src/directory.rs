//! In-memory directory over the CSV exports

use crate::error::Result;
use crate::record::{PartyRecord, TransactionRecord};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use scoring_engine::{ActivityLookup, PartyId, PartyProfile, ProfileLookup};
use std::io::Read;
use std::path::Path;
use std::sync::RwLock;
use tracing::info;

/// How many parties the demo-recipient sample returns
const DEMO_RECIPIENT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy)]
struct ActivityEntry {
    timestamp: DateTime<Utc>,
    amount: f64,
}

/// Condensed party row for search results and listings
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartySummary {
    /// Payment address
    pub upi_id: String,
    /// Display name
    pub display_name: String,
    /// Verification status label
    pub verification_status: Option<String>,
    /// Risk category label
    pub risk_category: Option<String>,
}

impl From<&PartyRecord> for PartySummary {
    fn from(record: &PartyRecord) -> Self {
        Self {
            upi_id: record.upi_id.clone(),
            display_name: record.display_name.clone(),
            verification_status: record.verification_status.clone(),
            risk_category: record.risk_category.clone(),
        }
    }
}

/// Aggregate historical statistics for one party
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct PartyStats {
    /// Historical transactions involving the party
    pub tx_count: usize,
    /// Mean transaction amount, 0 with no history
    pub avg_amount: f64,
}

/// The historical batch directory: party records plus a historical
/// transaction log, loaded once and read-only afterwards.
pub struct PartyDirectory {
    parties: DashMap<String, PartyRecord>,
    // Insertion order, for deterministic sampling
    roster: RwLock<Vec<String>>,
    activity: DashMap<String, Vec<ActivityEntry>>,
}

impl PartyDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self {
            parties: DashMap::new(),
            roster: RwLock::new(Vec::new()),
            activity: DashMap::new(),
        }
    }

    /// Load party records into the directory
    pub fn load_parties(&self, records: Vec<PartyRecord>) {
        let mut roster = self.roster.write().expect("party roster lock poisoned");
        for record in records {
            let id = record.upi_id.clone();
            if self.parties.insert(id.clone(), record).is_none() {
                roster.push(id);
            }
        }
        info!("Directory holds {} parties", roster.len());
    }

    /// Load historical transactions, indexed under both counterparties
    pub fn load_transactions(&self, records: Vec<TransactionRecord>) -> Result<usize> {
        let mut loaded = 0;
        for record in records {
            let entry = ActivityEntry {
                timestamp: record.parsed_timestamp()?,
                amount: record.amount,
            };
            self.activity
                .entry(record.sender_upi_id.clone())
                .or_default()
                .push(entry);
            self.activity
                .entry(record.receiver_upi_id.clone())
                .or_default()
                .push(entry);
            loaded += 1;
        }
        info!("Directory holds history for {} parties", self.activity.len());
        Ok(loaded)
    }

    /// Decode party rows from a CSV reader and load them
    pub fn load_parties_from_reader<R: Read>(&self, reader: R) -> Result<usize> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let records: Vec<PartyRecord> = csv_reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()?;
        let count = records.len();
        self.load_parties(records);
        Ok(count)
    }

    /// Decode transaction rows from a CSV reader and load them
    pub fn load_transactions_from_reader<R: Read>(&self, reader: R) -> Result<usize> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let records: Vec<TransactionRecord> = csv_reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()?;
        self.load_transactions(records)
    }

    /// Load the users export from disk
    pub fn load_parties_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let count = self.load_parties_from_reader(file)?;
        info!("Loaded {} parties from {}", count, path.display());
        Ok(count)
    }

    /// Load the transactions export from disk
    pub fn load_transactions_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let count = self.load_transactions_from_reader(file)?;
        info!("Loaded {} transactions from {}", count, path.display());
        Ok(count)
    }

    /// Fetch one party's directory record
    pub fn find(&self, upi_id: &str) -> Option<PartyRecord> {
        self.parties.get(upi_id).map(|r| r.value().clone())
    }

    /// Case-insensitive substring search over identifier and display name
    pub fn search(&self, query: &str, limit: usize) -> Vec<PartySummary> {
        if query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();
        let roster = self.roster.read().expect("party roster lock poisoned");

        roster
            .iter()
            .filter_map(|id| self.parties.get(id))
            .filter(|record| {
                record.upi_id.to_lowercase().contains(&query)
                    || record.display_name.to_lowercase().contains(&query)
            })
            .take(limit)
            .map(|record| PartySummary::from(record.value()))
            .collect()
    }

    /// Curated sample for the demo: two high-risk parties, one medium,
    /// two safe, padded with whatever remains when a category runs short.
    pub fn demo_recipients(&self) -> Vec<PartySummary> {
        let roster = self.roster.read().expect("party roster lock poisoned");

        let mut picked: Vec<PartySummary> = Vec::new();
        let pick = |category: &str, want: usize, picked: &mut Vec<PartySummary>| {
            let mut taken = 0;
            for id in roster.iter() {
                if taken == want {
                    break;
                }
                if let Some(record) = self.parties.get(id) {
                    if record.risk_category.as_deref() == Some(category)
                        && !picked.iter().any(|p| p.upi_id == record.upi_id)
                    {
                        picked.push(PartySummary::from(record.value()));
                        taken += 1;
                    }
                }
            }
        };

        pick("high", 2, &mut picked);
        pick("medium", 1, &mut picked);
        pick("safe", 2, &mut picked);

        // Pad from the roster when the categories run short.
        for id in roster.iter() {
            if picked.len() >= DEMO_RECIPIENT_COUNT {
                break;
            }
            if let Some(record) = self.parties.get(id) {
                if !picked.iter().any(|p| p.upi_id == record.upi_id) {
                    picked.push(PartySummary::from(record.value()));
                }
            }
        }

        picked
    }

    /// All parties, in load order
    pub fn all_parties(&self) -> Vec<PartySummary> {
        let roster = self.roster.read().expect("party roster lock poisoned");
        roster
            .iter()
            .filter_map(|id| self.parties.get(id))
            .map(|record| PartySummary::from(record.value()))
            .collect()
    }

    /// Aggregate historical statistics for one party
    pub fn party_stats(&self, upi_id: &str) -> PartyStats {
        match self.activity.get(upi_id) {
            Some(entries) if !entries.is_empty() => {
                let total: f64 = entries.iter().map(|e| e.amount).sum();
                PartyStats {
                    tx_count: entries.len(),
                    avg_amount: total / entries.len() as f64,
                }
            }
            _ => PartyStats {
                tx_count: 0,
                avg_amount: 0.0,
            },
        }
    }

    /// Number of loaded parties
    pub fn total_parties(&self) -> usize {
        self.parties.len()
    }
}

impl Default for PartyDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileLookup for PartyDirectory {
    fn profile(&self, party: &PartyId) -> scoring_engine::Result<Option<PartyProfile>> {
        Ok(self.find(party.as_str()).map(|record| record.to_profile()))
    }
}

impl ActivityLookup for PartyDirectory {
    fn transaction_count(&self, party: &PartyId, window: Duration) -> scoring_engine::Result<u32> {
        let cutoff = Utc::now() - window;
        let count = self
            .activity
            .get(party.as_str())
            .map(|entries| entries.iter().filter(|e| e.timestamp >= cutoff).count())
            .unwrap_or(0);
        Ok(count as u32)
    }

    fn hours_since_last(&self, party: &PartyId) -> scoring_engine::Result<Option<f64>> {
        let last = self
            .activity
            .get(party.as_str())
            .and_then(|entries| entries.iter().map(|e| e.timestamp).max());

        Ok(last.map(|t| ((Utc::now() - t).num_seconds() as f64 / 3600.0).max(0.0)))
    }
}
