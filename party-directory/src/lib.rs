//! Historical party directory for SafePay
//!
//! The batch half of the engine's two-source fusion: party risk records
//! and a historical transaction log, exported as CSV and loaded once into
//! an in-memory directory. The directory is read-only after load and safe
//! to share across concurrently scoring requests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod directory;
pub mod error;
pub mod record;

pub use directory::{PartyDirectory, PartyStats, PartySummary};
pub use error::{DirectoryError, Result};
pub use record::{PartyRecord, TransactionRecord};
