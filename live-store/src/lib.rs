//! In-memory live transactional store for SafePay
//!
//! The live half of the engine's two-source fusion: mutable party risk
//! records and a per-party log of recent transactions. This is a
//! reference implementation of the live-store collaborator. Durable
//! ledger persistence lives elsewhere; this crate exists so the
//! authenticated-transaction call site is real and testable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod store;

pub use store::{LiveStore, LiveTransaction};
