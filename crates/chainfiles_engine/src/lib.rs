//! Chainfiles engine: ledger I/O pipeline and the reconciliation surface.
mod client;
mod engine;
mod fetch;
mod tombstone;
mod types;

pub use client::{ClientSettings, HttpLedgerClient, LedgerClient, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use engine::Reconciler;
pub use fetch::{fetch_feed, FetchSettings};
pub use tombstone::{filter_deleted, TombstoneOutcome};
pub use types::{
    FeedPage, LedgerError, LedgerFailure, ReconcileError, ReconcileOptions, Reconciliation,
};
