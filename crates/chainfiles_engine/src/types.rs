use std::fmt;

use chainfiles_core::{FileEntry, FilterSpec, MetadataError, RawRecord, SortSpec};
use thiserror::Error;

use crate::fetch::FetchSettings;
use crate::tombstone::TombstoneOutcome;

/// One page of ledger records for a feed query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPage {
    pub deployed: Vec<RawRecord>,
    pub granted: Vec<RawRecord>,
    /// Deletion identifiers the combined owner/deletion query emits. Only
    /// the batch existence check removes entries, so these are informational.
    pub deleted: Vec<String>,
}

/// Failure of one ledger query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerError {
    pub kind: LedgerFailure,
    pub message: String,
}

impl LedgerError {
    pub(crate) fn new(kind: LedgerFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether the failure is worth retrying with backoff.
    pub fn is_rate_limit(&self) -> bool {
        self.kind == LedgerFailure::RateLimited
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for LedgerError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerFailure {
    InvalidUrl,
    /// Non-2xx status other than 429; never retried.
    HttpStatus(u16),
    /// HTTP 429; retried with bounded exponential backoff.
    RateLimited,
    Timeout,
    Network,
    /// The service answered 2xx with a body that does not decode.
    MalformedPayload,
    /// The rate-limit retry budget for one page ran out.
    RetriesExhausted { attempts: u32 },
}

impl fmt::Display for LedgerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerFailure::InvalidUrl => write!(f, "invalid url"),
            LedgerFailure::HttpStatus(code) => write!(f, "http status {code}"),
            LedgerFailure::RateLimited => write!(f, "rate limited"),
            LedgerFailure::Timeout => write!(f, "timeout"),
            LedgerFailure::Network => write!(f, "network error"),
            LedgerFailure::MalformedPayload => write!(f, "malformed payload"),
            LedgerFailure::RetriesExhausted { attempts } => {
                write!(f, "rate limited, retries exhausted after {attempts} attempts")
            }
        }
    }
}

/// Terminal error of one reconciliation, naming the stage that failed. The
/// tombstone check is the only stage without a variant here: it degrades
/// instead of failing the call.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("ledger fetch failed: {0}")]
    Fetch(#[from] LedgerError),
    #[error("metadata normalization failed: {0}")]
    Metadata(#[from] MetadataError),
}

/// Caller-facing knobs for one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub filter_by: Option<FilterSpec>,
    pub sort_by: Option<SortSpec>,
    pub fetch: FetchSettings,
}

/// The engine's output: the surviving entries in merge order (or the
/// caller's sort order) plus which path the tombstone filter took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub entries: Vec<FileEntry>,
    pub tombstones: TombstoneOutcome,
}
