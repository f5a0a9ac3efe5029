//! Chainfiles core: pure record normalization, merging, and projection.
//!
//! Everything in this crate is synchronous and deterministic; ledger I/O
//! lives in `chainfiles_engine`.
mod merge;
mod metadata;
mod project;
mod record;

pub use merge::merge;
pub use metadata::{normalize, AccessType, MetadataBlob, MetadataError, NormalizedMetadata};
pub use project::{project, FilterOp, FilterSpec, SortDirection, SortSpec};
pub use record::{FeedKind, FeedRecords, FileEntry, RawRecord};
