use crate::metadata::NormalizedMetadata;

/// The two paginated ledgers a reconciliation queries for one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Files the address registered itself.
    Owner,
    /// Files the address was granted access to by another party.
    Minter,
}

impl FeedKind {
    /// Stable lowercase label used in queries and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedKind::Owner => "owner",
            FeedKind::Minter => "minter",
        }
    }
}

/// One raw ledger record, as returned by a feed page.
///
/// Deployed records carry the registering owner's address and access-granted
/// records the grantee's; both land in `holder_address` here, the record kind
/// is tracked by which `FeedRecords` list the record sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub identifier: String,
    pub contract_address: String,
    pub holder_address: String,
    /// Embedded metadata blob, kept verbatim until normalization.
    pub metadata_blob: String,
}

/// Everything one feed returned across all of its pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedRecords {
    pub deployed: Vec<RawRecord>,
    pub granted: Vec<RawRecord>,
}

impl FeedRecords {
    pub fn is_empty(&self) -> bool {
        self.deployed.is_empty() && self.granted.is_empty()
    }
}

/// Canonical merged unit: at most one per lowercased identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Lowercased identifier, the primary key of the reconciled index.
    pub identifier: String,
    pub contract_address: String,
    pub owner: String,
    pub metadata: NormalizedMetadata,
    /// True iff the identifier appears in either feed's access-granted
    /// stream, independent of which record supplied the other fields.
    pub access_granted: bool,
}
