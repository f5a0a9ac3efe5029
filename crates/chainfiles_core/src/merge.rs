use std::collections::HashSet;

use crate::metadata::{normalize, MetadataError};
use crate::record::{FeedRecords, FileEntry};

/// Merge the two feeds' records into one deduplicated, ordered entry list.
///
/// Identifiers are lowercased before use as keys. Duplicates resolve by
/// first-seen precedence over the four logical streams in fixed order:
/// (owner, deployed), (owner, granted), (minter, deployed), (minter,
/// granted). Precedence is defined by stream identity, never by which feed
/// fetch happened to complete first, so the result is deterministic.
pub fn merge(owner: &FeedRecords, minter: &FeedRecords) -> Result<Vec<FileEntry>, MetadataError> {
    // Pass 1: union of access-granted identifiers across both feeds.
    let granted: HashSet<String> = owner
        .granted
        .iter()
        .chain(minter.granted.iter())
        .map(|record| record.identifier.to_lowercase())
        .collect();

    // Pass 2: insert first-seen-wins, gating each candidate on its metadata.
    let streams = [
        &owner.deployed,
        &owner.granted,
        &minter.deployed,
        &minter.granted,
    ];

    let mut seen: HashSet<String> = HashSet::new();
    let mut entries: Vec<FileEntry> = Vec::new();
    for stream in streams {
        for record in stream {
            let identifier = record.identifier.to_lowercase();
            if seen.contains(&identifier) {
                continue;
            }
            let metadata = normalize(&identifier, &record.metadata_blob)?;
            if !metadata.is_listable() {
                // A gated-out record never occupies a slot, so a later
                // stream's copy of the identifier is still considered.
                continue;
            }
            seen.insert(identifier.clone());
            entries.push(FileEntry {
                access_granted: granted.contains(&identifier),
                identifier,
                contract_address: record.contract_address.clone(),
                owner: record.holder_address.clone(),
                metadata,
            });
        }
    }

    Ok(entries)
}
