use chainfiles_core::FileEntry;
use engine_logging::{engine_debug, engine_warn};

use crate::client::LedgerClient;

/// Which path the tombstone filter took, so callers can tell a filtered
/// result from one where filtering was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TombstoneOutcome {
    /// The existence check ran; `removed` entries were confirmed deleted.
    Applied { removed: usize },
    /// The existence check failed; the full set was kept.
    Skipped { reason: String },
}

/// Drop entries the ledger confirms deleted, via one unchunked batch check.
/// A failing check keeps the full set: correctness is traded for
/// availability, a listing must never fail at this stage.
pub async fn filter_deleted(
    client: &dyn LedgerClient,
    entries: Vec<FileEntry>,
) -> (Vec<FileEntry>, TombstoneOutcome) {
    if entries.is_empty() {
        return (entries, TombstoneOutcome::Applied { removed: 0 });
    }

    let identifiers: Vec<String> = entries
        .iter()
        .map(|entry| entry.identifier.clone())
        .collect();
    let deleted = match client.check_deleted(&identifiers).await {
        Ok(flags) => flags,
        Err(err) => {
            engine_warn!(
                "tombstone check failed, keeping all {} entries: {}",
                entries.len(),
                err
            );
            return (
                entries,
                TombstoneOutcome::Skipped {
                    reason: err.to_string(),
                },
            );
        }
    };

    let before = entries.len();
    let entries: Vec<FileEntry> = entries
        .into_iter()
        .filter(|entry| !deleted.get(&entry.identifier).copied().unwrap_or(false))
        .collect();
    let removed = before - entries.len();
    if removed > 0 {
        engine_debug!("removed {removed} tombstoned entries");
    }
    (entries, TombstoneOutcome::Applied { removed })
}
