use std::sync::Arc;

use chainfiles_core::{merge, project, FeedKind};
use engine_logging::engine_info;
use futures_util::future::try_join;

use crate::client::LedgerClient;
use crate::fetch::fetch_feed;
use crate::tombstone::filter_deleted;
use crate::types::{ReconcileError, ReconcileOptions, Reconciliation};

/// Engine surface: reconciles one address's view of its file index.
pub struct Reconciler {
    client: Arc<dyn LedgerClient>,
}

impl Reconciler {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self { client }
    }

    /// Run one full reconciliation: fetch both feeds concurrently, merge and
    /// deduplicate, drop tombstoned entries, then apply the caller's
    /// filter/sort projections.
    ///
    /// All state is local to the call; concurrent reconciliations for
    /// different addresses do not interact.
    pub async fn reconcile(
        &self,
        address: &str,
        options: &ReconcileOptions,
    ) -> Result<Reconciliation, ReconcileError> {
        let address = address.to_lowercase();

        // The two feed loops share nothing and join only once both resolve;
        // merge precedence keeps the result independent of completion order.
        let (owner, minter) = try_join(
            fetch_feed(
                self.client.as_ref(),
                FeedKind::Owner,
                &address,
                &options.fetch,
            ),
            fetch_feed(
                self.client.as_ref(),
                FeedKind::Minter,
                &address,
                &options.fetch,
            ),
        )
        .await?;

        let merged = merge(&owner, &minter)?;
        engine_info!("merged {} entries for {address}", merged.len());

        let (entries, tombstones) = filter_deleted(self.client.as_ref(), merged).await;
        let entries = project(entries, options.filter_by.as_ref(), options.sort_by.as_ref());

        Ok(Reconciliation {
            entries,
            tombstones,
        })
    }
}
