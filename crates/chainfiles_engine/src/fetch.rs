use std::time::Duration;

use chainfiles_core::{FeedKind, FeedRecords};
use engine_logging::{engine_debug, engine_warn};
use tokio::time::sleep;

use crate::client::{LedgerClient, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::types::{FeedPage, LedgerError, LedgerFailure};

/// Pagination and retry knobs for one feed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub page_size: u32,
    /// Page budget; `None` paginates to end of data.
    pub max_pages: Option<u32>,
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_pages: None,
            max_retries: 5,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl FetchSettings {
    fn clamped_page_size(&self) -> u32 {
        self.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

/// Drain one feed for `address`: pages are fetched sequentially because each
/// continuation depends on whether the previous page filled up. Stops at the
/// first short page of the feed's primary record kind, or at the page
/// budget, whichever comes first.
pub async fn fetch_feed(
    client: &dyn LedgerClient,
    feed: FeedKind,
    address: &str,
    settings: &FetchSettings,
) -> Result<FeedRecords, LedgerError> {
    let page_size = settings.clamped_page_size();
    let mut records = FeedRecords::default();
    let mut skip = 0u32;
    let mut pages = 0u32;

    loop {
        let page =
            fetch_page_with_backoff(client, feed, address, skip, page_size, settings).await?;
        if !page.deleted.is_empty() {
            engine_debug!(
                "{} feed page at skip {} carried {} tombstone records",
                feed.as_str(),
                skip,
                page.deleted.len()
            );
        }

        // Termination tracks the feed's primary record kind: the owner feed
        // pages over deployed records, the minter feed over granted ones.
        let primary_len = match feed {
            FeedKind::Owner => page.deployed.len(),
            FeedKind::Minter => page.granted.len(),
        } as u32;

        records.deployed.extend(page.deployed);
        records.granted.extend(page.granted);
        pages += 1;

        if primary_len < page_size {
            break;
        }
        if settings.max_pages.is_some_and(|max| pages >= max) {
            engine_debug!("{} feed stopped at page budget {}", feed.as_str(), pages);
            break;
        }
        skip += page_size;
    }

    engine_debug!(
        "{} feed complete: {} deployed, {} granted across {} pages",
        feed.as_str(),
        records.deployed.len(),
        records.granted.len(),
        pages
    );
    Ok(records)
}

/// Retry a single page while the service rate-limits, with the delay scaled
/// by attempt number and capped. Every other failure propagates immediately.
async fn fetch_page_with_backoff(
    client: &dyn LedgerClient,
    feed: FeedKind,
    address: &str,
    skip: u32,
    first: u32,
    settings: &FetchSettings,
) -> Result<FeedPage, LedgerError> {
    let mut attempt = 0u32;
    loop {
        match client.fetch_page(feed, address, skip, first).await {
            Ok(page) => return Ok(page),
            Err(err) if err.is_rate_limit() => {
                attempt += 1;
                if attempt > settings.max_retries {
                    return Err(LedgerError::new(
                        LedgerFailure::RetriesExhausted {
                            attempts: settings.max_retries,
                        },
                        format!("{} feed page at skip {skip}", feed.as_str()),
                    ));
                }
                let delay = (settings.base_backoff * attempt).min(settings.max_backoff);
                engine_warn!(
                    "rate limited on {} feed page at skip {}, retry {}/{} in {:?}",
                    feed.as_str(),
                    skip,
                    attempt,
                    settings.max_retries,
                    delay
                );
                sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
