use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chainfiles_core::{FeedKind, RawRecord};
use serde::Deserialize;
use url::Url;

use crate::types::{FeedPage, LedgerError, LedgerFailure};

/// Bounds the ledger service enforces on the `first` page-size parameter.
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientSettings {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Read-only surface of the Ledger Query Service the engine consumes.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// One page of records for `address` on `feed`, starting at offset
    /// `skip` and carrying at most `first` records per kind.
    async fn fetch_page(
        &self,
        feed: FeedKind,
        address: &str,
        skip: u32,
        first: u32,
    ) -> Result<FeedPage, LedgerError>;

    /// Batch existence check: identifier to confirmed-deleted flag.
    async fn check_deleted(
        &self,
        identifiers: &[String],
    ) -> Result<HashMap<String, bool>, LedgerError>;
}

/// `LedgerClient` over HTTP via reqwest.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpLedgerClient {
    pub fn new(settings: ClientSettings) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| LedgerError::new(LedgerFailure::Network, err.to_string()))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint,
        })
    }

    fn route(&self, path: &str) -> Result<Url, LedgerError> {
        self.endpoint
            .join(path)
            .map_err(|err| LedgerError::new(LedgerFailure::InvalidUrl, err.to_string()))
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn fetch_page(
        &self,
        feed: FeedKind,
        address: &str,
        skip: u32,
        first: u32,
    ) -> Result<FeedPage, LedgerError> {
        let first = first.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        let skip = skip.to_string();
        let first = first.to_string();
        let response = self
            .client
            .get(self.route("files")?)
            .query(&[
                ("feed", feed.as_str()),
                ("address", address),
                ("skip", skip.as_str()),
                ("first", first.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response)?;
        let body: PageBody = response
            .json()
            .await
            .map_err(|err| LedgerError::new(LedgerFailure::MalformedPayload, err.to_string()))?;
        Ok(body.into())
    }

    async fn check_deleted(
        &self,
        identifiers: &[String],
    ) -> Result<HashMap<String, bool>, LedgerError> {
        let response = self
            .client
            .get(self.route("files/deleted")?)
            .query(&[("ids", identifiers.join(","))])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response)?;
        let flags: HashMap<String, bool> = response
            .json()
            .await
            .map_err(|err| LedgerError::new(LedgerFailure::MalformedPayload, err.to_string()))?;
        // Identifiers are case-insensitive keys.
        Ok(flags
            .into_iter()
            .map(|(identifier, deleted)| (identifier.to_lowercase(), deleted))
            .collect())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LedgerError> {
    let status = response.status();
    if status.as_u16() == 429 {
        return Err(LedgerError::new(LedgerFailure::RateLimited, status.to_string()));
    }
    if !status.is_success() {
        return Err(LedgerError::new(
            LedgerFailure::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

fn transport_error(err: reqwest::Error) -> LedgerError {
    if err.is_timeout() {
        return LedgerError::new(LedgerFailure::Timeout, err.to_string());
    }
    LedgerError::new(LedgerFailure::Network, err.to_string())
}

#[derive(Debug, Deserialize)]
struct PageBody {
    #[serde(default)]
    deployed: Vec<DeployedWire>,
    #[serde(default)]
    granted: Vec<GrantedWire>,
    #[serde(default)]
    deleted: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployedWire {
    id: String,
    contract_address: String,
    owner_address: String,
    metadata: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrantedWire {
    id: String,
    contract_address: String,
    minter_address: String,
    metadata: String,
}

impl From<PageBody> for FeedPage {
    fn from(body: PageBody) -> Self {
        FeedPage {
            deployed: body
                .deployed
                .into_iter()
                .map(|wire| RawRecord {
                    identifier: wire.id,
                    contract_address: wire.contract_address,
                    holder_address: wire.owner_address,
                    metadata_blob: wire.metadata,
                })
                .collect(),
            granted: body
                .granted
                .into_iter()
                .map(|wire| RawRecord {
                    identifier: wire.id,
                    contract_address: wire.contract_address,
                    holder_address: wire.minter_address,
                    metadata_blob: wire.metadata,
                })
                .collect(),
            deleted: body.deleted,
        }
    }
}
