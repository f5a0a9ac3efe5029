use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    /// A ledger record carried a blob that is not valid JSON. This indicates
    /// ledger corruption rather than an expected "file not ready" state, so
    /// it is a hard error for the containing reconciliation.
    #[error("unparseable metadata blob for record {identifier}: {source}")]
    Unparseable {
        identifier: String,
        source: serde_json::Error,
    },
}

/// Raw metadata payload of one record, kept as the original JSON text.
///
/// Application-specific fields stay opaque passthrough; `value()` decodes on
/// demand for callers that need to look inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlob(String);

impl MetadataBlob {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The verbatim JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the blob. Normalization has already proven the text parses, so
    /// later decodes only fail if the blob was constructed unvalidated.
    pub fn value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// Stringified top-level field, for filter/sort over passthrough fields.
    pub fn field_text(&self, field: &str) -> Option<String> {
        let value = self.value().ok()?;
        value.get(field).and_then(scalar_text)
    }
}

/// Visibility of the stored payload, when the blob declares one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    Public,
    Private,
}

impl AccessType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessType::Public => "public",
            AccessType::Private => "private",
        }
    }
}

/// Metadata fields reconciliation itself understands, extracted from a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMetadata {
    pub name: Option<String>,
    pub file_type: Option<String>,
    pub mime_type: Option<String>,
    pub subtype: Option<String>,
    /// Canonical pointer to the file's durable storage location.
    pub storage_locator: Option<String>,
    pub access_type: Option<AccessType>,
    /// The blob carries the `encryptedPointer` marker: encrypted but not yet
    /// committed to durable storage.
    pub pointer_only: bool,
    pub raw: MetadataBlob,
}

impl NormalizedMetadata {
    /// Required-metadata gate: a record enters the index only with a locator
    /// present and no intermediate-pointer marker. Records failing the gate
    /// are excluded silently, they are files not yet durably stored.
    pub fn is_listable(&self) -> bool {
        self.storage_locator.is_some() && !self.pointer_only
    }
}

type LocatorExtractor = fn(&Value) -> Option<&str>;

/// Storage-locator lookup shapes, tried in order; first non-empty match wins.
/// Older blobs nest the locator under a storage-info object (either casing),
/// newer ones carry it at the top level (either casing).
const LOCATOR_EXTRACTORS: [LocatorExtractor; 4] = [
    |v| nested_str(v, "storageInfo", "cid"),
    |v| nested_str(v, "storage_info", "cid"),
    |v| v.get("cid").and_then(Value::as_str),
    |v| v.get("CID").and_then(Value::as_str),
];

const POINTER_MARKER_FIELD: &str = "encryptedPointer";

/// Parse a record's metadata blob and extract the fields reconciliation
/// understands. Parse failure is a hard error carrying the identifier.
pub fn normalize(identifier: &str, blob: &str) -> Result<NormalizedMetadata, MetadataError> {
    let value: Value = serde_json::from_str(blob).map_err(|source| MetadataError::Unparseable {
        identifier: identifier.to_string(),
        source,
    })?;

    let storage_locator = LOCATOR_EXTRACTORS
        .iter()
        .filter_map(|extract| extract(&value))
        .find(|locator| !locator.is_empty())
        .map(ToOwned::to_owned);

    Ok(NormalizedMetadata {
        name: top_level_string(&value, "name"),
        file_type: top_level_string(&value, "type"),
        mime_type: top_level_string(&value, "mimeType"),
        subtype: top_level_string(&value, "subtype"),
        storage_locator,
        access_type: access_type(&value),
        pointer_only: value.get(POINTER_MARKER_FIELD).is_some(),
        raw: MetadataBlob::new(blob),
    })
}

fn nested_str<'a>(value: &'a Value, outer: &str, inner: &str) -> Option<&'a str> {
    value.get(outer)?.get(inner)?.as_str()
}

fn top_level_string(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(ToOwned::to_owned)
}

fn access_type(value: &Value) -> Option<AccessType> {
    match value.get("accessType").and_then(Value::as_str) {
        Some("public") => Some(AccessType::Public),
        Some("private") => Some(AccessType::Private),
        _ => None,
    }
}

/// Stringify a scalar JSON value the way filter/sort comparisons expect.
/// Nulls and composite values have no text form and never match.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
