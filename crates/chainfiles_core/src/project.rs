use std::cmp::Ordering;
use std::str::FromStr;

use crate::record::FileEntry;

/// String comparison applied by a [`FilterSpec`]. All comparisons are
/// case-insensitive over the stringified field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "equals" => Ok(FilterOp::Equals),
            "contains" => Ok(FilterOp::Contains),
            "starts-with" => Ok(FilterOp::StartsWith),
            "ends-with" => Ok(FilterOp::EndsWith),
            other => Err(format!("unknown filter operator: {other}")),
        }
    }
}

/// Optional predicate over one named field of each entry.
///
/// An entry whose named field is absent never matches, regardless of the
/// operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub field: String,
    pub value: String,
    pub op: FilterOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Optional stable sort over one named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Apply the optional filter, then the optional stable sort. Without a sort
/// spec the merge pass's insertion order is preserved.
pub fn project(
    entries: Vec<FileEntry>,
    filter: Option<&FilterSpec>,
    sort: Option<&SortSpec>,
) -> Vec<FileEntry> {
    let mut entries = match filter {
        Some(spec) => entries
            .into_iter()
            .filter(|entry| matches(entry, spec))
            .collect(),
        None => entries,
    };

    if let Some(spec) = sort {
        entries.sort_by(|a, b| compare(a, b, spec));
    }

    entries
}

fn matches(entry: &FileEntry, spec: &FilterSpec) -> bool {
    let Some(value) = field_text(entry, &spec.field) else {
        return false;
    };
    let haystack = value.to_lowercase();
    let needle = spec.value.to_lowercase();
    match spec.op {
        FilterOp::Equals => haystack == needle,
        FilterOp::Contains => haystack.contains(&needle),
        FilterOp::StartsWith => haystack.starts_with(&needle),
        FilterOp::EndsWith => haystack.ends_with(&needle),
    }
}

/// Missing values always compare greater than present ones, then the
/// direction flips the whole order, missing-value placement included: absent
/// fields sort to the end ascending and to the start descending.
fn compare(a: &FileEntry, b: &FileEntry, spec: &SortSpec) -> Ordering {
    let left = field_text(a, &spec.field).map(|value| value.to_lowercase());
    let right = field_text(b, &spec.field).map(|value| value.to_lowercase());

    let ordering = match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => left.cmp(&right),
    };

    match spec.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Resolve a field name against the entry, its normalized metadata, and
/// finally the raw blob's top-level fields (opaque passthrough).
fn field_text(entry: &FileEntry, field: &str) -> Option<String> {
    match field {
        "identifier" | "id" => Some(entry.identifier.clone()),
        "contractAddress" => Some(entry.contract_address.clone()),
        "owner" => Some(entry.owner.clone()),
        "accessGranted" => Some(entry.access_granted.to_string()),
        "name" => entry.metadata.name.clone(),
        "type" => entry.metadata.file_type.clone(),
        "mimeType" => entry.metadata.mime_type.clone(),
        "subtype" => entry.metadata.subtype.clone(),
        "cid" => entry.metadata.storage_locator.clone(),
        "accessType" => entry
            .metadata
            .access_type
            .map(|access| access.as_str().to_string()),
        other => entry.metadata.raw.field_text(other),
    }
}
