//! Filter matching and pagination over record lists.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Equality/substring filters applied by the read operations.
///
/// Each `(field, value)` pair must match for a record to pass. A textual
/// filter value matches by case-insensitive substring containment on the
/// stringified field; any other value must compare equal.
pub type Filters = Map<String, Value>;

/// `true` when `record` satisfies every pair in `filters`. An empty filter
/// set matches everything.
pub(crate) fn matches(record: &Record, filters: &Filters) -> bool {
    filters.iter().all(|(field, want)| match record.get(field) {
        Some(have) => field_matches(have, want),
        None => false,
    })
}

fn field_matches(have: &Value, want: &Value) -> bool {
    match want {
        Value::String(needle) => match text_of(have) {
            Some(text) => text.to_lowercase().contains(&needle.to_lowercase()),
            None => false,
        },
        other => have == other,
    }
}

/// Stringified view of a field for substring matching. Null yields `None`, so
/// a null field never matches a textual filter (same rule as a missing one).
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}

/// Pagination metadata attached to a [`Page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number that was requested.
    pub page: usize,
    /// Page size.
    pub limit: usize,
    /// Total records matching the filters, across all pages.
    pub total: usize,
    /// `ceil(total / limit)`.
    pub total_pages: usize,
    /// Whether another page follows this one.
    pub has_next: bool,
    /// Whether a page precedes this one. This is just `page > 1`; it is not
    /// re-checked against the upper bound.
    pub has_prev: bool,
}

/// One page of records plus its position in the full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// The records on this page, in insertion order.
    pub records: Vec<Record>,
    /// Where this page sits in the full result.
    pub pagination: Pagination,
}

/// Slice `all` into the 1-based `page` of size `limit`. Callers validate that
/// both are nonzero.
pub(crate) fn paginate(all: Vec<Record>, page: usize, limit: usize) -> Page {
    let total = all.len();
    let start = (page - 1) * limit;
    let records: Vec<Record> = all.into_iter().skip(start).take(limit).collect();
    Page {
        records,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
            has_next: start + limit < total,
            has_prev: page > 1,
        },
    }
}
