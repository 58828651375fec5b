//! Schema-free records and the collection map they live in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field holding the store-assigned record id.
pub const ID_FIELD: &str = "id";
/// Field holding the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Field holding the last-update timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Full store state: collection name mapped to its records in insertion
/// order. This is also the exact shape of the persisted JSON file.
pub type Tables = BTreeMap<String, Vec<Record>>;

/// One entity instance inside a collection.
///
/// Records are plain JSON objects. Apart from the bookkeeping fields the
/// store maintains (`id`, `createdAt`, `updatedAt`) there is no schema:
/// whatever object the caller hands to `create` is what gets stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Wrap an existing JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The store-assigned id, if this record has one.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.fields.get(ID_FIELD).and_then(Value::as_u64)
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Shallow merge: every field in `fields` overwrites the same-named field
    /// here; fields not mentioned are left untouched.
    pub fn merge(&mut self, fields: Map<String, Value>) {
        for (k, v) in fields {
            self.fields.insert(k, v);
        }
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
