//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if the state should travel in a different format
//! (RON, MessagePack, etc.).

use crate::error::{Error, Result};
use crate::record::Tables;

/// Converts full state snapshots to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode the state to bytes.
    fn to_bytes(&self, tables: &Tables) -> Result<Vec<u8>>;

    /// Decode bytes back into the state.
    fn from_bytes(&self, bytes: &[u8]) -> Result<Tables>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation — easier to read by hand.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn to_bytes(&self, tables: &Tables) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(tables)
        } else {
            serde_json::to_vec(tables)
        };
        bytes.map_err(Error::from)
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<Tables> {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
