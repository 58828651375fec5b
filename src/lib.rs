//! Persistent JSON-backed store of named record collections.
//!
//! Collections are fixed when the store is opened; records are schema-free
//! JSON objects stamped with `id`, `createdAt` and `updatedAt`. Every
//! create/update/delete lands one entry in the reserved audit collection,
//! and the whole state is mirrored to a JSON file according to the flush
//! policy (immediate by default).
//!
//! ```rust,no_run
//! use condo_store::RecordStore;
//! use serde_json::json;
//!
//! let db = RecordStore::open("condominio.json").unwrap();
//! let ana = db
//!     .create("moradores", json!({ "nome": "Ana", "apartamento": "10" }))
//!     .unwrap();
//! println!("created #{}", ana.id().unwrap());
//! ```
//!
//! **Single-process only.** If multiple processes open the same file they
//! will clobber each other. Use advisory file locking or a real database for
//! multi-process access.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod error;
pub mod flush;
pub mod persist;
pub mod query;
pub mod record;
pub mod seed;
pub mod serializer;
pub mod store;

pub use audit::{AuditAction, AuditActor, AuditEntry, AUDIT_TABLE};
pub use error::{Error, Result};
pub use flush::FlushPolicy;
pub use query::{Filters, Page, Pagination};
pub use record::{Record, Tables};
pub use store::{RecordStore, RecordStoreBuilder, RecordStoreHandle};
