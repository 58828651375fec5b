//! Core store type, handle, and builder.

use crate::audit::{AuditAction, AuditActor, AuditEntry, AUDIT_TABLE};
use crate::error::{Error, Result};
use crate::flush::{FlushPolicy, FlushWorker};
use crate::persist::{atomic_write, backup_path, load};
use crate::query::{matches, paginate, Filters, Page};
use crate::record::{Record, Tables, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use crate::seed;
use crate::serializer::{JsonSerializer, Serializer};
use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;

/// Persistent JSON-backed store of named record collections.
///
/// The collection set is fixed when the store is opened; records are
/// schema-free JSON objects the store stamps with `id`, `createdAt` and
/// `updatedAt`. Every mutation lands one entry in the reserved audit
/// collection, and the full state is mirrored to disk according to the flush
/// policy.
///
/// Construct one with [`open`](Self::open) or [`builder`](Self::builder) and
/// hand it to whatever serves requests; there is no implicit global
/// instance. Mutating operations hold a single writer lock across the whole
/// read-modify-audit-persist sequence, so concurrent callers cannot
/// interleave a read-modify-write cycle.
pub struct RecordStore {
    tables: Arc<RwLock<Tables>>,
    path: PathBuf,
    serializer: JsonSerializer,
    policy: FlushPolicy,
    actor: AuditActor,
    trigger: Option<mpsc::SyncSender<()>>,
}

impl RecordStore {
    /// Open (or seed) a store at `path` with the default collection set and
    /// immediate flushing.
    pub fn open(path: impl AsRef<Path>) -> Result<RecordStoreHandle> {
        Self::builder(path).build()
    }

    /// Open with a specific flush policy. Shorthand for
    /// `builder(path).policy(p).build()`.
    pub fn open_with_policy(
        path: impl AsRef<Path>,
        policy: FlushPolicy,
    ) -> Result<RecordStoreHandle> {
        Self::builder(path).policy(policy).build()
    }

    /// Start configuring a new store. Call
    /// [`.build()`](RecordStoreBuilder::build) when ready.
    pub fn builder(path: impl AsRef<Path>) -> RecordStoreBuilder {
        RecordStoreBuilder::new(path)
    }

    // ---- reads ----

    /// All records of `collection` that satisfy `filters`, in insertion
    /// order. An empty filter set returns everything.
    pub fn read(&self, collection: &str, filters: &Filters) -> Result<Vec<Record>> {
        let tables = self.tables.read();
        let rows = known(&tables, collection)?;
        Ok(rows.iter().filter(|r| matches(r, filters)).cloned().collect())
    }

    /// The record with the given id.
    ///
    /// A bad collection name is [`Error::UnknownCollection`]; a good name
    /// with an absent id is [`Error::NotFound`].
    pub fn read_by_id(&self, collection: &str, id: u64) -> Result<Record> {
        let tables = self.tables.read();
        let rows = known(&tables, collection)?;
        rows.iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                collection: collection.to_string(),
                id,
            })
    }

    /// Filtered read sliced into the 1-based `page` of size `limit`, with
    /// pagination metadata. Zero `page` or `limit` is rejected.
    pub fn read_paginated(
        &self,
        collection: &str,
        page: usize,
        limit: usize,
        filters: &Filters,
    ) -> Result<Page> {
        if page == 0 || limit == 0 {
            return Err(Error::Config(
                "page and limit are 1-based and must be nonzero".to_string(),
            ));
        }
        let all = self.read(collection, filters)?;
        Ok(paginate(all, page, limit))
    }

    /// Number of records matching `filters`.
    pub fn count(&self, collection: &str, filters: &Filters) -> Result<usize> {
        let tables = self.tables.read();
        let rows = known(&tables, collection)?;
        Ok(rows.iter().filter(|r| matches(r, filters)).count())
    }

    /// All records whose `field` matches `value`: the same semantics as a
    /// single-pair filter, exposed for path-parameter driven lookups.
    pub fn find_by_field(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Record>> {
        let mut filters = Filters::new();
        filters.insert(field.to_string(), value.clone());
        self.read(collection, &filters)
    }

    /// Names of the known collections.
    #[must_use]
    pub fn tables(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Current record count per collection.
    #[must_use]
    pub fn stats(&self) -> BTreeMap<String, usize> {
        self.tables
            .read()
            .iter()
            .map(|(name, rows)| (name.clone(), rows.len()))
            .collect()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ---- writes ----

    /// Insert a new record built from `fields` (which must be a JSON
    /// object). The store assigns `id`, `createdAt` and `updatedAt`; ids are
    /// `1 + max existing id`, so they may have gaps after deletions but never
    /// collide. Returns the stored record.
    pub fn create(&self, collection: &str, fields: Value) -> Result<Record> {
        let fields = object_fields(fields)?;
        let now = now_iso();

        let mut tables = self.tables.write();
        let rows = known_mut(&mut tables, collection)?;

        let mut record = Record::new(fields);
        record.set(ID_FIELD, Value::from(next_id(rows)));
        record.set(CREATED_AT_FIELD, Value::from(now.clone()));
        record.set(UPDATED_AT_FIELD, Value::from(now.clone()));
        rows.push(record.clone());

        self.append_audit(
            &mut tables,
            AuditAction::Create,
            collection,
            record.id(),
            None,
            Some(&record),
            &now,
        );
        self.persist_mutation(&tables)?;
        Ok(record)
    }

    /// Shallow-merge `fields` into the record with the given id: caller
    /// fields overwrite same-named existing ones, everything else is
    /// preserved, and `updatedAt` is refreshed. A caller-supplied `id` field
    /// is ignored; the store owns id assignment. Returns the merged record.
    pub fn update(&self, collection: &str, id: u64, fields: Value) -> Result<Record> {
        let mut fields = object_fields(fields)?;
        fields.remove(ID_FIELD);
        let now = now_iso();

        let mut tables = self.tables.write();
        let rows = known_mut(&mut tables, collection)?;
        let index = position(rows, collection, id)?;

        let before = rows[index].clone();
        let record = &mut rows[index];
        record.merge(fields);
        record.set(UPDATED_AT_FIELD, Value::from(now.clone()));
        let after = record.clone();

        self.append_audit(
            &mut tables,
            AuditAction::Update,
            collection,
            Some(id),
            Some(&before),
            Some(&after),
            &now,
        );
        self.persist_mutation(&tables)?;
        Ok(after)
    }

    /// Remove the record with the given id, preserving the order of the
    /// rest. Returns the removed record.
    pub fn delete(&self, collection: &str, id: u64) -> Result<Record> {
        let now = now_iso();

        let mut tables = self.tables.write();
        let rows = known_mut(&mut tables, collection)?;
        let index = position(rows, collection, id)?;
        let removed = rows.remove(index);

        self.append_audit(
            &mut tables,
            AuditAction::Delete,
            collection,
            Some(id),
            Some(&removed),
            None,
            &now,
        );
        self.persist_mutation(&tables)?;
        Ok(removed)
    }

    /// Empty every collection, keeping the collection set itself. The wipe is
    /// recorded afterwards as a single CLEAR entry in the audit trail, so the
    /// trail survives its own wipe with one row explaining it.
    pub fn clear_all(&self) -> Result<()> {
        let now = now_iso();

        let mut tables = self.tables.write();
        for rows in tables.values_mut() {
            rows.clear();
        }
        self.append_audit(&mut tables, AuditAction::Clear, "*", None, None, None, &now);
        self.persist_mutation(&tables)
    }

    // ---- persistence ----

    /// Write the current state to disk (atomic temp-file + rename).
    pub fn flush(&self) -> Result<()> {
        do_flush(&self.tables.read(), &self.path, &self.serializer)
    }

    /// Write the full current state to a timestamped sibling file, leaving
    /// the primary file and the in-memory state untouched. Returns the
    /// backup's path.
    pub fn backup(&self) -> Result<PathBuf> {
        let tables = self.tables.read();
        let bytes = self.serializer.to_bytes(&tables)?;
        let path = backup_path(&self.path, Utc::now().timestamp_millis());
        std::fs::write(&path, bytes).map_err(|e| Error::Io(e.to_string()))?;
        Ok(path)
    }

    // ---- internal ----

    /// Append one audit entry describing a mutation that was just applied.
    /// A failure here is logged and swallowed; the mutation itself stands.
    #[allow(clippy::too_many_arguments)]
    fn append_audit(
        &self,
        tables: &mut Tables,
        acao: AuditAction,
        tabela: &str,
        registro_id: Option<u64>,
        before: Option<&Record>,
        after: Option<&Record>,
        now: &str,
    ) {
        let entry = AuditEntry {
            id: tables.get(AUDIT_TABLE).map_or(1, |rows| next_id(rows)),
            usuario_id: self.actor.user_id,
            acao,
            tabela: tabela.to_string(),
            registro_id,
            dados_antigos: before.and_then(snapshot),
            dados_novos: after.and_then(snapshot),
            ip: self.actor.ip.clone(),
            user_agent: self.actor.user_agent.clone(),
            created_at: now.to_string(),
        };
        match entry_record(&entry) {
            Ok(record) => {
                if let Some(rows) = tables.get_mut(AUDIT_TABLE) {
                    rows.push(record);
                } else {
                    log::error!("audit collection '{AUDIT_TABLE}' is missing, entry dropped");
                }
            }
            Err(e) => log::error!("failed to encode audit entry: {e}"),
        }
    }

    fn persist_mutation(&self, tables: &Tables) -> Result<()> {
        match &self.policy {
            FlushPolicy::Immediate => do_flush(tables, &self.path, &self.serializer),
            FlushPolicy::Async(_) => {
                if let Some(t) = &self.trigger {
                    let _ = t.try_send(());
                }
                Ok(())
            }
            FlushPolicy::Manual => Ok(()),
        }
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn do_flush(tables: &Tables, path: &Path, serializer: &JsonSerializer) -> Result<()> {
    let bytes = serializer.to_bytes(tables)?;
    atomic_write(path, &bytes)
}

fn known<'t>(tables: &'t Tables, collection: &str) -> Result<&'t Vec<Record>> {
    tables
        .get(collection)
        .ok_or_else(|| Error::UnknownCollection(collection.to_string()))
}

fn known_mut<'t>(tables: &'t mut Tables, collection: &str) -> Result<&'t mut Vec<Record>> {
    tables
        .get_mut(collection)
        .ok_or_else(|| Error::UnknownCollection(collection.to_string()))
}

fn position(rows: &[Record], collection: &str, id: u64) -> Result<usize> {
    rows.iter()
        .position(|r| r.id() == Some(id))
        .ok_or_else(|| Error::NotFound {
            collection: collection.to_string(),
            id,
        })
}

/// Next id for a collection: `1 + max existing id`. Records without a usable
/// id (possible in a hand-edited state file) are skipped.
fn next_id(rows: &[Record]) -> u64 {
    rows.iter().filter_map(Record::id).max().unwrap_or(0) + 1
}

/// ISO-8601 with millisecond precision, e.g. `2024-01-15T12:30:00.123Z`.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn object_fields(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::Config("record fields must be a JSON object".to_string())),
    }
}

fn snapshot(record: &Record) -> Option<String> {
    serde_json::to_string(record).ok()
}

fn entry_record(entry: &AuditEntry) -> Result<Record> {
    match serde_json::to_value(entry)? {
        Value::Object(map) => Ok(Record::new(map)),
        _ => Err(Error::Serialize(
            "audit entry did not encode as an object".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`RecordStore`].
///
/// ```rust,no_run
/// use condo_store::{FlushPolicy, RecordStore};
///
/// let db = RecordStore::builder("condominio.json")
///     .pretty(true)
///     .policy(FlushPolicy::Manual)
///     .build()
///     .unwrap();
/// ```
pub struct RecordStoreBuilder {
    path: PathBuf,
    policy: FlushPolicy,
    pretty: bool,
    actor: AuditActor,
    collections: Option<Vec<String>>,
}

impl RecordStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy: FlushPolicy::Immediate,
            pretty: false,
            actor: AuditActor::default(),
            collections: None,
        }
    }

    /// Set the flush policy (default: [`FlushPolicy::Immediate`]).
    #[must_use]
    pub fn policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write human-readable JSON with indentation (default: compact).
    #[must_use]
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Attribute mutations to this actor in the audit trail instead of the
    /// built-in placeholders.
    #[must_use]
    pub fn actor(mut self, actor: AuditActor) -> Self {
        self.actor = actor;
        self
    }

    /// Use a custom collection set when initializing fresh state, instead of
    /// the built-in default dataset. The collections start empty; the audit
    /// collection is always included. Ignored when an existing state file is
    /// loaded; the file's own keys define the collection set then.
    #[must_use]
    pub fn collections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Load (or seed) the store and return a handle.
    pub fn build(self) -> Result<RecordStoreHandle> {
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let tables = match load(&self.path, &serializer) {
            Ok(Some(tables)) => {
                log::info!(
                    "loaded {} collections from {}",
                    tables.len(),
                    self.path.display()
                );
                tables
            }
            Ok(None) => {
                log::info!("no state file at {}, seeding defaults", self.path.display());
                let fresh = self.fresh_tables();
                do_flush(&fresh, &self.path, &serializer)?;
                fresh
            }
            Err(e) => {
                log::warn!(
                    "could not load {}: {e}; falling back to seed data",
                    self.path.display()
                );
                let fresh = self.fresh_tables();
                do_flush(&fresh, &self.path, &serializer)?;
                fresh
            }
        };

        let tables = Arc::new(RwLock::new(tables));

        let (worker, trigger) = match &self.policy {
            FlushPolicy::Async(interval) => {
                let (tx, rx) = mpsc::sync_channel(0);
                let shared = Arc::clone(&tables);
                let path = self.path.clone();
                let ser = serializer.clone();
                let worker = FlushWorker::spawn(
                    *interval,
                    move || {
                        if let Err(e) = do_flush(&shared.read(), &path, &ser) {
                            log::warn!("background flush failed: {e}");
                        }
                    },
                    rx,
                );
                (Some(worker), Some(tx))
            }
            _ => (None, None),
        };

        let store = RecordStore {
            tables,
            path: self.path,
            serializer,
            policy: self.policy,
            actor: self.actor,
            trigger,
        };

        Ok(RecordStoreHandle {
            inner: Arc::new(store),
            worker,
        })
    }

    fn fresh_tables(&self) -> Tables {
        match &self.collections {
            Some(names) => seed::empty_tables(names.iter().map(String::as_str)),
            None => seed::default_tables(&now_iso()),
        }
    }
}

impl std::fmt::Debug for RecordStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStoreBuilder")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .field("pretty", &self.pretty)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Owns the store and (for the async policy) the background flush thread.
///
/// Derefs to [`RecordStore`] so store methods can be called directly on it.
/// Dropping this will join the background thread if one is running, which may
/// block for up to one flush interval.
pub struct RecordStoreHandle {
    pub(crate) inner: Arc<RecordStore>,
    #[allow(dead_code)]
    pub(crate) worker: Option<FlushWorker>,
}

impl std::ops::Deref for RecordStoreHandle {
    type Target = RecordStore;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for RecordStoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.inner, f)
    }
}
