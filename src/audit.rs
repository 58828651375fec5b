//! Append-only audit trail written alongside every mutation.

use serde::{Deserialize, Serialize};

/// Name of the reserved collection the audit trail is appended to. Always
/// part of the collection set, whatever the builder is given.
pub const AUDIT_TABLE: &str = "auditoria";

/// What kind of mutation an [`AuditEntry`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// A record was inserted.
    Create,
    /// An existing record was merged with new fields.
    Update,
    /// A record was removed.
    Delete,
    /// Every collection was emptied at once.
    Clear,
}

/// Who mutations are attributed to in the audit trail.
///
/// The store has no request context of its own, so the defaults are
/// placeholders; pass a real actor through the builder when one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditActor {
    /// Id of the acting user.
    pub user_id: u64,
    /// Caller address.
    pub ip: String,
    /// Caller user agent.
    pub user_agent: String,
}

impl Default for AuditActor {
    fn default() -> Self {
        Self {
            user_id: 1,
            ip: "127.0.0.1".to_string(),
            user_agent: "Sistema Interno".to_string(),
        }
    }
}

/// One row of the audit trail.
///
/// Serialized field names match the persisted format: `usuarioId`, `acao`,
/// `tabela`, `registroId`, `dadosAntigos`, `dadosNovos`, `ip`, `userAgent`,
/// `createdAt`. The before/after snapshots are JSON *strings* of the record,
/// null where the action has no before (CREATE) or no after (DELETE).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Id within the audit collection.
    pub id: u64,
    /// The acting user (see [`AuditActor`]).
    pub usuario_id: u64,
    /// Action kind.
    pub acao: AuditAction,
    /// Collection the mutation targeted (`"*"` for a whole-store clear).
    pub tabela: String,
    /// Id of the mutated record; null for whole-store actions.
    pub registro_id: Option<u64>,
    /// Snapshot of the record before the mutation.
    pub dados_antigos: Option<String>,
    /// Snapshot of the record after the mutation.
    pub dados_novos: Option<String>,
    /// Caller address.
    pub ip: String,
    /// Caller user agent.
    pub user_agent: String,
    /// When the entry was written.
    pub created_at: String,
}
