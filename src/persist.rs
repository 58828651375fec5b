//! Disk I/O helpers: state-file load, atomic write, backup naming.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use crate::record::Tables;
use crate::serializer::Serializer;
use std::path::{Path, PathBuf};

/// Reads and deserializes the state file at `path`. Returns `None` when the
/// file is missing or empty (first start). A file that exists but does not
/// parse is an error; the store falls back to seed data in that case.
pub fn load<S: Serializer>(path: &Path, serializer: &S) -> Result<Option<Tables>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    if bytes.is_empty() {
        return Ok(None);
    }
    serializer.from_bytes(&bytes).map(Some)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}

/// Sibling path for a backup taken at `unix_millis`:
/// `backup_<unix_millis>.json` next to the primary file.
pub(crate) fn backup_path(primary: &Path, unix_millis: i64) -> PathBuf {
    let dir = primary.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("backup_{unix_millis}.json"))
}
