//! SQLite-backed store for the catalogue and its moderation log.
//!
//! Every write runs inside a single `IMMEDIATE` transaction so that
//! uniqueness checks and the write cannot interleave with another writer.
//! Foreign keys carry the cascade and null-on-delete rules:
//!
//! ```text
//! accounts ──< profiles ──< (creator/approver, SET NULL)
//! libraries ──< functions        (CASCADE)
//! topics    ──< skills           (CASCADE)
//! any content ──< request_logs   (CASCADE)
//! tags ──< functions/skills.tag  (SET NULL)
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, warn};

mod accounts;
mod content;
mod error;
mod requests;
mod schema;
mod selectable;
mod tags;
mod texts;

pub use content::{CascadeReport, Content, ListFilter};
pub use error::StoreError;
pub use schema::SCHEMA_VERSION;
pub use selectable::Selectable;

use crate::domain::ProfileId;

/// Handle to the catalogue database
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        debug!(path = %path.display(), "Opened database");
        Self::init(conn, Some(path))
    }

    /// Private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        // Required for ON DELETE CASCADE / SET NULL
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if path.is_some() {
            // WAL is unavailable for in-memory databases
            match conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            }) {
                Ok(mode) => debug!(%mode, "Journal mode set"),
                Err(err) => warn!(error = %err, "Could not enable WAL, keeping default journal"),
            }
        }

        schema::install(&conn)?;
        Ok(Self { conn, path })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn write_tx(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

fn profile_exists(conn: &Connection, id: ProfileId) -> Result<bool, StoreError> {
    Ok(conn
        .query_row("SELECT 1 FROM profiles WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

fn ensure_profile(conn: &Connection, id: ProfileId) -> Result<(), StoreError> {
    if profile_exists(conn, id)? {
        Ok(())
    } else {
        Err(StoreError::not_found("profile", id))
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == rusqlite::ErrorCode::ConstraintViolation
                && message
                    .as_deref()
                    .is_some_and(|value| value.contains("UNIQUE constraint failed"))
        }
        _ => false,
    }
}

/// Turn a unique-constraint failure on insert into a field error
fn map_unique_conflict(err: rusqlite::Error, field: &str) -> StoreError {
    if is_unique_violation(&err) {
        return StoreError::Validation(crate::validation::FieldErrors::single(
            field,
            format!("An entry with this {field} already exists."),
        ));
    }
    err.into()
}

fn to_sqlite_limit(limit: Option<usize>) -> i64 {
    // SQLite treats a negative LIMIT as unbounded
    limit.and_then(|l| i64::try_from(l).ok()).unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("nested").join("lesspy.db");

        let store = Store::open(&db_path).unwrap();
        assert_eq!(store.path(), Some(db_path.as_path()));
        assert!(db_path.exists());
    }

    #[test]
    fn test_reopen_keeps_schema_version() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("lesspy.db");

        drop(Store::open(&db_path).unwrap());
        let store = Store::open(&db_path).unwrap();

        let version: i32 = store
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_file_store_uses_wal() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(&temp.path().join("lesspy.db")).unwrap();

        let mode: String = store
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let store = Store::open_in_memory().unwrap();
        let enabled: i64 = store
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
