//! SQL schema for the catalogue.
//!
//! Cascades and null-on-delete rules live in the foreign keys, so they
//! only hold while `PRAGMA foreign_keys` is on for the connection.

use rusqlite::Connection;

use super::StoreError;

pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
    display_name TEXT NOT NULL,
    task INTEGER NOT NULL DEFAULT 0 CHECK (task >= 0)
);

CREATE TABLE IF NOT EXISTS texts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL CHECK (category IN ('LB', 'TP')),
    label TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS libraries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL,
    creator_id INTEGER REFERENCES profiles(id) ON DELETE SET NULL,
    timestamp TEXT NOT NULL,
    visible INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS functions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    library_id INTEGER NOT NULL REFERENCES libraries(id) ON DELETE CASCADE,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL,
    example TEXT NOT NULL,
    instance TEXT NOT NULL,
    tag_id INTEGER REFERENCES tags(id) ON DELETE SET NULL,
    creator_id INTEGER REFERENCES profiles(id) ON DELETE SET NULL,
    timestamp TEXT NOT NULL,
    visible INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS topics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL,
    creator_id INTEGER REFERENCES profiles(id) ON DELETE SET NULL,
    timestamp TEXT NOT NULL,
    visible INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS skills (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id INTEGER NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
    title TEXT NOT NULL UNIQUE,
    background TEXT NOT NULL,
    solution TEXT NOT NULL,
    tag_id INTEGER REFERENCES tags(id) ON DELETE SET NULL,
    creator_id INTEGER REFERENCES profiles(id) ON DELETE SET NULL,
    timestamp TEXT NOT NULL,
    visible INTEGER NOT NULL DEFAULT 1
);

-- One table for all four log kinds; exactly one target column is set.
CREATE TABLE IF NOT EXISTS request_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    library_id INTEGER REFERENCES libraries(id) ON DELETE CASCADE,
    function_id INTEGER REFERENCES functions(id) ON DELETE CASCADE,
    topic_id INTEGER REFERENCES topics(id) ON DELETE CASCADE,
    skill_id INTEGER REFERENCES skills(id) ON DELETE CASCADE,
    request_type TEXT NOT NULL CHECK (request_type IN ('request', 'issue')),
    subject TEXT NOT NULL,
    solution TEXT NOT NULL,
    note TEXT NOT NULL,
    confirmed INTEGER NOT NULL DEFAULT 0,
    creator_id INTEGER REFERENCES profiles(id) ON DELETE SET NULL,
    approver_id INTEGER REFERENCES profiles(id) ON DELETE SET NULL,
    timestamp TEXT NOT NULL,
    CHECK (
        (library_id IS NOT NULL) + (function_id IS NOT NULL)
        + (topic_id IS NOT NULL) + (skill_id IS NOT NULL) = 1
    )
);

CREATE INDEX IF NOT EXISTS idx_functions_library ON functions(library_id);
CREATE INDEX IF NOT EXISTS idx_skills_topic ON skills(topic_id);
CREATE INDEX IF NOT EXISTS idx_request_logs_library ON request_logs(library_id);
CREATE INDEX IF NOT EXISTS idx_request_logs_function ON request_logs(function_id);
CREATE INDEX IF NOT EXISTS idx_request_logs_topic ON request_logs(topic_id);
CREATE INDEX IF NOT EXISTS idx_request_logs_skill ON request_logs(skill_id);
"#;

/// Create missing tables and stamp the schema version
pub fn install(conn: &Connection) -> Result<(), StoreError> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version > SCHEMA_VERSION {
        return Err(StoreError::Integrity(format!(
            "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    conn.execute_batch(SCHEMA)?;
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    Ok(())
}
