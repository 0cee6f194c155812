//! Filing and approving request/issue logs.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::content::{content_creator, content_exists};
use super::{ensure_profile, Store, StoreError};
use crate::domain::request::SUBJECT_MAX;
use crate::domain::{
    ContentKind, ContentRef, NewRequest, ProfileId, RequestFilter, RequestId, RequestLog,
    RequestType,
};
use crate::validation::FieldErrors;

const REQUEST_COLUMNS: &str = "id, library_id, function_id, topic_id, skill_id, request_type, \
     subject, solution, note, confirmed, creator_id, approver_id, timestamp";

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<RequestLog> {
    // Columns 1..=4 hold the target; the schema guarantees exactly one is set
    let mut target = None;
    for (offset, kind) in ContentKind::ALL.into_iter().enumerate() {
        if let Some(id) = row.get::<_, Option<i64>>(1 + offset)? {
            target = Some(ContentRef::new(kind, id));
            break;
        }
    }
    let target = target.ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Null,
            "request log without a target".into(),
        )
    })?;

    let request_type: String = row.get(5)?;
    let request_type = request_type.parse::<RequestType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(RequestLog {
        id: row.get(0)?,
        target,
        request_type,
        subject: row.get(6)?,
        solution: row.get(7)?,
        note: row.get(8)?,
        confirmed: row.get(9)?,
        creator: row.get(10)?,
        approver: row.get(11)?,
        timestamp: row.get(12)?,
    })
}

fn load_request(conn: &Connection, id: RequestId) -> Result<RequestLog, StoreError> {
    conn.query_row(
        &format!("SELECT {REQUEST_COLUMNS} FROM request_logs WHERE id = ?1"),
        params![id],
        request_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("request", id))
}

impl Store {
    /// File a request or issue against a content entity.
    ///
    /// The new log is unconfirmed with no approver. The target's creator
    /// gets a pending task.
    pub fn file_request(
        &mut self,
        new: NewRequest,
        creator: ProfileId,
    ) -> Result<RequestLog, StoreError> {
        let tx = self.write_tx()?;
        ensure_profile(&tx, creator)?;

        let mut errors = FieldErrors::new();
        if !content_exists(&tx, new.target)? {
            errors.add(
                new.target.kind.as_str(),
                format!(
                    "Select a valid {}; {} does not exist.",
                    new.target.kind, new.target.id
                ),
            );
        }
        errors.require("subject", &new.subject);
        errors.max_length("subject", &new.subject, SUBJECT_MAX);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            &format!(
                "INSERT INTO request_logs({}, request_type, subject, solution, note, confirmed, \
                 creator_id, approver_id, timestamp) \
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, NULL, ?7)",
                new.target.kind.foreign_key()
            ),
            params![
                new.target.id,
                new.request_type.as_str(),
                new.subject,
                new.solution,
                new.note,
                creator,
                Utc::now(),
            ],
        )?;
        let log = load_request(&tx, tx.last_insert_rowid())?;

        if let Some(owner) = content_creator(&tx, new.target)? {
            tx.execute("UPDATE profiles SET task = task + 1 WHERE id = ?1", params![owner])?;
        }
        tx.commit()?;

        info!(
            id = log.id,
            target = %log.target,
            request_type = %log.request_type,
            creator,
            "Request filed"
        );
        Ok(log)
    }

    /// Confirm a log.
    ///
    /// Approving again with the same approver is a no-op; a different
    /// approver gets `AlreadyConfirmed`.
    pub fn approve(
        &mut self,
        id: RequestId,
        approver: ProfileId,
    ) -> Result<RequestLog, StoreError> {
        let tx = self.write_tx()?;
        let log = load_request(&tx, id)?;
        ensure_profile(&tx, approver)?;

        if log.confirmed {
            if log.approver == Some(approver) {
                debug!(id, approver, "Request already approved by this profile");
                return Ok(log);
            }
            return Err(StoreError::AlreadyConfirmed {
                id,
                approver: log.approver,
            });
        }

        tx.execute(
            "UPDATE request_logs SET confirmed = 1, approver_id = ?2 WHERE id = ?1",
            params![id, approver],
        )?;
        if let Some(owner) = content_creator(&tx, log.target)? {
            tx.execute(
                "UPDATE profiles SET task = MAX(task - 1, 0) WHERE id = ?1",
                params![owner],
            )?;
        }
        let log = load_request(&tx, id)?;
        tx.commit()?;

        info!(id, target = %log.target, approver, "Request approved");
        Ok(log)
    }

    pub fn get_request(&self, id: RequestId) -> Result<RequestLog, StoreError> {
        load_request(&self.conn, id)
    }

    /// Logs matching `filter`, oldest first
    pub fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<RequestLog>, StoreError> {
        let mut clauses = vec!["(?1 IS NULL OR confirmed = ?1)".to_string()];
        if let Some(kind) = filter.target.map(|t| t.kind).or(filter.kind) {
            clauses.push(format!("{} IS NOT NULL", kind.foreign_key()));
        }
        if let Some(target) = filter.target {
            clauses.push(format!("{} = ?2", target.kind.foreign_key()));
        } else {
            clauses.push("?2 IS NULL".to_string());
        }

        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM request_logs WHERE {} ORDER BY id ASC",
            clauses.join(" AND ")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![filter.confirmed, filter.target.map(|t| t.id)],
            request_from_row,
        )?;

        let mut out = Vec::new();
        for row in rows {
            let log = row?;
            // A target and a conflicting kind match nothing
            if filter.matches(&log) {
                out.push(log);
            }
        }
        Ok(out)
    }
}
