use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{map_unique_conflict, Store, StoreError};
use crate::domain::text::{TEXT_NAME_MAX, TEXT_TITLE_MAX};
use crate::domain::Text;
use crate::validation::FieldErrors;

fn text_from_row(row: &Row<'_>) -> rusqlite::Result<Text> {
    Ok(Text {
        id: row.get(0)?,
        name: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
    })
}

impl Store {
    /// Insert or replace the text stored under `name`
    pub fn put_text(&mut self, name: &str, title: &str, content: &str) -> Result<Text, StoreError> {
        let name = name.trim();
        let title = title.trim();
        let mut errors = FieldErrors::new();
        errors.require("name", name);
        errors.max_length("name", name, TEXT_NAME_MAX);
        errors.require("title", title);
        errors.max_length("title", title, TEXT_TITLE_MAX);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let tx = self.write_tx()?;
        tx.execute(
            "INSERT INTO texts(name, title, content) VALUES (?1, ?2, ?3) \
             ON CONFLICT(name) DO UPDATE SET title = excluded.title, content = excluded.content",
            params![name, title, content],
        )
        .map_err(|err| map_unique_conflict(err, "title"))?;
        let text = tx.query_row(
            "SELECT id, name, title, content FROM texts WHERE name = ?1",
            params![name],
            text_from_row,
        )?;
        tx.commit()?;

        info!(name, "Text saved");
        Ok(text)
    }

    pub fn get_text(&self, name: &str) -> Result<Text, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, title, content FROM texts WHERE name = ?1",
                params![name],
                text_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("text", name))
    }

    pub fn list_texts(&self) -> Result<Vec<Text>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, title, content FROM texts ORDER BY name ASC")?;
        let rows = stmt.query_map([], text_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
