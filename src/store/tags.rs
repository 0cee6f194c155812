use rusqlite::{params, Row};
use tracing::info;

use super::{Store, StoreError};
use crate::domain::tag::TAG_LABEL_MAX;
use crate::domain::{Tag, TagCategory, TagId};
use crate::validation::FieldErrors;

fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    let code: String = row.get(1)?;
    let category = TagCategory::from_code(&code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown tag category {code:?}").into(),
        )
    })?;

    Ok(Tag {
        id: row.get(0)?,
        category,
        label: row.get(2)?,
    })
}

impl Store {
    /// Register a tag; labels need not be unique
    pub fn add_tag(&mut self, category: TagCategory, label: &str) -> Result<Tag, StoreError> {
        let label = label.trim();
        let mut errors = FieldErrors::new();
        errors.require("tag", label);
        errors.max_length("tag", label, TAG_LABEL_MAX);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let tx = self.write_tx()?;
        tx.execute(
            "INSERT INTO tags(category, label) VALUES (?1, ?2)",
            params![category.code(), label],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(id, %category, label, "Tag added");
        Ok(Tag {
            id,
            category,
            label: label.to_string(),
        })
    }

    /// Tags in insertion order, optionally of one category
    pub fn list_tags(&self, category: Option<TagCategory>) -> Result<Vec<Tag>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, label FROM tags \
             WHERE ?1 IS NULL OR category = ?1 \
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![category.map(TagCategory::code)], tag_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Delete a tag; functions and skills using it become untagged
    pub fn delete_tag(&mut self, id: TagId) -> Result<(), StoreError> {
        let tx = self.write_tx()?;
        let deleted = tx.execute("DELETE FROM tags WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::not_found("tag", id));
        }
        tx.commit()?;

        info!(id, "Tag deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_by_category_in_insertion_order() {
        let mut store = Store::open_in_memory().unwrap();
        store.add_tag(TagCategory::Library, "path").unwrap();
        store.add_tag(TagCategory::Topic, "parsing").unwrap();
        store.add_tag(TagCategory::Library, "io").unwrap();

        let labels: Vec<_> = store
            .list_tags(Some(TagCategory::Library))
            .unwrap()
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(labels, vec!["path", "io"]);

        assert_eq!(store.list_tags(None).unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_labels_allowed() {
        let mut store = Store::open_in_memory().unwrap();
        store.add_tag(TagCategory::Topic, "io").unwrap();
        store.add_tag(TagCategory::Topic, "io").unwrap();
        assert_eq!(store.list_tags(Some(TagCategory::Topic)).unwrap().len(), 2);
    }

    #[test]
    fn test_label_bound() {
        let mut store = Store::open_in_memory().unwrap();
        let err = store
            .add_tag(TagCategory::Topic, &"t".repeat(21))
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("tag"));
    }

    #[test]
    fn test_delete_unknown_tag() {
        let mut store = Store::open_in_memory().unwrap();
        assert!(store.delete_tag(42).unwrap_err().is_not_found());
    }
}
