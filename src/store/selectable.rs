//! Choice lists for the dynamic fields of the forms.
//!
//! The boundary layer queries these before building a form, so forms never
//! touch the database themselves.

use rusqlite::params;
use rusqlite::types::Value;

use super::{Store, StoreError};
use crate::domain::{Choice, ContentKind, EntityId, TagCategory};

/// What to offer in a choice field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selectable {
    Libraries,

    /// Functions of one library
    Functions { library: EntityId },
    Topics,

    /// Skills of one topic
    Skills { topic: EntityId },
    Tags(TagCategory),
}

impl Store {
    /// Current `(id, label)` options, in id order.
    ///
    /// Hidden entities are still offered: requests may be filed against them.
    pub fn list_selectable(&self, what: Selectable) -> Result<Vec<Choice>, StoreError> {
        let (sql, arg): (String, Option<Value>) = match what {
            Selectable::Libraries => (content_sql(ContentKind::Library), None),
            Selectable::Topics => (content_sql(ContentKind::Topic), None),
            Selectable::Functions { library } => {
                (content_sql(ContentKind::Function), Some(Value::Integer(library)))
            }
            Selectable::Skills { topic } => {
                (content_sql(ContentKind::Skill), Some(Value::Integer(topic)))
            }
            Selectable::Tags(category) => (
                "SELECT id, label FROM tags WHERE category = ?1 ORDER BY id ASC".to_string(),
                Some(Value::Text(category.code().to_string())),
            ),
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match &arg {
            Some(arg) => stmt.query(params![arg])?,
            None => stmt.query([])?,
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(Choice::new(row.get(0)?, row.get::<_, String>(1)?));
        }
        Ok(out)
    }
}

fn content_sql(kind: ContentKind) -> String {
    match kind.parent() {
        Some(parent) => format!(
            "SELECT id, {} FROM {} WHERE {} = ?1 ORDER BY id ASC",
            kind.label_field(),
            kind.table(),
            parent.foreign_key()
        ),
        None => format!(
            "SELECT id, {} FROM {} ORDER BY id ASC",
            kind.label_field(),
            kind.table()
        ),
    }
}
