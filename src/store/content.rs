//! Content entities: create, read, list, update, hide and delete.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, info};

use super::{ensure_profile, map_unique_conflict, to_sqlite_limit, Store, StoreError};
use crate::domain::content::{DESCRIPTION_MAX, EXAMPLE_MAX};
use crate::domain::{
    ContentKind, ContentRef, EntityId, Function, FunctionChanges, Library, LibraryChanges,
    NewFunction, NewLibrary, NewSkill, NewTopic, ProfileId, Skill, SkillChanges, TagCategory,
    TagId, Topic, TopicChanges,
};
use crate::validation::FieldErrors;

/// A content entity type the store can read generically
pub trait Content: Sized {
    const KIND: ContentKind;

    /// Columns selected by `from_row`, in order
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn id(&self) -> EntityId;

    /// The unique name or title
    fn label(&self) -> &str;

    fn is_visible(&self) -> bool;
}

impl Content for Library {
    const KIND: ContentKind = ContentKind::Library;
    const COLUMNS: &'static str = "id, name, description, creator_id, timestamp, visible";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            creator: row.get(3)?,
            timestamp: row.get(4)?,
            visible: row.get(5)?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Content for Function {
    const KIND: ContentKind = ContentKind::Function;
    const COLUMNS: &'static str = "id, library_id, name, description, example, instance, \
                                   tag_id, creator_id, timestamp, visible";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            library: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            example: row.get(4)?,
            instance: row.get(5)?,
            tag: row.get(6)?,
            creator: row.get(7)?,
            timestamp: row.get(8)?,
            visible: row.get(9)?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Content for Topic {
    const KIND: ContentKind = ContentKind::Topic;
    const COLUMNS: &'static str = "id, title, description, creator_id, timestamp, visible";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            creator: row.get(3)?,
            timestamp: row.get(4)?,
            visible: row.get(5)?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Content for Skill {
    const KIND: ContentKind = ContentKind::Skill;
    const COLUMNS: &'static str = "id, topic_id, title, background, solution, \
                                   tag_id, creator_id, timestamp, visible";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            topic: row.get(1)?,
            title: row.get(2)?,
            background: row.get(3)?,
            solution: row.get(4)?,
            tag: row.get(5)?,
            creator: row.get(6)?,
            timestamp: row.get(7)?,
            visible: row.get(8)?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Which entities `Store::list` returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Skip hidden entities
    pub visible_only: bool,

    /// Only children of this library/topic (functions and skills only)
    pub parent: Option<EntityId>,

    pub limit: Option<usize>,
}

impl ListFilter {
    pub fn visible() -> Self {
        Self {
            visible_only: true,
            ..Default::default()
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// What a hard delete removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// Child entities (functions or skills) removed with the target
    pub children: usize,

    /// Request logs removed, including those on removed children
    pub requests: usize,
}

pub(super) fn get_in<C: Content>(conn: &Connection, id: EntityId) -> Result<C, StoreError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        C::COLUMNS,
        C::KIND.table()
    );
    conn.query_row(&sql, params![id], C::from_row)
        .optional()?
        .ok_or_else(|| StoreError::not_found(C::KIND.as_str(), id))
}

pub(super) fn content_exists(conn: &Connection, target: ContentRef) -> Result<bool, StoreError> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?1", target.kind.table());
    Ok(conn
        .query_row(&sql, params![target.id], |_| Ok(()))
        .optional()?
        .is_some())
}

/// Creator profile of a content entity, if it still has one
pub(super) fn content_creator(
    conn: &Connection,
    target: ContentRef,
) -> Result<Option<ProfileId>, StoreError> {
    let sql = format!("SELECT creator_id FROM {} WHERE id = ?1", target.kind.table());
    Ok(conn
        .query_row(&sql, params![target.id], |row| row.get::<_, Option<ProfileId>>(0))
        .optional()?
        .flatten())
}

/// Record an error when `label` is already used by another entity of `kind`
fn check_unique(
    conn: &Connection,
    kind: ContentKind,
    label: &str,
    exclude: Option<EntityId>,
    errors: &mut FieldErrors,
) -> Result<(), StoreError> {
    let field = kind.label_field();
    let sql = format!(
        "SELECT 1 FROM {} WHERE {field} = ?1 AND id != ?2",
        kind.table()
    );
    let taken = conn
        .query_row(&sql, params![label, exclude.unwrap_or(-1)], |_| Ok(()))
        .optional()?
        .is_some();
    if taken {
        errors.add(field, format!("A {kind} with this {field} already exists."));
    }
    Ok(())
}

fn check_label(
    conn: &Connection,
    kind: ContentKind,
    label: &str,
    exclude: Option<EntityId>,
    errors: &mut FieldErrors,
) -> Result<(), StoreError> {
    let field = kind.label_field();
    errors.require(field, label);
    errors.max_length(field, label, kind.label_max());
    check_unique(conn, kind, label, exclude, errors)
}

fn check_parent(
    conn: &Connection,
    parent: ContentRef,
    errors: &mut FieldErrors,
) -> Result<(), StoreError> {
    if !content_exists(conn, parent)? {
        errors.add(
            parent.kind.as_str(),
            format!("Select a valid {}; {} does not exist.", parent.kind, parent.id),
        );
    }
    Ok(())
}

/// Labels are stored without surrounding whitespace
fn trim_label(label: &mut String) {
    let trimmed = label.trim();
    if trimmed.len() != label.len() {
        *label = trimmed.to_string();
    }
}

/// A tag must exist and belong to the category of the tagged kind
fn check_tag(
    conn: &Connection,
    kind: ContentKind,
    tag: Option<TagId>,
    errors: &mut FieldErrors,
) -> Result<(), StoreError> {
    let Some(tag) = tag else {
        return Ok(());
    };
    let Some(expected) = kind.tag_category() else {
        errors.add("tag", format!("A {kind} cannot be tagged."));
        return Ok(());
    };

    let code: Option<String> = conn
        .query_row("SELECT category FROM tags WHERE id = ?1", params![tag], |row| {
            row.get(0)
        })
        .optional()?;

    match code.as_deref().and_then(TagCategory::from_code) {
        None => errors.add("tag", format!("Select a valid tag; {tag} does not exist.")),
        Some(category) if category != expected => errors.add(
            "tag",
            format!("Tag {tag} is a {category} tag; a {expected} tag is required."),
        ),
        Some(_) => {}
    }
    Ok(())
}

fn check_function_fields(description: &str, example: &str, errors: &mut FieldErrors) {
    errors.max_length("description", description, DESCRIPTION_MAX);
    errors.max_length("example", example, EXAMPLE_MAX);
}

/// Take the pending logs about to be cascaded off their owners' task counts
fn release_tasks(conn: &Connection, target: ContentRef) -> Result<(), StoreError> {
    let column = target.kind.foreign_key();
    let mut owners = format!(
        "SELECT t.creator_id AS owner FROM request_logs r JOIN {table} t ON r.{column} = t.id \
         WHERE t.id = ?1 AND r.confirmed = 0",
        table = target.kind.table(),
    );
    if let Some(child) = target.kind.child() {
        owners.push_str(&format!(
            " UNION ALL SELECT c.creator_id FROM request_logs r \
             JOIN {child_table} c ON r.{child_column} = c.id \
             WHERE c.{column} = ?1 AND r.confirmed = 0",
            child_table = child.table(),
            child_column = child.foreign_key(),
        ));
    }

    let sql = format!(
        "SELECT owner, COUNT(1) FROM ({owners}) WHERE owner IS NOT NULL GROUP BY owner"
    );
    let pending = {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![target.id], |row| {
            Ok((row.get::<_, ProfileId>(0)?, row.get::<_, i64>(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    for (owner, count) in pending {
        conn.execute(
            "UPDATE profiles SET task = MAX(task - ?2, 0) WHERE id = ?1",
            params![owner, count],
        )?;
        debug!(owner, count, "Released pending tasks");
    }
    Ok(())
}

impl Store {
    /// Load one entity by id
    pub fn get<C: Content>(&self, id: EntityId) -> Result<C, StoreError> {
        debug!(kind = %C::KIND, id, "Loading content");
        get_in(&self.conn, id)
    }

    /// List entities of one kind in id order
    pub fn list<C: Content>(&self, filter: &ListFilter) -> Result<Vec<C>, StoreError> {
        let parent_clause = match (C::KIND.parent(), filter.parent) {
            (Some(parent), Some(_)) => format!("{} = ?2", parent.foreign_key()),
            (None, Some(_)) => {
                return Err(FieldErrors::single(
                    "parent",
                    format!("A {} has no parent to filter by.", C::KIND),
                )
                .into())
            }
            (_, None) => "?2 IS NULL".to_string(),
        };

        let sql = format!(
            "SELECT {} FROM {} WHERE (?1 = 0 OR visible = 1) AND {parent_clause} \
             ORDER BY id ASC LIMIT ?3",
            C::COLUMNS,
            C::KIND.table()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![filter.visible_only, filter.parent, to_sqlite_limit(filter.limit)],
            C::from_row,
        )?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn create_library(
        &mut self,
        mut new: NewLibrary,
        creator: ProfileId,
    ) -> Result<Library, StoreError> {
        trim_label(&mut new.name);
        let tx = self.write_tx()?;
        ensure_profile(&tx, creator)?;

        let mut errors = FieldErrors::new();
        check_label(&tx, ContentKind::Library, &new.name, None, &mut errors)?;
        errors.max_length("description", &new.description, DESCRIPTION_MAX);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "INSERT INTO libraries(name, description, creator_id, timestamp, visible) \
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![new.name, new.description, creator, Utc::now()],
        )
        .map_err(|err| map_unique_conflict(err, "name"))?;
        let library: Library = get_in(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        info!(id = library.id, name = %library.name, creator, "Library created");
        Ok(library)
    }

    pub fn create_function(
        &mut self,
        mut new: NewFunction,
        creator: ProfileId,
    ) -> Result<Function, StoreError> {
        trim_label(&mut new.name);
        let tx = self.write_tx()?;
        ensure_profile(&tx, creator)?;

        let mut errors = FieldErrors::new();
        check_parent(&tx, ContentRef::library(new.library), &mut errors)?;
        check_label(&tx, ContentKind::Function, &new.name, None, &mut errors)?;
        check_function_fields(&new.description, &new.example, &mut errors);
        check_tag(&tx, ContentKind::Function, new.tag, &mut errors)?;
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "INSERT INTO functions(library_id, name, description, example, instance, tag_id, \
             creator_id, timestamp, visible) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
            params![
                new.library,
                new.name,
                new.description,
                new.example,
                new.instance,
                new.tag,
                creator,
                Utc::now(),
            ],
        )
        .map_err(|err| map_unique_conflict(err, "name"))?;
        let function: Function = get_in(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        info!(
            id = function.id,
            library = function.library,
            name = %function.name,
            creator,
            "Function created"
        );
        Ok(function)
    }

    pub fn create_topic(
        &mut self,
        mut new: NewTopic,
        creator: ProfileId,
    ) -> Result<Topic, StoreError> {
        trim_label(&mut new.title);
        let tx = self.write_tx()?;
        ensure_profile(&tx, creator)?;

        let mut errors = FieldErrors::new();
        check_label(&tx, ContentKind::Topic, &new.title, None, &mut errors)?;
        errors.max_length("description", &new.description, DESCRIPTION_MAX);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "INSERT INTO topics(title, description, creator_id, timestamp, visible) \
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![new.title, new.description, creator, Utc::now()],
        )
        .map_err(|err| map_unique_conflict(err, "title"))?;
        let topic: Topic = get_in(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        info!(id = topic.id, title = %topic.title, creator, "Topic created");
        Ok(topic)
    }

    pub fn create_skill(
        &mut self,
        mut new: NewSkill,
        creator: ProfileId,
    ) -> Result<Skill, StoreError> {
        trim_label(&mut new.title);
        let tx = self.write_tx()?;
        ensure_profile(&tx, creator)?;

        let mut errors = FieldErrors::new();
        check_parent(&tx, ContentRef::topic(new.topic), &mut errors)?;
        check_label(&tx, ContentKind::Skill, &new.title, None, &mut errors)?;
        errors.max_length("background", &new.background, DESCRIPTION_MAX);
        check_tag(&tx, ContentKind::Skill, new.tag, &mut errors)?;
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "INSERT INTO skills(topic_id, title, background, solution, tag_id, creator_id, \
             timestamp, visible) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
            params![
                new.topic,
                new.title,
                new.background,
                new.solution,
                new.tag,
                creator,
                Utc::now(),
            ],
        )
        .map_err(|err| map_unique_conflict(err, "title"))?;
        let skill: Skill = get_in(&tx, tx.last_insert_rowid())?;
        tx.commit()?;

        info!(id = skill.id, topic = skill.topic, title = %skill.title, creator, "Skill created");
        Ok(skill)
    }

    /// Apply changes and refresh the timestamp
    pub fn update_library(
        &mut self,
        id: EntityId,
        changes: LibraryChanges,
    ) -> Result<Library, StoreError> {
        let tx = self.write_tx()?;
        let mut library: Library = get_in(&tx, id)?;
        changes.apply(&mut library);
        trim_label(&mut library.name);

        let mut errors = FieldErrors::new();
        check_label(&tx, ContentKind::Library, &library.name, Some(id), &mut errors)?;
        errors.max_length("description", &library.description, DESCRIPTION_MAX);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "UPDATE libraries SET name = ?2, description = ?3, timestamp = ?4 WHERE id = ?1",
            params![id, library.name, library.description, Utc::now()],
        )
        .map_err(|err| map_unique_conflict(err, "name"))?;
        let library = get_in(&tx, id)?;
        tx.commit()?;

        info!(id, "Library updated");
        Ok(library)
    }

    pub fn update_function(
        &mut self,
        id: EntityId,
        changes: FunctionChanges,
    ) -> Result<Function, StoreError> {
        let tx = self.write_tx()?;
        let mut function: Function = get_in(&tx, id)?;
        changes.apply(&mut function);
        trim_label(&mut function.name);

        let mut errors = FieldErrors::new();
        check_label(&tx, ContentKind::Function, &function.name, Some(id), &mut errors)?;
        check_function_fields(&function.description, &function.example, &mut errors);
        check_tag(&tx, ContentKind::Function, function.tag, &mut errors)?;
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "UPDATE functions SET name = ?2, description = ?3, example = ?4, instance = ?5, \
             tag_id = ?6, timestamp = ?7 WHERE id = ?1",
            params![
                id,
                function.name,
                function.description,
                function.example,
                function.instance,
                function.tag,
                Utc::now(),
            ],
        )
        .map_err(|err| map_unique_conflict(err, "name"))?;
        let function = get_in(&tx, id)?;
        tx.commit()?;

        info!(id, "Function updated");
        Ok(function)
    }

    pub fn update_topic(
        &mut self,
        id: EntityId,
        changes: TopicChanges,
    ) -> Result<Topic, StoreError> {
        let tx = self.write_tx()?;
        let mut topic: Topic = get_in(&tx, id)?;
        changes.apply(&mut topic);
        trim_label(&mut topic.title);

        let mut errors = FieldErrors::new();
        check_label(&tx, ContentKind::Topic, &topic.title, Some(id), &mut errors)?;
        errors.max_length("description", &topic.description, DESCRIPTION_MAX);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "UPDATE topics SET title = ?2, description = ?3, timestamp = ?4 WHERE id = ?1",
            params![id, topic.title, topic.description, Utc::now()],
        )
        .map_err(|err| map_unique_conflict(err, "title"))?;
        let topic = get_in(&tx, id)?;
        tx.commit()?;

        info!(id, "Topic updated");
        Ok(topic)
    }

    pub fn update_skill(
        &mut self,
        id: EntityId,
        changes: SkillChanges,
    ) -> Result<Skill, StoreError> {
        let tx = self.write_tx()?;
        let mut skill: Skill = get_in(&tx, id)?;
        changes.apply(&mut skill);
        trim_label(&mut skill.title);

        let mut errors = FieldErrors::new();
        check_label(&tx, ContentKind::Skill, &skill.title, Some(id), &mut errors)?;
        errors.max_length("background", &skill.background, DESCRIPTION_MAX);
        check_tag(&tx, ContentKind::Skill, skill.tag, &mut errors)?;
        if !errors.is_empty() {
            return Err(errors.into());
        }

        tx.execute(
            "UPDATE skills SET title = ?2, background = ?3, solution = ?4, tag_id = ?5, \
             timestamp = ?6 WHERE id = ?1",
            params![
                id,
                skill.title,
                skill.background,
                skill.solution,
                skill.tag,
                Utc::now(),
            ],
        )
        .map_err(|err| map_unique_conflict(err, "title"))?;
        let skill = get_in(&tx, id)?;
        tx.commit()?;

        info!(id, "Skill updated");
        Ok(skill)
    }

    /// Soft-delete an entity.
    ///
    /// Returns `false` when it was already hidden; hiding again changes
    /// nothing, not even the timestamp.
    pub fn hide(&mut self, target: ContentRef) -> Result<bool, StoreError> {
        let tx = self.write_tx()?;
        let sql = format!("SELECT visible FROM {} WHERE id = ?1", target.kind.table());
        let visible: bool = tx
            .query_row(&sql, params![target.id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StoreError::not_found(target.kind.as_str(), target.id))?;

        if !visible {
            debug!(%target, "Already hidden");
            return Ok(false);
        }

        tx.execute(
            &format!(
                "UPDATE {} SET visible = 0, timestamp = ?2 WHERE id = ?1",
                target.kind.table()
            ),
            params![target.id, Utc::now()],
        )?;
        tx.commit()?;

        info!(%target, "Content hidden");
        Ok(true)
    }

    /// Hard-delete an entity with its children and request logs
    pub fn delete(&mut self, target: ContentRef) -> Result<CascadeReport, StoreError> {
        let tx = self.write_tx()?;
        if !content_exists(&tx, target)? {
            return Err(StoreError::not_found(target.kind.as_str(), target.id));
        }

        let column = target.kind.foreign_key();
        let report = match target.kind.child() {
            Some(child) => {
                let children: i64 = tx.query_row(
                    &format!("SELECT COUNT(1) FROM {} WHERE {column} = ?1", child.table()),
                    params![target.id],
                    |row| row.get(0),
                )?;
                let requests: i64 = tx.query_row(
                    &format!(
                        "SELECT COUNT(1) FROM request_logs WHERE {column} = ?1 \
                         OR {child_column} IN (SELECT id FROM {child_table} WHERE {column} = ?1)",
                        child_column = child.foreign_key(),
                        child_table = child.table(),
                    ),
                    params![target.id],
                    |row| row.get(0),
                )?;
                CascadeReport {
                    children: children as usize,
                    requests: requests as usize,
                }
            }
            None => {
                let requests: i64 = tx.query_row(
                    &format!("SELECT COUNT(1) FROM request_logs WHERE {column} = ?1"),
                    params![target.id],
                    |row| row.get(0),
                )?;
                CascadeReport {
                    children: 0,
                    requests: requests as usize,
                }
            }
        };

        release_tasks(&tx, target)?;
        tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", target.kind.table()),
            params![target.id],
        )?;
        tx.commit()?;

        info!(
            %target,
            children = report.children,
            requests = report.requests,
            "Content deleted"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_profile() -> (Store, ProfileId) {
        let mut store = Store::open_in_memory().unwrap();
        let account = store.create_account("ann").unwrap();
        let profile = store.create_profile(account.id, "Ann").unwrap();
        (store, profile.id)
    }

    fn library(name: &str) -> NewLibrary {
        NewLibrary {
            name: name.to_string(),
            description: "standard library module".to_string(),
        }
    }

    #[test]
    fn test_create_library_defaults() {
        let (mut store, creator) = store_with_profile();
        let lib = store.create_library(library("os"), creator).unwrap();

        assert!(lib.visible);
        assert_eq!(lib.creator, Some(creator));
        assert_eq!(store.get::<Library>(lib.id).unwrap(), lib);
    }

    #[test]
    fn test_label_length_bound() {
        let (mut store, creator) = store_with_profile();
        let err = store
            .create_library(library(&"x".repeat(21)), creator)
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("name"));

        // Exactly at the bound is fine
        store.create_library(library(&"x".repeat(20)), creator).unwrap();
    }

    #[test]
    fn test_list_rejects_parent_for_top_level_kind() {
        let (store, _) = store_with_profile();
        let err = store
            .list::<Library>(&ListFilter::all().with_parent(1))
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("parent"));
    }

    #[test]
    fn test_check_tag_uses_kind_category() {
        let (mut store, _) = store_with_profile();
        let tag = store.add_tag(TagCategory::Library, "path").unwrap();

        let mut errors = FieldErrors::new();
        check_tag(&store.conn, ContentKind::Function, Some(tag.id), &mut errors).unwrap();
        assert!(errors.is_empty());

        check_tag(&store.conn, ContentKind::Skill, Some(tag.id), &mut errors).unwrap();
        assert!(errors.contains("tag"));

        let mut errors = FieldErrors::new();
        check_tag(&store.conn, ContentKind::Library, Some(tag.id), &mut errors).unwrap();
        assert!(errors.contains("tag"));
    }

    #[test]
    fn test_list_limit() {
        let (mut store, creator) = store_with_profile();
        for name in ["os", "sys", "re"] {
            store.create_library(library(name), creator).unwrap();
        }

        let libs = store.list::<Library>(&ListFilter::all().with_limit(2)).unwrap();
        assert_eq!(libs.len(), 2);
        assert_eq!(libs[0].name, "os");
    }

    #[test]
    fn test_update_keeps_own_name() {
        let (mut store, creator) = store_with_profile();
        let lib = store.create_library(library("os"), creator).unwrap();

        let updated = store
            .update_library(
                lib.id,
                LibraryChanges {
                    name: Some("os".to_string()),
                    description: Some("operating system interfaces".to_string()),
                },
            )
            .unwrap();

        assert_eq!(updated.description, "operating system interfaces");
        assert!(updated.timestamp >= lib.timestamp);
    }

    #[test]
    fn test_unknown_creator_is_not_found() {
        let (mut store, _) = store_with_profile();
        let err = store.create_library(library("os"), 999).unwrap_err();
        assert!(err.is_not_found());
    }
}
