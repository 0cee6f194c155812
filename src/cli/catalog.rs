//! Create and edit subcommands for the four content kinds.

use anyhow::Result;
use clap::Subcommand;

use super::{output, Session};
use crate::domain::{
    EntityId, FunctionChanges, LibraryChanges, SkillChanges, TagCategory, TagId, TopicChanges,
};
use crate::forms::{FormData, FunctionForm, LibraryForm, SkillForm, TopicForm};
use crate::store::Selectable;

#[derive(Subcommand, Debug)]
pub enum LibraryCommands {
    /// Add a library (built-in function or module)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },

    /// Change fields of a library
    Edit {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FunctionCommands {
    /// Add a function to a library
    Add {
        /// Library id
        #[arg(long)]
        library: EntityId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Usage text
        #[arg(long)]
        instance: String,
        #[arg(long)]
        example: Option<String>,
        /// Library-category tag id
        #[arg(long)]
        tag: Option<TagId>,
    },

    /// Change fields of a function
    Edit {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        instance: Option<String>,
        #[arg(long)]
        example: Option<String>,
        #[arg(long, conflicts_with = "clear_tag")]
        tag: Option<TagId>,
        /// Remove the tag
        #[arg(long)]
        clear_tag: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TopicCommands {
    /// Add a topic
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },

    /// Change fields of a topic
    Edit {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SkillCommands {
    /// Add a skill under a topic
    Add {
        /// Topic id
        #[arg(long)]
        topic: EntityId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        background: String,
        #[arg(long)]
        solution: String,
        /// Topic-category tag id
        #[arg(long)]
        tag: Option<TagId>,
    },

    /// Change fields of a skill
    Edit {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        background: Option<String>,
        #[arg(long)]
        solution: Option<String>,
        #[arg(long, conflicts_with = "clear_tag")]
        tag: Option<TagId>,
        /// Remove the tag
        #[arg(long)]
        clear_tag: bool,
    },
}

/// `--tag`/`--clear-tag` as a tag change
fn tag_change(tag: Option<TagId>, clear: bool) -> Option<Option<TagId>> {
    if clear {
        Some(None)
    } else {
        tag.map(Some)
    }
}

pub(super) fn execute_library(session: &mut Session, command: LibraryCommands) -> Result<()> {
    let library = match command {
        LibraryCommands::Add { name, description } => {
            let new = LibraryForm.validate(&FormData::from_pairs([
                ("name", name),
                ("description", description),
            ]))?;
            let creator = session.current_profile()?;
            session.store.create_library(new, creator)?
        }
        LibraryCommands::Edit {
            id,
            name,
            description,
        } => session
            .store
            .update_library(id, LibraryChanges { name, description })?,
    };
    session.emit(&library, output::print_library)
}

pub(super) fn execute_function(session: &mut Session, command: FunctionCommands) -> Result<()> {
    let function = match command {
        FunctionCommands::Add {
            library,
            name,
            description,
            instance,
            example,
            tag,
        } => {
            let mut data = FormData::from_pairs([
                ("library", library.to_string()),
                ("name", name),
                ("description", description),
                ("instance", instance),
            ]);
            data.set_opt("example", example);
            data.set_opt("tag", tag.map(|t| t.to_string()));

            let form = FunctionForm::new(
                session.store.list_selectable(Selectable::Libraries)?,
                session
                    .store
                    .list_selectable(Selectable::Tags(TagCategory::Library))?,
            );
            let new = form.validate(&data)?;
            let creator = session.current_profile()?;
            session.store.create_function(new, creator)?
        }
        FunctionCommands::Edit {
            id,
            name,
            description,
            instance,
            example,
            tag,
            clear_tag,
        } => session.store.update_function(
            id,
            FunctionChanges {
                name,
                description,
                example,
                instance,
                tag: tag_change(tag, clear_tag),
            },
        )?,
    };
    session.emit(&function, output::print_function)
}

pub(super) fn execute_topic(session: &mut Session, command: TopicCommands) -> Result<()> {
    let topic = match command {
        TopicCommands::Add { title, description } => {
            let new = TopicForm.validate(&FormData::from_pairs([
                ("title", title),
                ("description", description),
            ]))?;
            let creator = session.current_profile()?;
            session.store.create_topic(new, creator)?
        }
        TopicCommands::Edit {
            id,
            title,
            description,
        } => session
            .store
            .update_topic(id, TopicChanges { title, description })?,
    };
    session.emit(&topic, output::print_topic)
}

pub(super) fn execute_skill(session: &mut Session, command: SkillCommands) -> Result<()> {
    let skill = match command {
        SkillCommands::Add {
            topic,
            title,
            background,
            solution,
            tag,
        } => {
            let mut data = FormData::from_pairs([
                ("topic", topic.to_string()),
                ("title", title),
                ("background", background),
                ("solution", solution),
            ]);
            data.set_opt("tag", tag.map(|t| t.to_string()));

            let form = SkillForm::new(
                session.store.list_selectable(Selectable::Topics)?,
                session
                    .store
                    .list_selectable(Selectable::Tags(TagCategory::Topic))?,
            );
            let new = form.validate(&data)?;
            let creator = session.current_profile()?;
            session.store.create_skill(new, creator)?
        }
        SkillCommands::Edit {
            id,
            title,
            background,
            solution,
            tag,
            clear_tag,
        } => session.store.update_skill(
            id,
            SkillChanges {
                title,
                background,
                solution,
                tag: tag_change(tag, clear_tag),
            },
        )?,
    };
    session.emit(&skill, output::print_skill)
}
