//! Command-line interface for lesspy.
//!
//! Stands in for the web layer: arguments are packed into `FormData`, the
//! matching form validates them against choices loaded from the store, and
//! only then is the store called.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::{self, ResolvedConfig};
use crate::domain::{
    ContentKind, ContentRef, EntityId, Function, Library, NewRequest, ProfileId, RequestFilter,
    RequestId, Skill, TagCategory, TagId, Topic,
};
use crate::forms::{
    FormData, FunctionRequestForm, LibraryRequestForm, ProfileForm, SkillRequestForm, TagForm,
    TextForm, TopicRequestForm,
};
use crate::store::{Content, ListFilter, Selectable, Store, StoreError};
use crate::validation::FieldErrors;

mod catalog;
mod output;

pub use catalog::{FunctionCommands, LibraryCommands, SkillCommands, TopicCommands};

/// lesspy - catalogue of Python libraries, functions, topics and skills
#[derive(Parser, Debug)]
#[command(name = "lesspy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true, env = "LESSPY_DB")]
    pub db: Option<PathBuf>,

    /// Username to act as
    #[arg(long = "as", global = true, env = "LESSPY_USER", value_name = "USERNAME")]
    pub user: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database if it does not exist
    Init,

    /// Show resolved configuration (debug)
    Config,

    /// Manage accounts and profiles
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Manage site texts
    Text {
        #[command(subcommand)]
        command: TextCommands,
    },

    /// Add or edit libraries
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },

    /// Add or edit functions
    Function {
        #[command(subcommand)]
        command: FunctionCommands,
    },

    /// Add or edit topics
    Topic {
        #[command(subcommand)]
        command: TopicCommands,
    },

    /// Add or edit skills
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },

    /// List content of one kind
    List {
        #[arg(value_enum)]
        kind: KindArg,

        /// Include hidden entries
        #[arg(long)]
        all: bool,

        /// Only children of this library/topic id
        #[arg(long)]
        parent: Option<EntityId>,

        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one content entry
    Show {
        #[arg(value_enum)]
        kind: KindArg,
        id: EntityId,
    },

    /// Hide a content entry from listings
    Hide {
        #[arg(value_enum)]
        kind: KindArg,
        id: EntityId,
    },

    /// Permanently delete a content entry, its children and their requests
    Delete {
        #[arg(value_enum)]
        kind: KindArg,
        id: EntityId,
    },

    /// File, approve and list requests/issues
    Request {
        #[command(subcommand)]
        command: RequestCommands,
    },

    /// Show the options a form would offer
    Choices {
        #[arg(value_enum)]
        what: ChoiceArg,

        /// Library id for functions, topic id for skills
        #[arg(long)]
        parent: Option<EntityId>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Register an account and its profile
    Add {
        username: String,

        /// Display name (max 10 characters)
        #[arg(long, default_value = "")]
        display_name: String,
    },

    /// Delete an account; its content and requests are kept
    Remove { username: String },

    /// Show an account's profile
    Show { username: String },
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Add a tag
    Add {
        #[arg(value_enum)]
        category: CategoryArg,
        label: String,
    },

    /// List tags in insertion order
    List {
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },

    /// Delete a tag; tagged entries become untagged
    Remove { id: TagId },
}

#[derive(Subcommand, Debug)]
pub enum TextCommands {
    /// Create or replace a text
    Put {
        name: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },

    Show { name: String },

    List,
}

#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// File a request or issue against a content entry
    File {
        #[arg(value_enum)]
        kind: KindArg,
        id: EntityId,

        #[arg(long = "type", value_enum, default_value = "request")]
        request_type: RequestTypeArg,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        solution: String,

        #[arg(long)]
        note: Option<String>,
    },

    /// Confirm a request as the current user
    Approve { id: RequestId },

    Show { id: RequestId },

    /// List requests, oldest first
    List {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// Only requests against this id (requires --kind)
        #[arg(long, requires = "kind")]
        target: Option<EntityId>,

        /// Only unconfirmed requests
        #[arg(long, conflicts_with = "confirmed")]
        pending: bool,

        /// Only confirmed requests
        #[arg(long)]
        confirmed: bool,
    },
}

/// Content kind for CLI (maps to ContentKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Library,
    Function,
    Topic,
    Skill,
}

impl From<KindArg> for ContentKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Library => ContentKind::Library,
            KindArg::Function => ContentKind::Function,
            KindArg::Topic => ContentKind::Topic,
            KindArg::Skill => ContentKind::Skill,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Library,
    Topic,
}

impl From<CategoryArg> for TagCategory {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Library => TagCategory::Library,
            CategoryArg::Topic => TagCategory::Topic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RequestTypeArg {
    Request,
    Issue,
}

impl RequestTypeArg {
    fn as_str(self) -> &'static str {
        match self {
            RequestTypeArg::Request => "request",
            RequestTypeArg::Issue => "issue",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ChoiceArg {
    Libraries,
    Functions,
    Topics,
    Skills,
    LibraryTags,
    TopicTags,
}

/// Open store plus the caller's identity and output settings
pub(crate) struct Session {
    pub store: Store,
    pub user: Option<String>,
    pub json: bool,
    pub list_limit: usize,
}

impl Session {
    fn open(db: Option<PathBuf>, user: Option<String>, json: bool) -> Result<Self> {
        let config = config::config()?;
        let database = db.unwrap_or_else(|| config.database.clone());
        let store = Store::open(&database)
            .with_context(|| format!("Failed to open database: {}", database.display()))?;

        Ok(Self {
            store,
            user: user.or_else(|| config.user.clone()),
            json,
            list_limit: config.list_limit,
        })
    }

    /// Profile of the acting user
    pub fn current_profile(&self) -> Result<ProfileId> {
        let username = self
            .user
            .as_deref()
            .context("No user given. Use --as <username> or set LESSPY_USER")?;
        let account = self.store.account_by_username(username)?;
        Ok(self.store.profile_for_account(account.id)?.id)
    }

    /// Print a value as JSON or with the given table printer
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, table: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table(value);
        }
        Ok(())
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let Cli {
            db,
            user,
            json,
            command,
        } = self;

        match command {
            Commands::Config => show_config(config::config()?),
            command => {
                let mut session = Session::open(db, user, json)?;
                run(&mut session, command)
            }
        }
    }
}

fn run(session: &mut Session, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            let path = session.store.path().map(|p| p.display().to_string());
            println!("Database ready: {}", path.unwrap_or_default());
            Ok(())
        }
        Commands::Config => show_config(config::config()?),
        Commands::Account { command } => execute_account(session, command),
        Commands::Tag { command } => execute_tag(session, command),
        Commands::Text { command } => execute_text(session, command),
        Commands::Library { command } => catalog::execute_library(session, command),
        Commands::Function { command } => catalog::execute_function(session, command),
        Commands::Topic { command } => catalog::execute_topic(session, command),
        Commands::Skill { command } => catalog::execute_skill(session, command),
        Commands::List {
            kind,
            all,
            parent,
            limit,
        } => {
            let filter = ListFilter {
                visible_only: !all,
                parent,
                limit: Some(limit.unwrap_or(session.list_limit)),
            };
            list_content(session, kind.into(), &filter)
        }
        Commands::Show { kind, id } => show_content(session, ContentRef::new(kind.into(), id)),
        Commands::Hide { kind, id } => {
            let target = ContentRef::new(kind.into(), id);
            if session.store.hide(target)? {
                println!("Hidden {}", target);
            } else {
                println!("{} was already hidden", target);
            }
            Ok(())
        }
        Commands::Delete { kind, id } => {
            let target = ContentRef::new(kind.into(), id);
            let report = session.store.delete(target)?;
            session.emit(&report, |r| {
                println!(
                    "Deleted {} ({} children, {} requests)",
                    target, r.children, r.requests
                )
            })
        }
        Commands::Request { command } => execute_request(session, command),
        Commands::Choices { what, parent } => show_choices(session, what, parent),
    }
}

/// Process exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<StoreError>() {
        return match err {
            StoreError::Validation(_) => 2,
            StoreError::NotFound { .. } => 3,
            _ => 1,
        };
    }
    if err.downcast_ref::<FieldErrors>().is_some() {
        return 2;
    }
    1
}

/// Print a failed command's error, one line per field error
pub fn report(err: &anyhow::Error) {
    let fields = err
        .downcast_ref::<FieldErrors>()
        .or_else(|| err.downcast_ref::<StoreError>().and_then(StoreError::field_errors));

    match fields {
        Some(fields) => {
            eprintln!("Error: invalid input");
            for field in fields.fields() {
                for message in fields.get(field) {
                    eprintln!("  {field}: {message}");
                }
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!("Home:       {}", config.home.display());
    println!("Database:   {}", config.database.display());
    println!(
        "Config:     {}",
        config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("User:       {}", config.user.as_deref().unwrap_or("(none)"));
    println!("List limit: {}", config.list_limit);
    Ok(())
}

fn execute_account(session: &mut Session, command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::Add {
            username,
            display_name,
        } => {
            let display_name =
                ProfileForm.validate(&FormData::from_pairs([("display_name", display_name)]))?;
            let (account, profile) = session.store.register(&username, &display_name)?;
            session.emit(&profile, |p| {
                println!("Created account {} (profile {})", account.username, p.id)
            })
        }
        AccountCommands::Remove { username } => {
            let account = session.store.account_by_username(&username)?;
            session.store.delete_account(account.id)?;
            println!("Removed account {}", username);
            Ok(())
        }
        AccountCommands::Show { username } => {
            let account = session.store.account_by_username(&username)?;
            let profile = session.store.profile_for_account(account.id)?;
            session.emit(&profile, output::print_profile)
        }
    }
}

fn execute_tag(session: &mut Session, command: TagCommands) -> Result<()> {
    match command {
        TagCommands::Add { category, label } => {
            let category: TagCategory = category.into();
            let input = TagForm.validate(&FormData::from_pairs([
                ("classes", category.to_string()),
                ("tag", label),
            ]))?;
            let tag = session.store.add_tag(input.category, &input.label)?;
            session.emit(&tag, |t| println!("Added {} tag {} ({})", t.category, t.id, t.label))
        }
        TagCommands::List { category } => {
            let tags = session.store.list_tags(category.map(Into::into))?;
            session.emit(tags.as_slice(), output::print_tags)
        }
        TagCommands::Remove { id } => {
            session.store.delete_tag(id)?;
            println!("Removed tag {}", id);
            Ok(())
        }
    }
}

fn execute_text(session: &mut Session, command: TextCommands) -> Result<()> {
    match command {
        TextCommands::Put {
            name,
            title,
            content,
        } => {
            let input = TextForm.validate(&FormData::from_pairs([
                ("name", name),
                ("title", title),
                ("content", content),
            ]))?;
            let text = session
                .store
                .put_text(&input.name, &input.title, &input.content)?;
            session.emit(&text, |t| println!("Saved text {}", t.name))
        }
        TextCommands::Show { name } => {
            let text = session.store.get_text(&name)?;
            session.emit(&text, |t| {
                println!("{}", t.title);
                println!("{}", "=".repeat(t.title.chars().count()));
                println!("{}", t.content);
            })
        }
        TextCommands::List => {
            let texts = session.store.list_texts()?;
            session.emit(texts.as_slice(), |texts| {
                for t in texts {
                    println!("{:<12} {}", t.name, t.title);
                }
            })
        }
    }
}

fn list_content(session: &Session, kind: ContentKind, filter: &ListFilter) -> Result<()> {
    match kind {
        ContentKind::Library => {
            let rows = session.store.list::<Library>(filter)?;
            session.emit(rows.as_slice(), output::print_content_rows)
        }
        ContentKind::Function => {
            let rows = session.store.list::<Function>(filter)?;
            session.emit(rows.as_slice(), output::print_content_rows)
        }
        ContentKind::Topic => {
            let rows = session.store.list::<Topic>(filter)?;
            session.emit(rows.as_slice(), output::print_content_rows)
        }
        ContentKind::Skill => {
            let rows = session.store.list::<Skill>(filter)?;
            session.emit(rows.as_slice(), output::print_content_rows)
        }
    }
}

fn show_content(session: &Session, target: ContentRef) -> Result<()> {
    let requests = session
        .store
        .list_requests(&RequestFilter::for_target(target))?;

    match target.kind {
        ContentKind::Library => {
            let library: Library = session.store.get(target.id)?;
            session.emit(&library, output::print_library)?;
        }
        ContentKind::Function => {
            let function: Function = session.store.get(target.id)?;
            session.emit(&function, output::print_function)?;
        }
        ContentKind::Topic => {
            let topic: Topic = session.store.get(target.id)?;
            session.emit(&topic, output::print_topic)?;
        }
        ContentKind::Skill => {
            let skill: Skill = session.store.get(target.id)?;
            session.emit(&skill, output::print_skill)?;
        }
    }

    if !session.json && !requests.is_empty() {
        println!();
        output::print_requests(&requests);
    }
    Ok(())
}

fn execute_request(session: &mut Session, command: RequestCommands) -> Result<()> {
    match command {
        RequestCommands::File {
            kind,
            id,
            request_type,
            subject,
            solution,
            note,
        } => {
            let mut data = FormData::from_pairs([
                ("request_type", request_type.as_str().to_string()),
                ("subject", subject),
                ("solution", solution),
            ]);
            data.set_opt("note", note);

            let creator = session.current_profile()?;
            let new = build_request_form(&session.store, ContentRef::new(kind.into(), id), data)?;
            let log = session.store.file_request(new, creator)?;
            session.emit(&log, |l| {
                println!("Filed {} {} against {}", l.request_type, l.id, l.target)
            })
        }
        RequestCommands::Approve { id } => {
            let approver = session.current_profile()?;
            let log = session.store.approve(id, approver)?;
            session.emit(&log, |l| println!("Approved request {}", l.id))
        }
        RequestCommands::Show { id } => {
            let log = session.store.get_request(id)?;
            session.emit(&log, output::print_request)
        }
        RequestCommands::List {
            kind,
            target,
            pending,
            confirmed,
        } => {
            let kind: Option<ContentKind> = kind.map(Into::into);
            let filter = RequestFilter {
                target: kind.zip(target).map(|(k, id)| ContentRef::new(k, id)),
                kind,
                confirmed: match (pending, confirmed) {
                    (true, _) => Some(false),
                    (_, true) => Some(true),
                    _ => None,
                },
            };
            let logs = session.store.list_requests(&filter)?;
            session.emit(logs.as_slice(), output::print_requests)
        }
    }
}

/// Validate a request submission through the form matching the target kind.
///
/// For functions and skills the parent is looked up first so that the
/// second-level choices are the children of that parent.
fn build_request_form(
    store: &Store,
    target: ContentRef,
    mut data: FormData,
) -> Result<NewRequest> {
    data.set(target.kind.as_str(), target.id.to_string());

    let new = match target.kind {
        ContentKind::Library => {
            LibraryRequestForm::new(store.list_selectable(Selectable::Libraries)?).validate(&data)?
        }
        ContentKind::Topic => {
            TopicRequestForm::new(store.list_selectable(Selectable::Topics)?).validate(&data)?
        }
        ContentKind::Function => {
            let library = parent_of::<Function>(store, target.id, |f| f.library)?;
            data.set_opt("library", library.map(|id| id.to_string()));
            let functions = match library {
                Some(library) => store.list_selectable(Selectable::Functions { library })?,
                None => Vec::new(),
            };
            FunctionRequestForm::new(store.list_selectable(Selectable::Libraries)?, functions)
                .validate(&data)?
        }
        ContentKind::Skill => {
            let topic = parent_of::<Skill>(store, target.id, |s| s.topic)?;
            data.set_opt("topic", topic.map(|id| id.to_string()));
            let skills = match topic {
                Some(topic) => store.list_selectable(Selectable::Skills { topic })?,
                None => Vec::new(),
            };
            SkillRequestForm::new(store.list_selectable(Selectable::Topics)?, skills)
                .validate(&data)?
        }
    };
    Ok(new)
}

/// Parent id of a child entity; `None` when the child does not exist
fn parent_of<C: Content>(
    store: &Store,
    id: EntityId,
    parent: impl Fn(&C) -> EntityId,
) -> Result<Option<EntityId>> {
    match store.get::<C>(id) {
        Ok(child) => Ok(Some(parent(&child))),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn show_choices(session: &Session, what: ChoiceArg, parent: Option<EntityId>) -> Result<()> {
    let selectable = match what {
        ChoiceArg::Libraries => Selectable::Libraries,
        ChoiceArg::Topics => Selectable::Topics,
        ChoiceArg::Functions => Selectable::Functions {
            library: parent.context("--parent <library id> is required for functions")?,
        },
        ChoiceArg::Skills => Selectable::Skills {
            topic: parent.context("--parent <topic id> is required for skills")?,
        },
        ChoiceArg::LibraryTags => Selectable::Tags(TagCategory::Library),
        ChoiceArg::TopicTags => Selectable::Tags(TagCategory::Topic),
    };

    let choices = session.store.list_selectable(selectable)?;
    session.emit(choices.as_slice(), |choices| {
        for c in choices {
            println!("{:<6} {}", c.id, c.label);
        }
    })
}
