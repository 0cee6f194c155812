//! lesspy - catalogue of Python libraries, functions, topics and skills
//!
//! Contributors add content entries, attach tags, and file requests or
//! issues against any entry. Moderators confirm those requests.
//!
//! # Architecture
//!
//! - Content is stored in SQLite; referential rules (cascading deletes,
//!   creators cleared on account removal) live in the schema
//! - Every write runs in a single immediate transaction
//! - Forms validate raw submissions against the choices the store offers
//!   before anything is written, and the store re-checks its own invariants
//!
//! # Modules
//!
//! - `domain`: Data structures (Library, Function, Topic, Skill, RequestLog)
//! - `store`: SQLite persistence and the operations on it
//! - `forms`: Submission validation with per-field errors
//! - `validation`: Field error collection shared by forms and store
//! - `config`: Layered configuration (env, config file, defaults)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Register and act as a user
//! lesspy account add ann --display-name Ann
//! export LESSPY_USER=ann
//!
//! # Add content
//! lesspy library add --name os --description "Operating system interfaces"
//! lesspy function add --library 1 --name os.path.join \
//!     --description "Join path components" --instance "os.path.join(a, b)"
//!
//! # File and approve a request
//! lesspy request file function 1 --subject "typo" --solution "fix it"
//! lesspy request approve 1
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod forms;
pub mod store;
pub mod validation;

// Re-export main types at crate root for convenience
pub use domain::{
    ContentKind, ContentRef, Function, Library, RequestLog, RequestType, Skill, Tag, TagCategory,
    Topic, UserProfile,
};
pub use store::{CascadeReport, ListFilter, Selectable, Store, StoreError};
pub use validation::FieldErrors;
