//! Accounts and the profile that extends them.
//!
//! Accounts belong to the external auth provider; lesspy keeps only the id
//! and username so that profiles can reference them.

use serde::{Deserialize, Serialize};

/// Identifier of an external account
pub type AccountId = i64;

/// Identifier of a user profile
pub type ProfileId = i64;

/// Maximum length of a profile display name
pub const DISPLAY_NAME_MAX: usize = 10;

/// Maximum length of an account username
pub const USERNAME_MAX: usize = 150;

/// Minimal record of an externally-managed account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
}

/// Non-auth information about a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: ProfileId,

    /// Owning account (one profile per account)
    pub account: AccountId,

    pub display_name: String,

    /// Number of open requests waiting on this user
    pub task: u32,
}

impl UserProfile {
    /// Bump the pending-task counter
    pub fn add_task(&mut self) {
        self.task = self.task.saturating_add(1);
    }

    /// Whether anything is waiting on this user
    pub fn has_task(&self) -> bool {
        self.task > 0
    }
}
