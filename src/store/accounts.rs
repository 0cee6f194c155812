//! Accounts and user profiles.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use super::{ensure_profile, map_unique_conflict, Store, StoreError};
use crate::domain::account::{DISPLAY_NAME_MAX, USERNAME_MAX};
use crate::domain::{Account, AccountId, ProfileId, UserProfile};
use crate::validation::FieldErrors;

const PROFILE_COLUMNS: &str = "id, account_id, display_name, task";

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get(0)?,
        account: row.get(1)?,
        display_name: row.get(2)?,
        task: row.get(3)?,
    })
}

pub(super) fn load_profile(conn: &Connection, id: ProfileId) -> Result<UserProfile, StoreError> {
    conn.query_row(
        &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
        params![id],
        profile_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("profile", id))
}

fn insert_account(conn: &Connection, username: &str) -> Result<Account, StoreError> {
    let username = username.trim();
    let mut errors = FieldErrors::new();
    errors.require("username", username);
    errors.max_length("username", username, USERNAME_MAX);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    conn.execute("INSERT INTO accounts(username) VALUES (?1)", params![username])
        .map_err(|err| map_unique_conflict(err, "username"))?;
    Ok(Account {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
    })
}

fn insert_profile(
    conn: &Connection,
    account: AccountId,
    display_name: &str,
) -> Result<UserProfile, StoreError> {
    let display_name = display_name.trim();
    let mut errors = FieldErrors::new();
    errors.max_length("display_name", display_name, DISPLAY_NAME_MAX);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let exists = conn
        .query_row("SELECT 1 FROM accounts WHERE id = ?1", params![account], |_| Ok(()))
        .optional()?
        .is_some();
    if !exists {
        return Err(StoreError::not_found("account", account));
    }

    conn.execute(
        "INSERT INTO profiles(account_id, display_name, task) VALUES (?1, ?2, 0)",
        params![account, display_name],
    )
    .map_err(|err| map_unique_conflict(err, "account"))?;
    Ok(UserProfile {
        id: conn.last_insert_rowid(),
        account,
        display_name: display_name.to_string(),
        task: 0,
    })
}

impl Store {
    /// Register an account handed over by the auth provider
    pub fn create_account(&mut self, username: &str) -> Result<Account, StoreError> {
        let tx = self.write_tx()?;
        let account = insert_account(&tx, username)?;
        tx.commit()?;

        info!(account = account.id, username = %account.username, "Account created");
        Ok(account)
    }

    /// Create an account together with its profile; neither is kept on failure
    pub fn register(
        &mut self,
        username: &str,
        display_name: &str,
    ) -> Result<(Account, UserProfile), StoreError> {
        let tx = self.write_tx()?;
        let account = insert_account(&tx, username)?;
        let profile = insert_profile(&tx, account.id, display_name)?;
        tx.commit()?;

        info!(
            account = account.id,
            profile = profile.id,
            username = %account.username,
            "Account registered"
        );
        Ok((account, profile))
    }

    pub fn account_by_username(&self, username: &str) -> Result<Account, StoreError> {
        self.conn
            .query_row(
                "SELECT id, username FROM accounts WHERE username = ?1",
                params![username],
                |row| {
                    Ok(Account {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("account", username))
    }

    /// Delete an account and its profile.
    ///
    /// Content and logs created or approved by the profile are kept; their
    /// creator/approver references are cleared.
    pub fn delete_account(&mut self, id: AccountId) -> Result<(), StoreError> {
        let tx = self.write_tx()?;
        let deleted = tx.execute("DELETE FROM accounts WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::not_found("account", id));
        }
        tx.commit()?;

        info!(account = id, "Account deleted");
        Ok(())
    }

    /// Attach a profile to an account (one per account)
    pub fn create_profile(
        &mut self,
        account: AccountId,
        display_name: &str,
    ) -> Result<UserProfile, StoreError> {
        let tx = self.write_tx()?;
        let profile = insert_profile(&tx, account, display_name)?;
        tx.commit()?;

        info!(profile = profile.id, account, "Profile created");
        Ok(profile)
    }

    pub fn profile(&self, id: ProfileId) -> Result<UserProfile, StoreError> {
        load_profile(&self.conn, id)
    }

    pub fn profile_for_account(&self, account: AccountId) -> Result<UserProfile, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE account_id = ?1"),
                params![account],
                profile_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("profile", format!("account {account}")))
    }

    /// Increment a profile's pending-task counter
    pub fn add_task(&mut self, id: ProfileId) -> Result<UserProfile, StoreError> {
        let tx = self.write_tx()?;
        ensure_profile(&tx, id)?;
        tx.execute("UPDATE profiles SET task = task + 1 WHERE id = ?1", params![id])?;
        let profile = load_profile(&tx, id)?;
        tx.commit()?;
        Ok(profile)
    }

    /// Whether anything is waiting on the profile
    pub fn has_task(&self, id: ProfileId) -> Result<bool, StoreError> {
        Ok(self.profile(id)?.has_task())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_roundtrip_and_tasks() {
        let mut store = Store::open_in_memory().unwrap();
        let account = store.create_account("ann").unwrap();
        let profile = store.create_profile(account.id, "Ann").unwrap();

        assert!(!store.has_task(profile.id).unwrap());
        let updated = store.add_task(profile.id).unwrap();
        assert_eq!(updated.task, 1);
        assert!(store.has_task(profile.id).unwrap());

        assert_eq!(store.profile_for_account(account.id).unwrap(), updated);
        assert_eq!(store.account_by_username("ann").unwrap(), account);
    }

    #[test]
    fn test_one_profile_per_account() {
        let mut store = Store::open_in_memory().unwrap();
        let account = store.create_account("ann").unwrap();
        store.create_profile(account.id, "Ann").unwrap();

        let err = store.create_profile(account.id, "Again").unwrap_err();
        assert!(err.field_errors().unwrap().contains("account"));
    }

    #[test]
    fn test_display_name_bound() {
        let mut store = Store::open_in_memory().unwrap();
        let account = store.create_account("ann").unwrap();

        let err = store.create_profile(account.id, "a very long name").unwrap_err();
        assert!(err.field_errors().unwrap().contains("display_name"));
    }

    #[test]
    fn test_duplicate_username() {
        let mut store = Store::open_in_memory().unwrap();
        store.create_account("ann").unwrap();
        let err = store.create_account("ann").unwrap_err();
        assert!(err.field_errors().unwrap().contains("username"));
    }

    #[test]
    fn test_register_is_all_or_nothing() {
        let mut store = Store::open_in_memory().unwrap();

        let err = store.register("ann", "a very long name").unwrap_err();
        assert!(err.field_errors().unwrap().contains("display_name"));
        assert!(store.account_by_username("ann").unwrap_err().is_not_found());

        let (account, profile) = store.register("ann", "Ann").unwrap();
        assert_eq!(profile.account, account.id);
        assert_eq!(store.profile_for_account(account.id).unwrap(), profile);
    }

    #[test]
    fn test_delete_account_removes_profile() {
        let mut store = Store::open_in_memory().unwrap();
        let account = store.create_account("ann").unwrap();
        let profile = store.create_profile(account.id, "Ann").unwrap();

        store.delete_account(account.id).unwrap();
        assert!(store.profile(profile.id).unwrap_err().is_not_found());
        assert!(store.delete_account(account.id).unwrap_err().is_not_found());
    }
}
