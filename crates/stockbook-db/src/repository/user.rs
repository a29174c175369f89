//! # User Repository
//!
//! Database operations for user accounts.
//!
//! ## Credential Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where The Password Goes                              │
//! │                                                                         │
//! │  NewUser { username, password, role }                                  │
//! │       │                                                                 │
//! │       ▼  hash_password() → Argon2id PHC string, random salt            │
//! │  users.password_hash                                                    │
//! │                                                                         │
//! │  User { id, username, role }  ← every read and echo; no hash, ever     │
//! │                                                                         │
//! │  authenticate(username, password)                                      │
//! │       │  load hashes for username                                      │
//! │       ▼  verify_password() per candidate                               │
//! │  Some(User) / None                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, LogFailure};
use stockbook_core::validation::{validate_id, validate_new_user};
use stockbook_core::{DeleteOutcome, NewUser, User};

/// Repository for user database operations.
///
/// ## Usage
/// ```rust,ignore
/// let users = db.users();
/// let admin = users.create(&NewUser { .. }).await?;
/// let me = users.authenticate("admin", "secret").await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists every user, oldest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        debug!("Listing users");

        let users = sqlx::query_as::<_, User>("SELECT id, username, role FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .log_failure("list_users")?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Creates a user, storing only a hash of the password.
    ///
    /// ## Returns
    /// The stored record (generated id, no password).
    pub async fn create(&self, user: &NewUser) -> DbResult<User> {
        validate_new_user(user)?;
        debug!(username = %user.username, role = %user.role, "Creating user");

        let password_hash = hash_password(&user.password)?;

        let result = sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3)")
            .bind(&user.username)
            .bind(&password_hash)
            .bind(&user.role)
            .execute(&self.pool)
            .await
            .log_failure("create_user")?;

        Ok(user.with_id(result.last_insert_rowid()))
    }

    /// Replaces a user's username, password and role.
    ///
    /// Reports success even when no row has this id.
    pub async fn update(&self, id: i64, user: &NewUser) -> DbResult<User> {
        validate_id("id", id)?;
        validate_new_user(user)?;
        debug!(id, username = %user.username, "Updating user");

        let password_hash = hash_password(&user.password)?;

        let result = sqlx::query(
            "UPDATE users SET username = ?1, password_hash = ?2, role = ?3 WHERE id = ?4",
        )
        .bind(&user.username)
        .bind(&password_hash)
        .bind(&user.role)
        .bind(id)
        .execute(&self.pool)
        .await
        .log_failure("update_user")?;

        if result.rows_affected() == 0 {
            debug!(id, "Update matched no user");
        }

        Ok(user.with_id(id))
    }

    /// Deletes a user by id.
    pub async fn delete(&self, id: i64) -> DbResult<DeleteOutcome> {
        debug!(id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .log_failure("delete_user")?;

        Ok(DeleteOutcome::new(result.rows_affected()))
    }

    /// Checks a username/password pair.
    ///
    /// Usernames are not unique, so every account with this name is tried in
    /// id order and the first whose hash verifies wins.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - Credentials match
    /// * `Ok(None)` - Unknown username or wrong password
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        debug!(username = %username, "Authenticating user");

        let candidates: Vec<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, username, role, password_hash FROM users WHERE username = ?1 ORDER BY id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .log_failure("authenticate_user")?;

        let user = candidates
            .into_iter()
            .find(|(_, _, _, hash)| verify_password(password, hash))
            .map(|(id, username, role, _)| User { id, username, role });

        debug!(authenticated = user.is_some(), "Authentication finished");
        Ok(user)
    }

    /// Counts users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .log_failure("count_users")?;

        Ok(count)
    }
}

// =============================================================================
// Hashing
// =============================================================================

/// Hashes a password for storage (Argon2id, fresh salt).
fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string. Unparseable hashes never
/// verify.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use stockbook_core::NewUser;

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            role: "clerk".to_string(),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = super::hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(super::verify_password("secret", &hash));
        assert!(!super::verify_password("Secret", &hash));
        assert!(!super::verify_password("secret", "not-a-hash"));
    }

    #[tokio::test]
    async fn test_create_list_and_authenticate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let amal = users.create(&new_user("amal", "pw1")).await.unwrap();
        assert!(amal.id > 0);
        assert_eq!(amal.username, "amal");

        assert_eq!(users.list().await.unwrap(), vec![amal.clone()]);
        assert_eq!(users.authenticate("amal", "pw1").await.unwrap(), Some(amal));
        assert_eq!(users.authenticate("amal", "wrong").await.unwrap(), None);
        assert_eq!(users.authenticate("nobody", "pw1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_plaintext() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().create(&new_user("amal", "pw1")).await.unwrap();

        let stored: String = sqlx::query_scalar("SELECT password_hash FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_ne!(stored, "pw1");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user_succeed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        let echoed = users.update(42, &new_user("ghost", "pw")).await.unwrap();
        assert_eq!(echoed.id, 42);
        assert_eq!(users.count().await.unwrap(), 0);

        let outcome = users.delete(42).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.rows_affected, 0);
    }
}
