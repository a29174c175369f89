//! # User Commands
//!
//! Account management. Responses never include passwords or hashes.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use stockbook_core::{DeleteOutcome, NewUser, User};

pub async fn list_users(db: &DbState) -> Result<Vec<User>, ApiError> {
    debug!("list_users command");
    Ok(db.inner().users().list().await?)
}

pub async fn create_user(db: &DbState, input: NewUser) -> Result<User, ApiError> {
    debug!(username = %input.username, "create_user command");
    let user = db.inner().users().create(&input).await?;
    info!(id = user.id, role = %user.role, "User created");
    Ok(user)
}

pub async fn update_user(db: &DbState, id: i64, input: NewUser) -> Result<User, ApiError> {
    debug!(id, "update_user command");
    Ok(db.inner().users().update(id, &input).await?)
}

pub async fn delete_user(db: &DbState, id: i64) -> Result<DeleteOutcome, ApiError> {
    debug!(id, "delete_user command");
    Ok(db.inner().users().delete(id).await?)
}

/// Checks credentials.
///
/// ## Returns
/// * `Ok(Some(User))` - username and password match
/// * `Ok(None)` - they don't (the caller can't tell which part was wrong)
pub async fn login(db: &DbState, username: String, password: String) -> Result<Option<User>, ApiError> {
    debug!(username = %username, "login command");
    Ok(db.inner().users().authenticate(&username, &password).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_create_and_login() {
        let db = state().await;
        let created = create_user(
            &db,
            NewUser {
                username: "amal".to_string(),
                password: "pw".to_string(),
                role: "admin".to_string(),
            },
        )
        .await
        .unwrap();

        let json = serde_json::to_value(&created).unwrap();
        assert!(json.get("password").is_none());

        let logged_in = login(&db, "amal".to_string(), "pw".to_string()).await.unwrap();
        assert_eq!(logged_in, Some(created));
        assert_eq!(login(&db, "amal".to_string(), "nope".to_string()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_password_is_validation_error() {
        let db = state().await;
        let err = create_user(
            &db,
            NewUser {
                username: "amal".to_string(),
                password: String::new(),
                role: "clerk".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(list_users(&db).await.unwrap().is_empty());
    }
}
