//! # Store Commands

use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use stockbook_core::{DeleteOutcome, NewStore, Store};

pub async fn list_stores(db: &DbState) -> Result<Vec<Store>, ApiError> {
    debug!("list_stores command");
    Ok(db.inner().stores().list().await?)
}

pub async fn get_store(db: &DbState, id: i64) -> Result<Store, ApiError> {
    debug!(id, "get_store command");
    db.inner()
        .stores()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", id))
}

pub async fn create_store(db: &DbState, input: NewStore) -> Result<Store, ApiError> {
    debug!(name = %input.name, "create_store command");
    Ok(db.inner().stores().create(&input).await?)
}

pub async fn update_store(db: &DbState, id: i64, input: NewStore) -> Result<Store, ApiError> {
    debug!(id, "update_store command");
    Ok(db.inner().stores().update(id, &input).await?)
}

pub async fn delete_store(db: &DbState, id: i64) -> Result<DeleteOutcome, ApiError> {
    debug!(id, "delete_store command");
    Ok(db.inner().stores().delete(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_store_round_trip() {
        let db = state().await;
        let input = NewStore {
            name: "Main".to_string(),
            description: "Warehouse".to_string(),
        };

        let created = create_store(&db, input.clone()).await.unwrap();
        assert_eq!(get_store(&db, created.id).await.unwrap(), input.with_id(created.id));

        delete_store(&db, created.id).await.unwrap();
        let err = get_store(&db, created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
