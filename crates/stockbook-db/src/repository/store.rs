//! # Store Repository
//!
//! CRUD for stores (the places products are kept).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbResult, LogFailure};
use stockbook_core::validation::{validate_id, validate_new_store};
use stockbook_core::{DeleteOutcome, NewStore, Store};

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Lists every store in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Store>> {
        debug!("Listing stores");

        let stores =
            sqlx::query_as::<_, Store>("SELECT id, name, description FROM stores ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .log_failure("list_stores")?;

        debug!(count = stores.len(), "Listed stores");
        Ok(stores)
    }

    /// Gets a store by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Store))` - Store found
    /// * `Ok(None)` - Store not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Store>> {
        debug!(id, "Getting store");

        let store =
            sqlx::query_as::<_, Store>("SELECT id, name, description FROM stores WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .log_failure("get_store")?;

        Ok(store)
    }

    /// Creates a store and echoes it back with its generated id.
    pub async fn create(&self, store: &NewStore) -> DbResult<Store> {
        validate_new_store(store)?;
        debug!(name = %store.name, "Creating store");

        let result = sqlx::query("INSERT INTO stores (name, description) VALUES (?1, ?2)")
            .bind(&store.name)
            .bind(&store.description)
            .execute(&self.pool)
            .await
            .log_failure("create_store")?;

        Ok(store.with_id(result.last_insert_rowid()))
    }

    /// Replaces a store's name and description.
    ///
    /// Reports success even when no row has this id.
    pub async fn update(&self, id: i64, store: &NewStore) -> DbResult<Store> {
        validate_id("id", id)?;
        validate_new_store(store)?;
        debug!(id, name = %store.name, "Updating store");

        sqlx::query("UPDATE stores SET name = ?1, description = ?2 WHERE id = ?3")
            .bind(&store.name)
            .bind(&store.description)
            .bind(id)
            .execute(&self.pool)
            .await
            .log_failure("update_store")?;

        Ok(store.with_id(id))
    }

    /// Deletes a store by id. Products pointing at it keep the stale id and
    /// list with no store name.
    pub async fn delete(&self, id: i64) -> DbResult<DeleteOutcome> {
        debug!(id, "Deleting store");

        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .log_failure("delete_store")?;

        Ok(DeleteOutcome::new(result.rows_affected()))
    }

    /// Checks whether a store with this id exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM stores WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .log_failure("store_exists")?;

        Ok(exists)
    }

    /// Counts stores.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await
            .log_failure("count_stores")?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
