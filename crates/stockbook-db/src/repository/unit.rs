//! # Unit Repository
//!
//! CRUD for units of measure.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbResult, LogFailure};
use stockbook_core::validation::{validate_id, validate_new_unit};
use stockbook_core::{DeleteOutcome, NewUnit, Unit};

/// Repository for unit database operations.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    pool: SqlitePool,
}

impl UnitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UnitRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Unit>> {
        debug!("Listing units");

        let units = sqlx::query_as::<_, Unit>("SELECT id, name, description FROM units ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .log_failure("list_units")?;

        Ok(units)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Unit>> {
        debug!(id, "Getting unit");

        let unit =
            sqlx::query_as::<_, Unit>("SELECT id, name, description FROM units WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .log_failure("get_unit")?;

        Ok(unit)
    }

    pub async fn create(&self, unit: &NewUnit) -> DbResult<Unit> {
        validate_new_unit(unit)?;
        debug!(name = %unit.name, "Creating unit");

        let result = sqlx::query("INSERT INTO units (name, description) VALUES (?1, ?2)")
            .bind(&unit.name)
            .bind(&unit.description)
            .execute(&self.pool)
            .await
            .log_failure("create_unit")?;

        Ok(unit.with_id(result.last_insert_rowid()))
    }

    /// Replaces a unit. A missing id is not an error.
    pub async fn update(&self, id: i64, unit: &NewUnit) -> DbResult<Unit> {
        validate_id("id", id)?;
        validate_new_unit(unit)?;
        debug!(id, name = %unit.name, "Updating unit");

        sqlx::query("UPDATE units SET name = ?1, description = ?2 WHERE id = ?3")
            .bind(&unit.name)
            .bind(&unit.description)
            .bind(id)
            .execute(&self.pool)
            .await
            .log_failure("update_unit")?;

        Ok(unit.with_id(id))
    }

    pub async fn delete(&self, id: i64) -> DbResult<DeleteOutcome> {
        debug!(id, "Deleting unit");

        let result = sqlx::query("DELETE FROM units WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .log_failure("delete_unit")?;

        Ok(DeleteOutcome::new(result.rows_affected()))
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM units WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .log_failure("unit_exists")?;

        Ok(exists)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM units")
            .fetch_one(&self.pool)
            .await
            .log_failure("count_units")?;

        Ok(count)
    }
}
