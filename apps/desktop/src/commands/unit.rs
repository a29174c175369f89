//! # Unit Commands

use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use stockbook_core::{DeleteOutcome, NewUnit, Unit};

pub async fn list_units(db: &DbState) -> Result<Vec<Unit>, ApiError> {
    debug!("list_units command");
    Ok(db.inner().units().list().await?)
}

pub async fn create_unit(db: &DbState, input: NewUnit) -> Result<Unit, ApiError> {
    debug!(name = %input.name, "create_unit command");
    Ok(db.inner().units().create(&input).await?)
}

pub async fn update_unit(db: &DbState, id: i64, input: NewUnit) -> Result<Unit, ApiError> {
    debug!(id, "update_unit command");
    Ok(db.inner().units().update(id, &input).await?)
}

pub async fn delete_unit(db: &DbState, id: i64) -> Result<DeleteOutcome, ApiError> {
    debug!(id, "delete_unit command");
    Ok(db.inner().units().delete(id).await?)
}
