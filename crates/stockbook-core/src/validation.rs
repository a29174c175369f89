//! # Validation Module
//!
//! Input validation for Stockbook entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (Rust)                                            │
//! │  └── THIS MODULE: names, quantities, ids                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Declared foreign keys                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("name", "Rice").unwrap();
//! validate_quantity("increase", 100).unwrap();
//! assert!(validate_quantity("decrease", -1).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, NewStore, NewTransaction, NewUnit, NewUser};
use crate::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required name-like field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_NAME_LENGTH` characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a free-text description. Empty is allowed.
pub fn validate_description(value: &str) -> ValidationResult<()> {
    if value.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LENGTH,
        });
    }

    Ok(())
}

/// Validates a stock quantity: zero up to `MAX_QUANTITY`.
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a row id supplied by the caller.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::InvalidId {
            field: field.to_string(),
            value: id,
        });
    }

    Ok(())
}

/// Validates an optional reference id (`None` is always fine).
pub fn validate_reference(field: &str, id: Option<i64>) -> ValidationResult<()> {
    match id {
        Some(id) => validate_id(field, id),
        None => Ok(()),
    }
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates user input. The password may not be blank.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_name("username", &user.username)?;

    if user.password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    validate_name("role", &user.role)
}

pub fn validate_new_store(store: &NewStore) -> ValidationResult<()> {
    validate_name("name", &store.name)?;
    validate_description(&store.description)
}

pub fn validate_new_unit(unit: &NewUnit) -> ValidationResult<()> {
    validate_name("name", &unit.name)?;
    validate_description(&unit.description)
}

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &product.name)?;
    validate_reference("store_id", product.store_id)?;
    validate_reference("unit_id", product.unit_id)?;

    if let Some(description) = &product.description {
        validate_description(description)?;
    }

    Ok(())
}

/// Validates a transaction. Both quantities may be nonzero; only negative
/// values are rejected.
pub fn validate_new_transaction(txn: &NewTransaction) -> ValidationResult<()> {
    validate_id("product_id", txn.product_id)?;
    validate_quantity("increase", txn.increase)?;
    validate_quantity("decrease", txn.decrease)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Rice").is_ok());
        assert!(validate_name("name", "أرز").is_ok());
        assert_eq!(
            validate_name("name", "   ").unwrap_err(),
            ValidationError::required("name")
        );
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("increase", 0).is_ok());
        assert!(validate_quantity("increase", 100).is_ok());
        assert!(validate_quantity("decrease", -1).is_err());
        assert!(validate_quantity("increase", MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity("increase", i64::MAX).unwrap_err(),
            ValidationError::TooLarge {
                field: "increase".to_string(),
                max: MAX_QUANTITY,
            }
        );
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("store_id", None).is_ok());
        assert!(validate_reference("store_id", Some(3)).is_ok());
        assert!(validate_reference("store_id", Some(0)).is_err());
    }

    #[test]
    fn test_validate_new_user() {
        let mut user = NewUser {
            username: "amal".to_string(),
            password: "pw".to_string(),
            role: "clerk".to_string(),
        };
        assert!(validate_new_user(&user).is_ok());

        user.password.clear();
        assert_eq!(
            validate_new_user(&user).unwrap_err(),
            ValidationError::required("password")
        );
    }

    #[test]
    fn test_validate_new_transaction() {
        assert!(validate_new_transaction(&NewTransaction::increase(1, 10)).is_ok());
        assert!(validate_new_transaction(&NewTransaction::decrease(1, 0)).is_ok());
        assert!(validate_new_transaction(&NewTransaction::increase(0, 10)).is_err());
        assert!(validate_new_transaction(&NewTransaction::decrease(1, -5)).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct {
            name: "Rice".to_string(),
            store_id: Some(1),
            ..Default::default()
        };
        assert!(validate_new_product(&product).is_ok());

        let unnamed = NewProduct::default();
        assert!(validate_new_product(&unnamed).is_err());
    }
}
