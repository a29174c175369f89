//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Joined listing (store and unit names resolved in SQL)
//! - CRUD with reference checks on store_id / unit_id
//!
//! ## Weak References
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product → Store / Unit                               │
//! │                                                                         │
//! │  create / update                                                       │
//! │       │                                                                 │
//! │       ├── store_id = None     → accepted                               │
//! │       ├── store_id = Some(3)  → SELECT EXISTS(stores.id = 3)            │
//! │       │                          false → ForeignKeyViolation            │
//! │       └── unit_id: same rule                                           │
//! │                                                                         │
//! │  list / get_by_id (LEFT JOIN)                                          │
//! │       ├── store_id = None       → store_name = None                    │
//! │       └── store deleted later   → store_name = None, store_id kept     │
//! │                                                                         │
//! │  delete                                                                 │
//! │       └── transactions are NOT removed (no cascade)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, LogFailure};
use crate::query::products_query;
use crate::repository::store::StoreRepository;
use crate::repository::unit::UnitRepository;
use stockbook_core::validation::{validate_id, validate_new_product};
use stockbook_core::{DeleteOutcome, NewProduct, Product, ProductDetails};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Listing with store/unit names
/// let products = repo.list().await?;
///
/// // Get by ID
/// let rice = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product with its store and unit names, by id.
    ///
    /// Products with a null or dangling store/unit are included; their names
    /// come back as `None`.
    pub async fn list(&self) -> DbResult<Vec<ProductDetails>> {
        debug!("Listing products");

        let products = products_query(None)
            .build_query_as::<ProductDetails>()
            .fetch_all(&self.pool)
            .await
            .log_failure("list_products")?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(ProductDetails))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<ProductDetails>> {
        debug!(id, "Getting product");

        let product = products_query(Some(id))
            .build_query_as::<ProductDetails>()
            .fetch_optional(&self.pool)
            .await
            .log_failure("get_product")?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// * `DbError::Validation` - blank name, bad ids
    /// * `DbError::ForeignKeyViolation` - store_id / unit_id names a missing row
    pub async fn create(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;
        self.check_references(product).await?;

        debug!(name = %product.name, "Creating product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, store_id, unit_id, created_date, expiry_date, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.name)
        .bind(product.store_id)
        .bind(product.unit_id)
        .bind(product.created_date)
        .bind(product.expiry_date)
        .bind(&product.description)
        .execute(&self.pool)
        .await
        .log_failure("create_product")?;

        let id = result.last_insert_rowid();
        debug!(id, "Product created");

        Ok(product.with_id(id))
    }

    /// Replaces every column of a product.
    ///
    /// Reports success even when no row has this id.
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        validate_id("id", id)?;
        validate_new_product(product)?;
        self.check_references(product).await?;

        debug!(id, name = %product.name, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?1,
                store_id = ?2,
                unit_id = ?3,
                created_date = ?4,
                expiry_date = ?5,
                description = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&product.name)
        .bind(product.store_id)
        .bind(product.unit_id)
        .bind(product.created_date)
        .bind(product.expiry_date)
        .bind(&product.description)
        .bind(id)
        .execute(&self.pool)
        .await
        .log_failure("update_product")?;

        if result.rows_affected() == 0 {
            debug!(id, "Update matched no product");
        }

        Ok(product.with_id(id))
    }

    /// Deletes a product by id.
    ///
    /// Its transactions stay behind as orphans unless foreign keys are
    /// enforced, in which case the delete fails with `ForeignKeyViolation`.
    pub async fn delete(&self, id: i64) -> DbResult<DeleteOutcome> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .log_failure("delete_product")?;

        Ok(DeleteOutcome::new(result.rows_affected()))
    }

    /// Checks whether a product with this id exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .log_failure("product_exists")?;

        Ok(exists)
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .log_failure("count_products")?;

        Ok(count)
    }

    /// Rejects a store_id / unit_id that names a row which does not exist.
    async fn check_references(&self, product: &NewProduct) -> DbResult<()> {
        if let Some(store_id) = product.store_id {
            if !StoreRepository::new(self.pool.clone()).exists(store_id).await? {
                return Err(DbError::dangling("store_id", store_id));
            }
        }

        if let Some(unit_id) = product.unit_id {
            if !UnitRepository::new(self.pool.clone()).exists(unit_id).await? {
                return Err(DbError::dangling("unit_id", unit_id));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use stockbook_core::{NewStore, NewTransaction, NewUnit};

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    async fn seeded() -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .create(&NewStore {
                name: "Main".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        let unit = db
            .units()
            .create(&NewUnit {
                name: "kg".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        (db, store.id, unit.id)
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let (db, store_id, unit_id) = seeded().await;
        let input = NewProduct {
            name: "Rice".to_string(),
            store_id: Some(store_id),
            unit_id: Some(unit_id),
            created_date: day(2024, 1, 1),
            expiry_date: day(2025, 1, 1),
            description: Some("Basmati".to_string()),
        };

        let created = db.products().create(&input).await.unwrap();
        assert_eq!(created, input.with_id(created.id));

        let fetched = db.products().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.to_product(), created);
        assert_eq!(fetched.store_name.as_deref(), Some("Main"));
        assert_eq!(fetched.unit_name.as_deref(), Some("kg"));
    }

    #[tokio::test]
    async fn test_unassigned_product_lists_without_names() {
        let (db, _, _) = seeded().await;
        let loose = db
            .products()
            .create(&NewProduct {
                name: "Loose".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let listed = db.products().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, loose.id);
        assert_eq!(listed[0].store_name, None);
        assert_eq!(listed[0].unit_name, None);
    }

    #[tokio::test]
    async fn test_dangling_store_after_delete_still_lists() {
        let (db, store_id, _) = seeded().await;
        let product = db
            .products()
            .create(&NewProduct {
                name: "Flour".to_string(),
                store_id: Some(store_id),
                ..Default::default()
            })
            .await
            .unwrap();

        db.stores().delete(store_id).await.unwrap();

        let fetched = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.store_id, Some(store_id));
        assert_eq!(fetched.store_name, None);
    }

    #[tokio::test]
    async fn test_missing_reference_rejected() {
        let (db, store_id, _) = seeded().await;

        let err = db
            .products()
            .create(&NewProduct {
                name: "Ghost".to_string(),
                store_id: Some(store_id + 100),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let err = db
            .products()
            .create(&NewProduct {
                name: "Ghost".to_string(),
                unit_id: Some(999),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_every_column() {
        let (db, store_id, unit_id) = seeded().await;
        let created = db
            .products()
            .create(&NewProduct {
                name: "Rice".to_string(),
                store_id: Some(store_id),
                unit_id: Some(unit_id),
                ..Default::default()
            })
            .await
            .unwrap();

        let replacement = NewProduct {
            name: "Brown Rice".to_string(),
            expiry_date: day(2024, 6, 30),
            ..Default::default()
        };
        let updated = db.products().update(created.id, &replacement).await.unwrap();
        assert_eq!(updated, replacement.with_id(created.id));

        let fetched = db.products().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.to_product(), updated);
        assert_eq!(fetched.store_name, None);
    }

    #[tokio::test]
    async fn test_get_missing_and_delete_missing() {
        let (db, _, _) = seeded().await;
        assert_eq!(db.products().get_by_id(77).await.unwrap(), None);

        let outcome = db.products().delete(77).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.rows_affected, 0);
    }

    #[tokio::test]
    async fn test_delete_leaves_orphaned_transactions() {
        let (db, _, _) = seeded().await;
        let rice = db
            .products()
            .create(&NewProduct {
                name: "Rice".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        db.transactions()
            .create(&NewTransaction::increase(rice.id, 10).on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
            .await
            .unwrap();

        let outcome = db.products().delete(rice.id).await.unwrap();
        assert!(outcome.removed());

        let orphans = db
            .transactions()
            .list(&crate::query::TransactionFilter::for_product(rice.id))
            .await
            .unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].product_name, None);
    }

    #[tokio::test]
    async fn test_enforced_foreign_keys_block_delete() {
        let db = Database::new(DbConfig::in_memory().enforce_foreign_keys(true))
            .await
            .unwrap();
        let rice = db
            .products()
            .create(&NewProduct {
                name: "Rice".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        db.transactions()
            .create(&NewTransaction::increase(rice.id, 10))
            .await
            .unwrap();

        let err = db.products().delete(rice.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.products().exists(rice.id).await.unwrap());
    }
}
