//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Catalog CRUD (create, read, list, update, delete)
//! - Keyword search with pagination
//! - Low-stock projection for the dashboard
//!
//! ## What Is Deliberately Missing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Quantity Is Owned by the Ledger Engine                     │
//! │                                                                         │
//! │  insert()          → quantity starts at 0, caller cannot choose it     │
//! │  update_details()  → writes name/category/price/threshold/description, │
//! │                      NEVER the quantity column                          │
//! │                                                                         │
//! │  The only statement that writes products.quantity lives inside         │
//! │  LedgerEngine::record_movement's transaction.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::validation::{
    validate_low_stock_threshold, validate_price_cents, validate_product_name, validate_sku,
};
use stockbook_core::{LowStockProduct, NewProduct, Product, DEFAULT_LOW_STOCK_THRESHOLD};

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str = "id, sku, name, category, price_cents, quantity, \
     low_stock_threshold, description, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.insert(&new_product).await?;
/// let found = repo.get_by_sku("ABC-001").await?;
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

    /// Inserts a new product.
    ///
    /// The product starts with `quantity = 0` regardless of caller input -
    /// stock arrives through the ledger, never through catalog creation.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id and timestamps
    /// * `Err(DbError::Rejected)` - Input failed validation
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, new_product: &NewProduct) -> DbResult<Product> {
        validate_sku(&new_product.sku)?;
        validate_product_name(&new_product.name)?;
        validate_price_cents(new_product.price_cents)?;
        let threshold = new_product
            .low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        validate_low_stock_threshold(threshold)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku: new_product.sku.trim().to_string(),
            name: new_product.name.trim().to_string(),
            category: new_product.category.clone(),
            price_cents: new_product.price_cents,
            quantity: 0,
            low_stock_threshold: threshold,
            description: new_product.description.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, sku, name, category, price_cents, quantity,
                low_stock_threshold, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.quantity)
        .bind(product.low_stock_threshold)
        .bind(&product.description)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products, optionally filtered by a name keyword.
    ///
    /// The keyword filter is a case-insensitive substring match on the name
    /// (SQLite `LIKE` is case-insensitive for ASCII). Results are ordered by
    /// name for stable pagination.
    ///
    /// ## Arguments
    /// * `keyword` - Optional name filter
    /// * `limit` / `offset` - Pagination window
    pub async fn list(
        &self,
        keyword: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Product>> {
        debug!(keyword = ?keyword, limit, offset, "Listing products");

        let products = match keyword {
            Some(kw) if !kw.trim().is_empty() => {
                let pattern = format!("%{}%", kw.trim());
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                     WHERE name LIKE ?1
                     ORDER BY name
                     LIMIT ?2 OFFSET ?3"
                ))
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                     ORDER BY name
                     LIMIT ?1 OFFSET ?2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Counts products, honoring the same keyword filter as [`Self::list`].
    pub async fn count(&self, keyword: Option<&str>) -> DbResult<i64> {
        let count: i64 = match keyword {
            Some(kw) if !kw.trim().is_empty() => {
                let pattern = format!("%{}%", kw.trim());
                sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE name LIKE ?1")
                    .bind(pattern)
                    .fetch_one(&self.pool)
                    .await?
            }
            _ => {
                sqlx::query_scalar("SELECT COUNT(*) FROM products")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Updates a product's descriptive fields.
    ///
    /// Writes name, category, price, threshold, and description. The
    /// `quantity` column is not in the statement: catalog edits can never
    /// move stock.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update_details(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        validate_low_stock_threshold(product.low_stock_threshold)?;

        debug!(id = %product.id, "Updating product details");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                low_stock_threshold = ?5,
                description = ?6,
                updated_at = ?7
            WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.low_stock_threshold)
        .bind(&product.description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Hard delete, matching the catalog contract: movements that reference
    /// the product stay behind as orphaned history and are not cleaned up.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Returns the low-stock projection: every product whose quantity is at
    /// or below its own threshold, smallest quantities first.
    pub async fn low_stock(&self) -> DbResult<Vec<LowStockProduct>> {
        let products = sqlx::query_as::<_, LowStockProduct>(
            "SELECT name, sku, quantity, low_stock_threshold
             FROM products
             WHERE quantity <= low_stock_threshold
             ORDER BY quantity, sku",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use stockbook_core::NewProduct;

    fn new_product(sku: &str, name: &str) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            category: "Hardware".to_string(),
            price_cents: 1099,
            low_stock_threshold: None,
            description: None,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_starts_at_zero_quantity() {
        let db = test_db().await;
        let product = db.products().insert(&new_product("ABC-001", "Widget")).await.unwrap();

        assert_eq!(product.quantity, 0);
        assert_eq!(product.low_stock_threshold, 5);

        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.quantity, 0);
        assert_eq!(fetched.sku, "ABC-001");
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = test_db().await;
        db.products().insert(&new_product("ABC-001", "Widget")).await.unwrap();

        let err = db
            .products()
            .insert(&new_product("ABC-001", "Other Widget"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let db = test_db().await;

        let mut bad_sku = new_product("has space", "Widget");
        assert!(db.products().insert(&bad_sku).await.is_err());

        bad_sku = new_product("ABC-002", "Widget");
        bad_sku.price_cents = -1;
        assert!(db.products().insert(&bad_sku).await.is_err());
    }

    #[tokio::test]
    async fn test_list_keyword_filter_and_pagination() {
        let db = test_db().await;
        db.products().insert(&new_product("A-1", "Alpha Widget")).await.unwrap();
        db.products().insert(&new_product("B-1", "Beta Widget")).await.unwrap();
        db.products().insert(&new_product("C-1", "Gamma Gadget")).await.unwrap();

        let widgets = db.products().list(Some("widget"), 10, 0).await.unwrap();
        assert_eq!(widgets.len(), 2);
        assert_eq!(db.products().count(Some("widget")).await.unwrap(), 2);
        assert_eq!(db.products().count(None).await.unwrap(), 3);

        // Second page of size 2 holds the last product (name order)
        let page = db.products().list(None, 2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Gamma Gadget");
    }

    #[tokio::test]
    async fn test_update_details_does_not_touch_quantity() {
        let db = test_db().await;
        let mut product = db.products().insert(&new_product("ABC-001", "Widget")).await.unwrap();

        product.name = "Renamed Widget".to_string();
        // A stale or hostile quantity on the struct must be ignored
        product.quantity = 999;
        db.products().update_details(&product).await.unwrap();

        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Renamed Widget");
        assert_eq!(fetched.quantity, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let db = test_db().await;
        let err = db.products().delete("nope").await.unwrap_err();
        assert!(matches!(err, crate::error::DbError::NotFound { .. }));
    }
}
