//! # Ledger Engine
//!
//! The stock-movement ledger and quantity-consistency engine: the only code
//! path in the system that writes `products.quantity`.
//!
//! ## The Atomic Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  record_movement(principal, request)                    │
//! │                                                                         │
//! │  1. Validate input (core crate, no I/O)                                │
//! │       │   quantity >= 1, product id present                            │
//! │       ▼                                                                 │
//! │  2. BEGIN transaction                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Guarded delta update (the serialization point):                    │
//! │                                                                         │
//! │     UPDATE products                                                    │
//! │     SET quantity = quantity + :delta                                   │
//! │     WHERE id = :id AND quantity + :delta >= 0                          │
//! │                                                                         │
//! │       ├── 1 row  → quantity moved, non-negativity held                 │
//! │       │                                                                 │
//! │       └── 0 rows → read product in the SAME transaction to classify:   │
//! │                    missing  → ProductNotFound                          │
//! │                    present  → InsufficientStock (rollback on drop)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. INSERT stock_movements row                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. COMMIT - both writes become visible together, or neither does      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Single Guarded UPDATE
//!
//! The read-modify-write on quantity happens inside one SQL statement, so
//! two concurrent movements against the same product cannot interleave
//! between the read and the write - SQLite's write lock (with busy_timeout)
//! queues them, and the second statement sees the first's committed
//! quantity. Movements against different products only contend on the
//! database-level write lock, never on each other's rows' state.
//!
//! A per-product async mutex would protect tasks in this process only; the
//! database lock holds across processes as well.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::movement::MovementRepository;
use crate::repository::product::ProductRepository;
use stockbook_core::{
    validation::validate_movement, LedgerError, LedgerResult, Movement, MovementRequest, Product,
    StatsSnapshot, RECENT_MOVEMENTS_LIMIT,
};

/// Collapse store faults onto the caller-facing taxonomy.
///
/// A `NotFound` from the store keeps its identity; everything else (pool
/// exhausted, lock timeout, I/O failure) is a retryable `StoreUnavailable`.
impl From<DbError> for LedgerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => LedgerError::ProductNotFound(id),
            other => LedgerError::StoreUnavailable(other.to_string()),
        }
    }
}

/// The stock ledger engine.
///
/// Owns a pool handle (cheap to clone) and exposes exactly two operations
/// to request handlers: [`record_movement`](Self::record_movement) and
/// [`get_stats`](Self::get_stats).
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    pool: SqlitePool,
}

impl LedgerEngine {
    /// Creates a new LedgerEngine.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerEngine { pool }
    }

    /// Records a stock movement and updates the product quantity atomically.
    ///
    /// ## Arguments
    /// * `performed_by` - Acting principal's id, when known
    /// * `request` - The movement to apply (`IN` adds, `OUT` subtracts)
    ///
    /// ## Returns
    /// The created [`Movement`] on success.
    ///
    /// ## Errors
    /// * [`LedgerError::InvalidMovement`] - quantity < 1 or blank product id;
    ///   nothing was read or written
    /// * [`LedgerError::ProductNotFound`] - unknown product id
    /// * [`LedgerError::InsufficientStock`] - the OUT would drive quantity
    ///   negative; quantity and ledger are untouched
    /// * [`LedgerError::StoreUnavailable`] - the atomic unit could not
    ///   complete; no partial write is visible, safe to retry
    ///
    /// ## Retry Semantics
    /// Calls are NOT idempotent: every successful call appends a distinct
    /// ledger entry. They are still safe to retry after a failure, because a
    /// failed attempt leaves no trace.
    pub async fn record_movement(
        &self,
        performed_by: Option<&str>,
        request: &MovementRequest,
    ) -> LedgerResult<Movement> {
        validate_movement(request)?;

        let delta = request.movement_type.signed_delta(request.quantity);

        debug!(
            product_id = %request.product_id,
            movement_type = %request.movement_type,
            quantity = request.quantity,
            "Recording stock movement"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let now = Utc::now();

        // The serialization point: read-modify-write in one statement, with
        // the non-negativity check folded into the WHERE clause.
        let result = sqlx::query(
            "UPDATE products
             SET quantity = quantity + ?2, updated_at = ?3
             WHERE id = ?1 AND quantity + ?2 >= 0",
        )
        .bind(&request.product_id)
        .bind(delta)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            // Nothing moved: either the product doesn't exist or the OUT
            // would go negative. Classify inside the same transaction, then
            // let the drop roll it back.
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, sku, name, category, price_cents, quantity,
                        low_stock_threshold, description, created_at, updated_at
                 FROM products WHERE id = ?1",
            )
            .bind(&request.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?;

            return Err(match product {
                None => LedgerError::ProductNotFound(request.product_id.clone()),
                Some(p) => {
                    warn!(
                        sku = %p.sku,
                        available = p.quantity,
                        requested = request.quantity,
                        "Insufficient stock"
                    );
                    LedgerError::InsufficientStock {
                        sku: p.sku,
                        available: p.quantity,
                        requested: request.quantity,
                    }
                }
            });
        }

        let movement = Movement {
            id: Uuid::new_v4().to_string(),
            product_id: request.product_id.clone(),
            movement_type: request.movement_type,
            quantity: request.quantity,
            reason: request.reason.clone(),
            performed_by: performed_by.map(str::to_string),
            created_at: now,
        };

        sqlx::query(
            "INSERT INTO stock_movements (
                id, product_id, type, quantity, reason, performed_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(&movement.reason)
        .bind(&movement.performed_by)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            movement_type = %movement.movement_type,
            quantity = movement.quantity,
            "Stock movement recorded"
        );

        Ok(movement)
    }

    /// Returns the dashboard aggregate.
    ///
    /// A point-in-time snapshot: total product count, the low-stock set
    /// (`quantity <= low_stock_threshold`), and the
    /// [`RECENT_MOVEMENTS_LIMIT`] most recent movements with product and
    /// principal resolved for display. Read-only; the three reads are not
    /// transactionally linked to each other.
    pub async fn get_stats(&self) -> LedgerResult<StatsSnapshot> {
        let products = ProductRepository::new(self.pool.clone());
        let movements = MovementRepository::new(self.pool.clone());

        let total_products = products.count(None).await?;
        let low_stock_products = products.low_stock().await?;
        let recent_movements = movements.recent(RECENT_MOVEMENTS_LIMIT).await?;

        debug!(
            total_products,
            low_stock = low_stock_products.len(),
            recent = recent_movements.len(),
            "Computed dashboard stats"
        );

        Ok(StatsSnapshot {
            total_products,
            low_stock_count: low_stock_products.len() as i64,
            low_stock_products,
            recent_movements,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockbook_core::{MovementType, NewProduct};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, sku: &str, threshold: i64) -> Product {
        db.products()
            .insert(&NewProduct {
                sku: sku.to_string(),
                name: format!("Product {sku}"),
                category: "Test".to_string(),
                price_cents: 500,
                low_stock_threshold: Some(threshold),
                description: None,
            })
            .await
            .unwrap()
    }

    fn request(product_id: &str, movement_type: MovementType, quantity: i64) -> MovementRequest {
        MovementRequest {
            product_id: product_id.to_string(),
            movement_type,
            quantity,
            reason: Some("Sale".to_string()),
        }
    }

    /// Stocks a product through the ledger (products are created empty).
    async fn stock(db: &Database, product_id: &str, quantity: i64) {
        db.ledger()
            .record_movement(None, &request(product_id, MovementType::In, quantity))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reconciliation_invariant() {
        let db = test_db().await;
        let product = seed_product(&db, "ABC-001", 5).await;
        let ledger = db.ledger();

        for (movement_type, qty) in [
            (MovementType::In, 10),
            (MovementType::Out, 4),
            (MovementType::In, 3),
            (MovementType::Out, 2),
        ] {
            ledger
                .record_movement(None, &request(&product.id, movement_type, qty))
                .await
                .unwrap();
        }

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        let net = db.movements().net_quantity(&product.id).await.unwrap();

        // quantity == sum(IN) - sum(OUT) from a creation value of 0
        assert_eq!(stored.quantity, 10 - 4 + 3 - 2);
        assert_eq!(stored.quantity, net);
        assert_eq!(db.movements().count_for_product(&product.id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_atomic() {
        let db = test_db().await;
        let product = seed_product(&db, "ABC-001", 5).await;
        let ledger = db.ledger();
        stock(&db, &product.id, 10).await;

        // OUT 3 succeeds: 10 -> 7
        ledger
            .record_movement(None, &request(&product.id, MovementType::Out, 3))
            .await
            .unwrap();

        // OUT 10 from 7 must fail and leave no trace
        let err = ledger
            .record_movement(None, &request(&product.id, MovementType::Out, 10))
            .await
            .unwrap_err();
        match err {
            LedgerError::InsufficientStock {
                sku,
                available,
                requested,
            } => {
                assert_eq!(sku, "ABC-001");
                assert_eq!(available, 7);
                assert_eq!(requested, 10);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 7);
        // Only the IN and the successful OUT are in the ledger
        assert_eq!(db.movements().count_for_product(&product.id).await.unwrap(), 2);

        // 7 > threshold 5: the worked example says this product is NOT low
        // stock, and the feed includes the successful OUT
        let stats = ledger.get_stats().await.unwrap();
        assert_eq!(stats.low_stock_count, 0);
        assert!(stats
            .recent_movements
            .iter()
            .any(|m| m.movement_type == MovementType::Out && m.quantity == 3));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let db = test_db().await;
        let err = db
            .ledger()
            .record_movement(None, &request("no-such-id", MovementType::In, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ProductNotFound(id) if id == "no-such-id"));
        assert_eq!(db.movements().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected_before_store() {
        let db = test_db().await;
        let product = seed_product(&db, "ABC-001", 5).await;
        let ledger = db.ledger();

        for bad in [0, -5] {
            let err = ledger
                .record_movement(None, &request(&product.id, MovementType::In, bad))
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidMovement(_)));
        }

        assert_eq!(db.movements().count().await.unwrap(), 0);
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 0);
    }

    #[tokio::test]
    async fn test_identical_calls_are_not_deduplicated() {
        let db = test_db().await;
        let product = seed_product(&db, "ABC-001", 5).await;
        let ledger = db.ledger();

        let req = request(&product.id, MovementType::In, 5);
        let first = ledger.record_movement(None, &req).await.unwrap();
        let second = ledger.record_movement(None, &req).await.unwrap();

        assert_ne!(first.id, second.id);
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 10);
        assert_eq!(db.movements().count_for_product(&product.id).await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_outs_serialize() {
        // A file-backed database so multiple pooled connections genuinely
        // contend on the write lock.
        let path = std::env::temp_dir().join(format!("stockbook-test-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();

        let product = seed_product(&db, "ABC-001", 5).await;
        stock(&db, &product.id, 8).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = db.ledger();
            let product_id = product.id.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .record_movement(None, &request(&product_id, MovementType::Out, 1))
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 0);
        // 1 stocking IN + 8 OUTs
        assert_eq!(db.movements().count_for_product(&product.id).await.unwrap(), 9);

        db.close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_stats_snapshot() {
        let db = test_db().await;
        let ledger = db.ledger();
        let admin = db.users().insert("warehouse-admin").await.unwrap();

        // low: quantity 2 <= threshold 5. boundary: 5 <= 5 is also low.
        let low = seed_product(&db, "LOW-001", 5).await;
        let boundary = seed_product(&db, "EDGE-001", 5).await;
        let healthy = seed_product(&db, "OK-001", 5).await;
        stock(&db, &low.id, 2).await;
        stock(&db, &boundary.id, 5).await;
        stock(&db, &healthy.id, 50).await;

        ledger
            .record_movement(
                Some(&admin.id),
                &request(&healthy.id, MovementType::Out, 1),
            )
            .await
            .unwrap();

        let stats = ledger.get_stats().await.unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.low_stock_count, 2);
        let low_skus: Vec<&str> = stats
            .low_stock_products
            .iter()
            .map(|p| p.sku.as_str())
            .collect();
        assert!(low_skus.contains(&"LOW-001"));
        assert!(low_skus.contains(&"EDGE-001"));
        assert!(!low_skus.contains(&"OK-001"));

        // Newest first, principal resolved to username
        let newest = &stats.recent_movements[0];
        assert_eq!(newest.movement_type, MovementType::Out);
        assert_eq!(newest.product_sku.as_deref(), Some("OK-001"));
        assert_eq!(newest.performed_by_name.as_deref(), Some("warehouse-admin"));
    }

    #[tokio::test]
    async fn test_recent_feed_limit_and_order() {
        let db = test_db().await;
        let product = seed_product(&db, "ABC-001", 5).await;
        let ledger = db.ledger();

        // 7 movements of increasing quantity; the feed keeps the last 5
        for qty in 1..=7 {
            ledger
                .record_movement(None, &request(&product.id, MovementType::In, qty))
                .await
                .unwrap();
        }

        let stats = ledger.get_stats().await.unwrap();
        let quantities: Vec<i64> = stats.recent_movements.iter().map(|m| m.quantity).collect();
        assert_eq!(quantities, vec![7, 6, 5, 4, 3]);
    }

    #[tokio::test]
    async fn test_orphaned_movements_stay_in_feed() {
        let db = test_db().await;
        let product = seed_product(&db, "GONE-001", 5).await;
        let ledger = db.ledger();
        stock(&db, &product.id, 4).await;

        db.products().delete(&product.id).await.unwrap();

        // The movement survives the product; product fields come back null
        let stats = ledger.get_stats().await.unwrap();
        assert_eq!(stats.recent_movements.len(), 1);
        assert!(stats.recent_movements[0].product_sku.is_none());
        assert_eq!(stats.recent_movements[0].quantity, 4);
        assert_eq!(db.movements().count().await.unwrap(), 1);
    }
}
