//! # Movement Repository
//!
//! Read-side access to the append-only stock ledger.
//!
//! ## Append-Only Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  stock_movements Is a Ledger                            │
//! │                                                                         │
//! │  Writes:  exactly one INSERT, inside LedgerEngine's transaction        │
//! │  Reads:   this repository (history, feed, reconciliation)              │
//! │  Updates: none, ever                                                   │
//! │  Deletes: none, ever (deleting a product orphans its movements,        │
//! │           it does not remove them)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tie-Breaking
//! The recent feed orders by `created_at DESC` and falls back to the SQLite
//! rowid, so equal timestamps resolve to insertion order and the feed is
//! deterministic for a fixed dataset.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::{Movement, RecentMovement};

/// Repository for stock movement reads.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Lists every movement for a product in insertion order.
    ///
    /// The audit view: replaying these from the product's creation (quantity
    /// 0) must reproduce its current quantity exactly.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(
            "SELECT id, product_id, type AS movement_type, quantity, reason,
                    performed_by, created_at
             FROM stock_movements
             WHERE product_id = ?1
             ORDER BY created_at, rowid",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Returns the most recent movements with product and principal resolved
    /// for display, newest first.
    ///
    /// LEFT JOINs keep orphaned movements visible: a movement whose product
    /// was deleted appears with null product fields rather than vanishing
    /// from history.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<RecentMovement>> {
        debug!(limit, "Fetching recent movements");

        let movements = sqlx::query_as::<_, RecentMovement>(
            "SELECT
                p.name AS product_name,
                p.sku AS product_sku,
                m.type AS movement_type,
                m.quantity,
                m.reason,
                u.username AS performed_by_name,
                m.created_at
             FROM stock_movements m
             LEFT JOIN products p ON p.id = m.product_id
             LEFT JOIN users u ON u.id = m.performed_by
             ORDER BY m.created_at DESC, m.rowid DESC
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Counts all movements in the ledger.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts movements for a single product.
    pub async fn count_for_product(&self, product_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Computes the ledger's net quantity for a product:
    /// `sum(IN quantities) - sum(OUT quantities)`.
    ///
    /// The reconciliation invariant says this always equals the product's
    /// stored quantity. Used by tests and audit tooling.
    pub async fn net_quantity(&self, product_id: &str) -> DbResult<i64> {
        let net: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(CASE type WHEN 'IN' THEN quantity ELSE -quantity END)
             FROM stock_movements
             WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(net.unwrap_or(0))
    }
}
