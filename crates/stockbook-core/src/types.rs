//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Movement     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  product_id     │   │  username       │       │
//! │  │  quantity       │   │  type IN/OUT    │   └─────────────────┘       │
//! │  │  threshold      │   │  quantity ≥ 1   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────────┐     │
//! │  │  MovementType   │   │  Wire shapes (camelCase JSON)           │     │
//! │  │  ─────────────  │   │  ─────────────────────────────────────  │     │
//! │  │  In  ("IN")     │   │  MovementRequest, StatsSnapshot,        │     │
//! │  │  Out ("OUT")    │   │  LowStockProduct, RecentMovement        │     │
//! │  └─────────────────┘   └─────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products carry two identifiers:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `sku`: business key - human-readable, unique, immutable after creation

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Movement Type
// =============================================================================

/// The direction of a stock movement.
///
/// Stored and serialized as `"IN"` / `"OUT"`, matching the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// Stock received (purchase, return, correction upward).
    In,
    /// Stock removed (sale, damage, correction downward).
    Out,
}

impl MovementType {
    /// Returns the signed quantity delta this movement applies to a product.
    ///
    /// `IN` adds, `OUT` subtracts. The caller is responsible for the
    /// non-negativity check on the resulting quantity.
    #[inline]
    pub const fn signed_delta(&self, quantity: i64) -> i64 {
        match self {
            MovementType::In => quantity,
            MovementType::Out => -quantity,
        }
    }

    /// Returns the canonical wire representation (`"IN"` / `"OUT"`).
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "IN",
            MovementType::Out => "OUT",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(MovementType::In),
            "OUT" => Ok(MovementType::Out),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["IN".to_string(), "OUT".to_string()],
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked by the inventory store.
///
/// `quantity` is owned by the ledger engine: it starts at 0 on creation and
/// is only ever changed inside the engine's atomic unit. Catalog edits touch
/// the descriptive fields, never the quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier, unique and immutable.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Category label (free-form).
    pub category: String,

    /// Price in cents (smallest currency unit, never floats).
    pub price_cents: i64,

    /// Current on-hand quantity. Invariant: always >= 0.
    pub quantity: i64,

    /// Low-stock alert threshold. A product is low on stock when
    /// `quantity <= low_stock_threshold`.
    pub low_stock_threshold: i64,

    /// Optional description for product details.
    pub description: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether this product is at or below its low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    /// Checks whether an outbound movement of `quantity` can be fulfilled
    /// without driving the stock negative.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

/// Input shape for creating a product.
///
/// Deliberately has no `quantity` field: new products start at 0 and are
/// stocked through the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    /// Defaults to [`crate::DEFAULT_LOW_STOCK_THRESHOLD`] when omitted.
    pub low_stock_threshold: Option<i64>,
    pub description: Option<String>,
}

// =============================================================================
// Movement
// =============================================================================

/// An immutable ledger entry recording a single stock adjustment.
///
/// Movements are append-only: once created they are never mutated or
/// deleted. `product_id` is a weak reference - deleting a product leaves its
/// movements behind as orphaned history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning product (weak reference, not a foreign key).
    pub product_id: String,

    /// Direction of the movement.
    #[serde(rename = "type")]
    pub movement_type: MovementType,

    /// Units moved. Invariant: always >= 1.
    pub quantity: i64,

    /// Optional free-text reason ("Sale", "Purchase", "Damage", ...).
    pub reason: Option<String>,

    /// Acting principal, when known (weak reference to a user id).
    pub performed_by: Option<String>,

    /// Creation timestamp. Immutable, non-decreasing in insertion order.
    pub created_at: DateTime<Utc>,
}

/// Movement request shape consumed from the API layer.
///
/// JSON: `{ "productId": "...", "type": "IN"|"OUT", "quantity": 3,
/// "reason": "Sale" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: Option<String>,
}

// =============================================================================
// User
// =============================================================================

/// A principal that can be attributed on movements.
///
/// Authentication lives outside this system; this is only the directory
/// needed to resolve `performedByName` for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stats Snapshot
// =============================================================================

/// Low-stock projection of a product for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub low_stock_threshold: i64,
}

/// A recent movement with product and principal resolved for display.
///
/// Product fields are `None` for orphaned movements (product deleted after
/// the movement was recorded).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct RecentMovement {
    pub product_name: Option<String>,
    pub product_sku: Option<String>,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: Option<String>,
    pub performed_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Dashboard aggregate returned by the ledger engine's `get_stats`.
///
/// A point-in-time snapshot: the three reads are not transactionally linked
/// to each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub low_stock_products: Vec<LowStockProduct>,
    pub recent_movements: Vec<RecentMovement>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64, threshold: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p1".to_string(),
            sku: "ABC".to_string(),
            name: "Widget".to_string(),
            category: "Hardware".to_string(),
            price_cents: 999,
            quantity,
            low_stock_threshold: threshold,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(MovementType::In.signed_delta(5), 5);
        assert_eq!(MovementType::Out.signed_delta(5), -5);
    }

    #[test]
    fn test_movement_type_parse() {
        assert_eq!("IN".parse::<MovementType>().unwrap(), MovementType::In);
        assert_eq!("OUT".parse::<MovementType>().unwrap(), MovementType::Out);
        assert!("in".parse::<MovementType>().is_err());
        assert!("ADJUST".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_movement_type_json_round_trip() {
        let json = serde_json::to_string(&MovementType::Out).unwrap();
        assert_eq!(json, r#""OUT""#);
        let back: MovementType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MovementType::Out);
    }

    #[test]
    fn test_movement_request_wire_shape() {
        let req: MovementRequest = serde_json::from_str(
            r#"{"productId":"p1","type":"OUT","quantity":3,"reason":"Sale"}"#,
        )
        .unwrap();
        assert_eq!(req.product_id, "p1");
        assert_eq!(req.movement_type, MovementType::Out);
        assert_eq!(req.quantity, 3);
        assert_eq!(req.reason.as_deref(), Some("Sale"));
    }

    #[test]
    fn test_is_low_stock_boundary() {
        // 7 > 5: not low; 5 <= 5: low; 0 <= 5: low
        assert!(!product(7, 5).is_low_stock());
        assert!(product(5, 5).is_low_stock());
        assert!(product(0, 5).is_low_stock());
    }

    #[test]
    fn test_can_fulfill() {
        let p = product(10, 5);
        assert!(p.can_fulfill(10));
        assert!(p.can_fulfill(3));
        assert!(!p.can_fulfill(11));
    }
}
