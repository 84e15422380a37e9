//! # Validation Module
//!
//! Input validation utilities for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API layer (external)                                         │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── A bad "type" string already fails MovementType parsing            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── quantity >= 1, product id present                                 │
//! │  └── Runs before any store access                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0) on products                                 │
//! │  ├── CHECK (quantity >= 1) on stock_movements                          │
//! │  └── UNIQUE constraint on sku                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use stockbook_core::validation::{validate_sku, validate_movement};
//! use stockbook_core::{MovementRequest, MovementType};
//!
//! validate_sku("ABC-001").unwrap();
//!
//! let req = MovementRequest {
//!     product_id: "p1".to_string(),
//!     movement_type: MovementType::Out,
//!     quantity: 3,
//!     reason: Some("Sale".to_string()),
//! };
//! validate_movement(&req).unwrap();
//! ```

use crate::error::ValidationError;
use crate::MovementRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Movement Validators
// =============================================================================

/// Validates a movement request before it reaches the store.
///
/// ## Rules
/// - `product_id` must be present (non-blank)
/// - `quantity` must be at least 1
///
/// Type shape is enforced by [`crate::MovementType`] itself: an invalid type
/// string never deserializes into a request.
pub fn validate_movement(req: &MovementRequest) -> ValidationResult<()> {
    if req.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "productId".to_string(),
        });
    }

    validate_movement_quantity(req.quantity)
}

/// Validates a movement quantity.
///
/// ## Rules
/// - Must be at least 1 (a zero or negative movement is meaningless:
///   direction is carried by the type, not the sign)
pub fn validate_movement_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a low-stock threshold.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero means "alert only when empty"
pub fn validate_low_stock_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::OutOfRange {
            field: "lowStockThreshold".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MovementType;

    fn request(product_id: &str, quantity: i64) -> MovementRequest {
        MovementRequest {
            product_id: product_id.to_string(),
            movement_type: MovementType::In,
            quantity,
            reason: None,
        }
    }

    #[test]
    fn test_validate_movement() {
        assert!(validate_movement(&request("p1", 1)).is_ok());
        assert!(validate_movement(&request("p1", 500)).is_ok());

        // Zero and negative quantities rejected
        assert!(validate_movement(&request("p1", 0)).is_err());
        assert!(validate_movement(&request("p1", -3)).is_err());

        // Blank product id rejected
        assert!(validate_movement(&request("", 1)).is_err());
        assert!(validate_movement(&request("   ", 1)).is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(1).is_ok());
        assert!(validate_movement_quantity(0).is_err());
        assert!(validate_movement_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("ABC-001").is_ok());
        assert!(validate_sku("widget_2").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_low_stock_threshold() {
        assert!(validate_low_stock_threshold(0).is_ok());
        assert!(validate_low_stock_threshold(5).is_ok());
        assert!(validate_low_stock_threshold(-1).is_err());
    }
}
