//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook. It contains the stock-ledger
//! rules as pure types and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockbook Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   API Layer (external)                          │   │
//! │  │    POST /api/stock ──► GET /api/stock/dashboard                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockbook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   error   │  │ validation│                  │   │
//! │  │   │  Product  │  │  Ledger   │  │   rules   │                  │   │
//! │  │   │  Movement │  │  taxonomy │  │   checks  │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               stockbook-db (Database Layer)                     │   │
//! │  │        SQLite store, repositories, LedgerEngine                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Movement, StatsSnapshot, etc.)
//! - [`error`] - The closed ledger-error taxonomy
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Quantities**: Stock and money are i64, never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## The One Invariant That Matters
//!
//! For every product, at all times:
//!
//! ```text
//! quantity == sum(IN movement quantities) - sum(OUT movement quantities)
//! quantity >= 0
//! ```
//!
//! This crate defines the rule; `stockbook-db`'s `LedgerEngine` enforces it
//! inside an atomic unit.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Movement` instead of
// `use stockbook_core::types::Movement`

pub use error::{LedgerError, LedgerResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default low-stock threshold for new products.
///
/// A product is considered low on stock when `quantity <= low_stock_threshold`.
/// Per-product overrides are allowed at creation time.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// How many movements the dashboard's recent-movement feed shows.
pub const RECENT_MOVEMENTS_LIMIT: i64 = 5;
