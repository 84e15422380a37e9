//! # stockbook-db: Database Layer + Ledger Engine for Stockbook
//!
//! This crate provides storage and the stock ledger engine for Stockbook.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  Request handler (POST /api/stock, GET /api/stock/dashboard)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockbook-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ LedgerEngine  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (ledger.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ the ONLY      │    │ 001_init.sql │  │   │
//! │  │   │ Lifecycle     │    │ quantity      │    │              │  │   │
//! │  │   │ Management    │    │ writer        │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                    │   │
//! │  │   ┌───────▼────────────────────────────────────────────────┐  │   │
//! │  │   │  Repositories: ProductRepository, MovementRepository,  │  │   │
//! │  │   │  UserRepository (the inventory store)                  │  │   │
//! │  │   └────────────────────────────────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration, lifecycle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`ledger`] - The ledger engine (movement recording + dashboard stats)
//! - [`repository`] - Repository implementations (product, movement, user)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let config = DbConfig::new("path/to/stockbook.db");
//! let db = Database::new(config).await?;
//!
//! // Record a movement through the ledger
//! let movement = db.ledger().record_movement(Some(&user_id), &request).await?;
//!
//! // Dashboard
//! let stats = db.ledger().get_stats().await?;
//!
//! // Shutdown
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use ledger::LedgerEngine;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::movement::MovementRepository;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
