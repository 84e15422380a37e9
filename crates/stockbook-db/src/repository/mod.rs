//! # Repository Module
//!
//! Database repository implementations for Stockbook - the inventory store
//! the ledger engine collaborates with.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Request handler                                                       │
//! │       │                                                                 │
//! │       │  db.products().get_by_sku("ABC-001")                           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, new_product)                                        │
//! │  ├── list(&self, keyword, limit, offset)                               │
//! │  └── low_stock(&self)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Deliberate Gap
//!
//! No repository exposes a quantity setter. The read-modify-write on
//! `products.quantity` lives exclusively inside `LedgerEngine`'s transaction,
//! so the reconciliation invariant can't be bypassed from the store layer.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog store operations
//! - [`movement::MovementRepository`] - Read-side of the append-only ledger
//! - [`user::UserRepository`] - Principal directory for attribution

pub mod movement;
pub mod product;
pub mod user;
