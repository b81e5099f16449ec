//! # bookstore-core: Pure Business Logic for the Bookstore
//!
//! This crate contains the domain records, money arithmetic, validation
//! rules and the sale/stock reconciliation logic, all as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstore Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React SPA)                         │   │
//! │  │    Inventory ──► Customers ──► Sales ──► Dashboard             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bookstore-api (axum)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bookstore-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ reconcile │  │ validation│  │   │
//! │  │   │   Book    │  │   Money   │  │ SalePlan  │  │   rules   │  │   │
//! │  │   │   Sale    │  │           │  │ Restock   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bookstore-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Book, Customer, Sale) and their inputs
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//! - [`reconcile`] - Stock arithmetic for sale create/update/delete
//!
//! ## Example Usage
//!
//! ```rust
//! use bookstore_core::money::Money;
//! use bookstore_core::reconcile::plan_sale;
//!
//! let plan = plan_sale(Money::from_cents(1000), 5, 3).unwrap();
//! assert_eq!(plan.amount.cents(), 3000);
//! assert_eq!(plan.remaining_stock, 2);
//! ```

pub mod error;
pub mod money;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Default page size when a list request asks for a page without a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound for `limit` on list endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default number of rows on the dashboard's recent sales table.
pub const DEFAULT_RECENT_SALES: u32 = 5;

/// Largest quantity a single sale may record.
///
/// Guards the amount computation against overflow on absurd input.
pub const MAX_SALE_QUANTITY: i64 = 100_000;
