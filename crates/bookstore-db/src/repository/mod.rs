//! # Repository Module
//!
//! Database repository implementations for the bookstore.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().create(&new_sale)                                  │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── list(&self, window)                                               │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, input)     ─┐                                       │
//! │  ├── update(&self, id, input)  ├─ one transaction each                 │
//! │  └── delete(&self, id)        ─┘                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`book::BookRepository`] - Book CRUD, search, low-stock report
//! - [`customer::CustomerRepository`] - Customer CRUD and search
//! - [`sale::SaleRepository`] - Sales with stock reconciliation
//! - [`dashboard::DashboardRepository`] - Aggregate counters

pub mod book;
pub mod customer;
pub mod dashboard;
pub mod sale;

use bookstore_core::PageWindow;

/// SQLite treats a negative LIMIT as "no limit".
const NO_LIMIT: i64 = -1;

/// Converts an optional page window into `(limit, offset)` bind values.
pub(crate) fn limit_offset(window: Option<PageWindow>) -> (i64, i64) {
    match window {
        Some(w) => (w.limit_i64(), w.offset_i64()),
        None => (NO_LIMIT, 0),
    }
}

/// Builds a `LIKE` pattern matching `term` anywhere, escaping `%`, `_`
/// and the escape character itself. Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
