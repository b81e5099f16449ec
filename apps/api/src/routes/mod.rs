//! # HTTP Handlers
//!
//! One module per resource. Each exposes a `router()` that `build_router`
//! nests under `/api/<resource>`.
//!
//! ```text
//! GET    /api/books               list (search, page, limit)
//! GET    /api/books/low-stock     stock <= threshold
//! GET    /api/books/{id}          get
//! POST   /api/books               create            → 201
//! PUT    /api/books/{id}          replace
//! DELETE /api/books/{id}          delete            → { message }
//!
//! /api/customers                  same shape as books (no low-stock)
//!
//! GET    /api/sales               list (page, limit), newest first
//! GET    /api/sales/recent        joined with book title and customer name
//! POST   /api/sales               create + stock decrement
//! PUT    /api/sales/{id}          partial update + stock reconciliation
//! DELETE /api/sales/{id}          delete + stock restore
//!
//! GET    /api/dashboard/stats     headline counters
//! ```

pub mod books;
pub mod customers;
pub mod dashboard;
pub mod sales;

use serde::Serialize;

/// Body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        MessageResponse { message }
    }
}
