//! # Domain Types
//!
//! Records and request payloads shared by the database layer and the API.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      Sale       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  book_id        │   │  id (UUID)      │       │
//! │  │  isbn (unique)  │   │  customer_id    │──►│  email (unique) │       │
//! │  │  price_cents    │   │  quantity       │   │  name           │       │
//! │  │  stock          │   │  amount_cents   │   │  phone          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Inputs:  BookInput, CustomerInput, NewSale, UpdateSale                │
//! │  Views:   SaleDetail, DashboardStats                                   │
//! │  Queries: ListQuery → PageWindow                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every type serializes with camelCase field names (`priceCents`,
//! `publishDate`, `bookId`). Money fields are integer cents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

/// Generates a new entity identifier (UUID v4, hyphenated).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Book
// =============================================================================

/// A title held in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub title: String,

    pub author: String,

    /// International Standard Book Number, unique across the catalog.
    pub isbn: String,

    pub publisher: Option<String>,

    #[ts(as = "Option<String>")]
    pub publish_date: Option<NaiveDate>,

    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Unsold copies on hand. Never negative.
    pub stock: i64,

    pub category: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Payload for creating or replacing a book.
///
/// `PUT /api/books/{id}` replaces every field, the same as the admin form
/// submits on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    /// Defaults to 0 when omitted.
    #[serde(default)]
    pub stock: i64,
    pub category: String,
}

impl BookInput {
    /// Returns a copy with surrounding whitespace removed and blank optional
    /// fields collapsed to `None`.
    pub fn normalized(&self) -> Self {
        BookInput {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            publisher: non_blank(self.publisher.as_deref()),
            publish_date: self.publish_date,
            description: non_blank(self.description.as_deref()),
            price_cents: self.price_cents,
            stock: self.stock,
            category: self.category.trim().to_string(),
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// Unique across customers.
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerInput {
    /// Trims fields and lowercases the email so uniqueness is case-blind.
    pub fn normalized(&self) -> Self {
        CustomerInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: non_blank(self.phone.as_deref()),
            address: non_blank(self.address.as_deref()),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of one book title to one customer.
///
/// `amount_cents` is frozen at `book.price × quantity` as of the last time
/// the quantity or book was set. Later price edits do not touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub book_id: String,
    pub customer_id: String,
    pub quantity: i64,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// A sale joined with the book title and customer name, for the dashboard.
///
/// Either name is `None` when the referenced row has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub id: String,
    pub book_id: String,
    pub customer_id: String,
    pub quantity: i64,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub book_title: Option<String>,
    pub customer_name: Option<String>,
}

/// Payload for recording a sale. `date` defaults to now.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub book_id: String,
    pub customer_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<DateTime<Utc>>,
}

fn default_quantity() -> i64 {
    1
}

/// Payload for editing a sale. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSale {
    #[serde(default)]
    pub book_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<DateTime<Utc>>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_books: i64,
    pub total_sales: i64,
    pub total_customers: i64,
    pub total_revenue_cents: i64,
}

impl DashboardStats {
    /// Returns total revenue as Money.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Query string accepted by the list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// A resolved LIMIT/OFFSET pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u32,
}

impl PageWindow {
    /// LIMIT as the signed integer SQLite binds.
    #[inline]
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }

    /// OFFSET as the signed integer SQLite binds.
    #[inline]
    pub fn offset_i64(&self) -> i64 {
        i64::from(self.offset)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book(stock: i64) -> Book {
        Book {
            id: new_id(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "978-0441013593".to_string(),
            publisher: None,
            publish_date: None,
            description: None,
            price_cents: 999,
            stock,
            category: "Science Fiction".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_book_price() {
        assert_eq!(sample_book(3).price().cents(), 999);
        assert_eq!(sample_book(3).price().to_string(), "$9.99");
    }

    #[test]
    fn test_book_serializes_camel_case() {
        let json = serde_json::to_value(sample_book(1)).unwrap();
        assert!(json.get("priceCents").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("price_cents").is_none());
    }

    #[test]
    fn test_book_input_stock_defaults_to_zero() {
        let input: BookInput = serde_json::from_str(
            r#"{"title":"T","author":"A","isbn":"0-306-40615-2","priceCents":100,"category":"C"}"#,
        )
        .unwrap();
        assert_eq!(input.stock, 0);
        assert!(input.publish_date.is_none());
    }

    #[test]
    fn test_book_input_normalized() {
        let input = BookInput {
            title: "  Dune ".to_string(),
            publisher: Some("   ".to_string()),
            description: Some(" classic ".to_string()),
            ..Default::default()
        };
        let normalized = input.normalized();
        assert_eq!(normalized.title, "Dune");
        assert_eq!(normalized.publisher, None);
        assert_eq!(normalized.description.as_deref(), Some("classic"));
    }

    #[test]
    fn test_customer_input_lowercases_email() {
        let input = CustomerInput {
            name: " Ada ".to_string(),
            email: " Ada@Example.COM ".to_string(),
            ..Default::default()
        };
        let normalized = input.normalized();
        assert_eq!(normalized.name, "Ada");
        assert_eq!(normalized.email, "ada@example.com");
    }

    #[test]
    fn test_new_sale_quantity_defaults_to_one() {
        let sale: NewSale = serde_json::from_str(r#"{"bookId":"b","customerId":"c"}"#).unwrap();
        assert_eq!(sale.quantity, 1);
        assert!(sale.date.is_none());
    }

    #[test]
    fn test_update_sale_absent_fields() {
        let update: UpdateSale = serde_json::from_str(r#"{"quantity":2}"#).unwrap();
        assert_eq!(update.quantity, Some(2));
        assert!(update.book_id.is_none());
        assert!(update.customer_id.is_none());
    }

    #[test]
    fn test_new_id_is_uuid() {
        let id = new_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_id());
    }
}
