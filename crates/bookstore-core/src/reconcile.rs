//! # Stock Reconciliation
//!
//! Pure planning for the stock adjustments that accompany a sale.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale ↔ Stock Reconciliation                          │
//! │                                                                         │
//! │  create(qty)          plan_sale ──► stock -= qty, amount = price × qty │
//! │                                                                         │
//! │  update(book', qty')  resolve_update                                   │
//! │       │                                                                 │
//! │       ├── book/qty unchanged ──► no stock movement, amount kept        │
//! │       │                                                                 │
//! │       └── changed ──► Restore(book, qty)                               │
//! │                       Deduct(book', qty')  (plan_sale again)           │
//! │                                                                         │
//! │  delete               Restore(book, qty)                               │
//! │                                                                         │
//! │  Same book, qty → qty': net stock change = qty - qty'                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer executes these plans inside one transaction, so a
//! failed deduction rolls the restore back with it.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Sale, UpdateSale};
use crate::validation::validate_quantity;

// =============================================================================
// Sale Plan
// =============================================================================

/// Outcome of selling `quantity` copies of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalePlan {
    /// Amount to record on the sale (`price × quantity`).
    pub amount: Money,
    /// Stock left on the book after the sale.
    pub remaining_stock: i64,
}

/// Plans a sale of `quantity` copies at `price` against `stock` on hand.
///
/// ## Errors
/// - `Validation` if quantity is not positive or the amount overflows
/// - `InsufficientStock` if `stock < quantity`
///
/// ## Example
/// ```rust
/// use bookstore_core::money::Money;
/// use bookstore_core::reconcile::plan_sale;
/// use bookstore_core::CoreError;
///
/// let err = plan_sale(Money::from_cents(1000), 2, 3).unwrap_err();
/// assert!(matches!(err, CoreError::InsufficientStock { available: 2, requested: 3 }));
/// ```
pub fn plan_sale(price: Money, stock: i64, quantity: i64) -> CoreResult<SalePlan> {
    validate_quantity(quantity)?;

    if stock < quantity {
        return Err(CoreError::InsufficientStock {
            available: stock,
            requested: quantity,
        });
    }

    let amount = price
        .multiply_quantity(quantity)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 0,
            max: i64::MAX,
        })?;

    Ok(SalePlan {
        amount,
        remaining_stock: stock - quantity,
    })
}

// =============================================================================
// Stock Movements
// =============================================================================

/// A single stock adjustment against one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockMovement {
    /// Put copies back (sale deleted or revised away).
    Restore { book_id: String, quantity: i64 },
    /// Take copies off the shelf (sale recorded or revised onto).
    Deduct { book_id: String, quantity: i64 },
}

impl StockMovement {
    /// The book this movement touches.
    pub fn book_id(&self) -> &str {
        match self {
            StockMovement::Restore { book_id, .. } | StockMovement::Deduct { book_id, .. } => {
                book_id
            }
        }
    }

    /// Signed stock delta (positive restores, negative deducts).
    pub fn delta(&self) -> i64 {
        match self {
            StockMovement::Restore { quantity, .. } => *quantity,
            StockMovement::Deduct { quantity, .. } => -*quantity,
        }
    }
}

/// Movements that undo a recorded sale.
pub fn reversal(sale: &Sale) -> StockMovement {
    StockMovement::Restore {
        book_id: sale.book_id.clone(),
        quantity: sale.quantity,
    }
}

// =============================================================================
// Sale Revision
// =============================================================================

/// A sale update with every absent field filled from the stored sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRevision {
    pub book_id: String,
    pub customer_id: String,
    pub quantity: i64,
    pub date: DateTime<Utc>,
    /// Whether the effective book or quantity differs from the stored sale.
    pub stock_affected: bool,
    /// Whether the request names a customer (which must then exist).
    pub customer_changed: bool,
}

impl SaleRevision {
    /// Ordered stock movements needed to apply this revision.
    ///
    /// Empty when only the customer or date changed. Otherwise the original
    /// quantity is restored before the new quantity is deducted, so a
    /// same-book edit can reuse the copies it releases.
    pub fn stock_movements(&self, original: &Sale) -> Vec<StockMovement> {
        if !self.stock_affected {
            return Vec::new();
        }

        vec![
            reversal(original),
            StockMovement::Deduct {
                book_id: self.book_id.clone(),
                quantity: self.quantity,
            },
        ]
    }
}

/// Merges `update` over `original`, validating any supplied quantity.
///
/// ## Example
/// ```rust
/// use bookstore_core::reconcile::resolve_update;
/// use bookstore_core::{Sale, UpdateSale};
///
/// let sale = Sale {
///     id: "s1".into(),
///     book_id: "b1".into(),
///     customer_id: "c1".into(),
///     quantity: 3,
///     amount_cents: 3000,
///     date: chrono::Utc::now(),
/// };
///
/// let revision = resolve_update(&sale, &UpdateSale { quantity: Some(1), ..Default::default() }).unwrap();
/// assert!(revision.stock_affected);
/// let net: i64 = revision.stock_movements(&sale).iter().map(|m| m.delta()).sum();
/// assert_eq!(net, 2);
/// ```
pub fn resolve_update(original: &Sale, update: &UpdateSale) -> CoreResult<SaleRevision> {
    if let Some(quantity) = update.quantity {
        validate_quantity(quantity)?;
    }

    let book_id = update
        .book_id
        .as_deref()
        .map(str::trim)
        .unwrap_or(original.book_id.as_str())
        .to_string();
    let customer_id = update
        .customer_id
        .as_deref()
        .map(str::trim)
        .unwrap_or(original.customer_id.as_str())
        .to_string();
    let quantity = update.quantity.unwrap_or(original.quantity);

    Ok(SaleRevision {
        stock_affected: book_id != original.book_id || quantity != original.quantity,
        customer_changed: update.customer_id.is_some(),
        book_id,
        customer_id,
        quantity,
        date: update.date.unwrap_or(original.date),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_sale(quantity: i64) -> Sale {
        Sale {
            id: "sale-1".to_string(),
            book_id: "book-1".to_string(),
            customer_id: "cust-1".to_string(),
            quantity,
            amount_cents: 1000 * quantity,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_plan_sale_decrements_and_prices() {
        let plan = plan_sale(Money::from_cents(1000), 5, 3).unwrap();
        assert_eq!(plan.remaining_stock, 2);
        assert_eq!(plan.amount, Money::from_cents(3000));
    }

    #[test]
    fn test_plan_sale_exact_stock() {
        let plan = plan_sale(Money::from_cents(250), 4, 4).unwrap();
        assert_eq!(plan.remaining_stock, 0);
        assert_eq!(plan.amount.cents(), 1000);
    }

    #[test]
    fn test_plan_sale_rejects_oversell() {
        let err = plan_sale(Money::from_cents(1000), 2, 3).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 2,
                requested: 3
            }
        ));
    }

    #[test]
    fn test_plan_sale_rejects_non_positive_quantity() {
        assert!(matches!(
            plan_sale(Money::from_cents(1000), 5, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(plan_sale(Money::from_cents(1000), 5, -2).is_err());
    }

    #[test]
    fn test_plan_sale_amount_overflow() {
        let err = plan_sale(Money::from_cents(i64::MAX), 10, 2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_create_then_delete_restores_stock() {
        let plan = plan_sale(Money::from_cents(1000), 5, 3).unwrap();
        let sale = stored_sale(3);
        let restored = plan.remaining_stock + reversal(&sale).delta();
        assert_eq!(restored, 5);
    }

    #[test]
    fn test_resolve_update_quantity_change() {
        let sale = stored_sale(3);
        let revision = resolve_update(
            &sale,
            &UpdateSale {
                quantity: Some(5),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(revision.stock_affected);
        assert_eq!(revision.book_id, "book-1");
        assert_eq!(revision.customer_id, "cust-1");

        let movements = revision.stock_movements(&sale);
        assert_eq!(
            movements,
            vec![
                StockMovement::Restore {
                    book_id: "book-1".to_string(),
                    quantity: 3
                },
                StockMovement::Deduct {
                    book_id: "book-1".to_string(),
                    quantity: 5
                },
            ]
        );
        let net: i64 = movements.iter().map(StockMovement::delta).sum();
        assert_eq!(net, 3 - 5);
    }

    #[test]
    fn test_resolve_update_book_change() {
        let sale = stored_sale(2);
        let revision = resolve_update(
            &sale,
            &UpdateSale {
                book_id: Some("book-2".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(revision.stock_affected);
        let movements = revision.stock_movements(&sale);
        assert_eq!(movements[0].book_id(), "book-1");
        assert_eq!(movements[0].delta(), 2);
        assert_eq!(movements[1].book_id(), "book-2");
        assert_eq!(movements[1].delta(), -2);
    }

    #[test]
    fn test_resolve_update_customer_only() {
        let sale = stored_sale(2);
        let revision = resolve_update(
            &sale,
            &UpdateSale {
                customer_id: Some("cust-2".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!revision.stock_affected);
        assert!(revision.customer_changed);
        assert_eq!(revision.customer_id, "cust-2");
        assert!(revision.stock_movements(&sale).is_empty());
    }

    #[test]
    fn test_resolve_update_same_values_is_noop() {
        let sale = stored_sale(2);
        let revision = resolve_update(
            &sale,
            &UpdateSale {
                book_id: Some("book-1".to_string()),
                quantity: Some(2),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!revision.stock_affected);
        assert!(!revision.customer_changed);
        assert_eq!(revision.date, sale.date);
    }

    #[test]
    fn test_resolve_update_rejects_bad_quantity() {
        let sale = stored_sale(2);
        let err = resolve_update(
            &sale,
            &UpdateSale {
                quantity: Some(0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
