//! # Sale Repository
//!
//! Database operations for sales, including the stock reconciliation that
//! accompanies every write.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  Every write below is ONE `BEGIN IMMEDIATE` transaction: writers       │
//! │  queue on the write lock. Any error drops the transaction, which      │
//! │  rolls back every statement before it.                                │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     ├── book exists?              (404 Book)                           │
//! │     ├── customer exists?          (404 Customer)                       │
//! │     ├── UPDATE books SET stock = stock - q WHERE stock >= q            │
//! │     │   (0 rows → InsufficientStock)                                   │
//! │     └── INSERT sale (amount = price × q)                               │
//! │                                                                         │
//! │  2. UPDATE (book or quantity changed)                                  │
//! │     ├── restore old book by old quantity (skipped if book is gone)     │
//! │     ├── deduct new book by new quantity (guarded, as in create)        │
//! │     ├── supplied customer exists?                                      │
//! │     └── UPDATE sale (amount re-derived)                                │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     ├── restore book by quantity (skipped if book is gone)             │
//! │     └── DELETE sale                                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bookstore_core::reconcile::{plan_sale, resolve_update, reversal, SalePlan, StockMovement};
use bookstore_core::validation::validate_quantity;
use bookstore_core::{
    new_id, Book, CoreError, NewSale, PageWindow, Sale, SaleDetail, UpdateSale,
};
use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use super::limit_offset;
use crate::error::{DbError, DbResult};

const SALE_COLUMNS: &str = "id, book_id, customer_id, quantity, amount_cents, date";

const BOOK_COLUMNS: &str = "id, title, author, isbn, publisher, publish_date, description, \
                            price_cents, stock, category, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists sales, newest first.
    pub async fn list(&self, window: Option<PageWindow>) -> DbResult<Vec<Sale>> {
        let (limit, offset) = limit_offset(window);

        debug!(limit, offset, "Listing sales");

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY date DESC, id LIMIT ?1 OFFSET ?2"
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// The most recent sales joined with book title and customer name.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<SaleDetail>> {
        debug!(limit, "Listing recent sales");

        let details = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT
                s.id,
                s.book_id,
                s.customer_id,
                s.quantity,
                s.amount_cents,
                s.date,
                b.title AS book_title,
                c.name AS customer_name
            FROM sales s
            LEFT JOIN books b ON b.id = s.book_id
            LEFT JOIN customers c ON c.id = s.customer_id
            ORDER BY s.date DESC, s.id
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Counts all sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes (transactional)
    // =========================================================================

    /// Opens a transaction holding SQLite's write lock from its first
    /// statement. Concurrent writers wait on `busy_timeout` for their turn.
    async fn begin_write(&self) -> DbResult<Transaction<'static, Sqlite>> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(tx)
    }

    /// Records a sale and takes its copies out of stock.
    ///
    /// ## Errors (checked in this order)
    /// * `Domain(Validation)` - quantity < 1
    /// * `NotFound("Book")` / `NotFound("Customer")`
    /// * `Domain(InsufficientStock)` - stock < quantity
    pub async fn create(&self, input: &NewSale) -> DbResult<Sale> {
        validate_quantity(input.quantity)?;

        debug!(book_id = %input.book_id, quantity = input.quantity, "Creating sale");

        let mut tx = self.begin_write().await?;

        let book = fetch_book(&mut tx, &input.book_id)
            .await?
            .ok_or_else(|| DbError::not_found("Book", &input.book_id))?;

        if !customer_exists(&mut tx, &input.customer_id).await? {
            return Err(DbError::not_found("Customer", &input.customer_id));
        }

        let plan = deduct_stock(&mut tx, &book, input.quantity).await?;

        let sale = Sale {
            id: new_id(),
            book_id: book.id.clone(),
            customer_id: input.customer_id.clone(),
            quantity: input.quantity,
            amount_cents: plan.amount.cents(),
            date: input.date.unwrap_or_else(Utc::now),
        };

        sqlx::query(
            r#"
            INSERT INTO sales (id, book_id, customer_id, quantity, amount_cents, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.book_id)
        .bind(&sale.customer_id)
        .bind(sale.quantity)
        .bind(sale.amount_cents)
        .bind(sale.date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            book_id = %sale.book_id,
            quantity = sale.quantity,
            amount = %sale.amount(),
            remaining_stock = plan.remaining_stock,
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Edits a sale, re-reconciling stock when the book or quantity changes.
    ///
    /// If only the customer or date changes, stock and amount are untouched.
    /// On any error the whole edit is rolled back.
    pub async fn update(&self, id: &str, input: &UpdateSale) -> DbResult<Sale> {
        debug!(id = %id, "Updating sale");

        let mut tx = self.begin_write().await?;

        let original = fetch_sale(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        let revision = resolve_update(&original, input)?;
        let mut amount = original.amount();

        for movement in revision.stock_movements(&original) {
            match movement {
                StockMovement::Restore { book_id, quantity } => {
                    if !restore_stock(&mut tx, &book_id, quantity).await? {
                        warn!(
                            sale_id = %id,
                            book_id = %book_id,
                            "Original book no longer exists, skipping stock restore"
                        );
                    }
                }
                StockMovement::Deduct { book_id, quantity } => {
                    let book = fetch_book(&mut tx, &book_id)
                        .await?
                        .ok_or_else(|| DbError::not_found("Book", &book_id))?;
                    amount = deduct_stock(&mut tx, &book, quantity).await?.amount;
                }
            }
        }

        if revision.customer_changed && !customer_exists(&mut tx, &revision.customer_id).await? {
            return Err(DbError::not_found("Customer", &revision.customer_id));
        }

        let sale = Sale {
            id: original.id,
            book_id: revision.book_id,
            customer_id: revision.customer_id,
            quantity: revision.quantity,
            amount_cents: amount.cents(),
            date: revision.date,
        };

        sqlx::query(
            r#"
            UPDATE sales SET
                book_id = ?2,
                customer_id = ?3,
                quantity = ?4,
                amount_cents = ?5,
                date = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.book_id)
        .bind(&sale.customer_id)
        .bind(sale.quantity)
        .bind(sale.amount_cents)
        .bind(sale.date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            stock_affected = revision.stock_affected,
            quantity = sale.quantity,
            amount = %sale.amount(),
            "Sale updated"
        );

        Ok(sale)
    }

    /// Deletes a sale and returns its copies to stock.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self.begin_write().await?;

        let sale = fetch_sale(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        let movement = reversal(&sale);
        if !restore_stock(&mut tx, movement.book_id(), movement.delta()).await? {
            warn!(
                sale_id = %id,
                book_id = %sale.book_id,
                "Book no longer exists, skipping stock restore"
            );
        }

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(sale_id = %id, restored = sale.quantity, "Sale deleted");
        Ok(())
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================
// These run on the caller's transaction connection. Using the pool here
// instead would deadlock an in-memory database (single connection).

async fn fetch_book(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Book>> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1");

    let book = sqlx::query_as::<_, Book>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(book)
}

async fn fetch_sale(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

    let sale = sqlx::query_as::<_, Sale>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(sale)
}

async fn customer_exists(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

/// Takes `quantity` copies of `book` out of stock.
///
/// The decrement is guarded by `stock >= quantity`, so it can never drive
/// stock negative even if `book` is stale.
async fn deduct_stock(conn: &mut SqliteConnection, book: &Book, quantity: i64) -> DbResult<SalePlan> {
    let plan = plan_sale(book.price(), book.stock, quantity)?;

    let result = sqlx::query("UPDATE books SET stock = stock - ?2 WHERE id = ?1 AND stock >= ?2")
        .bind(&book.id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        let available: i64 = sqlx::query_scalar("SELECT stock FROM books WHERE id = ?1")
            .bind(&book.id)
            .fetch_optional(&mut *conn)
            .await?
            .unwrap_or(0);
        return Err(CoreError::InsufficientStock {
            available,
            requested: quantity,
        }
        .into());
    }

    debug!(book_id = %book.id, quantity, remaining = plan.remaining_stock, "Stock deducted");
    Ok(plan)
}

/// Returns `quantity` copies to a book's stock.
///
/// Returns `false` when the book no longer exists.
async fn restore_stock(conn: &mut SqliteConnection, book_id: &str, quantity: i64) -> DbResult<bool> {
    let result = sqlx::query("UPDATE books SET stock = stock + ?2 WHERE id = ?1")
        .bind(book_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

    debug!(book_id = %book_id, quantity, "Stock restored");
    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================
