//! # Book Repository
//!
//! Database operations for books.
//!
//! ## Key Operations
//! - CRUD with ISBN uniqueness
//! - Case-insensitive search on title/author, substring on ISBN
//! - Low-stock report for the dashboard
//!
//! Stock changes caused by sales go through [`super::sale::SaleRepository`],
//! never through this repository.

use bookstore_core::{new_id, Book, BookInput, PageWindow};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{contains_pattern, limit_offset};
use crate::error::{DbError, DbResult};

const BOOK_COLUMNS: &str = "id, title, author, isbn, publisher, publish_date, description, \
                            price_cents, stock, category, created_at";

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// let matches = repo.list(Some("herbert"), None).await?;
/// let book = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists books ordered by title, optionally filtered and paginated.
    ///
    /// ## Arguments
    /// * `search` - Matches title or author (case-insensitive) or ISBN
    /// * `window` - LIMIT/OFFSET; `None` returns every row
    pub async fn list(&self, search: Option<&str>, window: Option<PageWindow>) -> DbResult<Vec<Book>> {
        let pattern = search.map(contains_pattern);
        let (limit, offset) = limit_offset(window);

        debug!(search = ?search, limit, offset, "Listing books");

        let sql = format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE ?1 IS NULL
               OR title LIKE ?1 ESCAPE '\'
               OR author LIKE ?1 ESCAPE '\'
               OR isbn LIKE ?1 ESCAPE '\'
            ORDER BY title COLLATE NOCASE, id
            LIMIT ?2 OFFSET ?3
            "#
        );

        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = books.len(), "Listed books");
        Ok(books)
    }

    /// Gets a book by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - Book not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Book>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1");

        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Gets a book by its ISBN.
    pub async fn get_by_isbn(&self, isbn: &str) -> DbResult<Option<Book>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?1");

        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Inserts a new book.
    ///
    /// `input` must already be normalized and validated.
    ///
    /// ## Returns
    /// * `Ok(Book)` - Inserted book with generated id and timestamp
    /// * `Err(DbError::UniqueViolation)` - ISBN already exists
    pub async fn insert(&self, input: &BookInput) -> DbResult<Book> {
        debug!(isbn = %input.isbn, "Inserting book");

        if self.get_by_isbn(&input.isbn).await?.is_some() {
            return Err(DbError::duplicate("Book", "ISBN", &input.isbn));
        }

        let book = Book {
            id: new_id(),
            title: input.title.clone(),
            author: input.author.clone(),
            isbn: input.isbn.clone(),
            publisher: input.publisher.clone(),
            publish_date: input.publish_date,
            description: input.description.clone(),
            price_cents: input.price_cents,
            stock: input.stock,
            category: input.category.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO books (
                id, title, author, isbn, publisher, publish_date,
                description, price_cents, stock, category, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.publisher)
        .bind(book.publish_date)
        .bind(&book.description)
        .bind(book.price_cents)
        .bind(book.stock)
        .bind(&book.category)
        .bind(book.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_unique_context("Book", "ISBN", &book.isbn))?;

        info!(id = %book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    /// Replaces every editable field of an existing book.
    ///
    /// ISBN uniqueness is only checked when the ISBN changes.
    ///
    /// ## Returns
    /// * `Ok(Book)` - The book as stored after the update
    /// * `Err(DbError::NotFound)` - Book doesn't exist
    /// * `Err(DbError::UniqueViolation)` - New ISBN belongs to another book
    pub async fn update(&self, id: &str, input: &BookInput) -> DbResult<Book> {
        debug!(id = %id, "Updating book");

        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Book", id))?;

        if input.isbn != existing.isbn && self.get_by_isbn(&input.isbn).await?.is_some() {
            return Err(DbError::duplicate("Book", "ISBN", &input.isbn));
        }

        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = ?2,
                author = ?3,
                isbn = ?4,
                publisher = ?5,
                publish_date = ?6,
                description = ?7,
                price_cents = ?8,
                stock = ?9,
                category = ?10
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.isbn)
        .bind(&input.publisher)
        .bind(input.publish_date)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(input.stock)
        .bind(&input.category)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_unique_context("Book", "ISBN", &input.isbn))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        info!(id = %id, "Book updated");

        Ok(Book {
            id: existing.id,
            title: input.title.clone(),
            author: input.author.clone(),
            isbn: input.isbn.clone(),
            publisher: input.publisher.clone(),
            publish_date: input.publish_date,
            description: input.description.clone(),
            price_cents: input.price_cents,
            stock: input.stock,
            category: input.category.clone(),
            created_at: existing.created_at,
        })
    }

    /// Deletes a book.
    ///
    /// Sales that reference the book are kept; their stock restores become
    /// no-ops.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting book");

        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        info!(id = %id, "Book deleted");
        Ok(())
    }

    /// Books with `stock <= threshold`, lowest stock first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Book>> {
        debug!(threshold, "Listing low-stock books");

        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE stock <= ?1 \
             ORDER BY stock ASC, title COLLATE NOCASE"
        );

        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Counts all books.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
