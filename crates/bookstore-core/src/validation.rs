//! # Validation Module
//!
//! Input validation for the bookstore's write paths.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  └── Required markers, number inputs                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handler (Rust)                                           │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── THIS MODULE: field rules, pagination bounds                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (stock >= 0, quantity >= 1)                      │
//! │  └── UNIQUE (books.isbn, customers.email)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookstore_core::validation::{validate_isbn, validate_quantity};
//!
//! validate_isbn("978-0-306-40615-7").unwrap();
//! validate_quantity(3).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{BookInput, CustomerInput, PageWindow};
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_SALE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted book price, in cents ($1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Largest stock count a single book may hold.
pub const MAX_STOCK: i64 = 1_000_000;

const MAX_TEXT_LEN: usize = 200;
const MAX_LONG_TEXT_LEN: usize = 5000;
const MAX_EMAIL_LEN: usize = 254;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required short text field (title, author, name, category).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates an optional free-text field (publisher, description, address).
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > MAX_LONG_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_LONG_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates an ISBN-10 or ISBN-13.
///
/// ## Rules
/// - Hyphens and spaces are ignored
/// - ISBN-10: nine digits followed by a digit or `X`
/// - ISBN-13: thirteen digits
///
/// Check digits are not verified; catalog data in the wild is too dirty.
///
/// ## Example
/// ```rust
/// use bookstore_core::validation::validate_isbn;
///
/// assert!(validate_isbn("0-306-40615-2").is_ok());
/// assert!(validate_isbn("080442957X").is_ok());
/// assert!(validate_isbn("978-0-306-40615-7").is_ok());
/// assert!(validate_isbn("12345").is_err());
/// ```
pub fn validate_isbn(isbn: &str) -> ValidationResult<()> {
    let isbn = isbn.trim();

    if isbn.is_empty() {
        return Err(ValidationError::Required {
            field: "isbn".to_string(),
        });
    }

    let compact: Vec<char> = isbn.chars().filter(|c| *c != '-' && *c != ' ').collect();

    let valid = match compact.len() {
        10 => {
            compact[..9].iter().all(|c| c.is_ascii_digit())
                && (compact[9].is_ascii_digit() || compact[9] == 'X' || compact[9] == 'x')
        }
        13 => compact.iter().all(|c| c.is_ascii_digit()),
        _ => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "isbn".to_string(),
            reason: "must be an ISBN-10 or ISBN-13".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot and does not start or end with one
/// - No whitespace, at most 254 characters
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query, or `None` when blank (meaning "no filter").
pub fn validate_search_query(query: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(None);
    };

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(Some(query.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_SALE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_SALE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_SALE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (giveaways).
///
/// ## Example
/// ```rust
/// use bookstore_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "priceCents".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock count entered through the book form.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates a stock threshold for the low-stock report.
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&threshold) {
        return Err(ValidationError::OutOfRange {
            field: "threshold".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates every field of a book payload.
///
/// Expects an already `normalized()` input.
pub fn validate_book(input: &BookInput) -> ValidationResult<()> {
    validate_text("title", &input.title)?;
    validate_text("author", &input.author)?;
    validate_isbn(&input.isbn)?;
    validate_text("category", &input.category)?;
    validate_price_cents(input.price_cents)?;
    validate_stock(input.stock)?;
    validate_optional_text("publisher", input.publisher.as_deref())?;
    validate_optional_text("description", input.description.as_deref())?;
    Ok(())
}

/// Validates every field of a customer payload.
pub fn validate_customer(input: &CustomerInput) -> ValidationResult<()> {
    validate_text("name", &input.name)?;
    validate_email(&input.email)?;
    validate_optional_text("phone", input.phone.as_deref())?;
    validate_optional_text("address", input.address.as_deref())?;
    Ok(())
}

// =============================================================================
// Pagination
// =============================================================================

/// Resolves `page`/`limit` query parameters into a LIMIT/OFFSET window.
///
/// ## Rules
/// ```text
/// page   limit   → window
/// ─────  ─────   ──────────────────────────────
/// None   None    → None (return every row)
/// None   Some(l) → limit l, offset 0
/// Some(p) None   → limit 10, offset (p-1)*10
/// Some(p) Some(l)→ limit l, offset (p-1)*l
/// ```
/// `limit` is clamped to 1..=100 and page 0 is treated as page 1.
pub fn resolve_page_window(page: Option<u32>, limit: Option<u32>) -> Option<PageWindow> {
    if page.is_none() && limit.is_none() {
        return None;
    }

    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let page = page.unwrap_or(1).max(1);

    Some(PageWindow {
        limit,
        offset: (page - 1).saturating_mul(limit),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_book() -> BookInput {
        BookInput {
            title: "The Hobbit".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            isbn: "978-0547928227".to_string(),
            price_cents: 1499,
            stock: 5,
            category: "Fantasy".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("title", "Dune").is_ok());
        assert!(matches!(
            validate_text("title", "   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_text("title", &"A".repeat(201)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
    }

    #[test]
    fn test_validate_isbn() {
        assert!(validate_isbn("0306406152").is_ok());
        assert!(validate_isbn("0-8044-2957-x").is_ok());
        assert!(validate_isbn("9780306406157").is_ok());
        assert!(validate_isbn("978 0 306 40615 7").is_ok());

        assert!(matches!(validate_isbn(""), Err(ValidationError::Required { .. })));
        assert!(validate_isbn("97803064061").is_err());
        assert!(validate_isbn("X306406152").is_err());
        assert!(validate_isbn("978030640615X").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("a.b+tag@mail.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a@@b.com").is_err());
        assert!(validate_email("a b@c.com").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_SALE_QUANTITY).is_ok());

        assert!(matches!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_SALE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query(None).unwrap(), None);
        assert_eq!(validate_search_query(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_search_query(Some(" tolkien ")).unwrap().as_deref(),
            Some("tolkien")
        );
        assert!(validate_search_query(Some(&"q".repeat(101))).is_err());
    }

    #[test]
    fn test_validate_book() {
        assert!(validate_book(&valid_book()).is_ok());

        let mut missing_category = valid_book();
        missing_category.category = String::new();
        assert!(matches!(
            validate_book(&missing_category),
            Err(ValidationError::Required { field }) if field == "category"
        ));

        let mut negative_stock = valid_book();
        negative_stock.stock = -1;
        assert!(validate_book(&negative_stock).is_err());
    }

    #[test]
    fn test_validate_customer() {
        let customer = CustomerInput {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        assert!(validate_customer(&customer).is_ok());

        let nameless = CustomerInput {
            name: String::new(),
            ..customer
        };
        assert!(validate_customer(&nameless).is_err());
    }

    #[test]
    fn test_resolve_page_window() {
        assert_eq!(resolve_page_window(None, None), None);
        assert_eq!(
            resolve_page_window(Some(1), None),
            Some(PageWindow { limit: 10, offset: 0 })
        );
        assert_eq!(
            resolve_page_window(Some(3), Some(20)),
            Some(PageWindow { limit: 20, offset: 40 })
        );
        assert_eq!(
            resolve_page_window(None, Some(500)),
            Some(PageWindow { limit: 100, offset: 0 })
        );
        assert_eq!(
            resolve_page_window(Some(0), Some(0)),
            Some(PageWindow { limit: 1, offset: 0 })
        );
    }
}
