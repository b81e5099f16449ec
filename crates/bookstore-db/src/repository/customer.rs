//! # Customer Repository
//!
//! Database operations for customers. Emails are stored lowercased by the
//! caller (`CustomerInput::normalized`), so the UNIQUE index is effectively
//! case-insensitive.

use bookstore_core::{new_id, Customer, CustomerInput, PageWindow};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{contains_pattern, limit_offset};
use crate::error::{DbError, DbResult};

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, address, created_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists customers ordered by name, optionally filtered and paginated.
    ///
    /// `search` matches name or email (case-insensitive) or phone.
    pub async fn list(
        &self,
        search: Option<&str>,
        window: Option<PageWindow>,
    ) -> DbResult<Vec<Customer>> {
        let pattern = search.map(contains_pattern);
        let (limit, offset) = limit_offset(window);

        debug!(search = ?search, limit, offset, "Listing customers");

        let sql = format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE ?1 IS NULL
               OR name LIKE ?1 ESCAPE '\'
               OR email LIKE ?1 ESCAPE '\'
               OR phone LIKE ?1 ESCAPE '\'
            ORDER BY name COLLATE NOCASE, id
            LIMIT ?2 OFFSET ?3
            "#
        );

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Gets a customer by email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, input: &CustomerInput) -> DbResult<Customer> {
        debug!(email = %input.email, "Inserting customer");

        if self.get_by_email(&input.email).await?.is_some() {
            return Err(DbError::duplicate("Customer", "email", &input.email));
        }

        let customer = Customer {
            id: new_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, phone, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_unique_context("Customer", "email", &customer.email))?;

        info!(id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Replaces every editable field of an existing customer.
    ///
    /// Email uniqueness is only checked when the email changes.
    pub async fn update(&self, id: &str, input: &CustomerInput) -> DbResult<Customer> {
        debug!(id = %id, "Updating customer");

        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;

        if input.email != existing.email && self.get_by_email(&input.email).await?.is_some() {
            return Err(DbError::duplicate("Customer", "email", &input.email));
        }

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                email = ?3,
                phone = ?4,
                address = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_unique_context("Customer", "email", &input.email))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        info!(id = %id, "Customer updated");

        Ok(Customer {
            id: existing.id,
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            created_at: existing.created_at,
        })
    }

    /// Deletes a customer. Their sales history is kept.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        info!(id = %id, "Customer deleted");
        Ok(())
    }

    /// Counts all customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn input(name: &str, email: &str) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
        }
    }

    async fn repo() -> CustomerRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let repo = repo().await;

        let ada = repo.insert(&input("Ada", "ada@example.com")).await.unwrap();
        assert_eq!(repo.get_by_id(&ada.id).await.unwrap(), Some(ada.clone()));
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(&ada.id).await.unwrap();
        assert!(repo.get_by_id(&ada.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&ada.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = repo().await;
        repo.insert(&input("Ada", "ada@example.com")).await.unwrap();

        let err = repo
            .insert(&input("Another Ada", "ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Customer with this email already exists");
    }

    #[tokio::test]
    async fn test_update_email_uniqueness() {
        let repo = repo().await;
        let ada = repo.insert(&input("Ada", "ada@example.com")).await.unwrap();
        repo.insert(&input("Grace", "grace@example.com")).await.unwrap();

        let kept = repo
            .update(&ada.id, &input("Ada Lovelace", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(kept.name, "Ada Lovelace");

        let err = repo
            .update(&ada.id, &input("Ada", "grace@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let err = repo
            .update("missing", &input("X", "x@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_search() {
        let repo = repo().await;
        repo.insert(&input("Grace Hopper", "grace@navy.mil")).await.unwrap();
        repo.insert(&input("Ada Lovelace", "ada@example.com")).await.unwrap();

        let all = repo.list(None, None).await.unwrap();
        assert_eq!(all[0].name, "Ada Lovelace");
        assert_eq!(all[1].name, "Grace Hopper");

        let navy = repo.list(Some("NAVY"), None).await.unwrap();
        assert_eq!(navy.len(), 1);
        assert_eq!(navy[0].name, "Grace Hopper");

        let by_phone = repo.list(Some("0100"), None).await.unwrap();
        assert_eq!(by_phone.len(), 2);
    }
}
