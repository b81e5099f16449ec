//! # Dashboard Repository
//!
//! Aggregate counters shown on the dashboard's summary cards.

use bookstore_core::DashboardStats;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for dashboard aggregations.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    /// Creates a new DashboardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Book, sale and customer counts plus total revenue, read in one
    /// statement so the numbers are consistent with each other.
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        let (total_books, total_sales, total_customers, total_revenue_cents): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM books),
                    (SELECT COUNT(*) FROM sales),
                    (SELECT COUNT(*) FROM customers),
                    (SELECT COALESCE(SUM(amount_cents), 0) FROM sales)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        debug!(
            total_books,
            total_sales, total_customers, total_revenue_cents, "Dashboard stats computed"
        );

        Ok(DashboardStats {
            total_books,
            total_sales,
            total_customers,
            total_revenue_cents,
        })
    }
}
