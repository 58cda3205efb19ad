//! Order repository.
//!
//! Orders are written by checkout. The dashboard reads them and updates
//! only their status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use qamar_core::{LineItem, Order, OrderId, OrderStatus, OrderTotals, UserId};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, user_id, first_name, last_name, phone, address, items, \
     subtotal, delivery_fee, discount, total, promo_code, payment_method, status, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: Option<String>,
    first_name: String,
    last_name: String,
    phone: String,
    address: String,
    items: Json<Vec<LineItem>>,
    subtotal: Decimal,
    delivery_fee: Decimal,
    discount: Decimal,
    total: Decimal,
    promo_code: Option<String>,
    payment_method: String,
    status: String,
    created_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            address: row.address,
            items: row.items.0,
            totals: OrderTotals {
                subtotal: row.subtotal,
                delivery_fee: row.delivery_fee,
                discount: row.discount,
                total: row.total,
            },
            promo_code: row.promo_code.filter(|code| !code.is_empty()),
            payment_method: row.payment_method,
            status: row.status,
            created_at: row.created_at,
            user_id: row.user_id.map(UserId::new),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM store.orders ORDER BY created_at DESC NULLS LAST, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM store.orders WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// All orders placed by one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM store.orders WHERE user_id = $1 \
             ORDER BY created_at DESC NULLS LAST, id"
        ))
        .bind(user_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Set an order's status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this id.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE store.orders SET status = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store.orders")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// The most recently placed orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM store.orders \
             ORDER BY created_at DESC NULLS LAST LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> OrderRow {
        OrderRow {
            id: "o1".to_string(),
            user_id: Some("u1".to_string()),
            first_name: "Mona".to_string(),
            last_name: "Adel".to_string(),
            phone: "0100".to_string(),
            address: "Cairo".to_string(),
            items: Json(vec![]),
            subtotal: Decimal::from(100),
            delivery_fee: Decimal::from(20),
            discount: Decimal::ZERO,
            total: Decimal::from(120),
            promo_code: Some(String::new()),
            payment_method: "cash".to_string(),
            status: status.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_row_with_unrecognized_status_converts() {
        let order = Order::from(row("returned"));
        assert_eq!(order.status, "returned");
        assert_eq!(order.known_status(), None);
        assert_eq!(order.progress().current_index, None);
        assert_eq!(order.progress().reached_count(), 0);
    }

    #[test]
    fn test_row_conversion() {
        let order = Order::from(row("processing"));
        assert_eq!(order.known_status(), Some(OrderStatus::Processing));
        assert_eq!(order.promo_code, None);
        assert_eq!(order.user_id, Some(UserId::new("u1")));
        assert!(order.totals.is_consistent());
    }
}
