//! Full in-memory reads of the store for the aggregate views.

use sqlx::PgPool;

use qamar_core::{Order, User};

use crate::db::{OrderRepository, RepositoryError, UserRepository};

/// Every user and every order, fetched together.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub users: Vec<User>,
    pub orders: Vec<Order>,
}

impl StoreSnapshot {
    /// Load users and orders concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first repository error encountered.
    pub async fn load(pool: &PgPool) -> Result<Self, RepositoryError> {
        let users = UserRepository::new(pool);
        let orders = OrderRepository::new(pool);
        let (users, orders) = tokio::try_join!(users.list_all(), orders.list_all())?;
        Ok(Self { users, orders })
    }
}
