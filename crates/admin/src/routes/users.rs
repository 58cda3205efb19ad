//! Storefront user route handlers.
//!
//! Users are read-only here. Each row carries the user's orders so the
//! list can link straight to them.

#![allow(clippy::used_underscore_binding)]

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use qamar_core::{CurrencyCode, Order, OrderId, User, UserId};

use crate::{
    db::{OrderRepository, UserRepository},
    error::AppError,
    middleware::RequireAdminAuth,
    services::{StoreSnapshot, filter_users},
    state::AppState,
};

/// Query parameters for the user list.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    /// Free-text search over name, email and phone.
    pub q: Option<String>,
}

/// Link to one of a user's orders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrderLink {
    pub id: OrderId,
    pub status: String,
    /// `Order #A1 - 120 EGP`.
    pub label: String,
}

impl UserOrderLink {
    fn new(order: &Order, currency: CurrencyCode) -> Self {
        Self {
            id: order.id.clone(),
            status: order.status.clone(),
            label: format!("Order #{} - {}", order.id, currency.amount(order.totals.total)),
        }
    }
}

/// One user with their orders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub products_bought_count: i32,
    pub avg_spent: Decimal,
    pub coupons_used_count: i32,
    pub purchases_without_sale: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub order_count: usize,
    pub orders: Vec<UserOrderLink>,
}

impl UserView {
    fn new(user: &User, orders: &[&Order], currency: CurrencyCode) -> Self {
        let names = user.name_parts();
        Self {
            id: user.id.clone(),
            first_name: names.first_name.to_owned(),
            last_name: names.last_name.to_owned(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            gender: user.gender.clone(),
            age: user.age,
            location: user.location.clone(),
            products_bought_count: user.products_bought_count,
            avg_spent: user.avg_spent,
            coupons_used_count: user.coupons_used_count,
            purchases_without_sale: user.purchases_without_sale,
            created_at: user.created_at,
            order_count: orders.len(),
            orders: orders
                .iter()
                .map(|order| UserOrderLink::new(order, currency))
                .collect(),
        }
    }
}

/// User list with order links.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Vec<UserView>>, AppError> {
    let snapshot = StoreSnapshot::load(state.pool()).await?;

    let mut orders_by_user: HashMap<&UserId, Vec<&Order>> = HashMap::new();
    for order in &snapshot.orders {
        if let Some(user_id) = &order.user_id {
            orders_by_user.entry(user_id).or_default().push(order);
        }
    }

    let currency = state.config().currency;
    let term = query.q.as_deref().unwrap_or_default();
    let views = filter_users(&snapshot.users, term)
        .into_iter()
        .map(|user| {
            let orders = orders_by_user
                .get(&user.id)
                .map_or(&[][..], Vec::as_slice);
            UserView::new(user, orders, currency)
        })
        .collect();

    Ok(Json(views))
}

/// A single user with their orders.
#[instrument(skip(_admin, state), fields(user_id = %id))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, AppError> {
    let id = UserId::new(id);
    let user = UserRepository::new(state.pool())
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    let orders = OrderRepository::new(state.pool()).list_for_user(&id).await?;
    let orders: Vec<&Order> = orders.iter().collect();

    Ok(Json(UserView::new(&user, &orders, state.config().currency)))
}

#[cfg(test)]
mod tests {
    use qamar_core::{OrderStatus, OrderTotals};

    use super::*;

    #[test]
    fn test_user_view_splits_name_and_links_orders() {
        let user = User {
            id: UserId::new("u1"),
            name: "Nour El Din".to_string(),
            email: Some("nour@mail.com".to_string()),
            phone: None,
            gender: Some("female".to_string()),
            age: Some(27),
            location: Some("Alexandria".to_string()),
            products_bought_count: 3,
            avg_spent: Decimal::from(120),
            coupons_used_count: 1,
            purchases_without_sale: 2,
            created_at: None,
        };
        let order = Order {
            id: OrderId::new("A1"),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            address: String::new(),
            items: vec![],
            totals: OrderTotals {
                total: Decimal::from(120),
                ..OrderTotals::default()
            },
            promo_code: None,
            payment_method: String::new(),
            status: OrderStatus::Delivered.to_string(),
            created_at: None,
            user_id: Some(UserId::new("u1")),
        };

        let view = UserView::new(&user, &[&order], CurrencyCode::EGP);
        assert_eq!(view.first_name, "Nour");
        assert_eq!(view.last_name, "El Din");
        assert_eq!(view.order_count, 1);
        assert_eq!(view.orders[0].label, "Order #A1 - 120 EGP");
    }
}
