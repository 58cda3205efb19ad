//! Order list handler.

#![allow(clippy::used_underscore_binding)]

use std::collections::{BTreeSet, HashMap};

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use qamar_core::{User, UserId};

use crate::{
    db::{OrderRepository, UserRepository},
    error::AppError,
    middleware::RequireAdminAuth,
    services::filter_orders,
    state::AppState,
};

use super::types::{OrderListItemView, OrdersQuery};

/// Order list, newest first, joined with each order's account email.
///
/// Linked users are fetched in one batched query.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<OrderListItemView>>, AppError> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    let user_ids: Vec<UserId> = orders
        .iter()
        .filter_map(|order| order.user_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let users: HashMap<UserId, User> = UserRepository::new(state.pool())
        .get_many(&user_ids)
        .await?
        .into_iter()
        .map(|user| (user.id.clone(), user))
        .collect();

    let currency = state.config().currency;
    let term = query.q.as_deref().unwrap_or_default();
    let rows = filter_orders(&orders, &users, term)
        .into_iter()
        .map(|order| {
            let user = order.user_id.as_ref().and_then(|id| users.get(id));
            OrderListItemView::new(order, user, currency)
        })
        .collect();

    Ok(Json(rows))
}
