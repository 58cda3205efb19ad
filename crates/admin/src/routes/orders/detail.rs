//! Order detail and status update handlers.

#![allow(clippy::used_underscore_binding)]

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use qamar_core::{OrderId, OrderStatus};

use crate::{
    db::{OrderRepository, UserRepository},
    error::AppError,
    middleware::RequireAdminAuth,
    state::AppState,
};

use super::types::{OrderDetailView, StatusUpdateInput};

/// Order detail with display lines, totals and status progress.
#[instrument(skip(_admin, state), fields(order_id = %id))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderDetailView>, AppError> {
    let id = OrderId::new(id);
    let order = OrderRepository::new(state.pool())
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let user = match &order.user_id {
        Some(user_id) => UserRepository::new(state.pool()).get_by_id(user_id).await?,
        None => None,
    };

    if !order.totals.is_consistent() {
        tracing::warn!(
            order_id = %order.id,
            total = %order.totals.total,
            expected = %order.totals.expected_total(),
            "Order total does not match subtotal + delivery fee - discount"
        );
    }

    Ok(Json(OrderDetailView::new(
        order,
        user,
        state.config().currency,
    )))
}

/// Response to a status update.
#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub id: OrderId,
    pub status: OrderStatus,
}

/// Set an order's status. Any of the six statuses may be chosen at any time.
#[instrument(skip(admin, state, input), fields(order_id = %id))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StatusUpdateInput>,
) -> Result<Json<StatusUpdated>, AppError> {
    let status = input
        .status
        .parse::<OrderStatus>()
        .map_err(AppError::BadRequest)?;
    let id = OrderId::new(id);

    OrderRepository::new(state.pool())
        .update_status(&id, status)
        .await?;

    tracing::info!(order_id = %id, %status, admin = %admin.email, "Order status updated");
    Ok(Json(StatusUpdated { id, status }))
}
