//! Analytics route handler.
//!
//! Reads every order and user and aggregates in memory on each request.

#![allow(clippy::used_underscore_binding)]

use axum::{Json, extract::State};
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::RequireAdminAuth,
    services::{AnalyticsReport, StoreSnapshot},
    state::AppState,
};

/// Best and worst sellers, plus order count and average spend per user.
#[instrument(skip(_admin, state))]
pub async fn report(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let snapshot = StoreSnapshot::load(state.pool()).await?;
    let report = AnalyticsReport::build(&snapshot);

    tracing::debug!(
        orders = snapshot.orders.len(),
        products = report.product_sales.len(),
        "Built analytics report"
    );
    Ok(Json(report))
}
