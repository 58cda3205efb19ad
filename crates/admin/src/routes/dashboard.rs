//! Dashboard route handler.

#![allow(clippy::used_underscore_binding)]

use axum::{Json, extract::State};
use tracing::instrument;

use crate::{
    error::AppError, middleware::RequireAdminAuth, services::DashboardSummary, state::AppState,
};

/// Counts of users, products, orders and promo codes plus recent activity.
#[instrument(skip(_admin, state))]
pub async fn summary(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = DashboardSummary::load(state.pool()).await?;
    Ok(Json(summary))
}
