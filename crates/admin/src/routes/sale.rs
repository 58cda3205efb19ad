//! Sale banner route handlers.

#![allow(clippy::used_underscore_binding)]

use axum::{Json, extract::State};
use tracing::instrument;

use qamar_core::{SaleBar, SalePopUp};

use crate::{db::SaleRepository, error::AppError, middleware::RequireAdminAuth, state::AppState};

/// Current sale bar.
#[instrument(skip(_admin, state))]
pub async fn show_bar(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<SaleBar>, AppError> {
    Ok(Json(SaleRepository::new(state.pool()).get_bar().await?))
}

/// Replace the sale bar text.
#[instrument(skip(admin, state, bar))]
pub async fn update_bar(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(bar): Json<SaleBar>,
) -> Result<Json<SaleBar>, AppError> {
    let bar = SaleBar {
        description: bar.description.trim().to_owned(),
    };
    SaleRepository::new(state.pool()).update_bar(&bar).await?;

    tracing::info!(admin = %admin.email, "Sale bar updated");
    Ok(Json(bar))
}

/// Current sale pop-up.
#[instrument(skip(_admin, state))]
pub async fn show_pop_up(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<SalePopUp>, AppError> {
    Ok(Json(SaleRepository::new(state.pool()).get_pop_up().await?))
}

/// Replace the sale pop-up.
#[instrument(skip(admin, state, pop_up))]
pub async fn update_pop_up(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(pop_up): Json<SalePopUp>,
) -> Result<Json<SalePopUp>, AppError> {
    let pop_up = SalePopUp {
        title: pop_up.title.trim().to_owned(),
        description: pop_up.description.trim().to_owned(),
    };
    SaleRepository::new(state.pool())
        .update_pop_up(&pop_up)
        .await?;

    tracing::info!(admin = %admin.email, "Sale pop-up updated");
    Ok(Json(pop_up))
}
