//! Product (catalog) route handlers.

#![allow(clippy::used_underscore_binding)]

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use qamar_core::{Product, ProductDraft, ProductId};

use crate::{
    db::ProductRepository, error::AppError, middleware::RequireAdminAuth, state::AppState,
};

/// Every product, newest first.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// A single product.
#[instrument(skip(_admin, state), fields(product_id = %id))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// Add a product. Title, category and price are required.
#[instrument(skip(admin, state, draft))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let new_product = draft.validate()?;
    let product = ProductRepository::new(state.pool())
        .create(&new_product)
        .await?;

    tracing::info!(
        product_id = %product.id,
        title = %product.details.title,
        admin = %admin.email,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's fields.
#[instrument(skip(admin, state, draft), fields(product_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, AppError> {
    let details = draft.validate()?;
    let id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .update(&id, &details)
        .await?;

    tracing::info!(product_id = %id, admin = %admin.email, "Product updated");
    Ok(Json(product))
}

/// Remove a product.
#[instrument(skip(admin, state), fields(product_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = ProductId::new(id);
    ProductRepository::new(state.pool()).delete(&id).await?;

    tracing::info!(product_id = %id, admin = %admin.email, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
