//! Promo code route handlers.

#![allow(clippy::used_underscore_binding)]

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use qamar_core::{
    AppliedDiscount, DiscountType, OrderCandidate, PromoCode, PromoCodeDraft, PromoCodeKey,
    PromoRejection,
};

use crate::{
    db::PromoCodeRepository,
    error::AppError,
    middleware::RequireAdminAuth,
    services::{PromoStatusFilter, filter_promo_codes},
    state::AppState,
};

/// Query parameters for the promo code list.
#[derive(Debug, Default, Deserialize)]
pub struct PromoCodesQuery {
    /// Substring of the code.
    pub q: Option<String>,
    /// `all` (default), `active` or `inactive`.
    #[serde(default)]
    pub status: PromoStatusFilter,
}

/// Promo code with list display fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeView {
    #[serde(flatten)]
    pub promo: PromoCode,
    /// `Active`, `Inactive`, `Expired` or `Used up`.
    pub status_label: &'static str,
    /// `3/10 uses` or `3 uses`.
    pub usage: String,
    /// `10%` or `50 EGP`.
    pub value_display: String,
}

impl PromoCodeView {
    fn new(promo: PromoCode, now: DateTime<Utc>, state: &AppState) -> Self {
        let status_label = if !promo.terms.active {
            "Inactive"
        } else if promo.is_expired(now) {
            "Expired"
        } else if promo.is_exhausted() {
            "Used up"
        } else {
            "Active"
        };

        let usage = promo.terms.usage_limit.map_or_else(
            || format!("{} uses", promo.used_count),
            |limit| format!("{}/{} uses", promo.used_count, limit),
        );

        let value = promo.terms.discount_value;
        let value_display = match promo.terms.discount_type {
            DiscountType::Percentage => format!("{}%", value.normalize()),
            DiscountType::Fixed => state.config().currency.amount(value).to_string(),
        };

        Self {
            promo,
            status_label,
            usage,
            value_display,
        }
    }
}

fn parse_code(raw: &str) -> Result<PromoCodeKey, AppError> {
    PromoCodeKey::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

async fn load(state: &AppState, code: &PromoCodeKey) -> Result<PromoCode, AppError> {
    PromoCodeRepository::new(state.pool())
        .get(code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("promo code {code}")))
}

/// Promo codes filtered by code and status.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<PromoCodesQuery>,
) -> Result<Json<Vec<PromoCodeView>>, AppError> {
    let codes = PromoCodeRepository::new(state.pool()).list_all().await?;
    let now = Utc::now();
    let term = query.q.as_deref().unwrap_or_default();

    let views = filter_promo_codes(&codes, term, query.status)
        .into_iter()
        .map(|promo| PromoCodeView::new(promo.clone(), now, &state))
        .collect();

    Ok(Json(views))
}

/// A single promo code.
#[instrument(skip(_admin, state))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PromoCodeView>, AppError> {
    let promo = load(&state, &parse_code(&code)?).await?;
    Ok(Json(PromoCodeView::new(promo, Utc::now(), &state)))
}

/// Create a promo code. The code is upper-cased and starts unused.
#[instrument(skip(admin, state, draft))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(draft): Json<PromoCodeDraft>,
) -> Result<(StatusCode, Json<PromoCode>), AppError> {
    let new_code = draft.validate_new(Utc::now())?;
    let promo = PromoCodeRepository::new(state.pool())
        .create(&new_code)
        .await?;

    tracing::info!(code = %promo.code, admin = %admin.email, "Promo code created");
    Ok((StatusCode::CREATED, Json(promo)))
}

/// Edit a promo code's terms. The code and its usage count are unchanged.
#[instrument(skip(admin, state, draft))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(draft): Json<PromoCodeDraft>,
) -> Result<Json<PromoCode>, AppError> {
    let code = parse_code(&code)?;
    let terms = draft.validate_terms()?;
    let promo = PromoCodeRepository::new(state.pool())
        .update(&code, &terms)
        .await?;

    tracing::info!(code = %code, admin = %admin.email, "Promo code updated");
    Ok(Json(promo))
}

/// Remove a promo code.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    let code = parse_code(&code)?;
    PromoCodeRepository::new(state.pool()).delete(&code).await?;

    tracing::info!(code = %code, admin = %admin.email, "Promo code deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Preview the discount a code gives on an order without using it up.
#[instrument(skip(_admin, state, order))]
pub async fn evaluate(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(order): Json<OrderCandidate>,
) -> Result<Json<AppliedDiscount>, AppError> {
    let promo = load(&state, &parse_code(&code)?).await?;
    let applied = promo.evaluate(&order, Utc::now())?;
    Ok(Json(applied))
}

/// Apply a code to an order and count the use.
///
/// The use is counted atomically, so a code at its limit is rejected even
/// when redeemed concurrently.
#[instrument(skip(admin, state, order))]
pub async fn redeem(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(order): Json<OrderCandidate>,
) -> Result<Json<AppliedDiscount>, AppError> {
    let code = parse_code(&code)?;
    let promo = load(&state, &code).await?;
    let applied = promo.evaluate(&order, Utc::now())?;

    let counted = PromoCodeRepository::new(state.pool())
        .record_redemption(&code)
        .await?;
    if !counted {
        let limit = promo.terms.usage_limit.unwrap_or(promo.used_count);
        return Err(PromoRejection::UsageLimitReached { limit }.into());
    }

    tracing::info!(
        code = %code,
        discount = %applied.discount,
        admin = %admin.email,
        "Promo code redeemed"
    );
    Ok(Json(applied))
}
