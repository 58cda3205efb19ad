//! Admin sign-in and sign-out.
//!
//! There is one administrator, identified by `ADMIN_EMAIL`. Signing in
//! stores a [`CurrentAdmin`] in the server-side session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use qamar_core::Email;

use crate::{
    error::{AppError, clear_sentry_user, set_sentry_user},
    middleware::{RequireAdminAuth, clear_current_admin, set_current_admin},
    models::CurrentAdmin,
    state::AppState,
};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Login and logout response body.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
}

/// Sign in as the store administrator.
///
/// Any address other than the configured admin email gets `401` with
/// `{"success": false}`; malformed addresses are treated the same way.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let admin_email = &state.config().admin_email;

    let accepted = Email::parse(&request.email)
        .ok()
        .filter(|email| email.as_str().eq_ignore_ascii_case(admin_email.as_str()));

    let Some(email) = accepted else {
        tracing::warn!("Rejected admin login attempt");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse { success: false }),
        )
            .into_response());
    };

    let admin = CurrentAdmin {
        email,
        signed_in_at: Utc::now(),
    };
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;
    set_sentry_user(admin.email.as_str());

    tracing::info!(email = %admin.email, "Admin signed in");
    Ok(Json(AuthResponse { success: true }).into_response())
}

/// Sign out and delete the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<AuthResponse>, AppError> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    tracing::info!("Admin signed out");
    Ok(Json(AuthResponse { success: true }))
}

/// The signed-in admin.
#[instrument(skip(admin))]
pub async fn current(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
