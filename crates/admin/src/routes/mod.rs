//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (database)
//!
//! # Auth
//! POST /api/admin/login                  - Sign in as the store admin
//! POST /api/admin/logout                 - Sign out
//! GET  /api/admin/session                - Current admin
//!
//! # Dashboard
//! GET  /api/dashboard                    - Counts and recent activity
//!
//! # Orders
//! GET  /api/orders?q=                    - Order list with customer email
//! GET  /api/orders/{id}                  - Order detail with progress
//! PUT  /api/orders/{id}/status           - Change order status
//!
//! # Users
//! GET  /api/users?q=                     - Users with order counts
//! GET  /api/users/{id}                   - User with their orders
//!
//! # Products
//! GET  /api/products                     - Catalog
//! POST /api/products                     - Add product
//! GET  /api/products/{id}                - Product detail
//! PUT  /api/products/{id}                - Edit product
//! DELETE /api/products/{id}              - Remove product
//!
//! # Promo codes
//! GET  /api/promo-codes?q=&status=       - Promo code list
//! POST /api/promo-codes                  - Create promo code
//! GET  /api/promo-codes/{code}           - Promo code detail
//! PUT  /api/promo-codes/{code}           - Edit promo code
//! DELETE /api/promo-codes/{code}         - Remove promo code
//! POST /api/promo-codes/{code}/evaluate  - Preview discount on an order
//! POST /api/promo-codes/{code}/redeem    - Apply and count one use
//!
//! # Analytics
//! GET  /api/analytics                    - Best/worst sellers, spend per user
//!
//! # Sale banners
//! GET  /api/sale/bar                     - Sale bar text
//! PUT  /api/sale/bar                     - Update sale bar
//! GET  /api/sale/pop-up                  - Sale pop-up
//! PUT  /api/sale/pop-up                  - Update sale pop-up
//! ```

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod promo_codes;
pub mod sale;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::state::AppState;

/// API routes (without state, health checks or layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/logout", post(auth::logout))
        .route("/api/admin/session", get(auth::current))
        // Dashboard
        .route("/api/dashboard", get(dashboard::summary))
        // Orders
        .route("/api/orders", get(orders::index))
        .route("/api/orders/{id}", get(orders::show))
        .route("/api/orders/{id}/status", put(orders::update_status))
        // Users
        .route("/api/users", get(users::index))
        .route("/api/users/{id}", get(users::show))
        // Products
        .route("/api/products", get(products::index).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        // Promo codes
        .route(
            "/api/promo-codes",
            get(promo_codes::index).post(promo_codes::create),
        )
        .route(
            "/api/promo-codes/{code}",
            get(promo_codes::show)
                .put(promo_codes::update)
                .delete(promo_codes::delete),
        )
        .route(
            "/api/promo-codes/{code}/evaluate",
            post(promo_codes::evaluate),
        )
        .route("/api/promo-codes/{code}/redeem", post(promo_codes::redeem))
        // Analytics
        .route("/api/analytics", get(analytics::report))
        // Sale banners
        .route("/api/sale/bar", get(sale::show_bar).put(sale::update_bar))
        .route(
            "/api/sale/pop-up",
            get(sale::show_pop_up).put(sale::update_pop_up),
        )
}

/// The full application router: health checks, API routes, session and
/// request tracing.
///
/// Sentry layers are added by the binary.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
