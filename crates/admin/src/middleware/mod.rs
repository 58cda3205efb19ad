//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first, as layered in `main.rs`)
//!
//! 1. Sentry layers (capture errors, HTTP transaction per request)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Auth extractor ([`RequireAdminAuth`]) on every protected handler

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, clear_current_admin, set_current_admin};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
