//! Domain models for admin that are not shared with other crates.

pub mod session;

pub use session::CurrentAdmin;
pub use session::keys as session_keys;
