//! Business logic services for admin.
//!
//! # Services
//!
//! - `analytics` - Best/worst sellers and per-user spend
//! - `dashboard` - Headline counts and recent activity
//! - `search` - Case-insensitive list filters
//! - `snapshot` - Concurrent full reads of users and orders

pub mod analytics;
pub mod dashboard;
pub mod search;
pub mod snapshot;

pub use analytics::{AnalyticsReport, ProductSales, UserSpend};
pub use dashboard::{ActivityItem, DashboardCounts, DashboardSummary};
pub use search::{PromoStatusFilter, filter_orders, filter_promo_codes, filter_users};
pub use snapshot::StoreSnapshot;
