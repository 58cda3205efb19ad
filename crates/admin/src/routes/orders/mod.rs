//! Order route handlers.
//!
//! This module contains handlers for the order list, the order detail view
//! and the status update.

mod detail;
mod list;
pub mod types;

pub use types::{
    LineItemView, OrderDetailView, OrderListItemView, OrdersQuery, StatusUpdateInput, TotalsView,
};

pub use list::index;

pub use detail::{show, update_status};
