//! Type definitions and conversions for order views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use qamar_core::{
    CurrencyCode, LineItem, Order, OrderId, OrderProgress, OrderStatus, OrderTotals, User, UserId,
};

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Free-text search over id, customer name, phone and linked email.
    pub q: Option<String>,
}

/// Body of a status update.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateInput {
    pub status: String,
}

// =============================================================================
// List View
// =============================================================================

/// One row of the order list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListItemView {
    pub id: OrderId,
    pub customer_name: String,
    pub phone: String,
    pub user_id: Option<UserId>,
    /// Email of the linked storefront account, if any.
    pub user_email: Option<String>,
    pub item_count: u32,
    pub total: Decimal,
    /// `120.00 EGP`.
    pub total_display: String,
    /// Stored status, verbatim.
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderListItemView {
    pub fn new(order: &Order, user: Option<&User>, currency: CurrencyCode) -> Self {
        Self {
            id: order.id.clone(),
            customer_name: order.customer_name(),
            phone: order.phone.clone(),
            user_id: order.user_id.clone(),
            user_email: user.and_then(|u| u.email.clone()),
            item_count: order.unit_count(),
            total: order.totals.total,
            total_display: currency.amount(order.totals.total).display_fixed(),
            status: order.status.clone(),
            created_at: order.created_at,
        }
    }
}

// =============================================================================
// Detail View
// =============================================================================

/// One purchased line with display strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub title: String,
    pub color: Option<String>,
    pub image_cover: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    /// `250 EGP × 2`.
    pub display: String,
}

impl LineItemView {
    pub fn new(item: &LineItem, currency: CurrencyCode) -> Self {
        Self {
            title: item.title.clone(),
            color: item.color.clone(),
            image_cover: item.image_cover.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            line_total: item.line_total(),
            display: format!("{} × {}", currency.amount(item.price), item.quantity),
        }
    }
}

/// Order totals as labelled display lines (`Total: 120 EGP`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    pub subtotal: String,
    pub delivery_fee: String,
    pub discount: String,
    pub total: String,
}

impl TotalsView {
    pub fn new(totals: &OrderTotals, currency: CurrencyCode) -> Self {
        Self {
            subtotal: format!("Subtotal: {}", currency.amount(totals.subtotal)),
            delivery_fee: format!("Delivery: {}", currency.amount(totals.delivery_fee)),
            discount: format!("Discount: {}", currency.amount(totals.discount)),
            total: format!("Total: {}", currency.amount(totals.total)),
        }
    }
}

/// Everything the order detail page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub order: Order,
    pub user: Option<User>,
    pub lines: Vec<LineItemView>,
    pub totals_display: TotalsView,
    /// Whether `subtotal + delivery fee - discount` equals the stored total.
    pub totals_consistent: bool,
    pub progress: OrderProgress,
    /// Values the status selector offers.
    pub status_options: [OrderStatus; 6],
}

impl OrderDetailView {
    pub fn new(order: Order, user: Option<User>, currency: CurrencyCode) -> Self {
        Self {
            lines: order
                .items
                .iter()
                .map(|item| LineItemView::new(item, currency))
                .collect(),
            totals_display: TotalsView::new(&order.totals, currency),
            totals_consistent: order.totals.is_consistent(),
            progress: order.progress(),
            status_options: OrderStatus::ALL,
            order,
            user,
        }
    }
}
