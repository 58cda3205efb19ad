//! Orders placed through the storefront checkout.
//!
//! Orders are created by checkout; the dashboard only reads them and changes
//! their [`OrderStatus`]. The stored status is kept verbatim, since checkout
//! may write values the dashboard does not know.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, UserId};
use super::status::{OrderProgress, OrderStatus};

/// One purchased product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub quantity: u32,
    /// Selected colour variant name, if the product has variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_cover: Option<String>,
}

impl LineItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Monetary summary of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// `subtotal + delivery_fee - discount`.
    #[must_use]
    pub fn expected_total(&self) -> Decimal {
        self.subtotal + self.delivery_fee - self.discount
    }

    /// Whether the stored total agrees with its components.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total == self.expected_total()
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<LineItem>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub promo_code: Option<String>,
    pub payment_method: String,
    /// Stored status, verbatim. See [`Order::known_status`].
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Storefront account that placed the order (guest orders have none).
    pub user_id: Option<UserId>,
}

impl Order {
    /// `"First Last"`, trimmed.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// The status, if it is one of the six the dashboard knows.
    #[must_use]
    pub fn known_status(&self) -> Option<OrderStatus> {
        self.status.parse().ok()
    }

    /// Progress display for the stored status.
    #[must_use]
    pub fn progress(&self) -> OrderProgress {
        OrderProgress::for_raw(&self.status)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn items_subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(title: &str, price: i64, quantity: u32) -> LineItem {
        LineItem {
            title: title.to_string(),
            price: Decimal::from(price),
            quantity,
            color: None,
            image_cover: None,
        }
    }

    #[test]
    fn test_totals_consistency() {
        let totals = OrderTotals {
            subtotal: Decimal::from(100),
            delivery_fee: Decimal::from(20),
            discount: Decimal::ZERO,
            total: Decimal::from(120),
        };
        assert!(totals.is_consistent());

        let off = OrderTotals {
            total: Decimal::from(110),
            ..totals
        };
        assert!(!off.is_consistent());
        assert_eq!(off.expected_total(), Decimal::from(120));
    }

    #[test]
    fn test_line_item_defaults() {
        let parsed: LineItem =
            serde_json::from_str(r#"{"title":"Silk Hijab","price":"250"}"#).unwrap();
        assert_eq!(parsed.title, "Silk Hijab");
        assert_eq!(parsed.quantity, 0);
        assert_eq!(parsed.line_total(), Decimal::ZERO);
    }

    #[test]
    fn test_items_subtotal_and_units() {
        let order = Order {
            id: OrderId::new("o1"),
            first_name: "Mona".to_string(),
            last_name: String::new(),
            phone: "01000000000".to_string(),
            address: "Cairo".to_string(),
            items: vec![item("A", 100, 2), item("B", 50, 1)],
            totals: OrderTotals::default(),
            promo_code: None,
            payment_method: "cash".to_string(),
            status: OrderStatus::Pending.to_string(),
            created_at: None,
            user_id: None,
        };
        assert_eq!(order.items_subtotal(), Decimal::from(250));
        assert_eq!(order.unit_count(), 3);
        assert_eq!(order.customer_name(), "Mona");
    }

    #[test]
    fn test_unrecognized_status_is_kept() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "o9",
            "firstName": "Mona",
            "lastName": "Adel",
            "phone": "0100",
            "address": "Giza",
            "items": [],
            "subtotal": "0",
            "deliveryFee": "0",
            "discount": "0",
            "total": "0",
            "promoCode": null,
            "paymentMethod": "cash",
            "status": "returned",
            "createdAt": null,
            "userId": null
        }))
        .unwrap();
        assert_eq!(order.status, "returned");
        assert_eq!(order.known_status(), None);
        assert_eq!(order.progress().reached_count(), 0);
    }
}
