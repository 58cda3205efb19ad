//! Dashboard overview: headline counts and a short recent-activity feed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use qamar_core::{Order, PromoCode, User};

use crate::db::{
    OrderRepository, ProductRepository, PromoCodeRepository, RepositoryError, UserRepository,
};

const RECENT_USERS: i64 = 2;
const RECENT_ORDERS: i64 = 2;

/// Headline counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub promo_codes: i64,
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    /// `New User`, `New Order` or `Promo Code`.
    pub kind: &'static str,
    pub description: String,
    pub at: Option<DateTime<Utc>>,
}

impl ActivityItem {
    fn from_user(user: &User) -> Self {
        Self {
            kind: "New User",
            description: user.email.clone().unwrap_or_else(|| user.name.clone()),
            at: user.created_at,
        }
    }

    fn from_order(order: &Order) -> Self {
        Self {
            kind: "New Order",
            description: format!("Order #{}", order.id),
            at: order.created_at,
        }
    }

    fn from_promo(promo: &PromoCode) -> Self {
        Self {
            kind: "Promo Code",
            description: promo.code.to_string(),
            at: Some(promo.created_at),
        }
    }
}

/// Everything the dashboard landing page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub counts: DashboardCounts,
    pub recent_activity: Vec<ActivityItem>,
}

impl DashboardSummary {
    /// Assemble the feed: newest users, then newest orders, then the newest
    /// promo code.
    #[must_use]
    pub fn assemble(
        counts: DashboardCounts,
        users: &[User],
        orders: &[Order],
        latest_promo: Option<&PromoCode>,
    ) -> Self {
        let recent_activity = users
            .iter()
            .map(ActivityItem::from_user)
            .chain(orders.iter().map(ActivityItem::from_order))
            .chain(latest_promo.map(ActivityItem::from_promo))
            .collect();

        Self {
            counts,
            recent_activity,
        }
    }

    /// Load counts and recent records concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first repository error encountered.
    pub async fn load(pool: &PgPool) -> Result<Self, RepositoryError> {
        let users = UserRepository::new(pool);
        let orders = OrderRepository::new(pool);
        let products = ProductRepository::new(pool);
        let promos = PromoCodeRepository::new(pool);

        let (user_count, product_count, order_count, promo_count) = tokio::try_join!(
            users.count(),
            products.count(),
            orders.count(),
            promos.count()
        )?;
        let (recent_users, recent_orders, latest_promo) = tokio::try_join!(
            users.recent(RECENT_USERS),
            orders.recent(RECENT_ORDERS),
            promos.latest()
        )?;

        let counts = DashboardCounts {
            users: user_count,
            products: product_count,
            orders: order_count,
            promo_codes: promo_count,
        };

        Ok(Self::assemble(
            counts,
            &recent_users,
            &recent_orders,
            latest_promo.as_ref(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use qamar_core::{OrderId, OrderStatus, OrderTotals, PromoCodeDraft, PromoCodeKey, UserId};
    use rust_decimal::Decimal;

    use super::*;

    fn user(id: &str, email: Option<&str>) -> User {
        User {
            id: UserId::new(id),
            name: "Mona Hassan".to_string(),
            email: email.map(str::to_string),
            phone: None,
            gender: None,
            age: None,
            location: None,
            products_bought_count: 0,
            avg_spent: Decimal::ZERO,
            coupons_used_count: 0,
            purchases_without_sale: 0,
            created_at: None,
        }
    }

    fn order(id: &str) -> Order {
        Order {
            id: OrderId::new(id),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            address: String::new(),
            items: vec![],
            totals: OrderTotals::default(),
            promo_code: None,
            payment_method: String::new(),
            status: OrderStatus::Pending.to_string(),
            created_at: None,
            user_id: None,
        }
    }

    #[test]
    fn test_activity_feed_order_and_labels() {
        let draft = PromoCodeDraft {
            code: "eid10".to_string(),
            discount_value: "10".to_string(),
            ..Default::default()
        };
        let promo = PromoCode {
            code: PromoCodeKey::parse("eid10").unwrap(),
            terms: draft.validate_terms().unwrap(),
            used_count: 0,
            created_at: Utc::now(),
        };

        let summary = DashboardSummary::assemble(
            DashboardCounts::default(),
            &[user("u1", Some("mona@mail.com")), user("u2", None)],
            &[order("A1")],
            Some(&promo),
        );

        let feed: Vec<(&str, &str)> = summary
            .recent_activity
            .iter()
            .map(|item| (item.kind, item.description.as_str()))
            .collect();
        assert_eq!(
            feed,
            vec![
                ("New User", "mona@mail.com"),
                ("New User", "Mona Hassan"),
                ("New Order", "Order #A1"),
                ("Promo Code", "EID10"),
            ]
        );
    }

    #[test]
    fn test_empty_store() {
        let summary = DashboardSummary::assemble(DashboardCounts::default(), &[], &[], None);
        assert!(summary.recent_activity.is_empty());
        assert_eq!(summary.counts.orders, 0);
    }
}
