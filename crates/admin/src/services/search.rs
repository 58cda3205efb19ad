//! List filters for the orders, users and promo code pages.
//!
//! All matching is a case-insensitive substring test. A blank term matches
//! everything.

use std::collections::HashMap;

use serde::Deserialize;

use qamar_core::{Order, PromoCode, User, UserId};

/// Promo code status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoStatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl PromoStatusFilter {
    const fn matches(self, promo: &PromoCode) -> bool {
        match self {
            Self::All => true,
            Self::Active => promo.terms.active,
            Self::Inactive => !promo.terms.active,
        }
    }
}

/// A lowercased search term.
struct Needle(String);

impl Needle {
    fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        (!term.is_empty()).then(|| Self(term.to_lowercase()))
    }

    fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    fn found_in_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        fields.into_iter().flatten().any(|field| self.found_in(field))
    }
}

/// Orders matching `term` on id, customer name, the order's own phone, or
/// the linked user's email.
#[must_use]
pub fn filter_orders<'a>(
    orders: &'a [Order],
    users: &HashMap<UserId, User>,
    term: &str,
) -> Vec<&'a Order> {
    let Some(needle) = Needle::new(term) else {
        return orders.iter().collect();
    };

    orders
        .iter()
        .filter(|order| {
            let user = order.user_id.as_ref().and_then(|id| users.get(id));
            needle.found_in_any([
                Some(order.id.as_str()),
                Some(order.first_name.as_str()),
                Some(order.last_name.as_str()),
                Some(order.phone.as_str()),
                user.and_then(|u| u.email.as_deref()),
            ])
        })
        .collect()
}

/// Users matching `term` on name, email or phone.
#[must_use]
pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    let Some(needle) = Needle::new(term) else {
        return users.iter().collect();
    };

    users
        .iter()
        .filter(|user| {
            needle.found_in_any([
                Some(user.name.as_str()),
                user.email.as_deref(),
                user.phone.as_deref(),
            ])
        })
        .collect()
}

/// Promo codes whose code contains `term` and whose status passes `status`.
#[must_use]
pub fn filter_promo_codes<'a>(
    codes: &'a [PromoCode],
    term: &str,
    status: PromoStatusFilter,
) -> Vec<&'a PromoCode> {
    let needle = Needle::new(term);
    codes
        .iter()
        .filter(|promo| status.matches(promo))
        .filter(|promo| {
            needle
                .as_ref()
                .is_none_or(|needle| needle.found_in(promo.code.as_str()))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use qamar_core::{OrderId, OrderStatus, OrderTotals, PromoCodeDraft, PromoCodeKey};
    use rust_decimal::Decimal;

    use super::*;

    fn user(id: &str, name: &str, email: &str, phone: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
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

    fn order(id: &str, first: &str, last: &str, user_id: Option<&str>) -> Order {
        Order {
            id: OrderId::new(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone: "01000000000".to_string(),
            address: "Cairo".to_string(),
            items: vec![],
            totals: OrderTotals::default(),
            promo_code: None,
            payment_method: "cash".to_string(),
            status: OrderStatus::Pending.to_string(),
            created_at: None,
            user_id: user_id.map(UserId::new),
        }
    }

    fn promo(code: &str, active: bool) -> PromoCode {
        let draft = PromoCodeDraft {
            code: code.to_string(),
            discount_value: "10".to_string(),
            active: Some(active),
            ..Default::default()
        };
        PromoCode {
            code: PromoCodeKey::parse(code).unwrap(),
            terms: draft.validate_terms().unwrap(),
            used_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_orders_by_name_id_and_linked_email() {
        let users: HashMap<UserId, User> = [user("u1", "Mona Hassan", "Mona@Mail.com", "0122")]
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        let orders = vec![
            order("ORD-1", "Mona", "Hassan", Some("u1")),
            order("ORD-2", "Salma", "Adel", None),
        ];

        assert_eq!(filter_orders(&orders, &users, "mail.COM").len(), 1);
        assert_eq!(filter_orders(&orders, &users, "adel")[0].id.as_str(), "ORD-2");
        assert_eq!(filter_orders(&orders, &users, "ord-").len(), 2);
        assert_eq!(filter_orders(&orders, &users, "  ").len(), 2);
        assert!(filter_orders(&orders, &users, "nobody").is_empty());
    }

    #[test]
    fn test_filter_orders_by_order_phone_only() {
        let users: HashMap<UserId, User> = [user("u1", "Mona Hassan", "mona@mail.com", "0155")]
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        let mut linked = order("ORD-1", "Mona", "Hassan", Some("u1"));
        linked.phone = "01001112233".to_string();
        let mut guest = order("ORD-2", "Salma", "Adel", None);
        guest.phone = "01229998877".to_string();
        let mut other = order("ORD-3", "Nour", "Ali", None);
        other.phone = "01001114455".to_string();
        let orders = vec![linked, guest, other];

        let ids = |term: &str| -> Vec<&str> {
            filter_orders(&orders, &users, term)
                .iter()
                .map(|order| order.id.as_str())
                .collect()
        };
        assert_eq!(ids("0100111"), vec!["ORD-1", "ORD-3"]);
        assert_eq!(ids("99988"), vec!["ORD-2"]);
        assert!(ids("0155").is_empty());
    }

    #[test]
    fn test_filter_users() {
        let users = vec![
            user("u1", "Mona Hassan", "mona@mail.com", "0122"),
            user("u2", "Salma Adel", "salma@mail.com", "0100"),
        ];
        assert_eq!(filter_users(&users, "SALMA").len(), 1);
        assert_eq!(filter_users(&users, "0122")[0].id.as_str(), "u1");
        assert_eq!(filter_users(&users, "").len(), 2);
    }

    #[test]
    fn test_filter_promo_codes_by_term_and_status() {
        let codes = vec![promo("EID10", true), promo("EID20", false), promo("WELCOME", true)];

        assert_eq!(filter_promo_codes(&codes, "eid", PromoStatusFilter::All).len(), 2);
        assert_eq!(
            filter_promo_codes(&codes, "eid", PromoStatusFilter::Active)[0].code.as_str(),
            "EID10"
        );
        assert_eq!(filter_promo_codes(&codes, "", PromoStatusFilter::Inactive).len(), 1);
        assert_eq!(filter_promo_codes(&codes, "", PromoStatusFilter::Active).len(), 2);
    }
}
