//! Sales analytics computed from in-memory orders and users.
//!
//! Everything here is recomputed from scratch on every request: orders are
//! grouped once by product title and once by user id.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use qamar_core::{Order, User, UserId};

use super::snapshot::StoreSnapshot;

/// How many products the best/worst seller lists hold.
pub const DEFAULT_RANKING_SIZE: usize = 5;

/// Units sold for one product title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub title: String,
    pub quantity: u64,
}

/// Order count and average spend for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpend {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub order_count: usize,
    pub total_spent: Decimal,
    /// `total_spent / order_count`, or zero for users without orders.
    pub average_spend: Decimal,
}

/// Everything the analytics page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub product_sales: Vec<ProductSales>,
    pub top_sellers: Vec<ProductSales>,
    pub least_sellers: Vec<ProductSales>,
    pub user_spend: Vec<UserSpend>,
    /// Order count keyed by user id, including users with no orders.
    pub orders_per_user: BTreeMap<UserId, usize>,
}

impl AnalyticsReport {
    #[must_use]
    pub fn build(snapshot: &StoreSnapshot) -> Self {
        let product_sales = product_sales(&snapshot.orders);
        Self {
            top_sellers: top_sellers(&product_sales, DEFAULT_RANKING_SIZE),
            least_sellers: least_sellers(&product_sales, DEFAULT_RANKING_SIZE),
            product_sales,
            user_spend: average_spend(&snapshot.users, &snapshot.orders),
            orders_per_user: orders_per_user(&snapshot.users, &snapshot.orders),
        }
    }
}

/// Total units sold per item title, in the order titles are first seen.
///
/// Lines with no quantity count as zero.
#[must_use]
pub fn product_sales(orders: &[Order]) -> Vec<ProductSales> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sales: Vec<ProductSales> = Vec::new();

    for item in orders.iter().flat_map(|order| &order.items) {
        let slot = *index.entry(item.title.as_str()).or_insert_with(|| {
            sales.push(ProductSales {
                title: item.title.clone(),
                quantity: 0,
            });
            sales.len() - 1
        });
        if let Some(entry) = sales.get_mut(slot) {
            entry.quantity += u64::from(item.quantity);
        }
    }

    sales
}

/// The `n` best sellers, most units first. Ties keep first-seen order.
#[must_use]
pub fn top_sellers(sales: &[ProductSales], n: usize) -> Vec<ProductSales> {
    let mut ranked = sales.to_vec();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranked.truncate(n);
    ranked
}

/// The `n` worst sellers, fewest units first. Ties keep first-seen order.
#[must_use]
pub fn least_sellers(sales: &[ProductSales], n: usize) -> Vec<ProductSales> {
    let mut ranked = sales.to_vec();
    ranked.sort_by_key(|entry| entry.quantity);
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Default, Clone, Copy)]
struct OrderTally {
    count: usize,
    total: Decimal,
}

fn tally_by_user(orders: &[Order]) -> HashMap<&UserId, OrderTally> {
    let mut tallies: HashMap<&UserId, OrderTally> = HashMap::new();
    for order in orders {
        if let Some(user_id) = &order.user_id {
            let tally = tallies.entry(user_id).or_default();
            tally.count += 1;
            tally.total += order.totals.total;
        }
    }
    tallies
}

/// Average order total per user, in the order users are given.
///
/// A user with no orders averages zero.
#[must_use]
pub fn average_spend(users: &[User], orders: &[Order]) -> Vec<UserSpend> {
    let tallies = tally_by_user(orders);

    users
        .iter()
        .map(|user| {
            let tally = tallies.get(&user.id).copied().unwrap_or_default();
            let average_spend = if tally.count == 0 {
                Decimal::ZERO
            } else {
                (tally.total / Decimal::from(tally.count))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            };
            UserSpend {
                user_id: user.id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                order_count: tally.count,
                total_spent: tally.total,
                average_spend,
            }
        })
        .collect()
}

/// Number of orders each user has placed. Users without orders map to zero.
#[must_use]
pub fn orders_per_user(users: &[User], orders: &[Order]) -> BTreeMap<UserId, usize> {
    let tallies = tally_by_user(orders);
    users
        .iter()
        .map(|user| {
            let count = tallies.get(&user.id).map_or(0, |tally| tally.count);
            (user.id.clone(), count)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use qamar_core::{LineItem, OrderId, OrderStatus, OrderTotals};

    use super::*;

    fn line(title: &str, quantity: u32) -> LineItem {
        LineItem {
            title: title.to_string(),
            price: Decimal::from(100),
            quantity,
            color: None,
            image_cover: None,
        }
    }

    fn order(id: &str, user: Option<&str>, total: i64, items: Vec<LineItem>) -> Order {
        Order {
            id: OrderId::new(id),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            address: String::new(),
            items,
            totals: OrderTotals {
                total: Decimal::from(total),
                ..OrderTotals::default()
            },
            promo_code: None,
            payment_method: "cash".to_string(),
            status: OrderStatus::Pending.to_string(),
            created_at: None,
            user_id: user.map(UserId::new),
        }
    }

    fn user(id: &str) -> User {
        User {
            id: UserId::new(id),
            name: format!("User {id}"),
            email: Some(format!("{id}@example.com")),
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

    #[test]
    fn test_product_sales_groups_by_title_in_first_seen_order() {
        let orders = vec![
            order("1", None, 0, vec![line("Silk", 2), line("Modal", 1)]),
            order("2", None, 0, vec![line("Modal", 3), line("Chiffon", 0)]),
        ];
        let sales = product_sales(&orders);
        let summary: Vec<(&str, u64)> = sales
            .iter()
            .map(|s| (s.title.as_str(), s.quantity))
            .collect();
        assert_eq!(summary, vec![("Silk", 2), ("Modal", 4), ("Chiffon", 0)]);
    }

    #[test]
    fn test_rankings_are_stable() {
        let sales = vec![
            ProductSales { title: "A".into(), quantity: 3 },
            ProductSales { title: "B".into(), quantity: 5 },
            ProductSales { title: "C".into(), quantity: 3 },
            ProductSales { title: "D".into(), quantity: 1 },
        ];

        let top: Vec<String> = top_sellers(&sales, 3).into_iter().map(|s| s.title).collect();
        assert_eq!(top, vec!["B", "A", "C"]);

        let least: Vec<String> = least_sellers(&sales, 3).into_iter().map(|s| s.title).collect();
        assert_eq!(least, vec!["D", "A", "C"]);
    }

    #[test]
    fn test_rankings_with_fewer_products_than_n() {
        let sales = vec![ProductSales { title: "Only".into(), quantity: 1 }];
        assert_eq!(top_sellers(&sales, DEFAULT_RANKING_SIZE).len(), 1);
        assert!(least_sellers(&[], DEFAULT_RANKING_SIZE).is_empty());
    }

    #[test]
    fn test_average_spend_never_divides_by_zero() {
        let users = vec![user("a"), user("b")];
        let orders = vec![
            order("1", Some("a"), 100, vec![]),
            order("2", Some("a"), 250, vec![]),
            order("3", None, 999, vec![]),
        ];

        let spend = average_spend(&users, &orders);
        assert_eq!(spend[0].order_count, 2);
        assert_eq!(spend[0].total_spent, Decimal::from(350));
        assert_eq!(spend[0].average_spend, Decimal::from(175));
        assert_eq!(spend[1].order_count, 0);
        assert_eq!(spend[1].average_spend, Decimal::ZERO);
    }

    #[test]
    fn test_average_spend_rounds_to_cents() {
        let users = vec![user("a")];
        let orders = vec![
            order("1", Some("a"), 100, vec![]),
            order("2", Some("a"), 100, vec![]),
            order("3", Some("a"), 101, vec![]),
        ];
        // 301 / 3 = 100.333...
        assert_eq!(
            average_spend(&users, &orders)[0].average_spend,
            Decimal::new(10033, 2)
        );
    }

    #[test]
    fn test_orders_per_user() {
        let users = vec![user("a"), user("b")];
        let orders = vec![order("1", Some("b"), 10, vec![]), order("2", Some("z"), 10, vec![])];
        let counts = orders_per_user(&users, &orders);
        assert_eq!(counts[&UserId::new("a")], 0);
        assert_eq!(counts[&UserId::new("b")], 1);
        assert!(!counts.contains_key(&UserId::new("z")));
    }

    #[test]
    fn test_report_build() {
        let snapshot = StoreSnapshot {
            users: vec![user("a"), user("b")],
            orders: vec![order("1", Some("a"), 300, vec![line("Silk", 2)])],
        };
        let report = AnalyticsReport::build(&snapshot);
        assert_eq!(report.top_sellers.len(), 1);
        assert_eq!(report.least_sellers[0].title, "Silk");
        assert_eq!(report.user_spend[0].average_spend, Decimal::from(300));
        assert_eq!(report.orders_per_user[&UserId::new("a")], 1);
        assert_eq!(report.orders_per_user[&UserId::new("b")], 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ordersPerUser"], serde_json::json!({ "a": 1, "b": 0 }));
    }
}
