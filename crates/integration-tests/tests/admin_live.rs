//! Live tests against a running admin server.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (cargo run -p qamar-cli -- migrate)
//! - The admin server running (cargo run -p qamar-admin)
//! - `ADMIN_EMAIL` set to the same address the server was started with
//!
//! Run with: cargo test -p qamar-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// Base URL for admin API (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create a client and sign in as the configured admin.
async fn authenticated_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");

    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set");
    let resp = client
        .post(format!("{}/api/admin/login", admin_base_url()))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

/// Read a decimal serialized as a JSON string.
fn decimal(value: &Value) -> Option<Decimal> {
    value.as_str().and_then(|s| s.parse().ok())
}

/// Unique suffix so repeated runs do not collide.
fn unique_suffix() -> String {
    chrono::Utc::now().format("%H%M%S%f").to_string()
}

// ============================================================================
// Promo codes
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_promo_code_lifecycle() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();
    let code = format!("LIVE{}", unique_suffix());

    let resp = client
        .post(format!("{base_url}/api/promo-codes"))
        .json(&json!({
            "code": code.to_lowercase(),
            "discountType": "percentage",
            "discountValue": "10",
            "maxDiscount": "30",
            "usageLimit": "1",
        }))
        .send()
        .await
        .expect("Failed to create promo code");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(created["code"], json!(code));
    assert_eq!(created["usedCount"], json!(0));

    // Preview: 10% of 500 is 50, capped at 30
    let resp = client
        .post(format!("{base_url}/api/promo-codes/{code}/evaluate"))
        .json(&json!({ "subtotal": "500", "deliveryFee": "50" }))
        .send()
        .await
        .expect("Failed to evaluate");
    assert_eq!(resp.status(), StatusCode::OK);
    let applied: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(decimal(&applied["discount"]), Some(Decimal::from(30)));
    assert_eq!(decimal(&applied["total"]), Some(Decimal::from(520)));

    let redeem = |client: Client| {
        let url = format!("{base_url}/api/promo-codes/{code}/redeem");
        async move {
            client
                .post(url)
                .json(&json!({ "subtotal": "500" }))
                .send()
                .await
                .expect("Failed to redeem")
        }
    };
    assert_eq!(redeem(client.clone()).await.status(), StatusCode::OK);

    // Limit of one use is now reached
    let resp = redeem(client.clone()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert!(body["rejection"].is_object());

    let resp = client
        .get(format!("{base_url}/api/promo-codes?q={code}&status=active"))
        .send()
        .await
        .expect("Failed to list promo codes");
    let listed: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(listed[0]["statusLabel"], json!("Used up"));
    assert_eq!(listed[0]["usage"], json!("1/1 uses"));

    let resp = client
        .delete(format!("{base_url}/api/promo-codes/{code}"))
        .send()
        .await
        .expect("Failed to delete promo code");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_duplicate_promo_code_conflicts() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();
    let code = format!("DUP{}", unique_suffix());
    let body = json!({ "code": code, "discountType": "fixed", "discountValue": "25" });

    let first = client
        .post(format!("{base_url}/api/promo-codes"))
        .json(&body)
        .send()
        .await
        .expect("Failed to create promo code");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{base_url}/api/promo-codes"))
        .json(&body)
        .send()
        .await
        .expect("Failed to create promo code");
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let _ = client
        .delete(format!("{base_url}/api/promo-codes/{code}"))
        .send()
        .await;
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_product_lifecycle() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();
    let title = format!("Live Test Scarf {}", unique_suffix());

    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "title": title,
            "category": "Silk",
            "price": 320,
            "images": ["https://cdn.example.com/a.jpg", "  "],
            "colors": [{ "name": "Red", "image": "", "hex": "#f00" }],
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Invalid JSON");
    let id = product["id"].as_str().expect("id").to_owned();
    assert_eq!(product["images"].as_array().map(Vec::len), Some(1));
    assert_eq!(product["colors"].as_array().map(Vec::len), Some(0));
    assert_eq!(product["stock"], json!(0));

    let resp = client
        .put(format!("{base_url}/api/products/{id}"))
        .json(&json!({ "title": title, "category": "Silk", "price": "300", "stock": "4" }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(updated["stock"], json!(4));

    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Read-only views
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_dashboard_and_analytics_shape() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let dashboard: Value = client
        .get(format!("{base_url}/api/dashboard"))
        .send()
        .await
        .expect("Failed to get dashboard")
        .json()
        .await
        .expect("Invalid JSON");
    assert!(dashboard["counts"]["users"].is_number());
    assert!(dashboard["recentActivity"].is_array());

    let analytics: Value = client
        .get(format!("{base_url}/api/analytics"))
        .send()
        .await
        .expect("Failed to get analytics")
        .json()
        .await
        .expect("Invalid JSON");
    assert!(analytics["topSellers"].as_array().is_some_and(|a| a.len() <= 5));
    assert!(analytics["userSpend"].is_array());
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_sale_bar_update() {
    let client = authenticated_client().await;
    let base_url = admin_base_url();

    let resp = client
        .put(format!("{base_url}/api/sale/bar"))
        .json(&json!({ "description": "  Free delivery this week  " }))
        .send()
        .await
        .expect("Failed to update sale bar");
    assert_eq!(resp.status(), StatusCode::OK);

    let bar: Value = client
        .get(format!("{base_url}/api/sale/bar"))
        .send()
        .await
        .expect("Failed to get sale bar")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(bar["description"], json!("Free delivery this week"));
}
