//! In-process tests for the admin router.
//!
//! These cover health checks, sign-in, session enforcement and request
//! validation. No database is needed: every request here is answered before
//! a query runs, except the ones asserting how database failures surface.

use axum::http::StatusCode;
use serde_json::json;

use qamar_integration_tests::{ADMIN_EMAIL, login, send, test_app};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();
    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("ok"));
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = test_app();
    let response = send(&app, "GET", "/health/ready", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Sign-in
// ============================================================================

#[tokio::test]
async fn test_api_requires_session() {
    let app = test_app();
    for uri in [
        "/api/dashboard",
        "/api/orders",
        "/api/users",
        "/api/products",
        "/api/promo-codes",
        "/api/analytics",
        "/api/sale/bar",
        "/api/admin/session",
    ] {
        let response = send(&app, "GET", uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_login_rejects_other_emails() {
    let app = test_app();
    for email in ["someone@else.com", "not an email", ""] {
        let response = send(
            &app,
            "POST",
            "/api/admin/login",
            None,
            Some(&json!({ "email": email })),
        )
        .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{email:?}");
        assert_eq!(response.body, json!({ "success": false }));
    }
}

#[tokio::test]
async fn test_login_is_case_insensitive() {
    let app = test_app();
    let response = send(
        &app,
        "POST",
        "/api/admin/login",
        None,
        Some(&json!({ "email": "  Admin@QamarScarves.com " })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));
    assert!(response.cookie.is_some());
}

#[tokio::test]
async fn test_session_round_trip() {
    let app = test_app();
    let cookie = login(&app).await;
    assert!(cookie.starts_with("qamar_admin_session="));

    let response = send(&app, "GET", "/api/admin/session", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], json!(ADMIN_EMAIL));

    let response = send(&app, "POST", "/api/admin/logout", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));

    let response = send(&app, "GET", "/api/admin/session", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Validation before storage
// ============================================================================

#[tokio::test]
async fn test_create_promo_code_rejects_bad_values() {
    let app = test_app();
    let cookie = login(&app).await;

    let cases = [
        json!({ "code": "", "discountType": "percentage", "discountValue": "10" }),
        json!({ "code": "SAVE", "discountType": "bogus", "discountValue": "10" }),
        json!({ "code": "SAVE", "discountType": "percentage", "discountValue": "abc" }),
        json!({ "code": "SAVE", "discountType": "percentage", "discountValue": "150" }),
        json!({ "code": "SAVE", "discountType": "fixed", "discountValue": "0" }),
        json!({ "code": "SAVE", "discountType": "fixed", "discountValue": "0.001" }),
        json!({ "code": "SAVE", "discountType": "fixed", "discountValue": "123456789012" }),
        json!({ "code": "SAVE", "discountType": "fixed", "discountValue": "5", "usageLimit": "1.5" }),
        json!({ "code": "SAVE", "discountType": "fixed", "discountValue": "5", "expiresAt": "2001-01-01" }),
    ];

    for body in cases {
        let response = send(&app, "POST", "/api/promo-codes", Some(&cookie), Some(&body)).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(response.body["error"].is_string());
    }
}

#[tokio::test]
async fn test_create_product_rejects_missing_fields() {
    let app = test_app();
    let cookie = login(&app).await;

    let cases = [
        json!({ "category": "Silk", "price": "100" }),
        json!({ "title": "Scarf", "price": "100" }),
        json!({ "title": "Scarf", "category": "Silk" }),
        json!({ "title": "Scarf", "category": "Silk", "price": "-5" }),
        json!({ "title": "Scarf", "category": "Silk", "price": "0.001" }),
        json!({ "title": "Scarf", "category": "Silk", "price": "123456789012" }),
        json!({ "title": "Scarf", "category": "Silk", "price": "100", "stock": "lots" }),
    ];

    for body in cases {
        let response = send(&app, "POST", "/api/products", Some(&cookie), Some(&body)).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    }
}

#[tokio::test]
async fn test_promo_evaluation_rejects_oversized_amounts() {
    let app = test_app();
    let cookie = login(&app).await;

    for uri in ["/api/promo-codes/SALE10/evaluate", "/api/promo-codes/SALE10/redeem"] {
        let body = json!({ "subtotal": "79228162514264337593543950335" });
        let response = send(&app, "POST", uri, Some(&cookie), Some(&body)).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }
}

#[tokio::test]
async fn test_order_status_must_be_known() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send(
        &app,
        "PUT",
        "/api/orders/A1/status",
        Some(&cookie),
        Some(&json!({ "status": "lost_in_transit" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_promo_code_path_is_validated() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send(&app, "GET", "/api/promo-codes/not%20valid!", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Database failures
// ============================================================================

#[tokio::test]
async fn test_database_errors_are_not_exposed() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send(&app, "GET", "/api/dashboard", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({ "error": "Internal server error" }));
}
