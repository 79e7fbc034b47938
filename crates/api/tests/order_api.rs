//! HTTP-level integration tests for checkout, order history and cancellation.

mod common;

use axum::http::StatusCode;
use common::{
    admin, body_json, customer, get_auth, post_auth, post_json_auth, put_json_auth, seed_product,
    seed_tree, shipping_body,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use storefront_api::config::ShopConfig;
use storefront_core::order::ChargeSettings;
use storefront_db::models::product::UpdateProduct;
use storefront_db::repositories::{CartRepo, OrderRepo, ProductRepo};

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

async fn add(pool: &PgPool, token: &str, product_id: i64, quantity: i32) {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/cart/{product_id}"),
        json!({ "quantity": quantity }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn checkout(pool: &PgPool, token: &str) -> (StatusCode, Value) {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/orders",
        shipping_body(),
        token,
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn set_stock(pool: &PgPool, product_id: i64, stock: i32) {
    ProductRepo::update(
        pool,
        product_id,
        &UpdateProduct {
            stock: Some(stock),
            ..Default::default()
        },
    )
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_turns_cart_into_order(pool: PgPool) {
    let (user, token) = customer(&pool, "buyer@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    let b = seed_product(&pool, sub.id, "Beta", "25.00", 1).await;
    add(&pool, &token, a.id, 2).await;
    add(&pool, &token, b.id, 1).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/cart", &token).await;
    let cart = body_json(response).await;
    assert_eq!(decimal(&cart["total"]), Decimal::new(4500, 2));
    assert_eq!(cart["items_count"], 2);

    let (status, json) = checkout(&pool, &token).await;
    assert_eq!(status, StatusCode::CREATED);
    let order = &json["order"];
    assert!(json["message"].is_string());
    assert_eq!(decimal(&order["subtotal"]), Decimal::new(4500, 2));
    assert_eq!(decimal(&order["total"]), Decimal::new(4500, 2));
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_status"], "pending");
    assert_eq!(order["payment_method"], "cash");
    assert_eq!(order["user_id"], user.id);
    assert_eq!(order["can_cancel"], true);

    let number = order["order_number"].as_str().unwrap();
    assert!(number.starts_with("ORD-"));
    assert_eq!(number.len(), "ORD-20251216-000001".len());

    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let alpha = items.iter().find(|i| i["product_id"] == a.id).unwrap();
    assert_eq!(alpha["product_name"], "Alpha");
    assert_eq!(alpha["quantity"], 2);
    assert_eq!(decimal(&alpha["subtotal"]), Decimal::new(2000, 2));

    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(3));
    assert_eq!(ProductRepo::stock(&pool, b.id).await.unwrap(), Some(0));
    assert_eq!(CartRepo::count_lines(&pool, user.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_applies_shipping_and_tax(pool: PgPool) {
    let shop = ShopConfig {
        charges: ChargeSettings {
            shipping_cost: Decimal::new(500, 2),
            free_shipping_threshold: Decimal::new(10000, 2),
            tax_rate: Decimal::new(12, 2),
        },
        ..ShopConfig::default()
    };
    let (_user, token) = customer(&pool, "buyer@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    add(&pool, &token, a.id, 2).await;

    let app = common::build_test_app_with_shop(pool.clone(), shop);
    let response = post_json_auth(app, "/api/v1/orders", shipping_body(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let order = &json["order"];
    assert_eq!(decimal(&order["shipping_cost"]), Decimal::new(500, 2));
    assert_eq!(decimal(&order["tax"]), Decimal::new(240, 2));
    assert_eq!(decimal(&order["total"]), Decimal::new(2740, 2));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn item_names_are_snapshotted_in_request_locale(pool: PgPool) {
    let (_user, token) = customer(&pool, "buyer@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    add(&pool, &token, a.id, 1).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/orders?lang=ru",
        shipping_body(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["order"]["items"][0]["product_name"], "Alpha ru");
    assert_eq!(json["order"]["items"][0]["product_sku"], a.sku.unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_with_empty_cart_fails(pool: PgPool) {
    let (_user, token) = customer(&pool, "buyer@example.com").await;
    let (status, json) = checkout(&pool, &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "EMPTY_CART");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_checkout_leaves_cart_and_stock_untouched(pool: PgPool) {
    let (user, token) = customer(&pool, "buyer@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    let b = seed_product(&pool, sub.id, "Beta", "25.00", 1).await;
    add(&pool, &token, a.id, 2).await;
    add(&pool, &token, b.id, 1).await;
    // Someone else bought the last Beta in the meantime.
    set_stock(&pool, b.id, 0).await;

    let (status, json) = checkout(&pool, &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    assert!(json["error"].as_str().unwrap().contains("Beta"));

    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(5));
    assert_eq!(CartRepo::count_lines(&pool, user.id).await.unwrap(), 2);
    assert_eq!(OrderRepo::count_for_user(&pool, user.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_checkouts_never_oversell(pool: PgPool) {
    let (_first, first_token) = customer(&pool, "first@example.com").await;
    let (_second, second_token) = customer(&pool, "second@example.com").await;
    let sub = seed_tree(&pool).await;
    let last = seed_product(&pool, sub.id, "Last One", "10.00", 1).await;
    add(&pool, &first_token, last.id, 1).await;
    add(&pool, &second_token, last.id, 1).await;

    let (a, b) = tokio::join!(
        checkout(&pool, &first_token),
        checkout(&pool, &second_token)
    );
    let mut statuses = [a.0, b.0];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(
        statuses,
        [StatusCode::CREATED, StatusCode::UNPROCESSABLE_ENTITY]
    );
    assert_eq!(ProductRepo::stock(&pool, last.id).await.unwrap(), Some(0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overlapping_carts_in_opposite_order_both_check_out(pool: PgPool) {
    let (_first, first_token) = customer(&pool, "first@example.com").await;
    let (_second, second_token) = customer(&pool, "second@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 100).await;
    let b = seed_product(&pool, sub.id, "Beta", "20.00", 100).await;

    for _ in 0..10 {
        add(&pool, &first_token, a.id, 1).await;
        add(&pool, &first_token, b.id, 1).await;
        add(&pool, &second_token, b.id, 1).await;
        add(&pool, &second_token, a.id, 1).await;

        let (first, second) = tokio::join!(
            checkout(&pool, &first_token),
            checkout(&pool, &second_token)
        );
        assert_eq!(first.0, StatusCode::CREATED, "{}", first.1);
        assert_eq!(second.0, StatusCode::CREATED, "{}", second.1);
    }

    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(80));
    assert_eq!(ProductRepo::stock(&pool, b.id).await.unwrap(), Some(80));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_validates_shipping_fields(pool: PgPool) {
    let (_user, token) = customer(&pool, "buyer@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    add(&pool, &token, a.id, 1).await;

    let mut body = shipping_body();
    body["shipping_phone"] = json!("1".repeat(21));
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/orders", body, &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["fields"]["shipping_phone"].is_array());

    let mut body = shipping_body();
    body["payment_method"] = json!("bitcoin");
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/orders", body, &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("bitcoin"));

    let mut body = shipping_body();
    body["shipping_name"] = json!("   ");
    body["shipping_city"] = json!("\t");
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/orders", body, &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["fields"]["shipping_name"].is_array());
    assert!(json["fields"]["shipping_city"].is_array());

    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(5));
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn orders_are_private_to_their_owner(pool: PgPool) {
    let (_owner, owner_token) = customer(&pool, "owner@example.com").await;
    let (_other, other_token) = customer(&pool, "other@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    add(&pool, &owner_token, a.id, 1).await;
    let (_, json) = checkout(&pool, &owner_token).await;
    let order_id = json["order"]["id"].as_i64().unwrap();

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/v1/orders", &owner_token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["per_page"], 10);
    assert_eq!(json["data"][0]["id"], order_id);
    assert_eq!(json["data"][0]["items"].as_array().unwrap().len(), 1);

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/v1/orders", &other_token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);

    let uri = format!("/api/v1/orders/{order_id}");
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], order_id);

    let response = get_auth(common::build_test_app(pool.clone()), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_auth(
        common::build_test_app(pool),
        &format!("{uri}/cancel"),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn cancel_restores_stock_once(pool: PgPool) {
    let (_user, token) = customer(&pool, "buyer@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    add(&pool, &token, a.id, 2).await;
    let (_, json) = checkout(&pool, &token).await;
    let uri = format!("/api/v1/orders/{}/cancel", json["order"]["id"]);
    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(3));

    let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["order"]["status"], "cancelled");
    assert_eq!(json["order"]["can_cancel"], false);
    assert_eq!(json["order"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(5));

    let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(5));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancel_skips_deleted_products(pool: PgPool) {
    let (_user, token) = customer(&pool, "buyer@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    let b = seed_product(&pool, sub.id, "Beta", "25.00", 5).await;
    add(&pool, &token, a.id, 1).await;
    add(&pool, &token, b.id, 1).await;
    let (_, json) = checkout(&pool, &token).await;
    let order_id = json["order"]["id"].as_i64().unwrap();
    ProductRepo::delete(&pool, b.id).await.unwrap();

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/orders/{order_id}/cancel"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(5));

    let json = body_json(response).await;
    let items = json["order"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|i| i["product_id"].is_null() && i["product_name"] == "Beta"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn shipped_orders_cannot_be_cancelled(pool: PgPool) {
    let (_user, token) = customer(&pool, "buyer@example.com").await;
    let (_admin, admin_token) = admin(&pool, "admin@example.com").await;
    let sub = seed_tree(&pool).await;
    let a = seed_product(&pool, sub.id, "Alpha", "10.00", 5).await;
    add(&pool, &token, a.id, 1).await;
    let (_, json) = checkout(&pool, &token).await;
    let order_id = json["order"]["id"].as_i64().unwrap();

    for status in ["confirmed", "processing", "shipped"] {
        let response = put_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/admin/orders/{order_id}/status"),
            json!({ "status": status }),
            &admin_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "transition to {status}");
    }

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/orders/{order_id}/cancel"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ProductRepo::stock(&pool, a.id).await.unwrap(), Some(4));
}
