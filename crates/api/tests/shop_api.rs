//! HTTP-level integration tests for public catalog browsing.

mod common;

use axum::body::Body;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{Request, StatusCode};
use common::{body_json, get, seed_catalog, seed_product, seed_subcatalog, seed_tree};
use serde_json::Value;
use sqlx::PgPool;
use storefront_db::models::catalog::UpdateCatalog;
use storefront_db::models::product::UpdateProduct;
use storefront_db::repositories::{CatalogRepo, ProductRepo};
use tower::ServiceExt;

fn names(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name_eng"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Catalogs and subcatalogs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn catalogs_list_only_active_with_counts(pool: PgPool) {
    let electronics = seed_catalog(&pool, "Electronics").await;
    seed_subcatalog(&pool, electronics.id, "Phones").await;
    seed_subcatalog(&pool, electronics.id, "Laptops").await;
    let hidden = seed_catalog(&pool, "Hidden").await;
    CatalogRepo::update(
        &pool,
        hidden.id,
        &UpdateCatalog {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let response = get(common::build_test_app(pool), "/api/v1/catalogs").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["slug"], "electronics");
    assert_eq!(data[0]["subcatalogs_count"], 2);
    assert_eq!(data[0]["name"], "Electronics");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn catalog_by_slug_includes_subcatalogs(pool: PgPool) {
    let sub = seed_tree(&pool).await;
    seed_product(&pool, sub.id, "Pixel", "500.00", 3).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/catalogs/electronics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let subs = json["data"]["subcatalogs"].as_array().unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0]["slug"], "phones");
    assert_eq!(subs[0]["products_count"], 1);

    let response = get(common::build_test_app(pool), "/api/v1/catalogs/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn subcatalogs_filter_by_catalog_and_nest_parent(pool: PgPool) {
    let electronics = seed_catalog(&pool, "Electronics").await;
    let clothing = seed_catalog(&pool, "Clothing").await;
    seed_subcatalog(&pool, electronics.id, "Phones").await;
    seed_subcatalog(&pool, clothing.id, "Jackets").await;

    let uri = format!("/api/v1/subcatalogs?catalog_id={}", clothing.id);
    let response = get(common::build_test_app(pool.clone()), &uri).await;
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["slug"], "jackets");
    assert_eq!(data[0]["catalog"]["slug"], "clothing");

    let response = get(common::build_test_app(pool), "/api/v1/subcatalogs/phones").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["catalog"]["id"], electronics.id);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn product_listing_paginates(pool: PgPool) {
    let sub = seed_tree(&pool).await;
    for i in 0..5 {
        seed_product(&pool, sub.id, &format!("Phone {i}"), "100.00", 1).await;
    }

    let response = get(
        common::build_test_app(pool),
        "/api/v1/products?per_page=2&page=3",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 5);
    assert_eq!(json["per_page"], 2);
    assert_eq!(json["current_page"], 3);
    assert_eq!(json["last_page"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn product_listing_filters_and_sorts(pool: PgPool) {
    let sub = seed_tree(&pool).await;
    seed_product(&pool, sub.id, "Budget Phone", "99.00", 5).await;
    seed_product(&pool, sub.id, "Mid Phone", "299.00", 5).await;
    seed_product(&pool, sub.id, "Flagship Phone", "999.00", 5).await;
    let hidden = seed_product(&pool, sub.id, "Hidden Phone", "199.00", 5).await;
    ProductRepo::update(
        &pool,
        hidden.id,
        &UpdateProduct {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/products?sort=price_desc",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(
        names(&json),
        vec!["Flagship Phone", "Mid Phone", "Budget Phone"]
    );

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/products?min_price=100&max_price=500",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Mid Phone"]);

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/products?search=flagship",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Flagship Phone"]);

    let response = get(
        common::build_test_app(pool),
        "/api/v1/products?sort=name&order=asc",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(
        names(&json),
        vec!["Budget Phone", "Flagship Phone", "Mid Phone"]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn product_names_follow_request_locale(pool: PgPool) {
    let sub = seed_tree(&pool).await;
    seed_product(&pool, sub.id, "Pixel", "500.00", 3).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/products/pixel?lang=ru").await;
    let json = body_json(response).await;
    assert_eq!(json["product"]["name"], "Pixel ru");

    let request = Request::builder()
        .uri("/api/v1/products/pixel")
        .header(ACCEPT_LANGUAGE, "uz-UZ,uz;q=0.9,en;q=0.5")
        .body(Body::empty())
        .unwrap();
    let response = common::build_test_app(pool.clone())
        .oneshot(request)
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["product"]["name"], "Pixel uz");

    let response = get(common::build_test_app(pool), "/api/v1/products/pixel?lang=xx").await;
    let json = body_json(response).await;
    assert_eq!(json["product"]["name"], "Pixel");
    assert_eq!(json["product"]["name_ru"], "Pixel ru");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn product_detail_with_related_products(pool: PgPool) {
    let sub = seed_tree(&pool).await;
    let pixel = seed_product(&pool, sub.id, "Pixel", "500.00", 3).await;
    seed_product(&pool, sub.id, "Galaxy", "450.00", 0).await;
    ProductRepo::update(
        &pool,
        pixel.id,
        &UpdateProduct {
            old_price: Some(Some("625.00".parse().unwrap())),
            image: Some(Some("products/pixel.jpg".into())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let response = get(common::build_test_app(pool.clone()), "/api/v1/products/pixel").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let product = &json["product"];
    assert_eq!(product["price"], "500.00");
    assert_eq!(product["discount_percentage"], 20);
    assert_eq!(product["in_stock"], true);
    assert_eq!(product["image"], "http://shop.test/storage/products/pixel.jpg");
    assert_eq!(product["subcatalog"]["catalog"]["slug"], "electronics");

    let related = json["related_products"].as_array().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["slug"], "galaxy");
    assert_eq!(related[0]["in_stock"], false);

    let response = get(common::build_test_app(pool), "/api/v1/products/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn featured_products_only(pool: PgPool) {
    let sub = seed_tree(&pool).await;
    let star = seed_product(&pool, sub.id, "Star", "10.00", 1).await;
    seed_product(&pool, sub.id, "Plain", "10.00", 1).await;
    ProductRepo::update(
        &pool,
        star.id,
        &UpdateProduct {
            is_featured: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let response = get(common::build_test_app(pool.clone()), "/api/v1/products/featured").await;
    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Star"]);

    let response = get(common::build_test_app(pool), "/api/v1/products?featured=1").await;
    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Star"]);
}
