#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use storefront_api::auth::google::{GoogleAuthError, GoogleIdentityProvider, GoogleProfile};
use storefront_api::auth::jwt::{issue_access_token, JwtConfig};
use storefront_api::auth::password::hash_password;
use storefront_api::config::{ServerConfig, ShopConfig};
use storefront_api::router::build_app_router;
use storefront_api::state::AppState;
use storefront_core::roles::{CUSTOMER_ROLE_ID, ROLE_ADMIN, ROLE_CUSTOMER};
use storefront_db::models::catalog::{Catalog, CreateCatalog, CreateSubcatalog, Subcatalog};
use storefront_db::models::product::{CreateProduct, Product};
use storefront_db::models::user::{CreateUser, User};
use storefront_db::repositories::{CatalogRepo, ProductRepo, SubcatalogRepo, UserRepo};

pub const ADMIN_ROLE_ID: i64 = 1;
pub const TEST_PASSWORD: &str = "secret-password-1";
pub const FRONTEND_URL: &str = "http://front.test";
pub const APP_URL: &str = "http://shop.test";

/// The authorization code the fake Google provider accepts.
pub const GOOGLE_CODE: &str = "valid-google-code";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_url: APP_URL.to_string(),
        frontend_url: FRONTEND_URL.to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 30,
        },
        google: None,
        shop: ShopConfig::default(),
    }
}

/// Google stand-in: accepts [`GOOGLE_CODE`] and returns a fixed profile.
pub struct FakeGoogle {
    pub profile: GoogleProfile,
}

impl FakeGoogle {
    pub fn new(id: &str, email: &str) -> Self {
        Self {
            profile: GoogleProfile {
                id: id.to_string(),
                email: email.to_string(),
                name: Some("Google User".to_string()),
                avatar: Some("https://lh3.googleusercontent.test/a.png".to_string()),
            },
        }
    }
}

#[async_trait]
impl GoogleIdentityProvider for FakeGoogle {
    fn authorize_url(&self) -> Result<String, GoogleAuthError> {
        Ok("https://accounts.google.test/o/oauth2/v2/auth?client_id=test".to_string())
    }

    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, GoogleAuthError> {
        if code == GOOGLE_CODE {
            Ok(self.profile.clone())
        } else {
            Err(GoogleAuthError::Url(format!("unknown code {code}")))
        }
    }
}

/// Build the full application router, with Google sign-in disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, test_config(), None)
}

/// Build the application with a custom shop configuration.
pub fn build_test_app_with_shop(pool: PgPool, shop: ShopConfig) -> Router {
    let mut config = test_config();
    config.shop = shop;
    build_app(pool, config, None)
}

/// Build the application with the given Google provider.
pub fn build_test_app_with_google(pool: PgPool, google: FakeGoogle) -> Router {
    build_app(pool, test_config(), Some(Arc::new(google)))
}

fn build_app(
    pool: PgPool,
    config: ServerConfig,
    google: Option<Arc<dyn GoogleIdentityProvider>>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        google,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST without a body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Create a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role_id: i64) -> User {
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: Some(hashed),
            google_id: None,
            avatar: None,
            role_id,
        },
    )
    .await
    .unwrap()
}

/// Create a customer and return it with a valid access token.
pub async fn customer(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, CUSTOMER_ROLE_ID).await;
    let token = issue_access_token(user.id, ROLE_CUSTOMER, &test_config().jwt)
        .unwrap()
        .token;
    (user, token)
}

/// Create an admin and return it with a valid access token.
pub async fn admin(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, ADMIN_ROLE_ID).await;
    let token = issue_access_token(user.id, ROLE_ADMIN, &test_config().jwt)
        .unwrap()
        .token;
    (user, token)
}

pub async fn seed_catalog(pool: &PgPool, name: &str) -> Catalog {
    let input = CreateCatalog {
        name_uz: format!("{name} uz"),
        name_ru: format!("{name} ru"),
        name_eng: name.to_string(),
        slug: None,
        description_uz: None,
        description_ru: None,
        description_eng: None,
        image: None,
        is_active: None,
        sort_order: None,
    };
    let slug = storefront_core::catalog::slugify(name);
    CatalogRepo::create(pool, &input, &slug).await.unwrap()
}

pub async fn seed_subcatalog(pool: &PgPool, catalog_id: i64, name: &str) -> Subcatalog {
    let input = CreateSubcatalog {
        catalog_id,
        name_uz: format!("{name} uz"),
        name_ru: format!("{name} ru"),
        name_eng: name.to_string(),
        slug: None,
        description_uz: None,
        description_ru: None,
        description_eng: None,
        image: None,
        is_active: None,
        sort_order: None,
    };
    let slug = storefront_core::catalog::slugify(name);
    SubcatalogRepo::create(pool, &input, &slug).await.unwrap()
}

/// Create an active product with the given price (e.g. `"10.00"`) and stock.
pub async fn seed_product(
    pool: &PgPool,
    subcatalog_id: i64,
    name: &str,
    price: &str,
    stock: i32,
) -> Product {
    let input = CreateProduct {
        subcatalog_id,
        name_uz: format!("{name} uz"),
        name_ru: format!("{name} ru"),
        name_eng: name.to_string(),
        slug: None,
        description_uz: None,
        description_ru: None,
        description_eng: None,
        short_description_uz: None,
        short_description_ru: None,
        short_description_eng: None,
        price: price.parse::<Decimal>().unwrap(),
        old_price: None,
        sku: None,
        stock: Some(stock),
        image: None,
        gallery: None,
        is_active: None,
        is_featured: None,
        sort_order: None,
    };
    let slug = storefront_core::catalog::slugify(name);
    let sku = storefront_core::catalog::generate_sku();
    ProductRepo::create(pool, &input, &slug, &sku).await.unwrap()
}

/// A catalog with one subcatalog, returning the subcatalog.
pub async fn seed_tree(pool: &PgPool) -> Subcatalog {
    let catalog = seed_catalog(pool, "Electronics").await;
    seed_subcatalog(pool, catalog.id, "Phones").await
}

/// Shipping fields accepted by `POST /orders`.
pub fn shipping_body() -> serde_json::Value {
    serde_json::json!({
        "payment_method": "cash",
        "shipping_name": "Aziz Karimov",
        "shipping_phone": "+998901234567",
        "shipping_address": "Amir Temur 15",
        "shipping_city": "Tashkent",
    })
}
