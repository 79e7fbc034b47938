//! Admin-only handlers: catalog maintenance and order management.
//!
//! Every handler takes [`RequireAdmin`], so non-admins get 403 before any
//! work is done.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_core::catalog::{generate_sku, slugify};
use storefront_core::error::CoreError;
use storefront_core::status::{OrderStatus, PaymentStatus};
use storefront_core::types::DbId;
use storefront_db::models::catalog::{
    CreateCatalog, CreateSubcatalog, UpdateCatalog, UpdateSubcatalog,
};
use storefront_db::models::product::{CreateProduct, UpdateProduct};
use storefront_db::repositories::{CatalogRepo, OrderRepo, ProductRepo, SubcatalogRepo};

use super::view_context;
use crate::checkout::transition_order;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::locale::RequestLocale;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::resources::{
    order_with_items, orders_with_items, CatalogView, OrderView, ProductView, SubcatalogView,
};
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/orders`.
#[derive(Debug, Deserialize)]
pub struct AdminOrderParams {
    pub status: Option<OrderStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Request body for `PUT /admin/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Request body for `PUT /admin/orders/{id}/payment`.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
    pub payment_transaction_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/catalogs
pub async fn create_catalog(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    AppJson(input): AppJson<CreateCatalog>,
) -> AppResult<(StatusCode, Json<DataResponse<CatalogView>>)> {
    let slug = resolve_slug(input.slug.as_deref(), &input.name_eng)?;
    let catalog = CatalogRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(catalog_id = catalog.id, admin_id = admin.user_id, "Catalog created");

    let ctx = view_context(&state, locale);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CatalogView::new(&catalog, &ctx),
        }),
    ))
}

/// PUT /api/v1/admin/catalogs/{id}
pub async fn update_catalog(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateCatalog>,
) -> AppResult<Json<DataResponse<CatalogView>>> {
    input.slug = normalize_slug(input.slug.take())?;
    let catalog = CatalogRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Catalog",
            id,
        })?;
    let ctx = view_context(&state, locale);
    Ok(Json(DataResponse {
        data: CatalogView::new(&catalog, &ctx),
    }))
}

/// DELETE /api/v1/admin/catalogs/{id}
///
/// Removes the catalog's subcatalogs and products with it.
pub async fn delete_catalog(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CatalogRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Catalog",
            id,
        }
        .into());
    }
    tracing::info!(catalog_id = id, admin_id = admin.user_id, "Catalog deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Subcatalogs
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/subcatalogs
pub async fn create_subcatalog(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    AppJson(input): AppJson<CreateSubcatalog>,
) -> AppResult<(StatusCode, Json<DataResponse<SubcatalogView>>)> {
    let slug = resolve_slug(input.slug.as_deref(), &input.name_eng)?;
    let sub = SubcatalogRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(subcatalog_id = sub.id, admin_id = admin.user_id, "Subcatalog created");

    let ctx = view_context(&state, locale);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubcatalogView::new(&sub, &ctx),
        }),
    ))
}

/// PUT /api/v1/admin/subcatalogs/{id}
pub async fn update_subcatalog(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateSubcatalog>,
) -> AppResult<Json<DataResponse<SubcatalogView>>> {
    input.slug = normalize_slug(input.slug.take())?;
    let sub = SubcatalogRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Subcatalog",
            id,
        })?;
    let ctx = view_context(&state, locale);
    Ok(Json(DataResponse {
        data: SubcatalogView::new(&sub, &ctx),
    }))
}

/// DELETE /api/v1/admin/subcatalogs/{id}
pub async fn delete_subcatalog(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SubcatalogRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Subcatalog",
            id,
        }
        .into());
    }
    tracing::info!(subcatalog_id = id, admin_id = admin.user_id, "Subcatalog deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/products
pub async fn create_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductView>>)> {
    validate_amounts(Some(input.price), input.old_price, input.stock)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name_eng)?;
    let sku = input
        .sku
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(generate_sku, str::to_string);

    let product = ProductRepo::create(&state.pool, &input, &slug, &sku).await?;
    tracing::info!(product_id = product.id, admin_id = admin.user_id, "Product created");

    let ctx = view_context(&state, locale);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProductView::new(&product, &ctx),
        }),
    ))
}

/// PUT /api/v1/admin/products/{id}
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateProduct>,
) -> AppResult<Json<DataResponse<ProductView>>> {
    validate_amounts(input.price, input.old_price.flatten(), input.stock)?;
    input.slug = normalize_slug(input.slug.take())?;
    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    let ctx = view_context(&state, locale);
    Ok(Json(DataResponse {
        data: ProductView::new(&product, &ctx),
    }))
}

/// DELETE /api/v1/admin/products/{id}
///
/// Past order items keep their snapshot; their product link is cleared.
pub async fn delete_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Product",
            id,
        }
        .into());
    }
    tracing::info!(product_id = id, admin_id = admin.user_id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/orders
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AdminOrderParams>,
) -> AppResult<Json<Paginated<OrderView>>> {
    let (page, per_page, offset) = PageParams {
        page: params.page,
        per_page: params.per_page,
    }
    .resolve(state.config.shop.orders_per_page);

    let orders = OrderRepo::list_all(&state.pool, params.status, per_page, offset).await?;
    let total = OrderRepo::count_all(&state.pool, params.status).await?;
    let data = orders_with_items(&state.pool, orders).await?;
    Ok(Json(Paginated::new(data, page, per_page, total)))
}

/// PUT /api/v1/admin/orders/{id}/status
///
/// Cancelling here restores stock exactly like a customer cancellation.
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    let order = transition_order(&state.pool, id, None, input.status).await?;
    tracing::info!(
        order_id = id,
        admin_id = admin.user_id,
        status = %input.status,
        "Order status set by admin"
    );
    let data = order_with_items(&state.pool, order).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/admin/orders/{id}/payment
pub async fn update_order_payment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdatePaymentRequest>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    let order = OrderRepo::update_payment(
        &state.pool,
        id,
        input.payment_status,
        input.payment_transaction_id.as_deref(),
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Order",
        id,
    })?;
    tracing::info!(
        order_id = id,
        admin_id = admin.user_id,
        payment_status = %input.payment_status,
        "Order payment updated"
    );
    let data = order_with_items(&state.pool, order).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Use the explicit slug when given, otherwise derive one from the English name.
fn resolve_slug(explicit: Option<&str>, name_eng: &str) -> Result<String, AppError> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => slugify(s),
        None => slugify(name_eng),
    };
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "A slug could not be derived from name_eng; provide one explicitly".into(),
        )
        .into());
    }
    Ok(slug)
}

/// Slugify an explicit slug on update. Blank values leave the slug unchanged.
fn normalize_slug(slug: Option<String>) -> Result<Option<String>, AppError> {
    match slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => resolve_slug(Some(s), "").map(Some),
    }
}

fn validate_amounts(
    price: Option<Decimal>,
    old_price: Option<Decimal>,
    stock: Option<i32>,
) -> Result<(), AppError> {
    if price.is_some_and(|p| p < Decimal::ZERO) || old_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(CoreError::Validation("price must not be negative".into()).into());
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(CoreError::Validation("stock must not be negative".into()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn slug_prefers_explicit_value() {
        assert_eq!(resolve_slug(Some("Summer Sale"), "ignored").unwrap(), "summer-sale");
        assert_eq!(resolve_slug(None, "Smart Phones").unwrap(), "smart-phones");
        assert_eq!(resolve_slug(Some("  "), "Laptops").unwrap(), "laptops");
    }

    #[test]
    fn slug_required_when_name_has_no_latin_letters() {
        assert_matches!(
            resolve_slug(None, "Телефоны"),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn blank_slug_on_update_is_ignored() {
        assert_eq!(normalize_slug(Some(" ".into())).unwrap(), None);
        assert_eq!(
            normalize_slug(Some("New Name".into())).unwrap().as_deref(),
            Some("new-name")
        );
    }

    #[test]
    fn negative_amounts_rejected() {
        assert!(validate_amounts(Some(Decimal::ZERO), None, Some(0)).is_ok());
        assert_matches!(
            validate_amounts(Some(Decimal::new(-1, 2)), None, None),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            validate_amounts(None, None, Some(-3)),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
