//! Public catalog browsing: catalogs, subcatalogs and products.

use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_db::models::product::{ProductFilter, ProductSort};
use storefront_db::repositories::{CatalogRepo, ProductRepo, SubcatalogRepo};

use super::view_context;
use crate::error::AppResult;
use crate::middleware::locale::RequestLocale;
use crate::query::PageParams;
use crate::resources::{
    products_with_parents, subcatalogs_with_catalogs, CatalogView, ProductView, SubcatalogView,
};
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /subcatalogs`.
#[derive(Debug, Deserialize)]
pub struct SubcatalogListParams {
    pub catalog_id: Option<DbId>,
}

/// Query parameters for `GET /products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub catalog_id: Option<DbId>,
    pub subcatalog_id: Option<DbId>,
    /// Any of `1`, `true`, `yes` restricts the listing to featured products.
    pub featured: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// `price_asc`, `price_desc` or `name`; anything else means newest first.
    pub sort: Option<String>,
    /// `asc` or `desc`, only used with `sort=name`.
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ProductListParams {
    fn filter(&self) -> ProductFilter {
        let sort = match self.sort.as_deref() {
            Some("price_asc") => ProductSort::PriceAsc,
            Some("price_desc") => ProductSort::PriceDesc,
            Some("name") => ProductSort::Name,
            _ => ProductSort::Newest,
        };
        ProductFilter {
            catalog_id: self.catalog_id,
            subcatalog_id: self.subcatalog_id,
            featured_only: matches!(
                self.featured.as_deref().map(str::to_ascii_lowercase).as_deref(),
                Some("1" | "true" | "yes")
            ),
            search: self.search.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            sort,
            descending: self.order.as_deref() == Some("desc"),
        }
    }
}

/// Response of `GET /products/{slug}`.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: ProductView,
    pub related_products: Vec<ProductView>,
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// GET /api/v1/catalogs
pub async fn list_catalogs(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> AppResult<Json<DataResponse<Vec<CatalogView>>>> {
    let ctx = view_context(&state, locale);
    let rows = CatalogRepo::list_active_with_counts(&state.pool).await?;
    let data = rows
        .iter()
        .map(|row| {
            let mut view = CatalogView::new(&row.catalog, &ctx);
            view.subcatalogs_count = Some(row.subcatalogs_count);
            view
        })
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/catalogs/{slug}
///
/// One active catalog with its active subcatalogs and their product counts.
pub async fn get_catalog(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<CatalogView>>> {
    let ctx = view_context(&state, locale);
    let catalog = CatalogRepo::find_active_by_slug(&state.pool, &slug)
        .await?
        .ok_or(CoreError::NotFoundBySlug {
            entity: "Catalog",
            slug,
        })?;
    let subs = SubcatalogRepo::list_active(&state.pool, Some(catalog.id)).await?;

    let mut view = CatalogView::new(&catalog, &ctx);
    view.subcatalogs_count = Some(subs.len() as i64);
    view.subcatalogs = Some(
        subs.iter()
            .map(|row| {
                let mut sub = SubcatalogView::new(&row.subcatalog, &ctx);
                sub.products_count = Some(row.products_count);
                sub
            })
            .collect(),
    );
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Subcatalogs
// ---------------------------------------------------------------------------

/// GET /api/v1/subcatalogs
pub async fn list_subcatalogs(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(params): Query<SubcatalogListParams>,
) -> AppResult<Json<DataResponse<Vec<SubcatalogView>>>> {
    let ctx = view_context(&state, locale);
    let rows: Vec<_> = SubcatalogRepo::list_active(&state.pool, params.catalog_id)
        .await?
        .into_iter()
        .map(|row| (row.subcatalog, Some(row.products_count)))
        .collect();
    let data = subcatalogs_with_catalogs(&state.pool, &rows, &ctx).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/subcatalogs/{slug}
pub async fn get_subcatalog(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<SubcatalogView>>> {
    let ctx = view_context(&state, locale);
    let sub = SubcatalogRepo::find_active_by_slug(&state.pool, &slug)
        .await?
        .ok_or(CoreError::NotFoundBySlug {
            entity: "Subcatalog",
            slug,
        })?;
    let catalog = CatalogRepo::find_by_id(&state.pool, sub.catalog_id).await?;
    let view = SubcatalogView::new(&sub, &ctx).with_catalog(catalog.as_ref(), &ctx);
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// GET /api/v1/products
///
/// Paginated listing of active products with filters and sorting.
pub async fn list_products(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<Paginated<ProductView>>> {
    let ctx = view_context(&state, locale);
    let (page, per_page, offset) = PageParams {
        page: params.page,
        per_page: params.per_page,
    }
    .resolve(state.config.shop.products_per_page);
    let filter = params.filter();

    let products = ProductRepo::list(&state.pool, &filter, per_page, offset).await?;
    let total = ProductRepo::count(&state.pool, &filter).await?;
    let data = products_with_parents(&state.pool, &products, &ctx).await?;

    Ok(Json(Paginated::new(data, page, per_page, total)))
}

/// GET /api/v1/products/featured
pub async fn featured_products(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> AppResult<Json<DataResponse<Vec<ProductView>>>> {
    let ctx = view_context(&state, locale);
    let products =
        ProductRepo::featured(&state.pool, state.config.shop.featured_products_limit).await?;
    let data = products_with_parents(&state.pool, &products, &ctx).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/products/{slug}
pub async fn get_product(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(slug): Path<String>,
) -> AppResult<Json<ProductDetail>> {
    let ctx = view_context(&state, locale);
    let product = ProductRepo::find_active_by_slug(&state.pool, &slug)
        .await?
        .ok_or(CoreError::NotFoundBySlug {
            entity: "Product",
            slug,
        })?;
    let related =
        ProductRepo::related(&state.pool, &product, state.config.shop.related_products_limit)
            .await?;

    let mut views = products_with_parents(&state.pool, std::slice::from_ref(&product), &ctx).await?;
    let product = views
        .pop()
        .unwrap_or_else(|| ProductView::new(&product, &ctx));
    let related_products = related.iter().map(|p| ProductView::new(p, &ctx)).collect();

    Ok(Json(ProductDetail {
        product,
        related_products,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_params_map_to_filter() {
        let params = ProductListParams {
            featured: Some("1".into()),
            sort: Some("name".into()),
            order: Some("desc".into()),
            search: Some("phone".into()),
            ..Default::default()
        };
        let filter = params.filter();
        assert!(filter.featured_only);
        assert_eq!(filter.sort, ProductSort::Name);
        assert!(filter.descending);
        assert_eq!(filter.search.as_deref(), Some("phone"));
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        let params = ProductListParams {
            sort: Some("random".into()),
            featured: Some("0".into()),
            ..Default::default()
        };
        let filter = params.filter();
        assert_eq!(filter.sort, ProductSort::Newest);
        assert!(!filter.featured_only);
        assert!(!filter.descending);
    }
}
