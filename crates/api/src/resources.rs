//! JSON views of catalog, cart and order rows.
//!
//! Views carry every per-language column plus the value resolved for the
//! request locale, absolute media URLs and derived fields such as the
//! discount badge.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use storefront_core::catalog::{discount_percentage, media_url};
use storefront_core::locale::{Locale, LocalizedText};
use storefront_core::status::{OrderStatus, PaymentStatus};
use storefront_core::types::{DbId, Timestamp};
use storefront_db::models::catalog::{Catalog, Subcatalog};
use storefront_db::models::order::{Order, OrderItem};
use storefront_db::models::product::Product;
use storefront_db::repositories::{CatalogRepo, OrderRepo, SubcatalogRepo};

/// What a view needs to know about the request.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub locale: Locale,
    pub app_url: &'a str,
}

impl ViewContext<'_> {
    fn resolve(&self, text: &LocalizedText) -> Option<String> {
        text.resolve(self.locale).map(str::to_string)
    }

    fn media(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| media_url(self.app_url, p))
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub id: DbId,
    pub name: Option<String>,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcatalogs_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcatalogs: Option<Vec<SubcatalogView>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CatalogView {
    pub fn new(catalog: &Catalog, ctx: &ViewContext<'_>) -> Self {
        Self {
            id: catalog.id,
            name: ctx.resolve(&catalog.name()),
            name_uz: catalog.name_uz.clone(),
            name_ru: catalog.name_ru.clone(),
            name_eng: catalog.name_eng.clone(),
            slug: catalog.slug.clone(),
            description: ctx.resolve(&catalog.description()),
            description_uz: catalog.description_uz.clone(),
            description_ru: catalog.description_ru.clone(),
            description_eng: catalog.description_eng.clone(),
            image: ctx.media(catalog.image.as_deref()),
            is_active: catalog.is_active,
            sort_order: catalog.sort_order,
            subcatalogs_count: None,
            subcatalogs: None,
            created_at: catalog.created_at,
            updated_at: catalog.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubcatalogView {
    pub id: DbId,
    pub catalog_id: DbId,
    pub name: Option<String>,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Box<CatalogView>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SubcatalogView {
    pub fn new(sub: &Subcatalog, ctx: &ViewContext<'_>) -> Self {
        Self {
            id: sub.id,
            catalog_id: sub.catalog_id,
            name: ctx.resolve(&sub.name()),
            name_uz: sub.name_uz.clone(),
            name_ru: sub.name_ru.clone(),
            name_eng: sub.name_eng.clone(),
            slug: sub.slug.clone(),
            description: ctx.resolve(&sub.description()),
            description_uz: sub.description_uz.clone(),
            description_ru: sub.description_ru.clone(),
            description_eng: sub.description_eng.clone(),
            image: ctx.media(sub.image.as_deref()),
            is_active: sub.is_active,
            sort_order: sub.sort_order,
            products_count: None,
            catalog: None,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }

    pub fn with_catalog(mut self, catalog: Option<&Catalog>, ctx: &ViewContext<'_>) -> Self {
        self.catalog = catalog.map(|c| Box::new(CatalogView::new(c, ctx)));
        self
    }
}

/// Attach each subcatalog's parent catalog.
pub async fn subcatalogs_with_catalogs(
    pool: &PgPool,
    subs: &[(Subcatalog, Option<i64>)],
    ctx: &ViewContext<'_>,
) -> Result<Vec<SubcatalogView>, sqlx::Error> {
    let mut catalog_ids: Vec<DbId> = subs.iter().map(|(s, _)| s.catalog_id).collect();
    catalog_ids.sort_unstable();
    catalog_ids.dedup();
    let catalogs: HashMap<DbId, Catalog> = CatalogRepo::find_by_ids(pool, &catalog_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(subs
        .iter()
        .map(|(sub, count)| {
            let mut view =
                SubcatalogView::new(sub, ctx).with_catalog(catalogs.get(&sub.catalog_id), ctx);
            view.products_count = *count;
            view
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: DbId,
    pub subcatalog_id: DbId,
    pub name: Option<String>,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub short_description: Option<String>,
    pub short_description_uz: Option<String>,
    pub short_description_ru: Option<String>,
    pub short_description_eng: Option<String>,
    pub price: Decimal,
    pub old_price: Option<Decimal>,
    pub discount_percentage: Option<i32>,
    pub sku: Option<String>,
    pub stock: i32,
    pub in_stock: bool,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub sort_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcatalog: Option<SubcatalogView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductView {
    pub fn new(product: &Product, ctx: &ViewContext<'_>) -> Self {
        Self {
            id: product.id,
            subcatalog_id: product.subcatalog_id,
            name: ctx.resolve(&product.name()),
            name_uz: product.name_uz.clone(),
            name_ru: product.name_ru.clone(),
            name_eng: product.name_eng.clone(),
            slug: product.slug.clone(),
            description: ctx.resolve(&product.description()),
            description_uz: product.description_uz.clone(),
            description_ru: product.description_ru.clone(),
            description_eng: product.description_eng.clone(),
            short_description: ctx.resolve(&product.short_description()),
            short_description_uz: product.short_description_uz.clone(),
            short_description_ru: product.short_description_ru.clone(),
            short_description_eng: product.short_description_eng.clone(),
            price: product.price,
            old_price: product.old_price,
            discount_percentage: discount_percentage(product.price, product.old_price),
            sku: product.sku.clone(),
            stock: product.stock,
            in_stock: product.stock > 0,
            image: ctx.media(product.image.as_deref()),
            gallery: product
                .gallery
                .0
                .iter()
                .filter_map(|p| ctx.media(Some(p)))
                .collect(),
            is_active: product.is_active,
            is_featured: product.is_featured,
            sort_order: product.sort_order,
            subcatalog: None,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Build product views with their subcatalog and catalog nested, using two
/// batched lookups regardless of how many products are passed.
pub async fn products_with_parents(
    pool: &PgPool,
    products: &[Product],
    ctx: &ViewContext<'_>,
) -> Result<Vec<ProductView>, sqlx::Error> {
    let mut sub_ids: Vec<DbId> = products.iter().map(|p| p.subcatalog_id).collect();
    sub_ids.sort_unstable();
    sub_ids.dedup();
    let subs = SubcatalogRepo::find_by_ids(pool, &sub_ids).await?;

    let mut catalog_ids: Vec<DbId> = subs.iter().map(|s| s.catalog_id).collect();
    catalog_ids.sort_unstable();
    catalog_ids.dedup();
    let catalogs: HashMap<DbId, Catalog> = CatalogRepo::find_by_ids(pool, &catalog_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let subs: HashMap<DbId, Subcatalog> = subs.into_iter().map(|s| (s.id, s)).collect();

    Ok(products
        .iter()
        .map(|product| {
            let mut view = ProductView::new(product, ctx);
            view.subcatalog = subs.get(&product.subcatalog_id).map(|sub| {
                SubcatalogView::new(sub, ctx).with_catalog(catalogs.get(&sub.catalog_id), ctx)
            });
            view
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub can_cancel: bool,
    pub items: Vec<OrderItem>,
}

impl OrderView {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let status = order.status();
        Self {
            payment_status: order.payment_status(),
            status,
            can_cancel: status.is_cancellable(),
            order,
            items,
        }
    }
}

/// Load the items of every order in one query and pair them up.
pub async fn orders_with_items(
    pool: &PgPool,
    orders: Vec<Order>,
) -> Result<Vec<OrderView>, sqlx::Error> {
    let ids: Vec<DbId> = orders.iter().map(|o| o.id).collect();
    let mut items_by_order: HashMap<DbId, Vec<OrderItem>> = HashMap::new();
    for item in OrderRepo::items_for_orders(pool, &ids).await? {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderView::new(order, items)
        })
        .collect())
}

pub async fn order_with_items(pool: &PgPool, order: Order) -> Result<OrderView, sqlx::Error> {
    let items = OrderRepo::items_for_orders(pool, &[order.id]).await?;
    Ok(OrderView::new(order, items))
}
