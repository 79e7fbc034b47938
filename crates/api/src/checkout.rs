//! Order placement and status transitions.
//!
//! Both run in a single database transaction. Placement locks the buyer's
//! cart row and takes stock with a conditional decrement, so two checkouts
//! can never sell the same unit. Transitions lock the order row; moving an
//! order to `cancelled` puts its items back into stock.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use storefront_core::cart::{ensure_stock, line_subtotal};
use storefront_core::error::CoreError;
use storefront_core::locale::Locale;
use storefront_core::order::{
    compute_totals, format_order_number, validate_transition, ChargeSettings, PaymentMethod,
};
use storefront_core::status::OrderStatus;
use storefront_core::types::DbId;
use storefront_db::models::cart::CartLine;
use storefront_db::models::order::{CreateOrder, CreateOrderItem, Order, OrderItem};
use storefront_db::repositories::{CartRepo, OrderRepo, ProductRepo};

use crate::error::{AppError, AppResult};

/// Buyer-supplied part of a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub payment_method: PaymentMethod,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_region: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub location_lat: Option<Decimal>,
    pub location_lng: Option<Decimal>,
    pub notes: Option<String>,
}

/// Turn the user's cart into an order.
///
/// Fails with [`CoreError::EmptyCart`] when there is nothing to buy and with
/// [`CoreError::InsufficientStock`] naming the first product that cannot be
/// covered. On any failure the transaction rolls back: the cart and stock
/// levels are left exactly as they were.
pub async fn place_order(
    pool: &PgPool,
    user_id: DbId,
    input: &NewOrder,
    charges: &ChargeSettings,
    locale: Locale,
) -> AppResult<(Order, Vec<OrderItem>)> {
    let mut tx = pool.begin().await?;

    let cart = CartRepo::lock_for_user(&mut *tx, user_id)
        .await?
        .ok_or(CoreError::EmptyCart)?;
    let lines = CartRepo::lines(&mut *tx, cart.id).await?;
    if lines.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let mut subtotal = Decimal::ZERO;
    for line in &lines {
        let name = display_name(&line.product.name(), locale);
        ensure_stock(&name, line.product.stock, 0, line.quantity)?;
        subtotal += line_subtotal(line.product.price, line.quantity);
    }
    let totals = compute_totals(subtotal, charges);

    let sequence = OrderRepo::next_order_sequence(&mut *tx).await?;
    let order_number = format_order_number(Utc::now().date_naive(), sequence);

    let order = OrderRepo::create(
        &mut *tx,
        &CreateOrder {
            order_number,
            user_id,
            subtotal: totals.subtotal,
            shipping_cost: totals.shipping_cost,
            tax: totals.tax,
            total: totals.total,
            payment_method: input.payment_method.as_str().to_string(),
            shipping_name: input.shipping_name.clone(),
            shipping_phone: input.shipping_phone.clone(),
            shipping_address: input.shipping_address.clone(),
            shipping_city: input.shipping_city.clone(),
            shipping_region: input.shipping_region.clone(),
            shipping_postal_code: input.shipping_postal_code.clone(),
            location_lat: input.location_lat,
            location_lng: input.location_lng,
            notes: input.notes.clone(),
        },
    )
    .await?;

    // Row locks are taken in product id order so that two carts holding the
    // same products in different orders cannot deadlock each other.
    let mut lock_order: Vec<&CartLine> = lines.iter().collect();
    lock_order.sort_by_key(|line| line.product.id);
    for line in lock_order {
        let product = &line.product;
        if !ProductRepo::try_decrement_stock(&mut *tx, product.id, line.quantity).await? {
            tracing::warn!(
                user_id,
                product_id = product.id,
                quantity = line.quantity,
                "Stock taken by a concurrent order during checkout"
            );
            let name = display_name(&product.name(), locale);
            return Err(CoreError::InsufficientStock { product: name }.into());
        }
    }

    let mut items = Vec::with_capacity(lines.len());
    for line in &lines {
        let product = &line.product;
        let item = OrderRepo::add_item(
            &mut *tx,
            &CreateOrderItem {
                order_id: order.id,
                product_id: product.id,
                product_name: display_name(&product.name(), locale),
                product_sku: product.sku.clone(),
                price: product.price,
                quantity: line.quantity,
                subtotal: line_subtotal(product.price, line.quantity),
            },
        )
        .await?;
        items.push(item);
    }

    CartRepo::clear(&mut *tx, cart.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id,
        order_id = order.id,
        order_number = %order.order_number,
        total = %order.total,
        lines = items.len(),
        "Order placed"
    );

    Ok((order, items))
}

/// Move an order to `to`, enforcing the status state machine.
///
/// With `owner` set, orders belonging to anyone else are reported as not
/// found. Cancelling restores stock for every item whose product still
/// exists.
pub async fn transition_order(
    pool: &PgPool,
    order_id: DbId,
    owner: Option<DbId>,
    to: OrderStatus,
) -> AppResult<Order> {
    let mut tx = pool.begin().await?;

    let order = OrderRepo::lock_by_id(&mut *tx, order_id)
        .await?
        .filter(|o| owner.map_or(true, |uid| o.user_id == uid))
        .ok_or(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        })?;

    let from = order.status();
    validate_transition(from, to)?;

    if to == OrderStatus::Cancelled {
        restore_stock(&mut *tx, order.id).await?;
    }
    let updated = OrderRepo::update_status(&mut *tx, order.id, to).await?;
    tx.commit().await?;

    tracing::info!(
        order_id,
        from = %from,
        to = %to,
        "Order status changed"
    );

    Ok(updated)
}

/// Put every item of an order back into stock. Items whose product has been
/// deleted are skipped.
async fn restore_stock(conn: &mut PgConnection, order_id: DbId) -> Result<(), AppError> {
    let mut items = OrderRepo::items_for_orders(&mut *conn, &[order_id]).await?;
    items.sort_by_key(|item| item.product_id);
    for item in items {
        let Some(product_id) = item.product_id else {
            continue;
        };
        if !ProductRepo::increment_stock(&mut *conn, product_id, item.quantity).await? {
            tracing::debug!(order_id, product_id, "Product gone, stock not restored");
        }
    }
    Ok(())
}

fn display_name(name: &storefront_core::locale::LocalizedText, locale: Locale) -> String {
    name.resolve(locale).unwrap_or_default().to_string()
}
