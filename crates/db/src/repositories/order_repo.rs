//! Repository for the `orders` and `order_items` tables.

use sqlx::{PgConnection, PgExecutor, PgPool};
use storefront_core::status::{OrderStatus, PaymentStatus};
use storefront_core::types::{DbId, StatusId};

use crate::models::order::{CreateOrder, CreateOrderItem, Order, OrderItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, order_number, user_id, subtotal, shipping_cost, tax, total, \
                        status_id, payment_status_id, payment_method, payment_transaction_id, \
                        paid_at, shipping_name, shipping_phone, shipping_address, shipping_city, \
                        shipping_region, shipping_postal_code, location_lat, location_lng, \
                        notes, shipped_at, delivered_at, created_at, updated_at";

/// Column list for `order_items`.
const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, product_sku, price, \
                             quantity, subtotal, created_at, updated_at";

/// Provides order persistence. Writes made during checkout and cancellation
/// take a connection so they join the caller's transaction.
pub struct OrderRepo;

impl OrderRepo {
    /// Draw the next value of the order number sequence.
    pub async fn next_order_sequence(conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT nextval('order_number_seq')")
            .fetch_one(conn)
            .await
    }

    /// Insert an order header in `pending`/`pending` state.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateOrder,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders
                (order_number, user_id, subtotal, shipping_cost, tax, total, payment_method,
                 shipping_name, shipping_phone, shipping_address, shipping_city,
                 shipping_region, shipping_postal_code, location_lat, location_lng, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(&input.order_number)
            .bind(input.user_id)
            .bind(input.subtotal)
            .bind(input.shipping_cost)
            .bind(input.tax)
            .bind(input.total)
            .bind(&input.payment_method)
            .bind(&input.shipping_name)
            .bind(&input.shipping_phone)
            .bind(&input.shipping_address)
            .bind(&input.shipping_city)
            .bind(&input.shipping_region)
            .bind(&input.shipping_postal_code)
            .bind(input.location_lat)
            .bind(input.location_lng)
            .bind(&input.notes)
            .fetch_one(conn)
            .await
    }

    /// Insert one order item snapshot.
    pub async fn add_item(
        conn: &mut PgConnection,
        input: &CreateOrderItem,
    ) -> Result<OrderItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO order_items
                (order_id, product_id, product_name, product_sku, price, quantity, subtotal)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(input.order_id)
            .bind(input.product_id)
            .bind(&input.product_name)
            .bind(&input.product_sku)
            .bind(input.price)
            .bind(input.quantity)
            .bind(input.subtotal)
            .fetch_one(conn)
            .await
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an order only if it belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lock an order row for the rest of the transaction.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Items of several orders, grouped by order and in insertion order.
    pub async fn items_for_orders<'e>(
        executor: impl PgExecutor<'e>,
        order_ids: &[DbId],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items
             WHERE order_id = ANY($1)
             ORDER BY order_id, id"
        );
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_ids)
            .fetch_all(executor)
            .await
    }

    /// Set the fulfilment status. `shipped_at` and `delivered_at` are stamped
    /// the first time the order reaches those states.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                status_id = $2,
                shipped_at = CASE WHEN $2 = $3 THEN COALESCE(shipped_at, NOW()) ELSE shipped_at END,
                delivered_at = CASE WHEN $2 = $4 THEN COALESCE(delivered_at, NOW()) ELSE delivered_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(StatusId::from(status))
            .bind(StatusId::from(OrderStatus::Shipped))
            .bind(StatusId::from(OrderStatus::Delivered))
            .fetch_one(conn)
            .await
    }

    /// Set the payment status and optional gateway transaction id. `paid_at`
    /// is stamped when the order becomes paid.
    pub async fn update_payment(
        pool: &PgPool,
        id: DbId,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                payment_status_id = $2,
                payment_transaction_id = COALESCE($3, payment_transaction_id),
                paid_at = CASE WHEN $2 = $4 THEN COALESCE(paid_at, NOW()) ELSE paid_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(StatusId::from(status))
            .bind(transaction_id)
            .bind(StatusId::from(PaymentStatus::Paid))
            .fetch_optional(pool)
            .await
    }

    /// All orders, newest first, optionally filtered by status.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(status.map(StatusId::from))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_all(pool: &PgPool, status: Option<OrderStatus>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE ($1::SMALLINT IS NULL OR status_id = $1)",
        )
        .bind(status.map(StatusId::from))
        .fetch_one(pool)
        .await
    }
}
