//! Order and order item models and DTOs.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use storefront_core::status::{OrderStatus, PaymentStatus};
use storefront_core::types::{DbId, StatusId, Timestamp};

/// A row from the `orders` table.
///
/// Orders are never deleted in normal flow; only status and payment fields change.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub order_number: String,
    pub user_id: DbId,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status_id: StatusId,
    pub payment_status_id: StatusId,
    pub payment_method: String,
    pub payment_transaction_id: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_region: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub location_lat: Option<Decimal>,
    pub location_lng: Option<Decimal>,
    pub notes: Option<String>,
    pub shipped_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Decoded fulfilment status. The foreign key guarantees a known id.
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_id(self.status_id).unwrap_or(OrderStatus::Pending)
    }

    /// Decoded payment status. The foreign key guarantees a known id.
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_id(self.payment_status_id).unwrap_or(PaymentStatus::Pending)
    }
}

/// A row from the `order_items` table: a snapshot of one purchased line.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    /// `None` once the product has been deleted; the snapshot fields remain.
    pub product_id: Option<DbId>,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an order header. Status and payment status start as pending.
#[derive(Debug)]
pub struct CreateOrder {
    pub order_number: String,
    pub user_id: DbId,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment_method: String,
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

/// DTO for inserting an order item snapshot.
#[derive(Debug)]
pub struct CreateOrderItem {
    pub order_id: DbId,
    pub product_id: DbId,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}
