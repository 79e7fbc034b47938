//! Customer order handlers: checkout, history and cancellation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::error::CoreError;
use storefront_core::order::PaymentMethod;
use storefront_core::status::OrderStatus;
use storefront_core::types::DbId;
use storefront_db::repositories::OrderRepo;
use validator::Validate;

use crate::checkout::{place_order, transition_order, NewOrder};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::RequestLocale;
use crate::query::PageParams;
use crate::resources::{order_with_items, orders_with_items, OrderView};
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;

/// Request body for `POST /orders`.
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    pub payment_method: PaymentMethod,
    #[validate(length(min = 1, max = 255))]
    pub shipping_name: String,
    #[validate(length(min = 1, max = 20))]
    pub shipping_phone: String,
    #[validate(length(min = 1, max = 500))]
    pub shipping_address: String,
    #[validate(length(min = 1, max = 100))]
    pub shipping_city: String,
    #[validate(length(max = 100))]
    pub shipping_region: Option<String>,
    #[validate(length(max = 20))]
    pub shipping_postal_code: Option<String>,
    pub location_lat: Option<Decimal>,
    pub location_lng: Option<Decimal>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl PlaceOrderRequest {
    /// Trim surrounding whitespace; blank optional fields become `None`.
    fn trimmed(self) -> Self {
        fn text(value: String) -> String {
            value.trim().to_string()
        }
        fn optional(value: Option<String>) -> Option<String> {
            value.map(text).filter(|v| !v.is_empty())
        }
        Self {
            shipping_name: text(self.shipping_name),
            shipping_phone: text(self.shipping_phone),
            shipping_address: text(self.shipping_address),
            shipping_city: text(self.shipping_city),
            shipping_region: optional(self.shipping_region),
            shipping_postal_code: optional(self.shipping_postal_code),
            notes: optional(self.notes),
            ..self
        }
    }
}

impl From<PlaceOrderRequest> for NewOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        NewOrder {
            payment_method: req.payment_method,
            shipping_name: req.shipping_name,
            shipping_phone: req.shipping_phone,
            shipping_address: req.shipping_address,
            shipping_city: req.shipping_city,
            shipping_region: req.shipping_region,
            shipping_postal_code: req.shipping_postal_code,
            location_lat: req.location_lat,
            location_lng: req.location_lng,
            notes: req.notes,
        }
    }
}

/// Response of order placement and cancellation.
#[derive(Debug, Serialize)]
pub struct OrderAction {
    pub message: &'static str,
    pub order: OrderView,
}

/// GET /api/v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Paginated<OrderView>>> {
    let (page, per_page, offset) = params.resolve(state.config.shop.orders_per_page);
    let orders =
        OrderRepo::list_for_user(&state.pool, auth_user.user_id, per_page, offset).await?;
    let total = OrderRepo::count_for_user(&state.pool, auth_user.user_id).await?;
    let data = orders_with_items(&state.pool, orders).await?;
    Ok(Json(Paginated::new(data, page, per_page, total)))
}

/// POST /api/v1/orders
///
/// Check out the caller's cart. Responds 201 with the new order.
pub async fn create_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    AppJson(input): AppJson<PlaceOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let input = input.trimmed();
    input.validate()?;
    let new_order = NewOrder::from(input);

    let (order, items) = place_order(
        &state.pool,
        auth_user.user_id,
        &new_order,
        &state.config.shop.charges,
        locale,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderAction {
            message: "Order placed successfully",
            order: OrderView::new(order, items),
        }),
    ))
}

/// GET /api/v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderView>>> {
    let order = OrderRepo::find_for_user(&state.pool, order_id, auth_user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        })?;
    let data = order_with_items(&state.pool, order).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/orders/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<OrderAction>> {
    let order = transition_order(
        &state.pool,
        order_id,
        Some(auth_user.user_id),
        OrderStatus::Cancelled,
    )
    .await?;
    let order = order_with_items(&state.pool, order).await?;
    Ok(Json(OrderAction {
        message: "Order cancelled",
        order,
    }))
}
