//! Order lifecycle rules: status transitions, payment methods, order numbers
//! and checkout charges.
//!
//! The status chain is
//!
//! ```text
//! pending -> confirmed -> processing -> shipped -> delivered
//!    \           \
//!     +-----------+--> cancelled
//! ```
//!
//! `delivered` and `cancelled` are terminal.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::OrderStatus;

/// Prefix of every human-readable order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Width the sequence part of an order number is zero-padded to.
const ORDER_SEQUENCE_WIDTH: usize = 6;

impl OrderStatus {
    /// Statuses a customer may cancel from.
    pub const CANCELLABLE: &'static [OrderStatus] = &[OrderStatus::Pending, OrderStatus::Confirmed];

    /// Statuses reachable from `self` in one step.
    pub fn next_statuses(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Shipped],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    pub fn is_cancellable(self) -> bool {
        Self::CANCELLABLE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }
}

/// Check a status change, returning [`CoreError::InvalidTransition`] when it is not allowed.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: from.as_str(),
            to: to.as_str(),
        })
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Payme,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Payme => "payme",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payme" => Ok(PaymentMethod::Payme),
            "cash" => Ok(PaymentMethod::Cash),
            _ => Err(format!("Invalid payment method '{s}'. Must be one of: payme, cash")),
        }
    }
}

/// Format an order number from the order date and a database sequence value.
///
/// `ORD-20251216-000042`. The sequence guarantees uniqueness; the date only
/// makes numbers readable. Values wider than six digits are not truncated.
pub fn format_order_number(date: NaiveDate, sequence: i64) -> String {
    format!(
        "{ORDER_NUMBER_PREFIX}-{}-{:0width$}",
        date.format("%Y%m%d"),
        sequence,
        width = ORDER_SEQUENCE_WIDTH
    )
}

/// Shipping and tax settings applied at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeSettings {
    /// Flat shipping cost per order.
    pub shipping_cost: Decimal,
    /// Orders whose subtotal reaches this amount ship free. Zero disables the threshold.
    pub free_shipping_threshold: Decimal,
    /// Tax rate as a fraction (`0.12` = 12%).
    pub tax_rate: Decimal,
}

impl Default for ChargeSettings {
    fn default() -> Self {
        Self {
            shipping_cost: Decimal::ZERO,
            free_shipping_threshold: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
        }
    }
}

/// Monetary header values of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Round a money amount to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute shipping, tax and total for a cart subtotal.
pub fn compute_totals(subtotal: Decimal, settings: &ChargeSettings) -> OrderTotals {
    let free_shipping = settings.free_shipping_threshold > Decimal::ZERO
        && subtotal >= settings.free_shipping_threshold;
    let shipping_cost = if free_shipping {
        Decimal::ZERO
    } else {
        settings.shipping_cost
    };
    let tax = round_money(subtotal * settings.tax_rate);

    OrderTotals {
        subtotal,
        shipping_cost,
        tax,
        total: subtotal + shipping_cost + tax,
    }
}
