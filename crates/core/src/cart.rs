//! Cart quantity rules and derived totals.
//!
//! Nothing is reserved while items sit in a cart: stock is only checked here
//! and decremented at checkout. Totals are always recomputed from live
//! product prices, so a cart is not a price lock.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;

/// Default lower bound for a single cart line quantity.
pub const DEFAULT_MIN_QUANTITY: i32 = 1;

/// Default upper bound for a single add/update request.
pub const DEFAULT_MAX_QUANTITY_PER_ITEM: i32 = 99;

/// Allowed quantity range for one add or update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for QuantityBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_QUANTITY,
            max: DEFAULT_MAX_QUANTITY_PER_ITEM,
        }
    }
}

impl QuantityBounds {
    /// Reject quantities outside `[min, max]`.
    pub fn validate(&self, quantity: i32) -> Result<(), CoreError> {
        if quantity < self.min || quantity > self.max {
            return Err(CoreError::Validation(format!(
                "quantity must be between {} and {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Check that `stock` covers `already_in_cart + requested` units.
pub fn ensure_stock(
    product_name: &str,
    stock: i32,
    already_in_cart: i32,
    requested: i32,
) -> Result<(), CoreError> {
    let wanted = i64::from(already_in_cart) + i64::from(requested);
    if i64::from(stock) < wanted {
        return Err(CoreError::InsufficientStock {
            product: product_name.to_string(),
        });
    }
    Ok(())
}

/// `price * quantity` for one line.
pub fn line_subtotal(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Derived cart summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of every line subtotal.
    pub total: Decimal,
    /// Number of distinct lines.
    pub items_count: i64,
}

impl CartTotals {
    pub const EMPTY: CartTotals = CartTotals {
        total: Decimal::ZERO,
        items_count: 0,
    };

    /// Compute totals from `(price, quantity)` pairs.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, i32)>,
    {
        lines
            .into_iter()
            .fold(Self::EMPTY, |acc, (price, quantity)| CartTotals {
                total: acc.total + line_subtotal(price, quantity),
                items_count: acc.items_count + 1,
            })
    }
}
