//! Commerce error types.

use catalog::CatalogError;
use common::{OrderId, ProductId};
use thiserror::Error;

use crate::order::OrderStatus;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity outside the 1..=10 per-product range.
    #[error("Invalid quantity: {quantity} (must be between 1 and 10)")]
    InvalidQuantity { quantity: u32 },

    /// The cart has no line for this product.
    #[error("No cart line for product: {product_id}")]
    LineNotFound { product_id: ProductId },

    /// Catalog rejected the product (unknown, inactive, or short on stock).
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors that can occur while converting a cart into an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines to convert.
    #[error("Cart is empty")]
    EmptyCart,

    /// Catalog rejected a line; the whole conversion was aborted and no
    /// stock was decremented.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors that can occur on stored orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order does not exist.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order is not in a status that allows the requested change.
    #[error("Invalid status change: cannot {action} from {current} status")]
    InvalidStatusChange {
        current: OrderStatus,
        action: &'static str,
    },

    /// The caller is neither the owner nor an admin.
    #[error("Not authorized to access order {0}")]
    Unauthorized(OrderId),
}
