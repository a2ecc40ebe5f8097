//! Catalog error types.

use common::{ProductId, ServiceId};
use thiserror::Error;

/// Errors that can occur when reading or mutating the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product exists but is not active for sale.
    #[error("Product unavailable: {0}")]
    ProductUnavailable(ProductId),

    /// Requested quantity exceeds the currently available stock.
    ///
    /// `available` is the post-check quantity the caller can still get.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The service does not exist.
    #[error("Service not found: {0}")]
    ServiceNotFound(ServiceId),

    /// The service exists but is not bookable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(ServiceId),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
