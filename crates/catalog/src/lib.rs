//! Catalog layer: the stock ledger and the bookable service directory.
//!
//! The [`StockLedger`] is the single authority for per-product available
//! quantity. Checkout consumes it through [`StockLedger::reserve`], which is
//! the serializable check-and-decrement primitive the overselling guarantee
//! rests on.

pub mod error;
pub mod ledger;
pub mod product;
pub mod services;

pub use error::{CatalogError, Result};
pub use ledger::StockLedger;
pub use product::ProductRecord;
pub use services::{ServiceDirectory, ServiceRecord};
