//! Commerce layer: the cart store and the order conversion service.
//!
//! The cart is cheap, mutable, per-user state whose aggregate is always
//! recomputed from its lines. [`CheckoutService::place_order`] is the one
//! atomic step that turns a cart into an immutable [`Order`], consuming the
//! stock ledger so the no-overselling guarantee holds under concurrency.

pub mod cart;
pub mod checkout;
pub mod error;
pub mod order;
pub mod pricing;

pub use cart::{CartLine, CartStore, CartView};
pub use checkout::CheckoutService;
pub use error::{CartError, CheckoutError, OrderError};
pub use order::{Address, Order, OrderItem, OrderStatus, OrderStore, PaymentMethod};
pub use pricing::{FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, PriceBreakdown, TAX_RATE_PERCENT};
