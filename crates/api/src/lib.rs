//! HTTP API server for the pet-care commerce and booking engine.
//!
//! Exposes the cart, checkout, order, booking, and tracking operations over
//! REST with structured logging (tracing) and Prometheus metrics. Live
//! tracking events stream over SSE.

pub mod auth;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use booking::{BookingService, BookingStore};
use catalog::{ProductRecord, ServiceDirectory, ServiceRecord, StockLedger};
use commerce::{CartStore, CheckoutService, OrderStore};
use common::{Money, ProductId, ServiceId};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracking::{FixedLocationProvider, TrackingBroadcaster};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub ledger: StockLedger,
    pub services: ServiceDirectory,
    pub carts: CartStore,
    pub orders: OrderStore,
    pub checkout: CheckoutService,
    pub bookings: BookingService,
    pub tracking: TrackingBroadcaster,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::catalog::list_products))
        .route("/services", get(routes::catalog::list_services))
        .route(
            "/admin/products/{sku}/restock",
            post(routes::catalog::restock),
        )
        .route("/cart", get(routes::cart::get_cart))
        .route("/cart/items", post(routes::cart::add_item))
        .route("/cart/items/{sku}", put(routes::cart::set_quantity))
        .route("/orders", post(routes::orders::checkout))
        .route("/orders", get(routes::orders::list))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/ship", post(routes::orders::ship))
        .route("/orders/{id}/deliver", post(routes::orders::deliver))
        .route("/orders/{id}/cancel", post(routes::orders::cancel))
        .route("/bookings", post(routes::bookings::create))
        .route("/bookings", get(routes::bookings::list))
        .route("/bookings/{id}", get(routes::bookings::get))
        .route("/bookings/{id}/confirm", post(routes::bookings::confirm))
        .route("/bookings/{id}/assign", post(routes::bookings::assign))
        .route("/bookings/{id}/cancel", post(routes::bookings::cancel))
        .route(
            "/bookings/{id}/reschedule",
            post(routes::bookings::reschedule),
        )
        .route(
            "/bookings/{id}/tracking",
            post(routes::tracking::post_update),
        )
        .route("/bookings/{id}/tracking", get(routes::tracking::history))
        .route(
            "/bookings/{id}/tracking/live",
            get(routes::tracking::live_status),
        )
        .route(
            "/bookings/{id}/tracking/stream",
            get(routes::tracking::stream),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state wired over fresh in-memory stores.
pub fn create_default_state() -> Arc<AppState> {
    let ledger = StockLedger::new();
    let services = ServiceDirectory::new();
    let carts = CartStore::new(ledger.clone());
    let orders = OrderStore::new();
    let checkout = CheckoutService::new(carts.clone(), ledger.clone(), orders.clone());
    let bookings = BookingService::new(BookingStore::new(), services.clone());
    let tracking = TrackingBroadcaster::new(
        bookings.clone(),
        Arc::new(FixedLocationProvider::default()),
    );

    Arc::new(AppState {
        ledger,
        services,
        carts,
        orders,
        checkout,
        bookings,
        tracking,
    })
}

/// Seeds a small demo catalog of products and services.
pub async fn seed_demo_catalog(state: &AppState) {
    let products = [
        ("SKU-FOOD-01", "Premium Dog Food 5kg", 1_200, 40),
        ("SKU-TREATS-01", "Chicken Treats", 100, 120),
        ("SKU-TOY-01", "Rope Tug Toy", 500, 25),
        ("SKU-LEASH-01", "Reflective Leash", 350, 15),
    ];
    for (sku, name, rupees, stock) in products {
        state
            .ledger
            .insert(ProductRecord::new(
                ProductId::new(sku),
                name,
                Money::from_rupees(rupees),
                stock,
            ))
            .await;
    }

    let services = [
        ("Full Grooming", 800),
        ("Dog Walking (30 min)", 300),
        ("Vet Home Visit", 1_500),
    ];
    for (name, rupees) in services {
        state
            .services
            .insert(ServiceRecord::new(
                ServiceId::new(),
                name,
                Money::from_rupees(rupees),
            ))
            .await;
    }

    tracing::info!(
        products = products.len(),
        services = services.len(),
        "Seeded demo catalog"
    );
}
