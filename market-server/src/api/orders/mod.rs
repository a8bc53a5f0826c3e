//! Order API module
//!
//! Buyer surface (listing, checkout, payment lifecycle) plus the seller
//! fulfillment view under `/seller`.

mod handler;
mod seller;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::require_seller;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/checkout", post(handler::checkout))
        .route("/paystack/initialize", post(handler::paystack_initialize))
        .route("/paystack/verify", post(handler::paystack_verify))
        .route(
            "/paystack/reinitialize",
            post(handler::paystack_reinitialize),
        )
        .merge(seller_routes())
        .route("/{id}", get(handler::get_by_id))
}

fn seller_routes() -> Router<ServerState> {
    Router::new()
        .route("/seller", get(seller::list))
        .route("/seller/{id}", get(seller::get_by_id))
        .route("/seller/{id}/status", patch(seller::update_status))
        .route_layer(middleware::from_fn(require_seller))
}
