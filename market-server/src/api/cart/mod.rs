//! Cart API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).delete(handler::clear))
        .route("/add", post(handler::add))
        .route("/{id}", put(handler::update).delete(handler::remove))
}
