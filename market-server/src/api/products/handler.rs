//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::ProductWithShop;

/// GET /api/products - active catalog with shop names
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductWithShop>>> {
    let products = product::find_all_active(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - one product
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithShop>> {
    let product = product::find_with_shop_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}
