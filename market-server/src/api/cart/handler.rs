//! Cart API Handlers
//!
//! Stock checks here are advisory and race-prone against other buyers; the
//! authoritative check happens inside the checkout engine.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{cart, product};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{CartAdd, CartLine, CartLineDetail, CartUpdate};

/// GET /api/cart - cart lines with product and shop data
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<CartLineDetail>>> {
    let lines = cart::find_details_by_user(&state.pool, user.id).await?;
    Ok(Json(lines))
}

/// POST /api/cart/add - add or increment a cart line
pub async fn add(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CartAdd>,
) -> AppResult<(StatusCode, Json<CartLine>)> {
    let qty = payload.qty.unwrap_or(1);
    if qty <= 0 {
        return Err(AppError::validation("qty must be positive"));
    }

    let product = product::find_active_by_id(&state.pool, payload.product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let line = match cart::find_by_user_and_product(&state.pool, user.id, product.id).await? {
        Some(existing) => {
            let new_qty = existing.qty + qty;
            if new_qty > product.quantity {
                return Err(AppError::insufficient_stock(product.name, product.quantity));
            }
            cart::set_qty(&state.pool, existing.id, user.id, new_qty).await?
        }
        None => {
            if qty > product.quantity {
                return Err(AppError::insufficient_stock(product.name, product.quantity));
            }
            cart::insert(&state.pool, user.id, product.id, qty).await?
        }
    };

    Ok((StatusCode::CREATED, Json(line)))
}

/// PUT /api/cart/:id - overwrite a cart line quantity
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CartUpdate>,
) -> AppResult<Json<CartLine>> {
    if payload.qty <= 0 {
        return Err(AppError::validation("qty must be positive"));
    }

    let line = cart::find_by_id_for_user(&state.pool, id, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CartLineNotFound))?;

    let product = product::find_by_id(&state.pool, line.product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    if payload.qty > product.quantity {
        return Err(AppError::insufficient_stock(product.name, product.quantity));
    }

    let line = cart::set_qty(&state.pool, id, user.id, payload.qty).await?;
    Ok(Json(line))
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// DELETE /api/cart/:id - remove one line (idempotent)
pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = cart::delete_for_user(&state.pool, id, user.id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// DELETE /api/cart - clear the whole cart (idempotent)
pub async fn clear(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<DeletedResponse>> {
    cart::clear_for_user(&state.pool, user.id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
