//! Seller fulfillment view handlers
//!
//! Scoped to the caller's provider record: a seller only ever sees their own
//! line items on an order, never another seller's lines, and their status
//! updates touch their own fulfillment row. The order-wide status is derived
//! as an aggregate over all fulfillment rows.

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{order, user as user_repo};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus, Provider, SellerOrder, StatusUpdateRequest};
use shared::models::order::derive_order_status;

async fn resolve_provider(
    state: &ServerState,
    user: &CurrentUser,
) -> AppResult<Option<Provider>> {
    Ok(user_repo::provider_by_user(&state.pool, user.id).await?)
}

async fn build_seller_order(
    state: &ServerState,
    o: Order,
    provider_id: i64,
) -> AppResult<Option<SellerOrder>> {
    let items = order::seller_items_for_order(&state.pool, o.id, provider_id).await?;
    if items.is_empty() {
        return Ok(None);
    }

    let fulfillment_status = order::fulfillment_status(&state.pool, o.id, provider_id)
        .await?
        .unwrap_or(o.status);

    let Some(buyer) = user_repo::buyer_contact(&state.pool, o.user_id).await? else {
        tracing::warn!(order_id = o.id, user_id = o.user_id, "Order buyer record missing");
        return Ok(None);
    };

    Ok(Some(SellerOrder {
        order: o,
        items,
        fulfillment_status,
        buyer,
    }))
}

/// GET /api/orders/seller - orders containing the seller's products
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<SellerOrder>>> {
    let Some(provider) = resolve_provider(&state, &user).await? else {
        return Ok(Json(Vec::new()));
    };

    let order_ids = order::seller_order_ids(&state.pool, provider.id).await?;

    let mut result = Vec::with_capacity(order_ids.len());
    for id in order_ids {
        let Some(o) = order::find_by_id(&state.pool, id).await? else {
            continue;
        };
        if let Some(view) = build_seller_order(&state, o, provider.id).await? {
            result.push(view);
        }
    }

    Ok(Json(result))
}

/// GET /api/orders/seller/:id - single-order seller view (receipt / detail)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<SellerOrder>> {
    let provider = resolve_provider(&state, &user)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let o = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    build_seller_order(&state, o, provider.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

/// PATCH /api/orders/seller/:id/status - transition the seller's fulfillment
/// state and notify the buyer
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<SellerOrder>> {
    // Fixed-set membership check; no forward-only ordering is enforced
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::invalid_status(payload.status.clone(), &OrderStatus::NAMES))?;

    let provider = resolve_provider(&state, &user)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProviderNotFound))?;

    let o = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if !order::has_seller_items(&state.pool, o.id, provider.id).await? {
        return Err(AppError::forbidden("Order does not contain your products"));
    }

    order::upsert_fulfillment_status(&state.pool, o.id, provider.id, status).await?;

    // Order-wide status is the aggregate of all sellers' fulfillment states
    let statuses = order::fulfillment_statuses(&state.pool, o.id).await?;
    order::set_order_status(&state.pool, o.id, derive_order_status(&statuses)).await?;

    let updated = order::find_by_id(&state.pool, o.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let view = build_seller_order(&state, updated, provider.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    // Best-effort notification; failure never rolls back the update
    if let Some(phone) = view.buyer.phone.clone() {
        let message = format!(
            "Kraal: Your order #{} status is now \"{}\". Thank you for your business.",
            view.order.id, status
        );
        state.sms.send_best_effort(phone, message);
    }

    Ok(Json(view))
}
