//! Order API Handlers — buyer surface and payment lifecycle

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::checkout::payment::{
    PAYMENT_REF_PREFIX, generate_payment_ref, mock_authorization_url, mock_reinit_url,
};
use crate::checkout::{CheckoutOptions, checkout as run_checkout};
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    CheckoutRequest, OrderWithItems, PaymentSession, PaystackInitRequest, PaystackReinitRequest,
    PaystackVerifyRequest,
};

/// GET /api/orders - the buyer's orders, newest first, with items
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<OrderWithItems>>> {
    let orders = order::find_by_user(&state.pool, user.id).await?;

    let mut result = Vec::with_capacity(orders.len());
    for o in orders {
        result.push(order::with_items(&state.pool, o).await?);
    }

    Ok(Json(result))
}

/// GET /api/orders/:id - one of the buyer's orders, with items
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithItems>> {
    let o = order::find_by_id_for_user(&state.pool, id, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order::with_items(&state.pool, o).await?))
}

/// POST /api/orders/checkout - direct checkout, no gateway
pub async fn checkout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<OrderWithItems>)> {
    let opts = CheckoutOptions {
        provider_id: payload.provider_id,
        idempotency_key: payload.idempotency_key,
        ..Default::default()
    };

    let order = run_checkout(&state.pool, user.id, opts).await?;

    tracing::info!(order_id = order.order.id, total = order.order.total, "Order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/orders/paystack/initialize - checkout + mint payment reference
///
/// The gateway itself is stubbed; the returned authorization URL is an opaque
/// redirect handle for the front-end.
pub async fn paystack_initialize(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PaystackInitRequest>,
) -> AppResult<(StatusCode, Json<PaymentSession>)> {
    if payload.email.as_deref().map_or(true, str::is_empty) {
        return Err(AppError::required_field("email"));
    }

    let opts = CheckoutOptions {
        provider_id: payload.provider_id,
        payment_ref: Some(generate_payment_ref(PAYMENT_REF_PREFIX)),
        expected_amount: payload.amount,
        idempotency_key: payload.idempotency_key,
    };

    let order = run_checkout(&state.pool, user.id, opts).await?;

    // On an idempotent replay the order carries its original reference
    let reference = order
        .order
        .payment_ref
        .clone()
        .ok_or_else(|| AppError::new(ErrorCode::PaymentInitFailed))?;

    tracing::info!(order_id = order.order.id, %reference, "Payment initialized");

    Ok((
        StatusCode::CREATED,
        Json(PaymentSession {
            authorization_url: mock_authorization_url(&reference),
            reference,
            order,
        }),
    ))
}

/// POST /api/orders/paystack/verify - confirm payment, advance status
///
/// Idempotent: verifying an already-processing order is a no-op.
pub async fn paystack_verify(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PaystackVerifyRequest>,
) -> AppResult<Json<OrderWithItems>> {
    if payload.reference.is_empty() {
        return Err(AppError::required_field("reference"));
    }

    let o = order::find_by_payment_ref(&state.pool, &payload.reference, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentRefNotFound))?;

    if o.status == shared::models::OrderStatus::Pending {
        order::mark_processing(&state.pool, o.id).await?;
    }

    let updated = order::find_by_id(&state.pool, o.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order::with_items(&state.pool, updated).await?))
}

/// POST /api/orders/paystack/reinitialize - remint the reference for an
/// existing order
///
/// Stock, items, and total were committed at the original checkout and are
/// untouched; only the reference changes.
pub async fn paystack_reinitialize(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PaystackReinitRequest>,
) -> AppResult<Json<PaymentSession>> {
    order::find_by_id_for_user(&state.pool, payload.order_id, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let reference = generate_payment_ref(PAYMENT_REF_PREFIX);
    let updated = order::set_payment_ref(&state.pool, payload.order_id, user.id, &reference).await?;

    tracing::info!(order_id = updated.id, %reference, "Payment re-initialized");

    Ok(Json(PaymentSession {
        authorization_url: mock_reinit_url(&reference),
        reference,
        order: order::with_items(&state.pool, updated).await?,
    }))
}
