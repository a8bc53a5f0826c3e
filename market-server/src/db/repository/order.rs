//! Order Repository
//!
//! Read and status-transition access to orders. Order creation goes through
//! the checkout engine, which owns the stock transaction.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItemDetail, OrderStatus, OrderWithItems};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, user_id, total, status, payment_ref, idempotency_key, created_at, updated_at FROM orders";

const ITEM_DETAIL_SELECT: &str = "SELECT oi.id, oi.order_id, oi.product_id, oi.qty, oi.price, p.name, p.company, p.image_url \
     FROM order_items oi JOIN products p ON oi.product_id = p.id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE id = ?", ORDER_SELECT);
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id_for_user(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE id = ? AND user_id = ?", ORDER_SELECT);
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{} WHERE user_id = ? ORDER BY created_at DESC",
        ORDER_SELECT
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Look up the buyer's order carrying this exact payment reference
pub async fn find_by_payment_ref(
    pool: &SqlitePool,
    reference: &str,
    user_id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE payment_ref = ? AND user_id = ?", ORDER_SELECT);
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(reference)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItemDetail>> {
    let sql = format!("{} WHERE oi.order_id = ? ORDER BY oi.id", ITEM_DETAIL_SELECT);
    let rows = sqlx::query_as::<_, OrderItemDetail>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Only the line items belonging to one seller's products
pub async fn seller_items_for_order(
    pool: &SqlitePool,
    order_id: i64,
    provider_id: i64,
) -> RepoResult<Vec<OrderItemDetail>> {
    let sql = format!(
        "{} WHERE oi.order_id = ? AND p.provider_id = ? ORDER BY oi.id",
        ITEM_DETAIL_SELECT
    );
    let rows = sqlx::query_as::<_, OrderItemDetail>(&sql)
        .bind(order_id)
        .bind(provider_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn with_items(pool: &SqlitePool, order: Order) -> RepoResult<OrderWithItems> {
    let items = items_for_order(pool, order.id).await?;
    Ok(OrderWithItems { order, items })
}

/// Ids of every order containing at least one of the seller's products,
/// newest first
pub async fn seller_order_ids(pool: &SqlitePool, provider_id: i64) -> RepoResult<Vec<i64>> {
    let rows = sqlx::query_scalar::<_, i64>(
        "SELECT DISTINCT o.id FROM orders o \
         JOIN order_items oi ON oi.order_id = o.id \
         JOIN products p ON oi.product_id = p.id \
         WHERE p.provider_id = ? \
         ORDER BY o.created_at DESC",
    )
    .bind(provider_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn has_seller_items(
    pool: &SqlitePool,
    order_id: i64,
    provider_id: i64,
) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM order_items oi \
         JOIN products p ON oi.product_id = p.id \
         WHERE oi.order_id = ? AND p.provider_id = ?",
    )
    .bind(order_id)
    .bind(provider_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Overwrite the payment reference on the buyer's order
pub async fn set_payment_ref(
    pool: &SqlitePool,
    order_id: i64,
    user_id: i64,
    reference: &str,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET payment_ref = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
    )
    .bind(reference)
    .bind(now)
    .bind(order_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }
    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Advance a pending order to processing after gateway confirmation
///
/// Both the order header and its still-pending fulfillment rows move
/// together; calling this on an already-confirmed order changes nothing.
pub async fn mark_processing(pool: &SqlitePool, order_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE orders SET status = 'processing', updated_at = ?1 WHERE id = ?2 AND status = 'pending'",
    )
    .bind(now)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE order_fulfillments SET status = 'processing', updated_at = ?1 WHERE order_id = ?2 AND status = 'pending'",
    )
    .bind(now)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn fulfillment_statuses(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Vec<OrderStatus>> {
    let rows = sqlx::query_scalar::<_, OrderStatus>(
        "SELECT status FROM order_fulfillments WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fulfillment_status(
    pool: &SqlitePool,
    order_id: i64,
    provider_id: i64,
) -> RepoResult<Option<OrderStatus>> {
    let row = sqlx::query_scalar::<_, OrderStatus>(
        "SELECT status FROM order_fulfillments WHERE order_id = ? AND provider_id = ?",
    )
    .bind(order_id)
    .bind(provider_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Set one seller's fulfillment state on an order
pub async fn upsert_fulfillment_status(
    pool: &SqlitePool,
    order_id: i64,
    provider_id: i64,
    status: OrderStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO order_fulfillments (id, order_id, provider_id, status, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(order_id, provider_id) DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(order_id)
    .bind(provider_id)
    .bind(status)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write the derived order-wide status; plain last-write-wins update
pub async fn set_order_status(
    pool: &SqlitePool,
    order_id: i64,
    status: OrderStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(())
}
