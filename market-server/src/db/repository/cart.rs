//! Cart Repository

use super::{RepoError, RepoResult};
use shared::models::{CartLine, CartLineDetail};
use sqlx::SqlitePool;

const CART_SELECT: &str =
    "SELECT id, user_id, product_id, qty, created_at, updated_at FROM cart";

/// Cart lines joined with product and shop data for rendering, grouped by
/// agrovet on the client
pub async fn find_details_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<CartLineDetail>> {
    let rows = sqlx::query_as::<_, CartLineDetail>(
        "SELECT c.id, c.product_id, c.qty, p.name, p.price, p.quantity AS stock, p.company, p.description, p.image_url, p.provider_id, pr.shop_name \
         FROM cart c \
         JOIN products p ON c.product_id = p.id \
         JOIN providers pr ON p.provider_id = pr.id \
         WHERE c.user_id = ? \
         ORDER BY c.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id_for_user(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> RepoResult<Option<CartLine>> {
    let sql = format!("{} WHERE id = ? AND user_id = ?", CART_SELECT);
    let row = sqlx::query_as::<_, CartLine>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_user_and_product(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> RepoResult<Option<CartLine>> {
    let sql = format!("{} WHERE user_id = ? AND product_id = ?", CART_SELECT);
    let row = sqlx::query_as::<_, CartLine>(&sql)
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new cart line
pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    qty: i64,
) -> RepoResult<CartLine> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cart (id, user_id, product_id, qty, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(user_id)
    .bind(product_id)
    .bind(qty)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id_for_user(pool, id, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cart line".into()))
}

/// Overwrite the quantity of an existing line
pub async fn set_qty(pool: &SqlitePool, id: i64, user_id: i64, qty: i64) -> RepoResult<CartLine> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE cart SET qty = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4")
        .bind(qty)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cart line {id} not found")));
    }
    find_by_id_for_user(pool, id, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cart line {id} not found")))
}

/// Remove one line; deleting an absent line is not an error
pub async fn delete_for_user(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Clear the buyer's whole cart; idempotent
pub async fn clear_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
