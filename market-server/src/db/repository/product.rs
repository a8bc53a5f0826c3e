//! Product Repository
//!
//! Read access to the catalog. Stock mutation happens only inside the
//! checkout engine's transaction.

use super::RepoResult;
use shared::models::{Product, ProductWithShop};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, provider_id, name, company, description, price, quantity, image_url, is_active, created_at, updated_at FROM products";

const PRODUCT_WITH_SHOP_SELECT: &str = "SELECT p.id, p.provider_id, p.name, p.company, p.description, p.price, p.quantity, p.image_url, p.is_active, pr.shop_name, p.created_at, p.updated_at FROM products p JOIN providers pr ON p.provider_id = pr.id";

pub async fn find_all_active(pool: &SqlitePool) -> RepoResult<Vec<ProductWithShop>> {
    let sql = format!(
        "{} WHERE p.is_active = 1 ORDER BY p.created_at DESC",
        PRODUCT_WITH_SHOP_SELECT
    );
    let rows = sqlx::query_as::<_, ProductWithShop>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{} WHERE id = ?", PRODUCT_SELECT);
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find an active product; inactive products behave as missing for buyers
pub async fn find_active_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{} WHERE id = ? AND is_active = 1", PRODUCT_SELECT);
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_with_shop_by_id(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<ProductWithShop>> {
    let sql = format!("{} WHERE p.id = ?", PRODUCT_WITH_SHOP_SELECT);
    let row = sqlx::query_as::<_, ProductWithShop>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
