//! User / provider lookups
//!
//! User and provider management is owned elsewhere in the platform; these
//! are the read paths the market subsystem needs.

use super::RepoResult;
use shared::models::{BuyerContact, Provider};
use sqlx::SqlitePool;

pub async fn buyer_contact(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<BuyerContact>> {
    let row = sqlx::query_as::<_, BuyerContact>(
        "SELECT id, name, email, phone FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn provider_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Provider>> {
    let row = sqlx::query_as::<_, Provider>(
        "SELECT id, user_id, shop_name FROM providers WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
