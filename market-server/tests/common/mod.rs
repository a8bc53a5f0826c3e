//! Shared test fixtures: a temp-dir backed database and seed helpers

#![allow(dead_code)]

use std::sync::Arc;

use sqlx::SqlitePool;
use tempfile::TempDir;

use market_server::auth::JwtService;
use market_server::core::{Config, ServerState};
use market_server::db::DbService;
use market_server::services::SmsService;
use shared::util::{now_millis, snowflake_id};

pub struct TestApp {
    pub state: ServerState,
    pub pool: SqlitePool,
    // Keeps the work dir alive for the duration of the test
    _work_dir: TempDir,
}

/// Fresh migrated database in a temp work dir, SMS in logged-only mode
pub async fn setup() -> TestApp {
    let work_dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    config
        .ensure_work_dir_structure()
        .expect("failed to create work dir structure");

    let db_path = config.database_dir().join("market.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("failed to open test database");
    let pool = db.pool.clone();

    let state = ServerState::new(
        config,
        pool.clone(),
        Arc::new(JwtService::default()),
        SmsService::new(None),
    );

    TestApp {
        state,
        pool,
        _work_dir: work_dir,
    }
}

pub async fn seed_user(pool: &SqlitePool, name: &str, role: &str) -> i64 {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO users (id, name, email, phone, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(name)
    .bind(format!("user{id}@test.local"))
    .bind("+254700000001")
    .bind(role)
    .bind(now_millis())
    .execute(pool)
    .await
    .expect("failed to seed user");
    id
}

pub async fn seed_provider(pool: &SqlitePool, user_id: i64, shop_name: &str) -> i64 {
    let id = snowflake_id();
    sqlx::query("INSERT INTO providers (id, user_id, shop_name) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(user_id)
        .bind(shop_name)
        .execute(pool)
        .await
        .expect("failed to seed provider");
    id
}

pub async fn seed_product(
    pool: &SqlitePool,
    provider_id: i64,
    name: &str,
    price: f64,
    quantity: i64,
) -> i64 {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO products (id, provider_id, name, company, price, quantity, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 'TestCo', ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(provider_id)
    .bind(name)
    .bind(price)
    .bind(quantity)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to seed product");
    id
}

/// Seed a full seller: user + provider, returning (user_id, provider_id)
pub async fn seed_seller(pool: &SqlitePool, name: &str, shop_name: &str) -> (i64, i64) {
    let user_id = seed_user(pool, name, "agrovet").await;
    let provider_id = seed_provider(pool, user_id, shop_name).await;
    (user_id, provider_id)
}

pub async fn add_cart_line(pool: &SqlitePool, user_id: i64, product_id: i64, qty: i64) {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO cart (id, user_id, product_id, qty, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(snowflake_id())
    .bind(user_id)
    .bind(product_id)
    .bind(qty)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to seed cart line");
}

pub async fn product_quantity(pool: &SqlitePool, product_id: i64) -> i64 {
    sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .expect("failed to read product quantity")
}

pub async fn cart_count(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM cart WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("failed to count cart lines")
}

pub async fn order_count(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("failed to count orders")
}
