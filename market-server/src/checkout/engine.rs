//! Checkout Engine
//!
//! Converts a buyer's cart (optionally scoped to one agrovet) into a durable
//! order: validates stock, computes the total, creates the order header and
//! line items, decrements catalog stock, and clears the consumed cart rows —
//! all inside one SQLite transaction.

use sqlx::{SqliteConnection, SqlitePool};

use shared::models::{Order, OrderItemDetail, OrderWithItems};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, AppResult};

use super::money;

/// Options for one checkout invocation
#[derive(Debug, Clone, Default)]
pub struct CheckoutOptions {
    /// Restrict checkout to one agrovet's cart lines
    pub provider_id: Option<i64>,
    /// Payment reference to attach (gateway-initialized checkout)
    pub payment_ref: Option<String>,
    /// Caller's expected total; must match the computed total within 1 unit
    pub expected_amount: Option<f64>,
    /// Client-supplied replay guard
    pub idempotency_key: Option<String>,
}

/// Cart line joined with the in-transaction product read
#[derive(Debug, sqlx::FromRow)]
struct CheckoutLine {
    cart_id: i64,
    product_id: i64,
    qty: i64,
    name: String,
    price: f64,
    stock: i64,
    provider_id: i64,
}

/// Run a checkout for the buyer
///
/// The transaction is opened with BEGIN IMMEDIATE so the write lock is held
/// from the first read: the stock check and the decrement cannot interleave
/// with a concurrent checkout, and combined over-requests fail instead of
/// overselling. Any error rolls the whole transaction back — no order, stock
/// change, or cart deletion survives a failed attempt.
pub async fn checkout(
    pool: &SqlitePool,
    buyer_id: i64,
    opts: CheckoutOptions,
) -> AppResult<OrderWithItems> {
    let mut conn = pool.acquire().await.map_err(db_err)?;

    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;

    match run(&mut conn, buyer_id, &opts).await {
        Ok(order) => match sqlx::query("COMMIT").execute(&mut *conn).await {
            Ok(_) => Ok(order),
            Err(e) => {
                // Transaction state unknown; keep the connection out of the pool
                drop(conn.detach());
                Err(db_err(e))
            }
        },
        Err(e) => {
            // Rollback failure is secondary to the original error
            if sqlx::query("ROLLBACK").execute(&mut *conn).await.is_err() {
                drop(conn.detach());
            }
            Err(e)
        }
    }
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::database(e.to_string())
}

async fn run(
    conn: &mut SqliteConnection,
    buyer_id: i64,
    opts: &CheckoutOptions,
) -> AppResult<OrderWithItems> {
    // Replay guard: a retried request returns the original order untouched
    if let Some(key) = opts.idempotency_key.as_deref() {
        if let Some(existing) = find_order_by_key(conn, buyer_id, key).await? {
            let items = load_items(conn, existing.id).await?;
            return Ok(OrderWithItems {
                order: existing,
                items,
            });
        }
    }

    let lines = load_cart_lines(conn, buyer_id, opts.provider_id).await?;
    if lines.is_empty() {
        return Err(AppError::cart_empty(opts.provider_id.is_some()));
    }

    // Authoritative stock check against the in-transaction read
    for line in &lines {
        if line.qty > line.stock {
            return Err(AppError::insufficient_stock(line.name.clone(), line.stock));
        }
    }

    let total = money::order_total(lines.iter().map(|l| (l.price, l.qty)));

    if let Some(expected) = opts.expected_amount {
        if !money::amount_matches(expected, total) {
            return Err(AppError::amount_mismatch(expected, total));
        }
    }

    let now = now_millis();
    let order_id = snowflake_id();
    sqlx::query(
        "INSERT INTO orders (id, user_id, total, status, payment_ref, idempotency_key, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 'pending', ?4, ?5, ?6, ?6)",
    )
    .bind(order_id)
    .bind(buyer_id)
    .bind(total)
    .bind(opts.payment_ref.as_deref())
    .bind(opts.idempotency_key.as_deref())
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(db_err)?;

    let mut providers: Vec<i64> = Vec::new();
    for line in &lines {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, qty, price, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(snowflake_id())
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.qty)
        .bind(line.price)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;

        // Guarded decrement: cannot drive quantity negative even if the
        // earlier check raced
        let updated = sqlx::query(
            "UPDATE products SET quantity = quantity - ?1, updated_at = ?2 \
             WHERE id = ?3 AND quantity >= ?1",
        )
        .bind(line.qty)
        .bind(now)
        .bind(line.product_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(AppError::insufficient_stock(line.name.clone(), line.stock));
        }

        if !providers.contains(&line.provider_id) {
            providers.push(line.provider_id);
        }
    }

    // One fulfillment row per contributing seller
    for provider_id in providers {
        sqlx::query(
            "INSERT INTO order_fulfillments (id, order_id, provider_id, status, updated_at) \
             VALUES (?1, ?2, ?3, 'pending', ?4)",
        )
        .bind(snowflake_id())
        .bind(order_id)
        .bind(provider_id)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
    }

    // Consume exactly the lines included in this checkout; a scoped checkout
    // leaves other sellers' lines in place
    for line in &lines {
        sqlx::query("DELETE FROM cart WHERE id = ?")
            .bind(line.cart_id)
            .execute(&mut *conn)
            .await
            .map_err(db_err)?;
    }

    let order = find_order(conn, order_id)
        .await?
        .ok_or_else(|| AppError::database("Order missing inside checkout transaction"))?;
    let items = load_items(conn, order_id).await?;
    Ok(OrderWithItems { order, items })
}

async fn load_cart_lines(
    conn: &mut SqliteConnection,
    buyer_id: i64,
    provider_id: Option<i64>,
) -> AppResult<Vec<CheckoutLine>> {
    let base = "SELECT c.id AS cart_id, c.product_id, c.qty, p.name, p.price, p.quantity AS stock, p.provider_id \
         FROM cart c JOIN products p ON c.product_id = p.id \
         WHERE c.user_id = ?";

    let lines = match provider_id {
        Some(pid) => {
            let sql = format!("{base} AND p.provider_id = ? ORDER BY c.id");
            sqlx::query_as::<_, CheckoutLine>(&sql)
                .bind(buyer_id)
                .bind(pid)
                .fetch_all(&mut *conn)
                .await
        }
        None => {
            let sql = format!("{base} ORDER BY c.id");
            sqlx::query_as::<_, CheckoutLine>(&sql)
                .bind(buyer_id)
                .fetch_all(&mut *conn)
                .await
        }
    }
    .map_err(db_err)?;

    Ok(lines)
}

async fn find_order(conn: &mut SqliteConnection, order_id: i64) -> AppResult<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "SELECT id, user_id, total, status, payment_ref, idempotency_key, created_at, updated_at \
         FROM orders WHERE id = ?",
    )
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_err)
}

async fn find_order_by_key(
    conn: &mut SqliteConnection,
    buyer_id: i64,
    key: &str,
) -> AppResult<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "SELECT id, user_id, total, status, payment_ref, idempotency_key, created_at, updated_at \
         FROM orders WHERE user_id = ? AND idempotency_key = ?",
    )
    .bind(buyer_id)
    .bind(key)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_err)
}

async fn load_items(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> AppResult<Vec<OrderItemDetail>> {
    sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.order_id, oi.product_id, oi.qty, oi.price, p.name, p.company, p.image_url \
         FROM order_items oi JOIN products p ON oi.product_id = p.id \
         WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_err)
}
