//! Cart models

use serde::{Deserialize, Serialize};

/// One buyer/product/quantity record pending checkout
///
/// (user_id, product_id) is unique; adding the same product again increments
/// the existing line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart line joined with current product and shop data, for rendering
///
/// `stock` is the product quantity at read time; it is advisory only and is
/// re-validated inside checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLineDetail {
    pub id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub company: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub provider_id: i64,
    pub shop_name: String,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAdd {
    pub product_id: i64,
    /// Desired quantity, defaults to 1
    pub qty: Option<i64>,
}

/// Set-cart-quantity payload (overwrites, does not add)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub qty: i64,
}
