//! Agro-input product model

use serde::{Deserialize, Serialize};

/// Sellable product listed by an agrovet provider
///
/// `quantity` is the available stock and is only ever decremented through the
/// checkout engine's guarded update; it never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    /// Owning provider (agrovet shop)
    pub provider_id: i64,
    pub name: String,
    pub company: Option<String>,
    pub description: Option<String>,
    /// Unit price in currency units (2 decimal places)
    pub price: f64,
    /// Available stock
    pub quantity: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product joined with its shop display name, for catalog listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductWithShop {
    pub id: i64,
    pub provider_id: i64,
    pub name: String,
    pub company: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub shop_name: String,
    pub created_at: i64,
    pub updated_at: i64,
}
