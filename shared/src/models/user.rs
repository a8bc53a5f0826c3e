//! User-facing collaborator models
//!
//! User management lives elsewhere in the platform; this subsystem only reads
//! contact data and provider (agrovet shop) records.

use serde::{Deserialize, Serialize};

/// Buyer contact summary attached to seller order views and used for
/// order-status notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BuyerContact {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Seller account record owned by a user with the agrovet role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Provider {
    pub id: i64,
    pub user_id: i64,
    pub shop_name: String,
}
