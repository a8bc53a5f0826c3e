//! Order models and the fulfillment status machine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order / fulfillment status
///
/// The allowed set is fixed; transitions are a membership check only — the
/// engine does not enforce forward-only ordering of shipped/delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Allowed status names, for error messages
    pub const NAMES: [&'static str; 5] =
        ["pending", "processing", "shipped", "delivered", "cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Position in the fulfillment pipeline; cancelled has no stage
    fn stage(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Processing => Some(1),
            OrderStatus::Shipped => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// Derive the order-wide status from its per-seller fulfillment statuses
///
/// All sellers cancelled → cancelled. Otherwise the order is only as far
/// along as its least-advanced non-cancelled seller (pending < processing <
/// shipped < delivered). An empty slice keeps the order pending.
pub fn derive_order_status(fulfillments: &[OrderStatus]) -> OrderStatus {
    let stages: Vec<u8> = fulfillments.iter().filter_map(|s| s.stage()).collect();
    if stages.is_empty() {
        if fulfillments.is_empty() {
            return OrderStatus::Pending;
        }
        return OrderStatus::Cancelled;
    }
    match stages.iter().min() {
        Some(0) => OrderStatus::Pending,
        Some(1) => OrderStatus::Processing,
        Some(2) => OrderStatus::Shipped,
        _ => OrderStatus::Delivered,
    }
}

/// Order header
///
/// Created exactly once per checkout; after creation only `status` (derived
/// from fulfillments / advanced by payment verification) and `payment_ref`
/// (overwritten by re-initialization) change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Sum of line price x qty at creation time
    pub total: f64,
    pub status: OrderStatus,
    /// Gateway payment reference, unique when present
    pub payment_ref: Option<String>,
    /// Client-supplied replay guard, unique per buyer when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item joined with product display data; quantity and price are
/// frozen at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub price: f64,
    pub name: String,
    pub company: Option<String>,
    pub image_url: Option<String>,
}

/// Order header with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// Seller view of an order: only the seller's own line items, the seller's
/// fulfillment status, and a buyer contact summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub fulfillment_status: OrderStatus,
    pub buyer: super::user::BuyerContact,
}

// ==================== Request / response payloads ====================

/// Direct checkout payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Scope checkout to one agrovet's cart lines
    pub provider_id: Option<i64>,
    /// Client-supplied replay guard
    pub idempotency_key: Option<String>,
}

/// Gateway-initialized checkout payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaystackInitRequest {
    /// Expected total; must match the computed total within 1 currency unit
    pub amount: Option<f64>,
    /// Buyer email handed to the gateway
    pub email: Option<String>,
    pub provider_id: Option<i64>,
    pub idempotency_key: Option<String>,
}

/// Gateway confirmation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackVerifyRequest {
    pub reference: String,
}

/// Re-initialization payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackReinitRequest {
    pub order_id: i64,
}

/// Seller status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Gateway redirect handle returned by initialize / reinitialize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub authorization_url: String,
    pub reference: String,
    pub order: OrderWithItems,
}
