//! Checkout domain
//!
//! - [`engine`] — the atomic cart-to-order conversion
//! - [`money`] — decimal-precise money math
//! - [`payment`] — payment reference minting and the stubbed gateway handle

pub mod engine;
pub mod money;
pub mod payment;

pub use engine::{CheckoutOptions, checkout};
