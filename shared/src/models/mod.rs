//! Data models shared between the market server and its clients

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartAdd, CartLine, CartLineDetail, CartUpdate};
pub use order::{
    CheckoutRequest, Order, OrderItemDetail, OrderStatus, OrderWithItems, PaymentSession,
    PaystackInitRequest, PaystackReinitRequest, PaystackVerifyRequest, SellerOrder,
    StatusUpdateRequest,
};
pub use product::{Product, ProductWithShop};
pub use user::{BuyerContact, Provider};
