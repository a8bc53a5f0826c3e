//! Shared types for the Kraal market platform
//!
//! Error codes, the API response envelope, data models, and small utilities
//! used by both the market server and the surrounding platform services.

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
