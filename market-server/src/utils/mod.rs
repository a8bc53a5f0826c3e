//! Utilities and shared re-exports
//!
//! The error and response types live in the `shared` crate so the wider
//! platform can speak the same envelope; they are re-exported here for
//! handler ergonomics.

pub mod logger;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
