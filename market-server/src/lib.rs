//! Kraal Market Server — agro-input order and checkout subsystem
//!
//! # Architecture overview
//!
//! The market server is the commerce core of the livestock services platform:
//! farmers fill a cart with agro-input products sold by agrovet shops, and
//! checkout atomically converts the cart into an order, decrements stock, and
//! attaches a payment reference that the gateway later confirms.
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # Config, state, server
//! ├── auth/          # JWT authentication, roles
//! ├── api/           # HTTP routes and handlers
//! ├── checkout/      # Checkout engine, money math, payment references
//! ├── db/            # Database layer and repositories
//! ├── services/      # SMS notification
//! └── utils/         # Logging and shared re-exports
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured tracing for auth events
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging. Call once at startup.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    utils::logger::init_logger();
}

pub fn print_banner() {
    println!(
        r#"
    __ __                 __
   / //_/_________ _____ _/ /
  / ,<  / ___/ __ `/ __ `/ /
 / /| |/ /  / /_/ / /_/ / /
/_/ |_/_/   \__,_/\__,_/_/
    __  ___           __        __
   /  |/  /___ ______/ /_____  / /_
  / /|_/ / __ `/ ___/ //_/ _ \/ __/
 / /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}
