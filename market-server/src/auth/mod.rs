//! Authentication and authorization
//!
//! Identity is issued elsewhere in the platform; this subsystem only
//! validates bearer tokens and enforces roles:
//! - [`JwtService`] — token validation (and generation, used by tests)
//! - [`CurrentUser`] — per-request identity context
//! - [`require_auth`] — authentication middleware
//! - [`require_seller`] — agrovet/admin role middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{CurrentUserExt, require_auth, require_seller};
