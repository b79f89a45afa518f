//! Middleware for the FinBoard API
//!
//! Request tracing, rate limiting, security headers, and the request gate
//! that authenticates protected routes.

pub mod auth;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::{first_token_from, AuthenticatedUser};
pub use rate_limiter::{rate_limit, RateLimiter};
pub use security::security_headers;
pub use self::tracing::request_tracing;
