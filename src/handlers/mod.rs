//! API handlers for the FinBoard backend

pub mod auth;
pub mod profile;

pub use auth::*;
pub use profile::*;

// Re-export the request gate for handler use
pub use crate::middleware::auth::AuthenticatedUser;
