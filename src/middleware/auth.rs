//! Request gate: access-token verification for protected routes
//!
//! Runs once per protected request, before any handler logic. Verification
//! is pure computation — no store round-trip.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthService, JwtError};
use crate::error::ApiError;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Fallback header carrying the refresh token
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Ordered multi-source token extraction: first non-blank candidate wins.
///
/// Pure and transport-independent; the request gate feeds it
/// cookie-then-header, the refresh handler cookie-then-body-then-header.
pub fn first_token_from<I>(sources: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    sources
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// Identity of the caller, resolved from a verified access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie_token = jar
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string());

        let bearer_token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let token = first_token_from([cookie_token, bearer_token])
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized request".to_string()))?;

        let auth_service = Arc::<AuthService>::from_ref(state);
        let claims = auth_service.codec().verify_access(&token).map_err(|e| {
            let message = match e {
                JwtError::Expired => "Access token expired",
                _ => "Invalid access token",
            };
            ApiError::Unauthorized(message.to_string())
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid access token".to_string()))?;

        Ok(AuthenticatedUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_token_from_priority_order() {
        let token = first_token_from([
            Some("from-cookie".to_string()),
            Some("from-body".to_string()),
            Some("from-header".to_string()),
        ]);
        assert_eq!(token.as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_first_token_from_skips_blank_sources() {
        let token = first_token_from([
            None,
            Some("   ".to_string()),
            Some("from-header".to_string()),
        ]);
        assert_eq!(token.as_deref(), Some("from-header"));
    }

    #[test]
    fn test_first_token_from_trims_value() {
        let token = first_token_from([Some("  tok  ".to_string())]);
        assert_eq!(token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_first_token_from_empty() {
        assert_eq!(first_token_from([None, None]), None);
    }
}
