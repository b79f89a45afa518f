//! JWT token generation and validation
//!
//! Access and refresh tokens carry the same minimal claim set but are signed
//! with independent secrets and lifetimes; a token of one class never
//! verifies as the other.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::TokenConfig;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims carried by both token classes
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Unique token ID; makes every issued token distinct, so rotation
    /// always produces a new value even within the same second
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject into a user ID
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtError::Invalid(e.to_string()))
    }
}

/// Stateless signer/verifier for both token classes, configured once at
/// startup.
#[derive(Clone)]
pub struct TokenCodec {
    config: TokenConfig,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Sign a short-lived access token for a user. No side effects.
    pub fn issue_access_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        issue(
            user_id,
            &self.config.access_secret,
            self.config.access_ttl_seconds,
        )
    }

    /// Sign a long-lived refresh token for a user. No side effects.
    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        issue(
            user_id,
            &self.config.refresh_secret,
            self.config.refresh_ttl_seconds,
        )
    }

    /// Verify a token against the access secret.
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        verify(token, &self.config.access_secret)
    }

    /// Verify a token against the refresh secret.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        verify(token, &self.config.refresh_secret)
    }
}

fn issue(user_id: Uuid, secret: &str, ttl_seconds: i64) -> Result<String, JwtError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_seconds);

    let claims = Claims {
        sub: user_id.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

fn verify(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(TokenConfig {
            access_secret: "access-test-secret".to_string(),
            refresh_secret: "refresh-test-secret".to_string(),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 864_000,
        })
    }

    #[test]
    fn test_access_token_roundtrip() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue_access_token(user_id).unwrap();
        assert!(!token.is_empty());

        let claims = codec.verify_access(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue_refresh_token(user_id).unwrap();
        let claims = codec.verify_refresh(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let first = codec.issue_refresh_token(user_id).unwrap();
        let second = codec.issue_refresh_token(user_id).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_classes_do_not_cross_verify() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let access = codec.issue_access_token(user_id).unwrap();
        let refresh = codec.issue_refresh_token(user_id).unwrap();

        assert!(codec.verify_refresh(&access).is_err());
        assert!(codec.verify_access(&refresh).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = test_codec();
        let mut token = codec.issue_access_token(Uuid::new_v4()).unwrap();
        token.pop();
        token.push('x');

        assert!(matches!(
            codec.verify_access(&token),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(TokenConfig {
            access_secret: "access-test-secret".to_string(),
            refresh_secret: "refresh-test-secret".to_string(),
            // Issued already past the default validation leeway
            access_ttl_seconds: -3600,
            refresh_ttl_seconds: -3600,
        });

        let token = codec.issue_access_token(Uuid::new_v4()).unwrap();
        assert!(matches!(codec.verify_access(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let codec = test_codec();
        assert!(codec.verify_access("not.a.token").is_err());
    }
}
