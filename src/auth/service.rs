//! Session management
//!
//! Orchestrates registration, login, logout, and refresh. A user's live
//! session is the single refresh-token value stored on their record:
//! rotation overwrites it, logout clears it, and a replayed token fails the
//! stored-value comparison even while its signature still verifies.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::models::User;
use crate::notify::{EmailNotifier, NotifyError};
use crate::store::{CredentialStore, NewUser, StoreError};

use super::crypto::{hash_password, verify_password, CryptoError};
use super::jwt::{JwtError, TokenCodec};

/// Session-layer errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized request")]
    MissingRefreshToken,

    #[error("Invalid refresh token: {0}")]
    InvalidRefreshToken(JwtError),

    #[error("Refresh token is expired or used")]
    StaleRefreshToken,

    #[error("Token generation failed: {0}")]
    TokenIssue(String),

    #[error("Password hashing failed")]
    Hash(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Notification dispatch failed: {0}")]
    Notification(String),
}

impl From<CryptoError> for AuthError {
    fn from(e: CryptoError) -> Self {
        AuthError::Hash(e.to_string())
    }
}

impl From<NotifyError> for AuthError {
    fn from(e: NotifyError) -> Self {
        AuthError::Notification(e.to_string())
    }
}

/// A freshly signed access/refresh pair
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session manager: the only component with cross-request state, all of it
/// held in the credential store.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    notifier: Arc<dyn EmailNotifier>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codec: TokenCodec,
        notifier: Arc<dyn EmailNotifier>,
    ) -> Self {
        Self {
            store,
            codec,
            notifier,
        }
    }

    /// Token codec, for the request gate's access-token verification.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Store connectivity probe, for the health endpoint.
    pub async fn ping_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Register a new user and start their first session.
    ///
    /// The welcome mail is sent after the record is durably created; a
    /// dispatch failure is therefore reported as a server error even though
    /// registration itself succeeded, so retries will see a duplicate email.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        require_non_blank(&[full_name, email, password])?;

        let email = email.trim().to_lowercase();

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .store
            .create(NewUser {
                full_name: full_name.trim().to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Covers the lookup/insert race as well
                StoreError::DuplicateEmail => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        // Login-on-register: the session exists as soon as the user does
        let refresh_token = self
            .codec
            .issue_refresh_token(user.id)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;
        self.store
            .set_refresh_token(user.id, Some(&refresh_token))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.notifier
            .send(
                &user.email,
                "Registration Successful",
                &format!(
                    "Welcome {}, you have successfully registered to our platform",
                    user.full_name
                ),
            )
            .await?;

        Ok(user)
    }

    /// Verify credentials and issue a fresh token pair, replacing any prior
    /// session (single active refresh token per user).
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, IssuedTokens), AuthError> {
        require_non_blank(&[email, password])?;

        let email = email.trim().to_lowercase();

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(user.id)?;
        self.store
            .set_refresh_token(user.id, Some(&tokens.refresh_token))
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, tokens))
    }

    /// Exchange a refresh token for a rotated pair.
    ///
    /// The conditional swap against the stored value is the anti-replay
    /// check: once a token has been rotated or the user has logged out, every
    /// previously issued refresh token fails here regardless of its expiry.
    pub async fn refresh(&self, incoming: Option<&str>) -> Result<IssuedTokens, AuthError> {
        let incoming = incoming
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingRefreshToken)?;

        let claims = self
            .codec
            .verify_refresh(incoming)
            .map_err(AuthError::InvalidRefreshToken)?;
        let user_id = claims.user_id().map_err(AuthError::InvalidRefreshToken)?;

        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let tokens = self.issue_tokens(user.id)?;

        let rotated = self
            .store
            .swap_refresh_token(user.id, incoming, &tokens.refresh_token)
            .await?;
        if !rotated {
            tracing::warn!(user_id = %user.id, "Refresh with rotated or cleared token");
            return Err(AuthError::StaleRefreshToken);
        }

        Ok(tokens)
    }

    /// End the user's session. Already-issued access tokens stay valid until
    /// their own expiry; there is no access-token revocation.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.store.set_refresh_token(user_id, None).await?;
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    fn issue_tokens(&self, user_id: Uuid) -> Result<IssuedTokens, AuthError> {
        let access_token = self
            .codec
            .issue_access_token(user_id)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;
        let refresh_token = self
            .codec
            .issue_refresh_token(user_id)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
        })
    }
}

fn require_non_blank(fields: &[&str]) -> Result<(), AuthError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AuthError::Validation("All fields are required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::notify::NoopNotifier;
    use crate::store::MemoryStore;

    fn test_service() -> AuthService {
        let codec = TokenCodec::new(TokenConfig {
            access_secret: "access-test-secret".to_string(),
            refresh_secret: "refresh-test-secret".to_string(),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 864_000,
        });
        AuthService::new(
            Arc::new(MemoryStore::new()),
            codec,
            Arc::new(NoopNotifier),
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = test_service();

        let user = service
            .register("Alice", "a@x.com", "secret1")
            .await
            .unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "secret1");

        let (logged_in, tokens) = service.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_blank_field_rejected() {
        let service = test_service();
        let err = service.register("Alice", "  ", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = test_service();
        service
            .register("Alice", "a@x.com", "secret1")
            .await
            .unwrap();

        let err = service
            .register("Other Alice", "a@x.com", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        // First record unaffected
        let (user, _) = service.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(user.full_name, "Alice");
    }

    #[tokio::test]
    async fn test_register_normalizes_email_case() {
        let service = test_service();
        service
            .register("Alice", "Alice@X.com", "secret1")
            .await
            .unwrap();

        assert!(service.login("alice@x.com", "secret1").await.is_ok());

        let err = service
            .register("Alice", "ALICE@x.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = test_service();
        service
            .register("Alice", "a@x.com", "secret1")
            .await
            .unwrap();

        let err = service.login("a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = test_service();
        let err = service.login("nobody@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let service = test_service();
        service
            .register("Alice", "a@x.com", "secret1")
            .await
            .unwrap();
        let (_, tokens) = service.login("a@x.com", "secret1").await.unwrap();

        let rotated = service.refresh(Some(&tokens.refresh_token)).await.unwrap();
        assert_ne!(rotated.refresh_token, tokens.refresh_token);
    }

    #[tokio::test]
    async fn test_refresh_replay_rejected() {
        let service = test_service();
        service
            .register("Alice", "a@x.com", "secret1")
            .await
            .unwrap();
        let (_, tokens) = service.login("a@x.com", "secret1").await.unwrap();

        service.refresh(Some(&tokens.refresh_token)).await.unwrap();

        // The original token is unexpired but already used
        let err = service
            .refresh(Some(&tokens.refresh_token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StaleRefreshToken));
    }

    #[tokio::test]
    async fn test_refresh_after_logout_rejected() {
        let service = test_service();
        let user = service
            .register("Alice", "a@x.com", "secret1")
            .await
            .unwrap();
        let (_, tokens) = service.login("a@x.com", "secret1").await.unwrap();

        service.logout(user.id).await.unwrap();

        let err = service
            .refresh(Some(&tokens.refresh_token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StaleRefreshToken));
    }

    #[tokio::test]
    async fn test_refresh_missing_token_rejected() {
        let service = test_service();
        assert!(matches!(
            service.refresh(None).await.unwrap_err(),
            AuthError::MissingRefreshToken
        ));
        assert!(matches!(
            service.refresh(Some("  ")).await.unwrap_err(),
            AuthError::MissingRefreshToken
        ));
    }

    #[tokio::test]
    async fn test_refresh_with_garbage_token_rejected() {
        let service = test_service();
        let err = service.refresh(Some("not.a.token")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken(_)));
    }

    #[tokio::test]
    async fn test_login_replaces_prior_session() {
        let service = test_service();
        service
            .register("Alice", "a@x.com", "secret1")
            .await
            .unwrap();

        let (_, first) = service.login("a@x.com", "secret1").await.unwrap();
        let (_, second) = service.login("a@x.com", "secret1").await.unwrap();

        // The first session's refresh token was overwritten by the second login
        let err = service.refresh(Some(&first.refresh_token)).await.unwrap_err();
        assert!(matches!(err, AuthError::StaleRefreshToken));

        assert!(service.refresh(Some(&second.refresh_token)).await.is_ok());
    }
}
