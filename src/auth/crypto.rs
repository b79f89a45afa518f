//! Password hashing and verification

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Hash a plaintext password with bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| CryptoError::Hash(e.to_string()))
}

/// Verify a plaintext password against a stored bcrypt hash.
/// Comparison inside bcrypt is constant-time.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, CryptoError> {
    bcrypt::verify(password, password_hash).map_err(|e| CryptoError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash_errors() {
        assert!(verify_password("secret1", "not-a-bcrypt-hash").is_err());
    }
}
