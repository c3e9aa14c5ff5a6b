// Password hashing and verification service

use crate::auth::error::AuthError;

/// bcrypt work factor used for every stored secret
pub const HASH_COST: u32 = 10;

/// Password service for hashing and verification
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService {
    pub fn new() -> Self {
        Self::with_cost(HASH_COST)
    }

    /// Cheaper cost factors keep test suites fast
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a random salt
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::PasswordHashError(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AuthError::PasswordHashError(format!("Failed to verify password: {}", e)))
    }

    /// `hash_password` on the blocking pool
    pub async fn hash(&self, password: String) -> Result<String, AuthError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash_password(&password))
            .await
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))?
    }

    /// `verify_password` on the blocking pool
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_service() -> PasswordService {
        PasswordService::with_cost(4)
    }

    #[test]
    fn test_hash_never_equals_plaintext() {
        let service = fast_service();
        let hash = service.hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_accepts_original_and_rejects_other() {
        let service = fast_service();
        let hash = service.hash_password("hunter2").unwrap();
        assert!(service.verify_password("hunter2", &hash).unwrap());
        assert!(!service.verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = fast_service();
        let first = service.hash_password("same").unwrap();
        let second = service.hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_default_cost_is_ten() {
        let hash = PasswordService::new().hash_password("pw").unwrap();
        assert!(hash.contains("$10$"));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = fast_service().verify_password("pw", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::PasswordHashError(_))));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let service = fast_service();
        let hash = service.hash("secret".to_string()).await.unwrap();
        assert!(service.verify("secret".to_string(), hash.clone()).await.unwrap());
        assert!(!service.verify("wrong".to_string(), hash).await.unwrap());
    }
}
