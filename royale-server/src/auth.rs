use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use royale_types::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID
    pub email: String,
    pub iat: u64,
    pub exp: u64,
}

/// The actor identity resolved from a bearer token. Authorization decisions
/// downstream only ever need the ID.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: Uuid,
    pub email: String,
}

/// Credential plumbing: bcrypt for password storage, HS256 JWTs for the
/// bearer tokens the client sends on every request.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: u64,
}

impl AuthService {
    pub fn new(jwt_secret: &str, token_ttl_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl_secs: token_ttl_hours * 3600,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            AuthError::HashingFailed
        })
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, password_hash).map_err(|e| {
            tracing::warn!("Password verification failed: {}", e);
            AuthError::InvalidCredentials
        })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Token creation failed: {}", e);
            AuthError::TokenCreationFailed
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthedUser, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!("Token validation failed: {:?}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let id = Uuid::parse_str(&token_data.claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthedUser {
            id,
            email: token_data.claims.email,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed")]
    HashingFailed,
    #[error("Token creation failed")]
    TokenCreationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            total_winnings_cents: 0,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let auth_service = AuthService::new("test-secret", 1);
        let user = test_user();

        let token = auth_service.issue_token(&user).unwrap();
        let authed = auth_service.validate_token(&token).unwrap();

        assert_eq!(authed.id, user.id);
        assert_eq!(authed.email, user.email);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let issuer = AuthService::new("secret-one", 1);
        let validator = AuthService::new("secret-two", 1);

        let token = issuer.issue_token(&test_user()).unwrap();
        let result = validator.validate_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth_service = AuthService::new("test-secret", 1);
        let result = auth_service.validate_token("not-a-jwt");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let auth_service = AuthService::new("test-secret", 1);

        let hash = auth_service.hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(auth_service.verify_password("hunter2", &hash).unwrap());
        assert!(!auth_service.verify_password("wrong", &hash).unwrap());
    }
}
