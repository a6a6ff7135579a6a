//! JWT token generation and validation.
//!
//! Provides HS256 access and refresh tokens carrying [`Claims`].

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::Claims;
use crate::config::JwtConfig;

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry_secs", &self.config.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.config.refresh_token_expiry_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(
        &self,
        user_id: i64,
        role: &str,
        is_admin: bool,
    ) -> Result<String, JwtError> {
        self.sign(user_id, role, is_admin, self.config.access_token_expiry_secs)
    }

    /// Generates a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(
        &self,
        user_id: i64,
        role: &str,
        is_admin: bool,
    ) -> Result<String, JwtError> {
        self.sign(user_id, role, is_admin, self.config.refresh_token_expiry_secs)
    }

    fn sign(&self, user_id: i64, role: &str, is_admin: bool, ttl_secs: u64) -> Result<String, JwtError> {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX / 1000);
        let expires_at = Utc::now() + Duration::seconds(ttl);
        let claims = Claims::new(user_id, role, is_admin, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or wrongly signed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> u64 {
        self.config.access_token_expiry_secs
    }

    /// Returns the refresh token expiration in seconds.
    #[must_use]
    pub const fn refresh_token_expires_in(&self) -> u64 {
        self.config.refresh_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 604_800,
        })
    }

    #[test]
    fn test_access_token_round_trips_claims() {
        let service = create_test_service();

        let token = service.generate_access_token(17, "manager", true).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), 17);
        assert_eq!(claims.role, "manager");
        assert!(claims.is_admin());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let service = create_test_service();

        let access = service.generate_access_token(1, "resident", false).unwrap();
        let refresh = service.generate_refresh_token(1, "resident", false).unwrap();

        let access_exp = service.validate_token(&access).unwrap().exp;
        let refresh_exp = service.validate_token(&refresh).unwrap().exp;
        assert!(refresh_exp > access_exp);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        let result = service.validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::DecodingError(_))));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = JwtService::new(JwtConfig {
            secret: "a-different-secret".to_string(),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 604_800,
        });
        let token = other.generate_access_token(1, "business", false).unwrap();

        assert!(create_test_service().validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        let claims = Claims {
            sub: 3,
            role: "resident".to_string(),
            adm: false,
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-for-testing"),
        )
        .unwrap();

        assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
    }
}
