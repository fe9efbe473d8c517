//! Authentication middleware
//!
//! Decodes the bearer token into an authenticated user context.
//! Passwords, login flows, and role administration live outside this
//! service; handlers only see the derived user id and role.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::utils::errors::{EventBoardError, Result};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ORGANIZER: &str = "organizer";

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub exp: usize,
}

/// Authenticated user context derived from a bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Token verification guard shared by all protected routes
#[derive(Clone)]
pub struct AuthGuard {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl AuthGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Authenticate an `Authorization` header value
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthUser> {
        let header = header.ok_or_else(|| {
            EventBoardError::Authentication("Missing authorization header".to_string())
        })?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            EventBoardError::Authentication("Malformed authorization header".to_string())
        })?;

        let data =
            decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(|e| {
                warn!(error = %e, "Bearer token rejected");
                EventBoardError::Authentication("Invalid bearer token".to_string())
            })?;

        debug!(user_id = data.claims.sub, role = %data.claims.role, "Bearer token accepted");
        Ok(AuthUser {
            id: data.claims.sub,
            role: data.claims.role,
        })
    }

    /// Issue a token for a user. The login service is external; this is
    /// used by tests and operational tooling.
    pub fn issue_token(&self, user_id: i64, role: &str, ttl_seconds: u64) -> Result<String> {
        let exp = (chrono::Utc::now().timestamp() as u64 + ttl_seconds) as usize;
        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| EventBoardError::Authentication(format!("Token encoding failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> AuthGuard {
        AuthGuard::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
        })
    }

    #[test]
    fn test_token_round_trip() {
        let guard = guard();
        let token = guard.issue_token(42, ROLE_ADMIN, 3600).unwrap();
        let user = guard
            .authenticate(Some(&format!("Bearer {}", token)))
            .unwrap();

        assert_eq!(user.id, 42);
        assert!(user.is_admin());
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(guard().authenticate(None).is_err());
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(guard().authenticate(Some("Token abc")).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = guard();
        let token = issuer.issue_token(1, ROLE_ORGANIZER, 3600).unwrap();

        let verifier = AuthGuard::new(&AuthConfig {
            jwt_secret: "other-secret".to_string(),
        });
        assert!(verifier
            .authenticate(Some(&format!("Bearer {}", token)))
            .is_err());
    }

    #[test]
    fn test_role_check() {
        let user = AuthUser {
            id: 1,
            role: ROLE_ORGANIZER.to_string(),
        };
        assert!(!user.is_admin());
    }
}
