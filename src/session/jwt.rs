//! HS256-signed session tokens

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::SessionAuthority;
use crate::domain::UserId;
use crate::error::{RedatorError, Result};

/// Claims carried by every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the user id.
    pub sub: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issues and verifies session tokens signed with a shared secret.
pub struct JwtSessionAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for JwtSessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionAuthority")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtSessionAuthority {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Result<Self> {
        if secret.is_empty() {
            return Err(RedatorError::Config("session secret is empty".to_string()));
        }
        let ttl_secs = i64::try_from(ttl_secs)
            .map_err(|_| RedatorError::Config(format!("session ttl {} is out of range", ttl_secs)))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        })
    }

    /// Read the secret from an environment variable
    pub fn from_env(env_var: &str, ttl_secs: u64) -> Result<Self> {
        let secret = std::env::var(env_var)
            .map_err(|_| RedatorError::Config(format!("{} not set", env_var)))?;
        Self::new(secret.as_bytes(), ttl_secs)
    }

    /// Issue a token for `user`
    pub fn issue(&self, user: &UserId) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.as_str().to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &SessionClaims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| RedatorError::Config(format!("JWT encode: {}", e)))
    }

    fn decode(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);

        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation) {
            Ok(data) if !data.claims.sub.is_empty() => Some(data.claims),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Rejected session token: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SessionAuthority for JwtSessionAuthority {
    async fn verify(&self, token: &str) -> Option<UserId> {
        self.decode(token).map(|claims| UserId::new(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> JwtSessionAuthority {
        JwtSessionAuthority::new(b"test-secret", 3600).unwrap()
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let auth = authority();
        let token = auth.issue(&UserId::new("alice")).unwrap();
        assert_eq!(auth.verify(&token).await, Some(UserId::new("alice")));
    }

    #[tokio::test]
    async fn test_rejects_foreign_signature() {
        let other = JwtSessionAuthority::new(b"other-secret", 3600).unwrap();
        let token = other.issue(&UserId::new("alice")).unwrap();
        assert_eq!(authority().verify(&token).await, None);
    }

    #[tokio::test]
    async fn test_rejects_expired_token() {
        let auth = authority();
        let now = Utc::now().timestamp();
        let token = auth
            .sign(&SessionClaims {
                sub: "alice".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();
        assert_eq!(auth.verify(&token).await, None);
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        assert_eq!(authority().verify("not-a-token").await, None);
        assert_eq!(authority().verify("").await, None);
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        assert!(matches!(
            JwtSessionAuthority::new(b"", 60),
            Err(RedatorError::Config(_))
        ));
    }

    #[test]
    fn test_ttl_beyond_timestamp_range_is_config_error() {
        assert!(matches!(
            JwtSessionAuthority::new(b"test-secret", u64::MAX),
            Err(RedatorError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_largest_ttl_issues_unexpired_token() {
        let auth = JwtSessionAuthority::new(b"test-secret", i64::MAX as u64).unwrap();
        let token = auth.issue(&UserId::new("alice")).unwrap();
        assert_eq!(auth.verify(&token).await, Some(UserId::new("alice")));
    }
}
