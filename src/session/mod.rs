//! Session authority - turns a caller's token into a stable user id
//!
//! Handlers receive the authority as a trait object, so tests substitute
//! `StaticSessionAuthority` for the signed-token implementation.

mod jwt;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::UserId;

pub use jwt::{JwtSessionAuthority, SessionClaims};

/// Verifies caller identity tokens
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    /// Stable user id for a valid token, None otherwise (fail closed)
    async fn verify(&self, token: &str) -> Option<UserId>;
}

/// Fixed token-to-user table
#[derive(Debug, Default, Clone)]
pub struct StaticSessionAuthority {
    tokens: HashMap<String, UserId>,
}

impl StaticSessionAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as a session for `user`
    pub fn with_token(mut self, token: impl Into<String>, user: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), UserId::new(user));
        self
    }
}

#[async_trait]
impl SessionAuthority for StaticSessionAuthority {
    async fn verify(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_authority_known_token() {
        let auth = StaticSessionAuthority::new().with_token("tok-a", "alice");
        assert_eq!(auth.verify("tok-a").await, Some(UserId::new("alice")));
    }

    #[tokio::test]
    async fn test_static_authority_unknown_token() {
        let auth = StaticSessionAuthority::new().with_token("tok-a", "alice");
        assert_eq!(auth.verify("tok-b").await, None);
        assert_eq!(auth.verify("").await, None);
    }
}
