//! Session token transport: cookie or bearer header in, Set-Cookie out

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::domain::UserId;
use crate::error::{RedatorError, Result};
use crate::session::SessionAuthority;

/// Token from `Authorization: Bearer`, else from the named cookie
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Resolve the caller or fail closed
pub async fn authenticate(
    authority: &dyn SessionAuthority,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Result<UserId> {
    let token = session_token(headers, cookie_name).ok_or(RedatorError::Unauthorized)?;
    authority.verify(&token).await.ok_or(RedatorError::Unauthorized)
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(cookie_name: &str, token: &str, max_age_secs: u64, secure: bool) -> Result<HeaderValue> {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        cookie_name, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|_| RedatorError::ValidationFailed("Token inválido".to_string()))
}

/// `Set-Cookie` value that expires the session cookie
pub fn cleared_cookie(cookie_name: &str, secure: bool) -> Result<HeaderValue> {
    session_cookie(cookie_name, "", 0, secure)
}
