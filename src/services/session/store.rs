//! Session lookup interface used by the session-loading middleware.
use async_trait::async_trait;
use axum::http::{HeaderMap, header::COOKIE};
use thiserror::Error;

use crate::services::auth::SessionData;
use crate::services::cache::CacheError;

/// Session-layer errors.
///
/// A missing or unreadable session is `Ok(None)`, not an error: only backend
/// failures surface here (and become 500s).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Capability: "can find the session attached to this request".
///
/// The gatekeeper only reads sessions; it never writes or destroys them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn load(&self, headers: &HeaderMap) -> Result<Option<SessionData>, SessionError>;
}

/// Find a cookie value by name across every `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name && !value.is_empty() => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}
