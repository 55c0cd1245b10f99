//! Client-side sessions: the cookie carries base64-encoded session JSON.
use async_trait::async_trait;
use axum::http::HeaderMap;
use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};

use crate::services::auth::SessionData;
use crate::services::session::store::{SessionError, SessionStore, cookie_value};

#[derive(Clone, Debug)]
pub struct CookieSessionStore {
    cookie_name: String,
}

impl CookieSessionStore {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Encode session data the way this store expects to read it back.
    pub fn encode(data: &SessionData) -> Result<String, serde_json::Error> {
        Ok(STANDARD.encode(serde_json::to_vec(data)?))
    }

    fn decode(raw: &str) -> Option<SessionData> {
        // Accept both alphabets; browsers and proxies differ on padding/URL-safety.
        let bytes = STANDARD
            .decode(raw)
            .or_else(|_| URL_SAFE_NO_PAD.decode(raw.trim_end_matches('=')))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[async_trait]
impl SessionStore for CookieSessionStore {
    fn backend_name(&self) -> &'static str {
        "cookie"
    }

    async fn load(&self, headers: &HeaderMap) -> Result<Option<SessionData>, SessionError> {
        let Some(raw) = cookie_value(headers, &self.cookie_name) else {
            return Ok(None);
        };

        match Self::decode(&raw) {
            Some(data) => Ok(Some(data)),
            None => {
                tracing::warn!(cookie = %self.cookie_name, "unreadable session cookie ignored");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::AuthTokenBundle;
    use axum::http::{HeaderValue, header::COOKIE};

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    fn session() -> SessionData {
        SessionData::with_bundle(AuthTokenBundle {
            access: "a.b.c".into(),
            refresh: Some("d.e.f".into()),
            mfa: None,
            expire: None,
        })
    }

    #[tokio::test]
    async fn loads_encoded_session() {
        let store = CookieSessionStore::new("session");
        let cookie = format!("session={}", CookieSessionStore::encode(&session()).unwrap());

        let loaded = store.load(&headers_with(&cookie)).await.unwrap();
        assert_eq!(loaded, Some(session()));
    }

    #[tokio::test]
    async fn accepts_url_safe_alphabet() {
        let store = CookieSessionStore::new("session");
        let raw = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&session()).unwrap());

        let loaded = store.load(&headers_with(&format!("session={raw}"))).await.unwrap();
        assert_eq!(loaded, Some(session()));
    }

    #[tokio::test]
    async fn missing_cookie_is_no_session() {
        let store = CookieSessionStore::new("session");
        assert_eq!(store.load(&HeaderMap::new()).await.unwrap(), None);
        assert_eq!(store.load(&headers_with("other=1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn garbage_cookie_is_no_session() {
        let store = CookieSessionStore::new("session");
        let loaded = store.load(&headers_with("session=%%%not-base64")).await.unwrap();
        assert_eq!(loaded, None);

        let not_json = STANDARD.encode(b"plain text");
        let loaded = store
            .load(&headers_with(&format!("session={not_json}")))
            .await
            .unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn empty_object_is_session_without_tokens() {
        let store = CookieSessionStore::new("session");
        let raw = STANDARD.encode(b"{}");
        let loaded = store.load(&headers_with(&format!("session={raw}"))).await.unwrap();
        assert_eq!(loaded, Some(SessionData::default()));
    }
}
