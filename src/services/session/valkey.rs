use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::services::auth::SessionData;
use crate::services::cache::{CacheClient, CacheError, ValkeyClient};
use crate::services::session::store::{SessionError, SessionStore, cookie_value};

/// Server-side sessions (Redis protocol).
///
/// The cookie carries only a session id; the JSON payload lives at `<prefix>:<id>`.
/// Backend failures are returned as `Err` (fail-closed); a missing key or a
/// payload that does not parse is "no session".
#[derive(Clone)]
pub struct ValkeySessionStore<C: CacheClient> {
    cache: Arc<C>,
    cookie_name: String,
    // Key prefix to avoid collisions across environments
    prefix: String,
}

impl ValkeySessionStore<ValkeyClient> {
    pub async fn connect(
        url: &str,
        cookie_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, CacheError> {
        let client = ValkeyClient::new(url).await?;
        Ok(Self::new_with_cache(Arc::new(client), cookie_name, prefix))
    }
}

impl<C: CacheClient> ValkeySessionStore<C> {
    pub fn new_with_cache(
        cache: Arc<C>,
        cookie_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            cookie_name: cookie_name.into(),
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, session_id: &str) -> String {
        format!("{}:{}", self.prefix, session_id)
    }
}

#[async_trait]
impl<C: CacheClient> SessionStore for ValkeySessionStore<C> {
    fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    async fn load(&self, headers: &HeaderMap) -> Result<Option<SessionData>, SessionError> {
        let Some(session_id) = cookie_value(headers, &self.cookie_name) else {
            return Ok(None);
        };

        let Some(raw) = self.cache.get_string(&self.key(&session_id)).await? else {
            tracing::debug!("session id not found in store");
            return Ok(None);
        };

        match serde_json::from_str::<SessionData>(&raw) {
            Ok(data) => Ok(Some(data)),
            Err(err) => {
                tracing::warn!(error = %err, "stored session payload ignored");
                Ok(None)
            }
        }
    }
}
