#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;
use session_gate::app::build_router;
use session_gate::services::auth::{JwtVerifier, SessionData};
use session_gate::services::session::CookieSessionStore;
use session_gate::state::AppState;

pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";
pub const COOKIE_NAME: &str = "session";

pub fn router() -> Router {
    let verifier = JwtVerifier::new(ACCESS_SECRET, REFRESH_SECRET, 0).unwrap();
    let sessions = CookieSessionStore::new(COOKIE_NAME);
    build_router(AppState::new(Arc::new(verifier), Arc::new(sessions)))
}

pub fn sign(payload: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        payload,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// `Cookie` header value carrying the given session JSON.
pub fn session_cookie(session: &Value) -> String {
    let data: SessionData = serde_json::from_value(session.clone()).unwrap();
    format!(
        "{COOKIE_NAME}={}",
        CookieSessionStore::encode(&data).unwrap()
    )
}

pub fn future_exp() -> u64 {
    jsonwebtoken::get_current_timestamp() + 600
}

pub fn past_exp() -> u64 {
    jsonwebtoken::get_current_timestamp() - 600
}
