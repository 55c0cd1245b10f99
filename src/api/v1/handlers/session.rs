/*
 * Responsibility
 * - session / token の状態を返すだけの handler
 * - 認証判定は route に掛けた gate の責務 (handler は結果を読むだけ)
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::v1::extractors::CurrentUser;

/// GET /session (presence gate only)
pub async fn session_status() -> Json<Value> {
    Json(json!({ "authenticated": true }))
}

/// GET /me (access token verified)
pub async fn me(CurrentUser(current): CurrentUser) -> Json<Value> {
    let expires_at = current.claims.expires_at().map(|t| t.to_rfc3339());

    Json(json!({
        "tokenKind": current.kind,
        "claims": current.claims,
        "expiresAt": expires_at,
    }))
}

/// POST /token/refresh (refresh token verified; issuing a new pair is done elsewhere)
pub async fn refresh_check(CurrentUser(current): CurrentUser) -> Json<Value> {
    Json(json!({
        "tokenKind": current.kind,
        "username": current.claims.username,
    }))
}
