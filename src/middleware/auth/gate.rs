//! Request gates, framework-free.
//!
//! Each gate takes what the session layer / validation step left on the request
//! and either lets the request proceed or fails with an `AppError`. Verifying
//! gates return the decoded claims instead of mutating the request; the axum
//! adapters in `layers` put them into extensions.

use crate::error::{AppError, RequestError};
use crate::services::auth::{CurrentUserJwt, SessionData, TokenKind, TokenVerifier};

/// Session exists, carries a token bundle, and the bundle's access token verifies
/// under the access secret.
pub fn check_is_authenticated(
    session: Option<&SessionData>,
    verifier: &dyn TokenVerifier,
) -> Result<CurrentUserJwt, AppError> {
    let token = session
        .and_then(|s| s.jwt.as_ref())
        .map(|bundle| bundle.access.as_str())
        .filter(|t| !t.is_empty())
        .ok_or_else(AppError::not_authorised)?;

    verify(verifier, TokenKind::Access, token)
}

/// Presence only: a session with a token bundle. No signature work.
pub fn validate_required_access_token(session: Option<&SessionData>) -> Result<(), AppError> {
    match session.and_then(|s| s.jwt.as_ref()) {
        Some(_) => Ok(()),
        None => Err(AppError::not_authorised()),
    }
}

/// Session carries a refresh token that verifies under the refresh secret.
pub fn validate_required_refresh_token(
    session: Option<&SessionData>,
    verifier: &dyn TokenVerifier,
) -> Result<CurrentUserJwt, AppError> {
    let token = session
        .and_then(|s| s.jwt.as_ref())
        .and_then(|bundle| bundle.refresh.as_deref())
        .filter(|t| !t.is_empty())
        .ok_or_else(AppError::not_authorised)?;

    verify(verifier, TokenKind::Refresh, token)
}

/// Relay upstream field-validation results. Every error is reported, in order.
pub fn validate_request_body_fields(errors: &[RequestError]) -> Result<(), AppError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(AppError::request_validation(errors.to_vec()))
}

fn verify(
    verifier: &dyn TokenVerifier,
    kind: TokenKind,
    token: &str,
) -> Result<CurrentUserJwt, AppError> {
    match verifier.verify(kind, token) {
        Ok(claims) => Ok(CurrentUserJwt::new(kind, claims)),
        Err(err) => {
            tracing::warn!(token_kind = %kind, error = %err, "session token failed validation");
            Err(AppError::token_failed_validation())
        }
    }
}
