//! axum adapters for the gates.
//!
//! Session data is expected in request extensions (see `middleware::session`).
//! Verifying gates insert `CurrentUserJwt`; every verifying gate re-verifies
//! and overwrites whatever an earlier gate stored.
//!
//! 例：
//! ```ignore
//! let me = get(me).route_layer(middleware::from_fn_with_state(state.clone(), require_authenticated));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::gate;
use crate::middleware::validation::FieldErrors;
use crate::services::auth::SessionData;
use crate::state::AppState;

pub async fn require_authenticated(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current =
        gate::check_is_authenticated(req.extensions().get::<SessionData>(), state.verifier.as_ref())?;

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

pub async fn require_access_token(req: Request, next: Next) -> Result<Response, AppError> {
    gate::validate_required_access_token(req.extensions().get::<SessionData>())?;
    Ok(next.run(req).await)
}

pub async fn require_refresh_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current = gate::validate_required_refresh_token(
        req.extensions().get::<SessionData>(),
        state.verifier.as_ref(),
    )?;

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Relay for `validate_json`: a request that never went through validation has no errors.
pub async fn require_valid_body(req: Request, next: Next) -> Result<Response, AppError> {
    let errors = req
        .extensions()
        .get::<FieldErrors>()
        .map(|e| e.as_slice())
        .unwrap_or_default();

    if let Err(err) = gate::validate_request_body_fields(errors) {
        tracing::debug!(count = errors.len(), "request body failed validation");
        return Err(err);
    }

    Ok(next.run(req).await)
}
