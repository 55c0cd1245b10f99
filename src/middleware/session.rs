//! Session loading: runs once per request, before any gate.
//!
//! The loaded `SessionData` is put into request extensions; gates only read it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{CurrentUserJwt, SessionData};
use crate::state::AppState;

pub async fn load_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Claims only ever come from a gate that ran on this request.
    req.extensions_mut().remove::<CurrentUserJwt>();
    req.extensions_mut().remove::<SessionData>();

    let session = state.sessions.load(req.headers()).await?;

    match session {
        Some(session) => {
            req.extensions_mut().insert(session);
        }
        None => {
            tracing::debug!(backend = state.sessions.backend_name(), "no session on request");
        }
    }

    Ok(next.run(req).await)
}
