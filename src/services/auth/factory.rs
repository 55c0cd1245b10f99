/// Factory: build the token verifier from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{JwtVerifier, TokenVerifier};

pub fn build_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>, AppError> {
    let verifier = JwtVerifier::new(
        &config.access_token_secret,
        &config.refresh_token_secret,
        config.token_leeway_seconds,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build token verifier");
        AppError::Internal
    })?;

    Ok(Arc::new(verifier))
}
