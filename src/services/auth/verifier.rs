use std::collections::HashSet;
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::services::auth::claims::{TokenKind, UserClaims};

/// Upper bound for clock-skew leeway (one day).
pub const MAX_LEEWAY_SECONDS: u64 = 86_400;

/// Errors returned by token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("empty signing secret for {0} tokens")]
    EmptySecret(TokenKind),

    #[error("leeway of {0}s exceeds {MAX_LEEWAY_SECONDS}s")]
    LeewayTooLarge(u64),

    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Capability: "can verify a session token".
///
/// Gates only see this trait so they can be exercised with fakes.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, kind: TokenKind, token: &str) -> Result<UserClaims, TokenError>;
}

/// HMAC (HS256/384/512) verifier with one secret per token kind.
///
/// - Access and refresh secrets are separate trust domains and are never cross-applied.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        leeway_seconds: u64,
    ) -> Result<Self, TokenError> {
        if access_secret.is_empty() {
            return Err(TokenError::EmptySecret(TokenKind::Access));
        }
        if refresh_secret.is_empty() {
            return Err(TokenError::EmptySecret(TokenKind::Refresh));
        }
        // jsonwebtoken subtracts leeway from the current time.
        if leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(TokenError::LeewayTooLarge(leeway_seconds));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Issuers may sign shared-secret tokens with any HMAC size.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Tokens minted without `exp` are accepted; `exp`/`nbf` are enforced when present.
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // No audience is issued for session tokens.
        validation.validate_aud = false;
        validation.leeway = leeway_seconds;

        Ok(Self {
            access_key: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(refresh_secret.as_bytes()),
            validation,
        })
    }

    fn key(&self, kind: TokenKind) -> &DecodingKey {
        match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, kind: TokenKind, token: &str) -> Result<UserClaims, TokenError> {
        let data = jsonwebtoken::decode::<UserClaims>(token, self.key(kind), &self.validation)?;
        Ok(data.claims)
    }
}
