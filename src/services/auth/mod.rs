pub mod claims;
pub mod factory;
pub mod verifier;

pub use claims::{
    AuthTokenBundle, CurrentUserJwt, Expiry, MfaState, SessionData, TokenKind, UserClaims,
};
pub use factory::build_verifier;
pub use verifier::{JwtVerifier, TokenError, TokenVerifier};
