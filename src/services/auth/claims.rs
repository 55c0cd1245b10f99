/*
 * Responsibility
 * - session に載っている token bundle と、検証後の claims の型
 * - wire format (camelCase, string|number の expire) は session layer / token issuer に合わせる
 */
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `expire` is written either as epoch seconds or as a duration/date string by the issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    Seconds(i64),
    Text(String),
}

/// Signed tokens attached to a session by the login/refresh endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokenBundle {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfa: Option<String>,
    #[serde(default, alias = "exp", skip_serializing_if = "Option::is_none")]
    pub expire: Option<Expiry>,
}

impl fmt::Debug for AuthTokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print raw tokens
        f.debug_struct("AuthTokenBundle")
            .field("has_refresh", &self.refresh.is_some())
            .field("has_mfa", &self.mfa.is_some())
            .field("expire", &self.expire)
            .finish()
    }
}

/// Per-request session payload as produced by the session layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<AuthTokenBundle>,
}

impl SessionData {
    pub fn with_bundle(bundle: AuthTokenBundle) -> Self {
        Self { jwt: Some(bundle) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfaState {
    pub validated: bool,
    pub enabled: bool,
}

/// Decoded token payload.
///
/// Registered claims (`iat`/`exp`) and any claim not declared here (`extra`) are
/// kept so the value serialises back to the payload the issuer signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<Expiry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfa: Option<MfaState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = i64::try_from(self.exp?).ok()?;
        DateTime::from_timestamp(exp, 0)
    }
}

/// Which secret a token is verified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims recovered by a verifying gate, tagged with the token they came from.
///
/// Lives in request extensions for the rest of the request. A refresh token's
/// payload is decoded into the same shape but stays marked as `Refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserJwt {
    pub kind: TokenKind,
    pub claims: UserClaims,
}

impl CurrentUserJwt {
    pub fn new(kind: TokenKind, claims: UserClaims) -> Self {
        Self { kind, claims }
    }
}
