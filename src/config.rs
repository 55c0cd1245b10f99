/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, 署名 secret, session backend など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::verifier::MAX_LEEWAY_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Where per-request sessions are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    /// Session JSON carried in the cookie itself (base64).
    Cookie,
    /// Cookie carries a session id; payload lives in Valkey/Redis.
    Valkey { url: String, key_prefix: String },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub token_leeway_seconds: u64,

    pub session_cookie_name: String,
    pub session_backend: SessionBackend,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets stay out of logs
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_backend", &self.session_backend)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (process env in production, a map in tests).
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let access_token_secret = get("JWT_TOKEN_SIGNATURE")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_TOKEN_SIGNATURE"))?;

        let refresh_token_secret = get("JWT_REFRESH_TOKEN_SIGNATURE")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_REFRESH_TOKEN_SIGNATURE"))?;

        // Refresh tokens must not verify under the access secret (and vice versa).
        if access_token_secret == refresh_token_secret {
            return Err(ConfigError::Invalid("JWT_REFRESH_TOKEN_SIGNATURE"));
        }

        let token_leeway_seconds = match get("JWT_LEEWAY_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s <= MAX_LEEWAY_SECONDS)
                .ok_or(ConfigError::Invalid("JWT_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let session_cookie_name = get("SESSION_COOKIE_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "session".to_string());

        let session_backend = match get("SESSION_BACKEND")
            .unwrap_or_else(|| "cookie".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "cookie" => SessionBackend::Cookie,
            "valkey" | "redis" => SessionBackend::Valkey {
                url: get("VALKEY_URL").ok_or(ConfigError::Missing("VALKEY_URL"))?,
                key_prefix: get("SESSION_KEY_PREFIX").unwrap_or_else(|| "sess".to_string()),
            },
            _ => return Err(ConfigError::Invalid("SESSION_BACKEND")),
        };

        Ok(Self {
            addr,
            app_env,
            access_token_secret,
            refresh_token_secret,
            token_leeway_seconds,
            session_cookie_name,
            session_backend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    const SECRETS: [(&str, &str); 2] = [
        ("JWT_TOKEN_SIGNATURE", "a"),
        ("JWT_REFRESH_TOKEN_SIGNATURE", "r"),
    ];

    #[test]
    fn defaults() {
        let c = load(&SECRETS).unwrap();
        assert_eq!(c.addr.port(), 3000);
        assert_eq!(c.app_env, AppEnv::Development);
        assert_eq!(c.token_leeway_seconds, 0);
        assert_eq!(c.session_cookie_name, "session");
        assert_eq!(c.session_backend, SessionBackend::Cookie);
    }

    #[test]
    fn missing_secrets_fail() {
        assert_eq!(
            load(&[("JWT_REFRESH_TOKEN_SIGNATURE", "r")]).unwrap_err(),
            ConfigError::Missing("JWT_TOKEN_SIGNATURE")
        );
        assert_eq!(
            load(&[("JWT_TOKEN_SIGNATURE", "a")]).unwrap_err(),
            ConfigError::Missing("JWT_REFRESH_TOKEN_SIGNATURE")
        );
    }

    #[test]
    fn shared_secret_is_rejected() {
        let err = load(&[
            ("JWT_TOKEN_SIGNATURE", "same"),
            ("JWT_REFRESH_TOKEN_SIGNATURE", "same"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWT_REFRESH_TOKEN_SIGNATURE"));
    }

    #[test]
    fn valkey_backend_needs_url() {
        let mut pairs = SECRETS.to_vec();
        pairs.push(("SESSION_BACKEND", "valkey"));
        assert_eq!(load(&pairs).unwrap_err(), ConfigError::Missing("VALKEY_URL"));

        pairs.push(("VALKEY_URL", "redis://localhost:6379"));
        let c = load(&pairs).unwrap();
        assert_eq!(
            c.session_backend,
            SessionBackend::Valkey {
                url: "redis://localhost:6379".into(),
                key_prefix: "sess".into()
            }
        );
    }

    #[test]
    fn invalid_port_and_env() {
        let mut pairs = SECRETS.to_vec();
        pairs.push(("PORT", "nope"));
        assert_eq!(load(&pairs).unwrap_err(), ConfigError::Invalid("PORT"));

        let mut pairs = SECRETS.to_vec();
        pairs.push(("APP_ENV", "PROD"));
        assert!(load(&pairs).unwrap().app_env.is_production());
    }

    #[test]
    fn leeway_is_bounded() {
        let mut pairs = SECRETS.to_vec();
        pairs.push(("JWT_LEEWAY_SECONDS", "86400"));
        assert_eq!(load(&pairs).unwrap().token_leeway_seconds, 86_400);

        for raw in ["86401", "9223372036854775807", "-1", "soon"] {
            let mut pairs = SECRETS.to_vec();
            pairs.push(("JWT_LEEWAY_SECONDS", raw));
            assert_eq!(
                load(&pairs).unwrap_err(),
                ConfigError::Invalid("JWT_LEEWAY_SECONDS")
            );
        }
    }

    #[test]
    fn debug_hides_secrets() {
        let c = load(&[
            ("JWT_TOKEN_SIGNATURE", "top-secret-a"),
            ("JWT_REFRESH_TOKEN_SIGNATURE", "top-secret-r"),
        ])
        .unwrap();
        let printed = format!("{c:?}");
        assert!(!printed.contains("top-secret"));
    }
}
