/*
 * Responsibility
 * - Config読み込み → 依存生成 (verifier / session store) → Router 組み立て
 * - Middleware の適用 (HTTP layers, session 読み込み)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, middleware::from_fn_with_state, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, SessionBackend};
use crate::services::auth::build_verifier;
use crate::services::session::{CookieSessionStore, SessionStore, ValkeySessionStore};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,session_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gatekeeper in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let verifier = build_verifier(config).context("invalid token secrets")?;

    let sessions: Arc<dyn SessionStore> = match &config.session_backend {
        SessionBackend::Cookie => Arc::new(CookieSessionStore::new(&config.session_cookie_name)),
        SessionBackend::Valkey { url, key_prefix } => Arc::new(
            ValkeySessionStore::connect(url, &config.session_cookie_name, key_prefix)
                .await
                .context("failed to connect session store")?,
        ),
    };

    tracing::info!(backend = sessions.backend_name(), "session store ready");

    Ok(AppState::new(verifier, sessions))
}

/// Router with every route, session loading, and HTTP layers applied.
pub fn build_router(state: AppState) -> Router {
    async fn health() -> &'static str {
        "ok"
    }

    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::session::load_session,
        ))
        .route("/health", get(health))
        .with_state(state);

    middleware::http::apply(router)
}
