/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: token 検証 (access / refresh の secret は構築時に注入済み)
 *   - sessions: request ごとの session 読み出し
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::{auth::TokenVerifier, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { verifier, sessions }
    }
}
