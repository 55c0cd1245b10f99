/*
 * Responsibility
 * - gate: framework 非依存の判定ロジック
 * - layers: axum middleware として request に適用する薄い adapter
 */
pub mod gate;
pub mod layers;

pub use layers::{
    require_access_token, require_authenticated, require_refresh_token, require_valid_body,
};
