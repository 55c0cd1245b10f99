/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - session 読み込み → gate → handler の順で適用する
 */
pub mod auth;
pub mod http;
pub mod session;
pub mod validation;
