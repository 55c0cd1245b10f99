/*
 * Responsibility
 * - request ごとの session を読み出す (cookie / valkey)
 * - gate 側は SessionStore trait しか知らない
 */
pub mod cookie;
pub mod store;
pub mod valkey;

pub use cookie::CookieSessionStore;
pub use store::{SessionError, SessionStore, cookie_value};
pub use valkey::ValkeySessionStore;
