use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::CurrentUserJwt;

/// Handler で、検証済みの CurrentUserJwt を受け取るための extractor
/// verifying gate (require_authenticated / require_refresh_token) が extensions に insert 済みである前提
/// 見つからない場合は 401（gate が route に掛かっていない）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub CurrentUserJwt);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUserJwt>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(AppError::not_authorised)
    }
}
