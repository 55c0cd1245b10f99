/*
 * Responsibility
 * - POST /profile
 * - body は validate_json + require_valid_body で検証済み (ここでは再チェックしない)
 */
use axum::Json;

use crate::api::v1::dto::profile::{UpdateProfileRequest, UpdateProfileResponse};
use crate::api::v1::extractors::CurrentUser;

pub async fn update_profile(
    CurrentUser(current): CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Json<UpdateProfileResponse> {
    tracing::info!(username = %current.claims.username, "profile update accepted");

    Json(UpdateProfileResponse {
        username: current.claims.username,
        profile: req,
    })
}
