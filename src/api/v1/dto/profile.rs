/*
 * Responsibility
 * - POST /profile の request/response DTO
 * - 形式チェックは validator の derive で宣言する (validate_json が実行)
 */
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub name: String,

    #[validate(email(message = "invalid email"))]
    pub email: String,

    #[validate(url(message = "invalid url"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub username: String,
    pub profile: UpdateProfileRequest,
}
