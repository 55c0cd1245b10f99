/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - gate の失敗 (not authorised / validation) と infra error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::session::SessionError;

pub const NOT_AUTHORISED: &str = "not authorised";
pub const TOKEN_FAILED_VALIDATION: &str = "token failed validation";

/// One field-level validation problem, as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<RequestError>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    NotAuthorised { message: &'static str },
    #[error("invalid request parameters")]
    RequestValidation(Vec<RequestError>),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_authorised() -> Self {
        Self::NotAuthorised {
            message: NOT_AUTHORISED,
        }
    }

    pub fn token_failed_validation() -> Self {
        Self::NotAuthorised {
            message: TOKEN_FAILED_VALIDATION,
        }
    }

    pub fn request_validation(errors: Vec<RequestError>) -> Self {
        Self::RequestValidation(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotAuthorised { .. } => StatusCode::UNAUTHORIZED,
            AppError::RequestValidation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let (code, fields) = match self {
            AppError::NotAuthorised { .. } => ("NOT_AUTHORISED", Vec::new()),
            AppError::RequestValidation(errors) => ("REQUEST_VALIDATION", errors),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", Vec::new()),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        tracing::error!(error = %e, "session lookup failed");
        AppError::Internal
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        tracing::error!(error = %e, "invalid configuration");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_authorised_maps_to_401() {
        let (status, body) = body_json(AppError::token_failed_validation()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({"error": {"code": "NOT_AUTHORISED", "message": "token failed validation"}})
        );
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let err = AppError::request_validation(vec![
            RequestError::for_field("email", "invalid email"),
            RequestError::new("body is not valid JSON"),
        ]);
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "REQUEST_VALIDATION");
        assert_eq!(
            body["error"]["fields"],
            json!([
                {"message": "invalid email", "field": "email"},
                {"message": "body is not valid JSON"}
            ])
        );
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let (status, body) = body_json(AppError::Internal).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }
}
