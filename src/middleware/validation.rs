//! Declarative per-route body validation.
//!
//! `validate_json::<T>` runs before the gates: it parses the body as `T`, runs
//! `validator::Validate`, and records the outcome as `FieldErrors` in request
//! extensions. It never rejects by itself; `require_valid_body` does that, so
//! gates placed between the two still run first (an unreadable body included).

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::RequestError;
use crate::middleware::http::BODY_LIMIT_BYTES;

/// Ordered field-validation result for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<RequestError>);

impl FieldErrors {
    pub fn as_slice(&self) -> &[RequestError] {
        &self.0
    }
}

pub const BODY_UNREADABLE: &str = "request body could not be read";

pub async fn validate_json<T>(req: Request, next: Next) -> Response
where
    T: DeserializeOwned + Validate,
{
    let (mut parts, body) = req.into_parts();

    let (errors, body) = match to_bytes(body, BODY_LIMIT_BYTES).await {
        Ok(bytes) => (validate_bytes::<T>(&bytes), Body::from(bytes)),
        Err(err) => {
            tracing::debug!(error = %err, "request body could not be read");
            (
                vec![RequestError::new(BODY_UNREADABLE)],
                Body::empty(),
            )
        }
    };

    parts.extensions.insert(FieldErrors(errors));
    next.run(Request::from_parts(parts, body)).await
}

/// Parse + validate; a body that does not deserialise yields one field-less error.
pub fn validate_bytes<T>(bytes: &[u8]) -> Vec<RequestError>
where
    T: DeserializeOwned + Validate,
{
    match serde_json::from_slice::<T>(bytes) {
        Ok(value) => match value.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => flatten(&errors),
        },
        Err(err) => vec![RequestError::new(err.to_string())],
    }
}

/// Flatten (possibly nested) validator errors, sorted by field path.
/// Errors on the same field keep their declaration order.
pub fn flatten(errors: &ValidationErrors) -> Vec<RequestError> {
    let mut out = Vec::new();
    collect(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<RequestError>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code));
                    RequestError::for_field(path.clone(), message)
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(length(min = 3, message = "username too short"))]
        username: String,
        #[validate(email(message = "invalid email"))]
        email: String,
        #[validate(nested)]
        address: Address,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Address {
        #[validate(length(min = 1, message = "city required"))]
        city: String,
    }

    #[test]
    fn valid_body_has_no_errors() {
        let body = br#"{"username":"alice","email":"a@x.com","address":{"city":"Oslo"}}"#;
        assert!(validate_bytes::<Signup>(body).is_empty());
    }

    #[test]
    fn every_failing_field_is_reported_in_field_order() {
        let body = br#"{"username":"al","email":"nope","address":{"city":""}}"#;
        let errors = validate_bytes::<Signup>(body);

        assert_eq!(
            errors,
            vec![
                RequestError::for_field("address.city", "city required"),
                RequestError::for_field("email", "invalid email"),
                RequestError::for_field("username", "username too short"),
            ]
        );
    }

    #[tokio::test]
    async fn unreadable_body_is_recorded_not_rejected() {
        use axum::{Extension, Json, Router, middleware::from_fn, routing::post};
        use axum_test::TestServer;

        async fn seen(Extension(errors): Extension<FieldErrors>) -> Json<Vec<RequestError>> {
            Json(errors.0)
        }

        let app = Router::new()
            .route("/", post(seen))
            .layer(from_fn(validate_json::<Signup>));
        let server = TestServer::new(app).unwrap();

        let oversized = vec![b' '; BODY_LIMIT_BYTES + 1];
        let response = server.post("/").bytes(oversized.into()).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Vec<RequestError>>(),
            vec![RequestError::new(BODY_UNREADABLE)]
        );
    }

    #[test]
    fn malformed_json_is_single_fieldless_error() {
        let errors = validate_bytes::<Signup>(b"{not json");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.is_none());
    }
}
