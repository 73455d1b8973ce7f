//! Shared HTTP types: the `{errors: [...]}` envelope, `ApiError` and the
//! `{msg}` success body.

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::application::ImportError;
use crate::domain::DomainError;

/// Message returned in place of any store or runtime failure detail.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// One entry of the error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorMessage {
    pub msg: String,
    /// Request field the error refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl ErrorMessage {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
        }
    }

    pub fn for_param(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.into()),
        }
    }
}

/// Error body of every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorMessage>,
}

/// Success body carrying a single message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// HTTP-facing error: a status plus the error envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    errors: Vec<ErrorMessage>,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            errors: vec![ErrorMessage::new(msg)],
        }
    }

    pub fn with_errors(status: StatusCode, errors: Vec<ErrorMessage>) -> Self {
        Self { status, errors }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    /// 500 with the generic message. The detail is logged, never sent.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn errors(&self) -> &[ErrorMessage] {
        &self.errors
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                errors: self.errors,
            }),
        )
            .into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => Self::bad_request(msg),
            DomainError::InvalidField { field, message } => Self::with_errors(
                StatusCode::BAD_REQUEST,
                vec![ErrorMessage::for_param(field, message)],
            ),
            e @ DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            DomainError::Conflict(msg) => {
                error!(error = %msg, "Uniqueness conflict");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            DomainError::Unauthorized(msg) | DomainError::Forbidden(msg) => Self::unauthorized(msg),
            e @ (DomainError::Database(_) | DomainError::Internal(_)) => Self::internal(e),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::MissingFile | ImportError::InvalidFileType => Self::with_errors(
                StatusCode::BAD_REQUEST,
                vec![ErrorMessage::for_param("productsfile", e.to_string())],
            ),
            ImportError::Parse { .. } | ImportError::Csv(_) => Self::with_errors(
                StatusCode::BAD_REQUEST,
                vec![ErrorMessage::for_param("productsfile", e.to_string())],
            ),
            ImportError::DuplicateProducts => {
                error!("Import rejected: duplicate barcode");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ImportError::Io(_) | ImportError::Store(_) => Self::internal(e),
        }
    }
}

/// Accept a JSON string or number and keep it as text, so digit checks can
/// report a field error instead of a JSON syntax error. `null` reads as empty.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(f)) => f.to_string(),
        None => String::new(),
    })
}

/// Digits-only check shared by numeric text fields.
pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[derive(Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "string_or_number")]
        value: String,
    }

    fn loose(json: &str) -> String {
        serde_json::from_str::<Loose>(json).unwrap().value
    }

    #[test]
    fn string_or_number_accepts_both_shapes() {
        assert_eq!(loose(r#"{"value": "0123"}"#), "0123");
        assert_eq!(loose(r#"{"value": 5551234}"#), "5551234");
        assert_eq!(loose(r#"{"value": null}"#), "");
        assert_eq!(loose(r#"{}"#), "");
    }

    #[test]
    fn digits_check() {
        assert!(is_digits("0123"));
        assert!(!is_digits(""));
        assert!(!is_digits("12a"));
        assert!(!is_digits("-1"));
    }

    #[tokio::test]
    async fn store_errors_are_masked() {
        let response = ApiError::from(DomainError::Database("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.errors, vec![ErrorMessage::new(GENERIC_FAILURE)]);
    }

    #[test]
    fn conflicts_surface_as_server_errors() {
        let err = ApiError::from(ImportError::DuplicateProducts);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.errors()[0].msg, "Duplicate products not allowed");
    }

    #[test]
    fn field_errors_carry_the_param() {
        let err = ApiError::from(DomainError::InvalidField {
            field: "email",
            message: "Please enter a valid email".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.errors()[0].param.as_deref(), Some("email"));
    }
}
