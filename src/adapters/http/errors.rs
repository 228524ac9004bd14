use actix_web::{
  HttpRequest, HttpResponse,
  error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError},
  http::{StatusCode, header::ContentType},
};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::catalog::CatalogError;
use crate::domain::review::ReviewError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Invalid input (400). `details` maps field names to messages.
  Validation {
    message: String,
    details: Option<Value>,
  },

  /// Authentication or authorization failure (401 / 403)
  Auth(AuthErrorKind),

  /// Missing resource (404)
  NotFound(String),

  /// Internal server error (500)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// No credentials on a protected operation (401)
  NotAuthenticated,

  /// Bearer token malformed, expired or for an unknown user (401)
  InvalidToken,

  /// Authenticated but not allowed (403)
  PermissionDenied,
}

impl ApiError {
  pub fn validation(message: impl Into<String>) -> Self {
    ApiError::Validation {
      message: message.into(),
      details: None,
    }
  }

  /// Validation failure attributed to a single request field
  pub fn field(field: &str, message: impl Into<String>) -> Self {
    let message = message.into();
    let mut details = Map::new();
    details.insert(
      field.to_string(),
      Value::Array(vec![Value::String(message.clone())]),
    );
    ApiError::Validation {
      message,
      details: Some(Value::Object(details)),
    }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    ApiError::NotFound(message.into())
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation { message, .. } => write!(f, "Validation error: {}", message),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
      },
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message, details) = match self {
      ApiError::Validation { message, details } => {
        ("validation_error", message.clone(), details.clone())
      }
      ApiError::Auth(kind) => {
        let (err_type, msg) = match kind {
          AuthErrorKind::NotAuthenticated => (
            "not_authenticated",
            "Authentication credentials were not provided.",
          ),
          AuthErrorKind::InvalidToken => ("invalid_token", "Given token not valid for any token type"),
          AuthErrorKind::PermissionDenied => (
            "permission_denied",
            "You do not have permission to perform this action.",
          ),
        };
        (err_type, msg.to_string(), None)
      }
      ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
      ApiError::Internal(msg) => {
        // Details stay in the log
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
          None,
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<RepositoryError> for ApiError {
  fn from(error: RepositoryError) -> Self {
    match error {
      RepositoryError::NotFound => ApiError::not_found("Not found."),
      RepositoryError::DuplicateKey(constraint) => {
        ApiError::validation(format!("Duplicate value violates {}", constraint))
      }
      other => ApiError::Internal(other.to_string()),
    }
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::NotAuthenticated => ApiError::Auth(AuthErrorKind::NotAuthenticated),
      AuthError::PermissionDenied => ApiError::Auth(AuthErrorKind::PermissionDenied),
      AuthError::InvalidToken => ApiError::Auth(AuthErrorKind::InvalidToken),
      AuthError::InvalidConfirmationCode => {
        ApiError::field("confirmation_code", "Wrong confirmation code")
      }
      AuthError::UserNotFound => ApiError::not_found("User not found"),
      AuthError::Validation(err) => ApiError::field(err.field(), err.to_string()),
      AuthError::Repository(err) => err.into(),
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
      AuthError::Mail(err) => ApiError::Internal(err.to_string()),
      AuthError::Token(msg) => ApiError::Internal(msg),
    }
  }
}

impl From<CatalogError> for ApiError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::CategoryNotFound => ApiError::not_found("Category not found"),
      CatalogError::GenreNotFound => ApiError::not_found("Genre not found"),
      CatalogError::TitleNotFound => ApiError::not_found("Title not found"),
      CatalogError::Validation(err) => ApiError::field(err.field(), err.to_string()),
      CatalogError::Auth(err) => err.into(),
      CatalogError::Repository(err) => err.into(),
    }
  }
}

impl From<ReviewError> for ApiError {
  fn from(error: ReviewError) -> Self {
    match error {
      ReviewError::TitleNotFound => ApiError::not_found("Title not found"),
      ReviewError::ReviewNotFound => ApiError::not_found("Review not found"),
      ReviewError::CommentNotFound => ApiError::not_found("Comment not found"),
      ReviewError::Validation(err) => ApiError::field(err.field(), err.to_string()),
      ReviewError::Auth(err) => err.into(),
      ReviewError::Repository(err) => err.into(),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut details = Map::new();
    let mut first = None;

    for (field, errors) in errors.field_errors() {
      let messages: Vec<Value> = errors
        .iter()
        .map(|error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field))
        })
        .inspect(|m| {
          first.get_or_insert_with(|| m.clone());
        })
        .map(Value::String)
        .collect();
      details.insert(field.to_string(), Value::Array(messages));
    }

    ApiError::Validation {
      message: first.unwrap_or_else(|| "Invalid input".to_string()),
      details: Some(Value::Object(details)),
    }
  }
}

/// Renders malformed JSON bodies in the common error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::validation(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::validation(err.to_string()).into()
}

/// Non-numeric ids in the path never match a resource
pub fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
  ApiError::not_found("Not found.").into()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::ValidationError;
  use actix_web::body::to_bytes;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::validation("test").status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::NotAuthenticated).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::PermissionDenied).status_code(),
      StatusCode::FORBIDDEN
    );
    assert_eq!(
      ApiError::not_found("x").status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::UserNotFound.into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = AuthError::Validation(ValidationError::UsernameTaken).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = CatalogError::Auth(AuthError::PermissionDenied).into();
    assert_eq!(api_error.status_code(), StatusCode::FORBIDDEN);
  }

  #[actix_web::test]
  async fn test_wrong_code_body_names_field() {
    let api_error: ApiError = AuthError::InvalidConfirmationCode.into();
    let response = api_error.error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "validation_error");
    assert_eq!(
      json["details"]["confirmation_code"][0],
      "Wrong confirmation code"
    );
  }

  #[actix_web::test]
  async fn test_internal_details_are_hidden() {
    let response = ApiError::Internal("pool timed out".to_string()).error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["message"], "An internal server error occurred");
    assert!(json.get("details").is_none());
  }
}
