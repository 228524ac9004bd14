use thiserror::Error;

use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum ReviewError {
  #[error("Title not found")]
  TitleNotFound,

  #[error("Review not found")]
  ReviewNotFound,

  #[error("Comment not found")]
  CommentNotFound,

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Auth error: {0}")]
  Auth(#[from] AuthError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("This field may not be blank")]
  Blank { field: &'static str },

  #[error("Score must be between {min} and {max}")]
  ScoreOutOfRange { min: i32, max: i32 },

  #[error("You have already reviewed this title")]
  AlreadyReviewed,

  #[error("This field is required")]
  MissingField { field: &'static str },
}

impl ValidationError {
  /// Name of the request field the error refers to
  pub fn field(&self) -> &'static str {
    match self {
      ValidationError::ScoreOutOfRange { .. } => "score",
      ValidationError::AlreadyReviewed => "non_field_errors",
      ValidationError::Blank { field } | ValidationError::MissingField { field } => field,
    }
  }
}

impl From<sqlx::Error> for ReviewError {
  fn from(error: sqlx::Error) -> Self {
    ReviewError::Repository(RepositoryError::from(error))
  }
}

/// Title lookups go through the catalog repository
impl From<CatalogError> for ReviewError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::TitleNotFound => ReviewError::TitleNotFound,
      CatalogError::Repository(e) => ReviewError::Repository(e),
      CatalogError::Auth(e) => ReviewError::Auth(e),
      other => ReviewError::Repository(RepositoryError::QueryFailed(other.to_string())),
    }
  }
}
