use thiserror::Error;

use crate::domain::auth::errors::{AuthError, RepositoryError};

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Category not found")]
  CategoryNotFound,

  #[error("Genre not found")]
  GenreNotFound,

  #[error("Title not found")]
  TitleNotFound,

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

  #[error("Ensure this field has no more than {max} characters")]
  TooLong { field: &'static str, max: usize },

  #[error("Enter a valid slug consisting of letters, numbers, underscores or hyphens")]
  InvalidSlug,

  #[error("An entry with this slug already exists")]
  SlugTaken,

  #[error("Object with slug={slug} does not exist")]
  UnknownSlug { field: &'static str, slug: String },

  #[error("Year cannot be greater than {max}")]
  YearInFuture { max: i32 },

  #[error("This field is required")]
  MissingField { field: &'static str },
}

impl ValidationError {
  /// Name of the request field the error refers to
  pub fn field(&self) -> &'static str {
    match self {
      ValidationError::InvalidSlug | ValidationError::SlugTaken => "slug",
      ValidationError::YearInFuture { .. } => "year",
      ValidationError::Blank { field }
      | ValidationError::TooLong { field, .. }
      | ValidationError::UnknownSlug { field, .. }
      | ValidationError::MissingField { field } => field,
    }
  }
}

impl From<sqlx::Error> for CatalogError {
  fn from(error: sqlx::Error) -> Self {
    CatalogError::Repository(RepositoryError::from(error))
  }
}
