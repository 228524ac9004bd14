use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::application::catalog::{NamedSlugFields, TitleFields};
use crate::application::reviews::{CommentFields, ReviewFields};
use crate::application::users::UserFields;

// ============================================================================
// Auth
// ============================================================================

/// Request for a confirmation code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendCodeRequest {
  #[validate(
    required(message = "This field is required."),
    email(message = "Enter a valid email address."),
    length(max = 254, message = "Ensure this field has no more than 254 characters.")
  )]
  pub email: Option<String>,

  #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
  pub username: Option<String>,
}

/// Request for exchanging a confirmation code for a token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenRequest {
  #[validate(
    required(message = "This field is required."),
    email(message = "Enter a valid email address.")
  )]
  pub email: Option<String>,

  #[validate(required(message = "This field is required."))]
  pub confirmation_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub token: String,
}

// ============================================================================
// Users
// ============================================================================

/// User body for create, PUT and PATCH. Presence rules depend on the
/// operation and are checked by the use case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRequest {
  pub username: Option<String>,
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub bio: Option<String>,
  pub role: Option<String>,
}

impl From<UserRequest> for UserFields {
  fn from(request: UserRequest) -> Self {
    UserFields {
      username: request.username,
      email: request.email,
      first_name: request.first_name,
      last_name: request.last_name,
      bio: request.bio,
      role: request.role,
    }
  }
}

// ============================================================================
// Catalog
// ============================================================================

/// Category or genre creation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedSlugRequest {
  pub name: Option<String>,
  pub slug: Option<String>,
}

impl From<NamedSlugRequest> for NamedSlugFields {
  fn from(request: NamedSlugRequest) -> Self {
    NamedSlugFields {
      name: request.name,
      slug: request.slug,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleRequest {
  pub name: Option<String>,
  pub year: Option<i32>,
  #[serde(default, deserialize_with = "explicit_null")]
  pub description: Option<Option<String>>,
  /// Genre slugs
  pub genre: Option<Vec<String>>,
  /// Category slug
  pub category: Option<String>,
}

/// Keeps a present `null` as `Some(None)`, apart from a missing field
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

impl From<TitleRequest> for TitleFields {
  fn from(request: TitleRequest) -> Self {
    TitleFields {
      name: request.name,
      year: request.year,
      description: request.description,
      genre: request.genre,
      category: request.category,
    }
  }
}

/// `?search=` on category, genre and user listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
  pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleQuery {
  pub genre: Option<String>,
  pub category: Option<String>,
  pub year: Option<i32>,
  pub name: Option<String>,
  pub search: Option<String>,
}

// ============================================================================
// Reviews
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
  pub text: Option<String>,
  pub score: Option<i32>,
}

impl From<ReviewRequest> for ReviewFields {
  fn from(request: ReviewRequest) -> Self {
    ReviewFields {
      text: request.text,
      score: request.score,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentRequest {
  pub text: Option<String>,
}

impl From<CommentRequest> for CommentFields {
  fn from(request: CommentRequest) -> Self {
    CommentFields { text: request.text }
  }
}

// ============================================================================
// Common
// ============================================================================

/// Page-number envelope used by every listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
  pub count: i64,
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
  pub status: String,
  pub database: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Error type identifier
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Per-field messages for validation failures
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
