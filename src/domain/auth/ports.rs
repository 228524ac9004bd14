use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{EmailMessage, User};
use super::errors::AuthError;
use super::value_objects::{AccessToken, ConfirmationCode, Email};
use crate::domain::pagination::{Page, PageRequest};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Finds a user by their username (exact match)
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

  /// Lists users ordered by username, optionally filtered by a
  /// case-insensitive username substring
  async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<User>, AuthError>;

  /// Updates an existing user
  async fn update(&self, user: User) -> Result<User, AuthError>;

  /// Removes a user together with the content they authored
  async fn delete(&self, id: Uuid) -> Result<(), AuthError>;
}

/// One-way hashing of confirmation codes
#[async_trait]
pub trait ConfirmationCodeHasher: Send + Sync {
  async fn hash(&self, code: &ConfirmationCode) -> Result<String, AuthError>;

  async fn verify(&self, code: &ConfirmationCode, hash: &str) -> Result<bool, AuthError>;
}

/// Issues and checks bearer access tokens
pub trait TokenService: Send + Sync {
  fn issue(&self, user: &User) -> Result<AccessToken, AuthError>;

  /// Returns the id of the user the token was issued for
  fn verify(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Outgoing mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, message: EmailMessage) -> Result<(), AuthError>;
}
