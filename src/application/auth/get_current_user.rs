use std::sync::Arc;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Use case for resolving the user behind a bearer token
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::InvalidToken` if the token is malformed, expired or
  /// names a user that no longer exists
  pub async fn execute(&self, token: String) -> Result<User, AuthError> {
    self.auth_service.authenticate(&token).await
  }
}
