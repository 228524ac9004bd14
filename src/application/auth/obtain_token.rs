use std::sync::Arc;

use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{ConfirmationCode, Email};

/// Command for exchanging a confirmation code for an access token
#[derive(Debug, Clone)]
pub struct ObtainTokenCommand {
  pub email: Option<String>,
  pub confirmation_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObtainTokenResponse {
  pub token: String,
}

pub struct ObtainTokenUseCase {
  auth_service: Arc<AuthService>,
}

impl ObtainTokenUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// `AuthError::UserNotFound` for an unknown address,
  /// `AuthError::InvalidConfirmationCode` when the code does not match
  pub async fn execute(&self, command: ObtainTokenCommand) -> Result<ObtainTokenResponse, AuthError> {
    let email = command
      .email
      .ok_or(ValidationError::MissingField { field: "email" })?;
    let email = Email::new(email)?;

    let code = command
      .confirmation_code
      .ok_or(ValidationError::MissingField {
        field: "confirmation_code",
      })?;

    let token = self
      .auth_service
      .obtain_token(email, ConfirmationCode::from_string(code))
      .await?;

    Ok(ObtainTokenResponse {
      token: token.into_inner(),
    })
  }
}
