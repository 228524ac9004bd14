use std::sync::Arc;

use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Username};

/// Command for requesting a confirmation code
#[derive(Debug, Clone)]
pub struct SendConfirmationCodeCommand {
  pub email: Option<String>,
  /// Only used when the account does not exist yet
  pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendConfirmationCodeResponse {
  /// Address the code was mailed to
  pub email: String,
}

impl SendConfirmationCodeResponse {
  pub fn message(&self) -> String {
    format!("Code was sent to {}, please check", self.email)
  }
}

/// Use case for mailing a fresh confirmation code, signing the user up on
/// first contact
pub struct SendConfirmationCodeUseCase {
  auth_service: Arc<AuthService>,
}

impl SendConfirmationCodeUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::Validation` for a malformed email or username, or
  /// when the username belongs to another account
  pub async fn execute(
    &self,
    command: SendConfirmationCodeCommand,
  ) -> Result<SendConfirmationCodeResponse, AuthError> {
    let email = command
      .email
      .ok_or(ValidationError::MissingField { field: "email" })?;
    let email = Email::new(email)?;

    let username = command
      .username
      .filter(|u| !u.trim().is_empty())
      .map(Username::new)
      .transpose()?;

    let user = self
      .auth_service
      .send_confirmation_code(email, username)
      .await?;

    Ok(SendConfirmationCodeResponse { email: user.email })
  }
}
