use std::sync::Arc;

use super::entities::{EmailMessage, ProfileUpdate, User, UserRole};
use super::errors::{AuthError, RepositoryError, ValidationError};
use super::permissions::{require_admin, require_authenticated};
use super::ports::{ConfirmationCodeHasher, Mailer, TokenService, UserRepository};
use super::value_objects::{AccessToken, ConfirmationCode, Email, Username};
use crate::domain::pagination::{Page, PageRequest};

/// Upper bound on generated username candidates before giving up
const MAX_USERNAME_ATTEMPTS: u32 = 1000;

/// Maps unique constraint violations on the users table to field errors
fn map_duplicate(error: AuthError) -> AuthError {
  match error {
    AuthError::Repository(RepositoryError::DuplicateKey(constraint)) => {
      if constraint.contains("email") {
        AuthError::Validation(ValidationError::EmailTaken)
      } else {
        AuthError::Validation(ValidationError::UsernameTaken)
      }
    }
    other => other,
  }
}

/// Confirmation-code authentication: code issuance, token exchange and
/// bearer token validation
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  code_hasher: Arc<dyn ConfirmationCodeHasher>,
  token_service: Arc<dyn TokenService>,
  mailer: Arc<dyn Mailer>,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    code_hasher: Arc<dyn ConfirmationCodeHasher>,
    token_service: Arc<dyn TokenService>,
    mailer: Arc<dyn Mailer>,
  ) -> Self {
    Self {
      user_repo,
      code_hasher,
      token_service,
      mailer,
    }
  }

  /// Issues a fresh confirmation code for `email` and mails it.
  ///
  /// Creates the account on first use. `username` only matters for a new
  /// account; when omitted one is derived from the address. Any code
  /// issued earlier stops being valid.
  ///
  /// # Errors
  /// Returns `ValidationError::UsernameTaken` if the requested username
  /// belongs to another account
  pub async fn send_confirmation_code(
    &self,
    email: Email,
    username: Option<Username>,
  ) -> Result<User, AuthError> {
    let mut user = match self.user_repo.find_by_email(&email).await? {
      Some(user) => user,
      None => {
        let username = match username {
          Some(username) => {
            if self
              .user_repo
              .find_by_username(username.as_str())
              .await?
              .is_some()
            {
              return Err(ValidationError::UsernameTaken.into());
            }
            username
          }
          None => self.available_username(&email).await?,
        };

        let user = User::new(username, email.clone(), UserRole::User);
        let created = self.user_repo.create(user).await.map_err(map_duplicate)?;
        tracing::info!(user_id = %created.id, username = %created.username, "Created user on code request");
        created
      }
    };

    let code = ConfirmationCode::generate();
    let code_hash = self.code_hasher.hash(&code).await?;
    user.set_confirmation_code(code_hash);
    let user = self.user_repo.update(user).await?;

    self
      .mailer
      .send(EmailMessage::confirmation_code(&user.email, &code))
      .await?;

    tracing::info!(user_id = %user.id, "Confirmation code sent");

    Ok(user)
  }

  /// Exchanges a confirmation code for an access token.
  ///
  /// The code is consumed on success.
  ///
  /// # Errors
  /// Returns `AuthError::UserNotFound` for an unknown email and
  /// `AuthError::InvalidConfirmationCode` when the code does not match
  pub async fn obtain_token(
    &self,
    email: Email,
    code: ConfirmationCode,
  ) -> Result<AccessToken, AuthError> {
    let mut user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::UserNotFound)?;

    let Some(code_hash) = user.confirmation_code.as_deref() else {
      return Err(AuthError::InvalidConfirmationCode);
    };

    if !self.code_hasher.verify(&code, code_hash).await? {
      tracing::warn!(user_id = %user.id, "Wrong confirmation code");
      return Err(AuthError::InvalidConfirmationCode);
    }

    user.clear_confirmation_code();
    let user = self.user_repo.update(user).await?;

    self.token_service.issue(&user)
  }

  /// Resolves the user a bearer token was issued for
  pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
    let user_id = self.token_service.verify(token)?;

    self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::InvalidToken)
  }

  async fn available_username(&self, email: &Email) -> Result<Username, AuthError> {
    for attempt in 0..MAX_USERNAME_ATTEMPTS {
      let candidate = Username::from_email(email, attempt);
      if self
        .user_repo
        .find_by_username(candidate.as_str())
        .await?
        .is_none()
      {
        return Ok(candidate);
      }
    }

    Err(ValidationError::UsernameTaken.into())
  }
}

/// Administration of user accounts and self-service profile access
pub struct UserService {
  user_repo: Arc<dyn UserRepository>,
}

impl UserService {
  pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
    Self { user_repo }
  }

  pub async fn list_users(
    &self,
    actor: Option<&User>,
    search: Option<&str>,
    page: PageRequest,
  ) -> Result<Page<User>, AuthError> {
    require_admin(actor)?;
    self.user_repo.list(search, page).await
  }

  pub async fn create_user(&self, actor: Option<&User>, user: User) -> Result<User, AuthError> {
    require_admin(actor)?;
    self.ensure_unique(&user.username, &user.email, None).await?;

    let created = self.user_repo.create(user).await.map_err(map_duplicate)?;
    tracing::info!(user_id = %created.id, role = %created.role, "User created by admin");
    Ok(created)
  }

  pub async fn get_user(&self, actor: Option<&User>, username: &str) -> Result<User, AuthError> {
    require_admin(actor)?;
    self.find(username).await
  }

  pub async fn update_user(
    &self,
    actor: Option<&User>,
    username: &str,
    update: ProfileUpdate,
  ) -> Result<User, AuthError> {
    require_admin(actor)?;
    let user = self.find(username).await?;
    self.save_changes(user, update).await
  }

  pub async fn delete_user(&self, actor: Option<&User>, username: &str) -> Result<(), AuthError> {
    require_admin(actor)?;
    let user = self.find(username).await?;
    self.user_repo.delete(user.id).await?;
    tracing::info!(user_id = %user.id, "User deleted");
    Ok(())
  }

  /// Returns the freshest copy of the calling user
  pub async fn me(&self, actor: Option<&User>) -> Result<User, AuthError> {
    let actor = require_authenticated(actor)?;
    self
      .user_repo
      .find_by_id(actor.id)
      .await?
      .ok_or(AuthError::UserNotFound)
  }

  /// Updates the caller's own profile; the role cannot be changed here
  pub async fn update_me(
    &self,
    actor: Option<&User>,
    update: ProfileUpdate,
  ) -> Result<User, AuthError> {
    let user = self.me(actor).await?;
    self.save_changes(user, update.without_role()).await
  }

  /// Makes sure an admin account exists for the given identity
  pub async fn ensure_admin(&self, username: Username, email: Email) -> Result<User, AuthError> {
    if let Some(mut user) = self.user_repo.find_by_email(&email).await? {
      if user.is_admin() {
        return Ok(user);
      }
      user.apply(ProfileUpdate {
        role: Some(UserRole::Admin),
        ..Default::default()
      });
      tracing::info!(user_id = %user.id, "Promoted bootstrap user to admin");
      return self.user_repo.update(user).await;
    }

    self.ensure_unique(username.as_str(), email.as_str(), None).await?;
    let user = User::new(username, email, UserRole::Admin);
    let created = self.user_repo.create(user).await.map_err(map_duplicate)?;
    tracing::info!(user_id = %created.id, "Bootstrap admin created");
    Ok(created)
  }

  async fn find(&self, username: &str) -> Result<User, AuthError> {
    self
      .user_repo
      .find_by_username(username)
      .await?
      .ok_or(AuthError::UserNotFound)
  }

  async fn save_changes(&self, mut user: User, update: ProfileUpdate) -> Result<User, AuthError> {
    let username = update
      .username
      .as_ref()
      .map(|u| u.as_str().to_string())
      .unwrap_or_else(|| user.username.clone());
    let email = update
      .email
      .as_ref()
      .map(|e| e.as_str().to_string())
      .unwrap_or_else(|| user.email.clone());
    self.ensure_unique(&username, &email, Some(&user)).await?;

    user.apply(update);
    self.user_repo.update(user).await.map_err(map_duplicate)
  }

  /// Checks that neither identifier belongs to an account other than `current`
  async fn ensure_unique(
    &self,
    username: &str,
    email: &str,
    current: Option<&User>,
  ) -> Result<(), AuthError> {
    let is_other = |found: &User| current.is_none_or(|c| c.id != found.id);

    if let Some(found) = self.user_repo.find_by_username(username).await? {
      if is_other(&found) {
        return Err(ValidationError::UsernameTaken.into());
      }
    }

    let email = Email::new(email)?;
    if let Some(found) = self.user_repo.find_by_email(&email).await? {
      if is_other(&found) {
        return Err(ValidationError::EmailTaken.into());
      }
    }

    Ok(())
  }
}
