use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::ValidationError;
use super::value_objects::{ConfirmationCode, Email, Username};

/// Access level of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  #[default]
  User,
  Moderator,
  Admin,
}

impl UserRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      UserRole::User => "user",
      UserRole::Moderator => "moderator",
      UserRole::Admin => "admin",
    }
  }

  pub fn parse(value: &str) -> Result<Self, ValidationError> {
    match value.to_lowercase().as_str() {
      "user" => Ok(UserRole::User),
      "moderator" => Ok(UserRole::Moderator),
      "admin" => Ok(UserRole::Admin),
      _ => Err(ValidationError::InvalidRole(value.to_string())),
    }
  }
}

impl fmt::Display for UserRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// User entity representing an account on the site
#[derive(Debug, Clone)]
pub struct User {
  pub id: Uuid,
  /// Unique public handle, used as lookup key
  pub username: String,
  /// Unique, lowercased email address
  pub email: String,
  pub role: UserRole,
  pub bio: String,
  pub first_name: String,
  pub last_name: String,
  /// Argon2 hash of the pending confirmation code
  pub confirmation_code: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn new(username: Username, email: Email, role: UserRole) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      username: username.into_inner(),
      email: email.into_inner(),
      role,
      bio: String::new(),
      first_name: String::new(),
      last_name: String::new(),
      confirmation_code: None,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn is_admin(&self) -> bool {
    self.role == UserRole::Admin
  }

  pub fn is_moderator(&self) -> bool {
    self.role == UserRole::Moderator
  }

  /// Whether the user may edit or remove content written by others
  pub fn can_moderate(&self) -> bool {
    self.is_admin() || self.is_moderator()
  }

  pub fn set_confirmation_code(&mut self, code_hash: String) {
    self.confirmation_code = Some(code_hash);
    self.updated_at = Utc::now();
  }

  pub fn clear_confirmation_code(&mut self) {
    self.confirmation_code = None;
    self.updated_at = Utc::now();
  }

  /// Applies the fields present in `update`
  pub fn apply(&mut self, update: ProfileUpdate) {
    if let Some(username) = update.username {
      self.username = username.into_inner();
    }
    if let Some(email) = update.email {
      self.email = email.into_inner();
    }
    if let Some(first_name) = update.first_name {
      self.first_name = first_name;
    }
    if let Some(last_name) = update.last_name {
      self.last_name = last_name;
    }
    if let Some(bio) = update.bio {
      self.bio = bio;
    }
    if let Some(role) = update.role {
      self.role = role;
    }
    self.updated_at = Utc::now();
  }
}

/// Validated set of profile changes; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
  pub username: Option<Username>,
  pub email: Option<Email>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub bio: Option<String>,
  pub role: Option<UserRole>,
}

impl ProfileUpdate {
  /// Drops the role change, used for self-service profile edits
  pub fn without_role(mut self) -> Self {
    self.role = None;
    self
  }
}

/// Outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
  pub to: String,
  pub subject: String,
  pub body: String,
}

impl EmailMessage {
  const CONFIRMATION_SUBJECT: &'static str = "Confirmation code on Yamdb.ru";

  pub fn confirmation_code(to: &str, code: &ConfirmationCode) -> Self {
    Self {
      to: to.to_string(),
      subject: Self::CONFIRMATION_SUBJECT.to_string(),
      body: format!("Your confirmation code: {}", code.as_str()),
    }
  }
}
