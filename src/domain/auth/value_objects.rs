use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::ValidateEmail;

use super::errors::ValidationError;

lazy_static! {
  static ref USERNAME_RE: Regex = Regex::new(r"^[\w.@+-]+$").expect("valid username regex");
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  pub const MAX_LENGTH: usize = 254;

  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    let email = email.into().trim().to_string();

    if email.is_empty() {
      return Err(ValidationError::Blank { field: "email" });
    }

    if email.len() > Self::MAX_LENGTH {
      return Err(ValidationError::TooLong {
        field: "email",
        max: Self::MAX_LENGTH,
      });
    }

    if !email.validate_email() {
      return Err(ValidationError::InvalidEmail);
    }

    // Normalize to lowercase
    Ok(Self(email.to_lowercase()))
  }

  /// Part of the address before the `@`
  pub fn local_part(&self) -> &str {
    self.0.split('@').next().unwrap_or_default()
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Username Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
  pub const MAX_LENGTH: usize = 150;
  const RESERVED: &'static str = "me";

  pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
    let username = username.into().trim().to_string();

    if username.is_empty() {
      return Err(ValidationError::Blank { field: "username" });
    }

    if username.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::TooLong {
        field: "username",
        max: Self::MAX_LENGTH,
      });
    }

    if !USERNAME_RE.is_match(&username) {
      return Err(ValidationError::InvalidUsername);
    }

    if username.eq_ignore_ascii_case(Self::RESERVED) {
      return Err(ValidationError::ReservedUsername);
    }

    Ok(Self(username))
  }

  /// Builds a username candidate out of an email address local part.
  ///
  /// Characters the username pattern rejects are dropped; the result is
  /// suffixed with `attempt` when it is non-zero.
  pub fn from_email(email: &Email, attempt: u32) -> Self {
    let mut base: String = email
      .local_part()
      .chars()
      .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
      .take(Self::MAX_LENGTH - 10)
      .collect();

    if base.is_empty() || base.eq_ignore_ascii_case(Self::RESERVED) {
      base = "user".to_string();
    }

    if attempt > 0 {
      base.push_str(&attempt.to_string());
    }

    Self(base)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Username {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Profile text fields
// ============================================================================

/// Validates an optional free text profile field (first/last name)
pub fn profile_name(field: &'static str, value: impl Into<String>) -> Result<String, ValidationError> {
  const MAX_LENGTH: usize = 150;

  let value = value.into().trim().to_string();
  if value.chars().count() > MAX_LENGTH {
    return Err(ValidationError::TooLong {
      field,
      max: MAX_LENGTH,
    });
  }

  Ok(value)
}

// ============================================================================
// ConfirmationCode Value Object (never stored in clear)
// ============================================================================

#[derive(Clone)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
  /// Generates a new random confirmation code
  pub fn generate() -> Self {
    Self(Uuid::new_v4().to_string())
  }

  /// Wraps a code received from a client
  pub fn from_string(code: impl Into<String>) -> Self {
    Self(code.into().trim().to_string())
  }

  /// Returns the code as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the code
impl fmt::Debug for ConfirmationCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ConfirmationCode(***)")
  }
}

// ============================================================================
// AccessToken Value Object (signed JWT)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
  pub fn new(token: impl Into<String>) -> Self {
    Self(token.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for AccessToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("AccessToken(***)")
  }
}
