//! User administration and self-service profile use cases

mod manage_users;
mod profile;

use serde::Serialize;

use crate::domain::auth::entities::{ProfileUpdate, User, UserRole};
use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::value_objects::{Email, Username, profile_name};

pub use manage_users::{
  CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersCommand, ListUsersUseCase,
  UpdateUserCommand, UpdateUserUseCase,
};
pub use profile::{GetMeUseCase, UpdateMeUseCase};

/// Public representation of a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
  pub username: String,
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub bio: String,
  pub role: UserRole,
}

impl From<User> for UserDto {
  fn from(user: User) -> Self {
    Self {
      username: user.username,
      email: user.email,
      first_name: user.first_name,
      last_name: user.last_name,
      bio: user.bio,
      role: user.role,
    }
  }
}

/// Raw profile fields as submitted; every field is optional at this stage
#[derive(Debug, Clone, Default)]
pub struct UserFields {
  pub username: Option<String>,
  pub email: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub bio: Option<String>,
  pub role: Option<String>,
}

impl UserFields {
  /// Validates the present fields. A full update (`partial == false`)
  /// additionally requires `username` and `email`.
  pub fn into_update(self, partial: bool) -> Result<ProfileUpdate, AuthError> {
    if !partial {
      if self.username.is_none() {
        return Err(ValidationError::MissingField { field: "username" }.into());
      }
      if self.email.is_none() {
        return Err(ValidationError::MissingField { field: "email" }.into());
      }
    }

    Ok(ProfileUpdate {
      username: self.username.map(Username::new).transpose()?,
      email: self.email.map(Email::new).transpose()?,
      first_name: self
        .first_name
        .map(|v| profile_name("first_name", v))
        .transpose()?,
      last_name: self
        .last_name
        .map(|v| profile_name("last_name", v))
        .transpose()?,
      bio: self.bio,
      role: self.role.as_deref().map(UserRole::parse).transpose()?,
    })
  }

  /// Builds a new account, `role` defaults to `user`
  pub fn into_user(self) -> Result<User, AuthError> {
    let mut update = self.into_update(false)?;

    let (Some(username), Some(email)) = (update.username.take(), update.email.take()) else {
      return Err(ValidationError::MissingField { field: "username" }.into());
    };

    let mut user = User::new(username, email, update.role.take().unwrap_or_default());
    user.apply(update);
    Ok(user)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_full_update_requires_identity() {
    let fields = UserFields {
      email: Some("reader@example.com".to_string()),
      ..Default::default()
    };

    assert!(matches!(
      fields.into_update(false),
      Err(AuthError::Validation(ValidationError::MissingField { field: "username" }))
    ));
  }

  #[test]
  fn test_partial_update_validates_present_fields() {
    let fields = UserFields {
      role: Some("superuser".to_string()),
      ..Default::default()
    };

    assert!(matches!(
      fields.into_update(true),
      Err(AuthError::Validation(ValidationError::InvalidRole(_)))
    ));
  }

  #[test]
  fn test_into_user_defaults_role() {
    let user = UserFields {
      username: Some("reader".to_string()),
      email: Some("Reader@Example.com".to_string()),
      bio: Some("Reads a lot".to_string()),
      ..Default::default()
    }
    .into_user()
    .unwrap();

    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.email, "reader@example.com");
    assert_eq!(user.bio, "Reads a lot");
  }

  #[test]
  fn test_dto_serializes_role_lowercase() {
    let user = UserFields {
      username: Some("boss".to_string()),
      email: Some("boss@example.com".to_string()),
      role: Some("admin".to_string()),
      ..Default::default()
    }
    .into_user()
    .unwrap();

    let json = serde_json::to_value(UserDto::from(user)).unwrap();
    assert_eq!(json["role"], "admin");
    assert_eq!(json["first_name"], "");
  }
}
