//! Access rules shared by every resource.
//!
//! Anonymous callers get `NotAuthenticated` (401), authenticated callers
//! lacking rights get `PermissionDenied` (403).

use uuid::Uuid;

use super::entities::User;
use super::errors::AuthError;

pub fn require_authenticated(actor: Option<&User>) -> Result<&User, AuthError> {
  actor.ok_or(AuthError::NotAuthenticated)
}

pub fn require_admin(actor: Option<&User>) -> Result<&User, AuthError> {
  let user = require_authenticated(actor)?;
  if !user.is_admin() {
    return Err(AuthError::PermissionDenied);
  }
  Ok(user)
}

/// Content may be changed by its author, a moderator or an admin
pub fn require_author_or_staff(actor: Option<&User>, author_id: Uuid) -> Result<&User, AuthError> {
  let user = require_authenticated(actor)?;
  if user.id != author_id && !user.can_moderate() {
    return Err(AuthError::PermissionDenied);
  }
  Ok(user)
}
