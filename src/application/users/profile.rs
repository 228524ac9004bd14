use std::sync::Arc;

use super::{UserDto, UserFields};
use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::permissions::require_authenticated;
use crate::domain::auth::services::UserService;

/// `GET /users/me/`
pub struct GetMeUseCase {
  user_service: Arc<UserService>,
}

impl GetMeUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, actor: Option<&User>) -> Result<UserDto, AuthError> {
    Ok(self.user_service.me(actor).await?.into())
  }
}

/// `PATCH /users/me/`, role changes are silently ignored
pub struct UpdateMeUseCase {
  user_service: Arc<UserService>,
}

impl UpdateMeUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, actor: Option<&User>, fields: UserFields) -> Result<UserDto, AuthError> {
    require_authenticated(actor)?;
    let fields = UserFields {
      role: None,
      ..fields
    };
    let update = fields.into_update(true)?;
    Ok(self.user_service.update_me(actor, update).await?.into())
  }
}
