use std::sync::Arc;

use super::{UserDto, UserFields};
use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::permissions::require_admin;
use crate::domain::auth::services::UserService;
use crate::domain::pagination::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct ListUsersCommand {
  /// Case-insensitive username substring
  pub search: Option<String>,
  pub page: PageRequest,
}

/// Admin listing of all accounts
pub struct ListUsersUseCase {
  user_service: Arc<UserService>,
}

impl ListUsersUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    command: ListUsersCommand,
  ) -> Result<Page<UserDto>, AuthError> {
    let search = command.search.as_deref().filter(|s| !s.is_empty());
    let page = self
      .user_service
      .list_users(actor, search, command.page)
      .await?;
    Ok(page.map(UserDto::from))
  }
}

pub struct CreateUserUseCase {
  user_service: Arc<UserService>,
}

impl CreateUserUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, actor: Option<&User>, fields: UserFields) -> Result<UserDto, AuthError> {
    require_admin(actor)?;
    let user = fields.into_user()?;
    let created = self.user_service.create_user(actor, user).await?;
    Ok(created.into())
  }
}

pub struct GetUserUseCase {
  user_service: Arc<UserService>,
}

impl GetUserUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, actor: Option<&User>, username: &str) -> Result<UserDto, AuthError> {
    let user = self.user_service.get_user(actor, username).await?;
    Ok(user.into())
  }
}

#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
  pub username: String,
  pub fields: UserFields,
  /// PATCH semantics when true, PUT otherwise
  pub partial: bool,
}

pub struct UpdateUserUseCase {
  user_service: Arc<UserService>,
}

impl UpdateUserUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    command: UpdateUserCommand,
  ) -> Result<UserDto, AuthError> {
    require_admin(actor)?;
    let update = command.fields.into_update(command.partial)?;
    let user = self
      .user_service
      .update_user(actor, &command.username, update)
      .await?;
    Ok(user.into())
  }
}

pub struct DeleteUserUseCase {
  user_service: Arc<UserService>,
}

impl DeleteUserUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, actor: Option<&User>, username: &str) -> Result<(), AuthError> {
    self.user_service.delete_user(actor, username).await
  }
}
