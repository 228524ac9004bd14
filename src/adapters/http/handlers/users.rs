use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{SearchQuery, UserRequest},
  errors::ApiError,
  middleware::AuthUser,
  pagination::{page_request, paginated},
};
use crate::application::users::{
  CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, GetUserUseCase, ListUsersCommand,
  ListUsersUseCase, UpdateMeUseCase, UpdateUserCommand, UpdateUserUseCase,
};

/// GET /api/v1/users/
pub async fn list_users_handler(
  req: HttpRequest,
  query: web::Query<SearchQuery>,
  use_case: web::Data<Arc<ListUsersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let page = page_request(&req)?;

  let users = use_case
    .execute(
      actor.as_ref(),
      ListUsersCommand {
        search: query.into_inner().search,
        page,
      },
    )
    .await?;

  paginated(&req, users)
}

/// POST /api/v1/users/
pub async fn create_user_handler(
  req: HttpRequest,
  body: web::Json<UserRequest>,
  use_case: web::Data<Arc<CreateUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let user = use_case
    .execute(actor.as_ref(), body.into_inner().into())
    .await?;
  Ok(HttpResponse::Created().json(user))
}

/// GET /api/v1/users/{username}/
pub async fn get_user_handler(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<GetUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let user = use_case.execute(actor.as_ref(), &path).await?;
  Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/v1/users/{username}/
pub async fn put_user_handler(
  req: HttpRequest,
  path: web::Path<String>,
  body: web::Json<UserRequest>,
  use_case: web::Data<Arc<UpdateUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_user(req, path.into_inner(), body.into_inner(), &use_case, false).await
}

/// PATCH /api/v1/users/{username}/
pub async fn patch_user_handler(
  req: HttpRequest,
  path: web::Path<String>,
  body: web::Json<UserRequest>,
  use_case: web::Data<Arc<UpdateUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_user(req, path.into_inner(), body.into_inner(), &use_case, true).await
}

async fn update_user(
  req: HttpRequest,
  username: String,
  body: UserRequest,
  use_case: &UpdateUserUseCase,
  partial: bool,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let user = use_case
    .execute(
      actor.as_ref(),
      UpdateUserCommand {
        username,
        fields: body.into(),
        partial,
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/v1/users/{username}/
pub async fn delete_user_handler(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<DeleteUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  use_case.execute(actor.as_ref(), &path).await?;
  Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/users/me/
pub async fn get_me_handler(
  req: HttpRequest,
  use_case: web::Data<Arc<GetMeUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let user = use_case.execute(actor.as_ref()).await?;
  Ok(HttpResponse::Ok().json(user))
}

/// PATCH /api/v1/users/me/
pub async fn patch_me_handler(
  req: HttpRequest,
  body: web::Json<UserRequest>,
  use_case: web::Data<Arc<UpdateMeUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let user = use_case
    .execute(actor.as_ref(), body.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(user))
}
