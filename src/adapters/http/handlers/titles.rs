use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{TitleQuery, TitleRequest},
  errors::ApiError,
  middleware::AuthUser,
  pagination::{page_request, paginated},
};
use crate::application::catalog::{
  CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesCommand, ListTitlesUseCase,
  UpdateTitleCommand, UpdateTitleUseCase,
};

/// GET /api/v1/titles/?genre=&category=&year=&name=
pub async fn list_titles_handler(
  req: HttpRequest,
  query: web::Query<TitleQuery>,
  use_case: web::Data<Arc<ListTitlesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = page_request(&req)?;
  let query = query.into_inner();

  let titles = use_case
    .execute(ListTitlesCommand {
      genre: query.genre,
      category: query.category,
      year: query.year,
      name: query.name,
      search: query.search,
      page,
    })
    .await?;

  paginated(&req, titles)
}

/// GET /api/v1/titles/{title_id}/
pub async fn get_title_handler(
  path: web::Path<i64>,
  use_case: web::Data<Arc<GetTitleUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let title = use_case.execute(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(title))
}

/// POST /api/v1/titles/
pub async fn create_title_handler(
  req: HttpRequest,
  body: web::Json<TitleRequest>,
  use_case: web::Data<Arc<CreateTitleUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let title = use_case
    .execute(actor.as_ref(), body.into_inner().into())
    .await?;
  Ok(HttpResponse::Created().json(title))
}

/// PUT /api/v1/titles/{title_id}/
pub async fn put_title_handler(
  req: HttpRequest,
  path: web::Path<i64>,
  body: web::Json<TitleRequest>,
  use_case: web::Data<Arc<UpdateTitleUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_title(req, path.into_inner(), body.into_inner(), &use_case, false).await
}

/// PATCH /api/v1/titles/{title_id}/
pub async fn patch_title_handler(
  req: HttpRequest,
  path: web::Path<i64>,
  body: web::Json<TitleRequest>,
  use_case: web::Data<Arc<UpdateTitleUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_title(req, path.into_inner(), body.into_inner(), &use_case, true).await
}

async fn update_title(
  req: HttpRequest,
  id: i64,
  body: TitleRequest,
  use_case: &UpdateTitleUseCase,
  partial: bool,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let title = use_case
    .execute(
      actor.as_ref(),
      UpdateTitleCommand {
        id,
        fields: body.into(),
        partial,
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(title))
}

/// DELETE /api/v1/titles/{title_id}/
pub async fn delete_title_handler(
  req: HttpRequest,
  path: web::Path<i64>,
  use_case: web::Data<Arc<DeleteTitleUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  use_case.execute(actor.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}
