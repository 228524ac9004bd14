use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{NamedSlugRequest, SearchQuery},
  errors::ApiError,
  middleware::AuthUser,
  pagination::{page_request, paginated},
};
use crate::application::catalog::{CreateGenreUseCase, DeleteGenreUseCase, ListGenresUseCase};

/// GET /api/v1/genres/
pub async fn list_genres_handler(
  req: HttpRequest,
  query: web::Query<SearchQuery>,
  use_case: web::Data<Arc<ListGenresUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = page_request(&req)?;
  let genres = use_case.execute(query.into_inner().search, page).await?;
  paginated(&req, genres)
}

/// POST /api/v1/genres/
pub async fn create_genre_handler(
  req: HttpRequest,
  body: web::Json<NamedSlugRequest>,
  use_case: web::Data<Arc<CreateGenreUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let genre = use_case
    .execute(actor.as_ref(), body.into_inner().into())
    .await?;
  Ok(HttpResponse::Created().json(genre))
}

/// DELETE /api/v1/genres/{slug}/
pub async fn delete_genre_handler(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<DeleteGenreUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  use_case.execute(actor.as_ref(), &path).await?;
  Ok(HttpResponse::NoContent().finish())
}
