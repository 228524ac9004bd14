use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{NamedSlugRequest, SearchQuery},
  errors::ApiError,
  middleware::AuthUser,
  pagination::{page_request, paginated},
};
use crate::application::catalog::{CreateCategoryUseCase, DeleteCategoryUseCase, ListCategoriesUseCase};

/// GET /api/v1/categories/
pub async fn list_categories_handler(
  req: HttpRequest,
  query: web::Query<SearchQuery>,
  use_case: web::Data<Arc<ListCategoriesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = page_request(&req)?;
  let categories = use_case.execute(query.into_inner().search, page).await?;
  paginated(&req, categories)
}

/// POST /api/v1/categories/
pub async fn create_category_handler(
  req: HttpRequest,
  body: web::Json<NamedSlugRequest>,
  use_case: web::Data<Arc<CreateCategoryUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let category = use_case
    .execute(actor.as_ref(), body.into_inner().into())
    .await?;
  Ok(HttpResponse::Created().json(category))
}

/// DELETE /api/v1/categories/{slug}/
pub async fn delete_category_handler(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<DeleteCategoryUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  use_case.execute(actor.as_ref(), &path).await?;
  Ok(HttpResponse::NoContent().finish())
}
