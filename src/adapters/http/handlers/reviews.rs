use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::ReviewRequest,
  errors::ApiError,
  middleware::AuthUser,
  pagination::{page_request, paginated},
};
use crate::application::reviews::{
  CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase, ListReviewsUseCase,
  UpdateReviewCommand, UpdateReviewUseCase,
};

/// GET /api/v1/titles/{title_id}/reviews/
pub async fn list_reviews_handler(
  req: HttpRequest,
  path: web::Path<i64>,
  use_case: web::Data<Arc<ListReviewsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = page_request(&req)?;
  let reviews = use_case.execute(path.into_inner(), page).await?;
  paginated(&req, reviews)
}

/// POST /api/v1/titles/{title_id}/reviews/
pub async fn create_review_handler(
  req: HttpRequest,
  path: web::Path<i64>,
  body: web::Json<ReviewRequest>,
  use_case: web::Data<Arc<CreateReviewUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let review = use_case
    .execute(actor.as_ref(), path.into_inner(), body.into_inner().into())
    .await?;
  Ok(HttpResponse::Created().json(review))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/
pub async fn get_review_handler(
  path: web::Path<(i64, i64)>,
  use_case: web::Data<Arc<GetReviewUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let (title_id, review_id) = path.into_inner();
  let review = use_case.execute(title_id, review_id).await?;
  Ok(HttpResponse::Ok().json(review))
}

/// PUT /api/v1/titles/{title_id}/reviews/{review_id}/
pub async fn put_review_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64)>,
  body: web::Json<ReviewRequest>,
  use_case: web::Data<Arc<UpdateReviewUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_review(req, path.into_inner(), body.into_inner(), &use_case, false).await
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/
pub async fn patch_review_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64)>,
  body: web::Json<ReviewRequest>,
  use_case: web::Data<Arc<UpdateReviewUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_review(req, path.into_inner(), body.into_inner(), &use_case, true).await
}

async fn update_review(
  req: HttpRequest,
  (title_id, review_id): (i64, i64),
  body: ReviewRequest,
  use_case: &UpdateReviewUseCase,
  partial: bool,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let review = use_case
    .execute(
      actor.as_ref(),
      UpdateReviewCommand {
        title_id,
        review_id,
        fields: body.into(),
        partial,
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(review))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/
pub async fn delete_review_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64)>,
  use_case: web::Data<Arc<DeleteReviewUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let (title_id, review_id) = path.into_inner();
  use_case
    .execute(actor.as_ref(), title_id, review_id)
    .await?;
  Ok(HttpResponse::NoContent().finish())
}
