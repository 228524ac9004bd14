use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::CommentRequest,
  errors::ApiError,
  middleware::AuthUser,
  pagination::{page_request, paginated},
};
use crate::application::reviews::{
  CreateCommentUseCase, DeleteCommentUseCase, GetCommentUseCase, ListCommentsUseCase,
  UpdateCommentCommand, UpdateCommentUseCase,
};

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/
pub async fn list_comments_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64)>,
  use_case: web::Data<Arc<ListCommentsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let page = page_request(&req)?;
  let (title_id, review_id) = path.into_inner();
  let comments = use_case.execute(title_id, review_id, page).await?;
  paginated(&req, comments)
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments/
pub async fn create_comment_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64)>,
  body: web::Json<CommentRequest>,
  use_case: web::Data<Arc<CreateCommentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let (title_id, review_id) = path.into_inner();
  let comment = use_case
    .execute(actor.as_ref(), title_id, review_id, body.into_inner().into())
    .await?;
  Ok(HttpResponse::Created().json(comment))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/
pub async fn get_comment_handler(
  path: web::Path<(i64, i64, i64)>,
  use_case: web::Data<Arc<GetCommentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let (title_id, review_id, comment_id) = path.into_inner();
  let comment = use_case.execute(title_id, review_id, comment_id).await?;
  Ok(HttpResponse::Ok().json(comment))
}

/// PUT /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/
pub async fn put_comment_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64, i64)>,
  body: web::Json<CommentRequest>,
  use_case: web::Data<Arc<UpdateCommentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_comment(req, path.into_inner(), body.into_inner(), &use_case, false).await
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/
pub async fn patch_comment_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64, i64)>,
  body: web::Json<CommentRequest>,
  use_case: web::Data<Arc<UpdateCommentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  update_comment(req, path.into_inner(), body.into_inner(), &use_case, true).await
}

async fn update_comment(
  req: HttpRequest,
  (title_id, review_id, comment_id): (i64, i64, i64),
  body: CommentRequest,
  use_case: &UpdateCommentUseCase,
  partial: bool,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  let comment = use_case
    .execute(
      actor.as_ref(),
      UpdateCommentCommand {
        title_id,
        review_id,
        comment_id,
        fields: body.into(),
        partial,
      },
    )
    .await?;
  Ok(HttpResponse::Ok().json(comment))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/
pub async fn delete_comment_handler(
  req: HttpRequest,
  path: web::Path<(i64, i64, i64)>,
  use_case: web::Data<Arc<DeleteCommentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = req.current_user();
  use_case.execute(actor.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}
