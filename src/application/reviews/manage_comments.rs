use std::sync::Arc;

use super::{CommentDto, required_text};
use crate::domain::auth::{entities::User, permissions::require_authenticated};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::review::{ReviewError, ReviewService, Text};

/// Raw `{text}` body
#[derive(Debug, Clone, Default)]
pub struct CommentFields {
  pub text: Option<String>,
}

pub struct ListCommentsUseCase {
  review_service: Arc<ReviewService>,
}

impl ListCommentsUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    title_id: i64,
    review_id: i64,
    page: PageRequest,
  ) -> Result<Page<CommentDto>, ReviewError> {
    let page = self
      .review_service
      .list_comments(title_id, review_id, page)
      .await?;
    Ok(page.map(CommentDto::from))
  }
}

pub struct GetCommentUseCase {
  review_service: Arc<ReviewService>,
}

impl GetCommentUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    title_id: i64,
    review_id: i64,
    comment_id: i64,
  ) -> Result<CommentDto, ReviewError> {
    let comment = self
      .review_service
      .get_comment(title_id, review_id, comment_id)
      .await?;
    Ok(comment.into())
  }
}

pub struct CreateCommentUseCase {
  review_service: Arc<ReviewService>,
}

impl CreateCommentUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    title_id: i64,
    review_id: i64,
    fields: CommentFields,
  ) -> Result<CommentDto, ReviewError> {
    require_authenticated(actor)?;
    let text = required_text(fields.text)?;
    let comment = self
      .review_service
      .create_comment(actor, title_id, review_id, text)
      .await?;
    Ok(comment.into())
  }
}

#[derive(Debug, Clone)]
pub struct UpdateCommentCommand {
  pub title_id: i64,
  pub review_id: i64,
  pub comment_id: i64,
  pub fields: CommentFields,
  pub partial: bool,
}

/// PUT replaces the text, PATCH keeps it when `text` is absent
pub struct UpdateCommentUseCase {
  review_service: Arc<ReviewService>,
}

impl UpdateCommentUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    command: UpdateCommentCommand,
  ) -> Result<CommentDto, ReviewError> {
    require_authenticated(actor)?;
    let text = if command.partial {
      command.fields.text.map(Text::new).transpose()?
    } else {
      Some(required_text(command.fields.text)?)
    };
    let comment = self
      .review_service
      .update_comment(
        actor,
        command.title_id,
        command.review_id,
        command.comment_id,
        text,
      )
      .await?;
    Ok(comment.into())
  }
}

pub struct DeleteCommentUseCase {
  review_service: Arc<ReviewService>,
}

impl DeleteCommentUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    ids: (i64, i64, i64),
  ) -> Result<(), ReviewError> {
    let (title_id, review_id, comment_id) = ids;
    self
      .review_service
      .delete_comment(actor, title_id, review_id, comment_id)
      .await
  }
}
