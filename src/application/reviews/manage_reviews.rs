use std::sync::Arc;

use super::{ReviewDto, required_text};
use crate::domain::auth::{entities::User, permissions::require_authenticated};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::review::{ReviewChanges, ReviewError, ReviewService, Score, Text, ValidationError};

/// Raw `{text, score}` body
#[derive(Debug, Clone, Default)]
pub struct ReviewFields {
  pub text: Option<String>,
  pub score: Option<i32>,
}

impl ReviewFields {
  fn into_parts(self) -> Result<(Text, Score), ReviewError> {
    let text = required_text(self.text)?;
    let score = self
      .score
      .ok_or(ValidationError::MissingField { field: "score" })?;
    Ok((text, Score::new(score)?))
  }

  fn into_changes(self, partial: bool) -> Result<ReviewChanges, ReviewError> {
    if !partial {
      let (text, score) = self.into_parts()?;
      return Ok(ReviewChanges {
        text: Some(text),
        score: Some(score),
      });
    }

    Ok(ReviewChanges {
      text: self.text.map(Text::new).transpose()?,
      score: self.score.map(Score::new).transpose()?,
    })
  }
}

pub struct ListReviewsUseCase {
  review_service: Arc<ReviewService>,
}

impl ListReviewsUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    title_id: i64,
    page: PageRequest,
  ) -> Result<Page<ReviewDto>, ReviewError> {
    let page = self.review_service.list_reviews(title_id, page).await?;
    Ok(page.map(ReviewDto::from))
  }
}

pub struct GetReviewUseCase {
  review_service: Arc<ReviewService>,
}

impl GetReviewUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(&self, title_id: i64, review_id: i64) -> Result<ReviewDto, ReviewError> {
    Ok(
      self
        .review_service
        .get_review(title_id, review_id)
        .await?
        .into(),
    )
  }
}

pub struct CreateReviewUseCase {
  review_service: Arc<ReviewService>,
}

impl CreateReviewUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    title_id: i64,
    fields: ReviewFields,
  ) -> Result<ReviewDto, ReviewError> {
    require_authenticated(actor)?;
    let (text, score) = fields.into_parts()?;
    let review = self
      .review_service
      .create_review(actor, title_id, text, score)
      .await?;
    Ok(review.into())
  }
}

#[derive(Debug, Clone)]
pub struct UpdateReviewCommand {
  pub title_id: i64,
  pub review_id: i64,
  pub fields: ReviewFields,
  pub partial: bool,
}

pub struct UpdateReviewUseCase {
  review_service: Arc<ReviewService>,
}

impl UpdateReviewUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    command: UpdateReviewCommand,
  ) -> Result<ReviewDto, ReviewError> {
    require_authenticated(actor)?;
    let changes = command.fields.into_changes(command.partial)?;
    let review = self
      .review_service
      .update_review(actor, command.title_id, command.review_id, changes)
      .await?;
    Ok(review.into())
  }
}

pub struct DeleteReviewUseCase {
  review_service: Arc<ReviewService>,
}

impl DeleteReviewUseCase {
  pub fn new(review_service: Arc<ReviewService>) -> Self {
    Self { review_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    title_id: i64,
    review_id: i64,
  ) -> Result<(), ReviewError> {
    self
      .review_service
      .delete_review(actor, title_id, review_id)
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_score_is_required_on_create() {
    let result = ReviewFields {
      text: Some("Great".to_string()),
      score: None,
    }
    .into_parts();

    assert!(matches!(
      result,
      Err(ReviewError::Validation(ValidationError::MissingField { field: "score" }))
    ));
  }

  #[test]
  fn test_out_of_range_score() {
    let result = ReviewFields {
      text: None,
      score: Some(11),
    }
    .into_changes(true);

    assert!(matches!(
      result,
      Err(ReviewError::Validation(ValidationError::ScoreOutOfRange { .. }))
    ));
  }
}
