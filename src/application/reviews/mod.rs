//! Review and comment use cases

mod manage_comments;
mod manage_reviews;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::review::{Comment, Review, ReviewError, Text, ValidationError};

pub use manage_comments::{
  CommentFields, CreateCommentUseCase, DeleteCommentUseCase, GetCommentUseCase,
  ListCommentsUseCase, UpdateCommentCommand, UpdateCommentUseCase,
};
pub use manage_reviews::{
  CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase, ListReviewsUseCase, ReviewFields,
  UpdateReviewCommand, UpdateReviewUseCase,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDto {
  pub id: i64,
  pub text: String,
  /// Username of the author
  pub author: String,
  pub score: i32,
  pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
  fn from(review: Review) -> Self {
    Self {
      id: review.id,
      text: review.text,
      author: review.author_username,
      score: review.score,
      pub_date: review.pub_date,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentDto {
  pub id: i64,
  pub text: String,
  pub author: String,
  pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
  fn from(comment: Comment) -> Self {
    Self {
      id: comment.id,
      text: comment.text,
      author: comment.author_username,
      pub_date: comment.pub_date,
    }
  }
}

fn required_text(text: Option<String>) -> Result<Text, ReviewError> {
  let text = text.ok_or(ValidationError::MissingField { field: "text" })?;
  Ok(Text::new(text)?)
}
