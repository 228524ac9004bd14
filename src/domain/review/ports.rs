use async_trait::async_trait;
use uuid::Uuid;

use super::{
  entities::{Comment, NewComment, NewReview, Review},
  errors::ReviewError,
};
use crate::domain::pagination::{Page, PageRequest};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
  async fn create(&self, review: NewReview) -> Result<Review, ReviewError>;
  /// Finds a review scoped to its title
  async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, ReviewError>;
  /// Ordered by id
  async fn list(&self, title_id: i64, page: PageRequest) -> Result<Page<Review>, ReviewError>;
  async fn exists_for_author(&self, title_id: i64, author_id: Uuid) -> Result<bool, ReviewError>;
  /// Persists text and score
  async fn update(&self, review: Review) -> Result<Review, ReviewError>;
  /// Removes the review and its comments
  async fn delete(&self, id: i64) -> Result<(), ReviewError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
  async fn create(&self, comment: NewComment) -> Result<Comment, ReviewError>;
  /// Finds a comment scoped to its review
  async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, ReviewError>;
  /// Ordered by id
  async fn list(&self, review_id: i64, page: PageRequest) -> Result<Page<Comment>, ReviewError>;
  /// Persists the text
  async fn update(&self, comment: Comment) -> Result<Comment, ReviewError>;
  async fn delete(&self, id: i64) -> Result<(), ReviewError>;
}
