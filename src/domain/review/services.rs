use std::sync::Arc;

use crate::domain::auth::{
  entities::User,
  permissions::{require_authenticated, require_author_or_staff},
};
use crate::domain::catalog::TitleRepository;
use crate::domain::pagination::{Page, PageRequest};

use super::{
  entities::{Comment, NewComment, NewReview, Review, ReviewChanges},
  errors::{ReviewError, ValidationError},
  ports::{CommentRepository, ReviewRepository},
  value_objects::{Score, Text},
};

/// Reviews of titles and comments on reviews.
///
/// Every operation resolves the parent first, a review is only visible
/// under its own title and a comment only under its own review.
pub struct ReviewService {
  title_repo: Arc<dyn TitleRepository>,
  review_repo: Arc<dyn ReviewRepository>,
  comment_repo: Arc<dyn CommentRepository>,
}

impl ReviewService {
  pub fn new(
    title_repo: Arc<dyn TitleRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    comment_repo: Arc<dyn CommentRepository>,
  ) -> Self {
    Self {
      title_repo,
      review_repo,
      comment_repo,
    }
  }

  // ==========================================================================
  // Reviews
  // ==========================================================================

  pub async fn list_reviews(
    &self,
    title_id: i64,
    page: PageRequest,
  ) -> Result<Page<Review>, ReviewError> {
    self.ensure_title(title_id).await?;
    self.review_repo.list(title_id, page).await
  }

  pub async fn get_review(&self, title_id: i64, review_id: i64) -> Result<Review, ReviewError> {
    self.ensure_title(title_id).await?;
    self.find_review(title_id, review_id).await
  }

  pub async fn create_review(
    &self,
    actor: Option<&User>,
    title_id: i64,
    text: Text,
    score: Score,
  ) -> Result<Review, ReviewError> {
    let author = require_authenticated(actor)?;
    self.ensure_title(title_id).await?;

    if self
      .review_repo
      .exists_for_author(title_id, author.id)
      .await?
    {
      return Err(ValidationError::AlreadyReviewed.into());
    }

    let review = self
      .review_repo
      .create(NewReview {
        title_id,
        author_id: author.id,
        text,
        score,
      })
      .await?;

    tracing::info!(title_id, review_id = review.id, author = %author.username, "Review created");
    Ok(review)
  }

  pub async fn update_review(
    &self,
    actor: Option<&User>,
    title_id: i64,
    review_id: i64,
    changes: ReviewChanges,
  ) -> Result<Review, ReviewError> {
    require_authenticated(actor)?;
    self.ensure_title(title_id).await?;

    let mut review = self.find_review(title_id, review_id).await?;
    require_author_or_staff(actor, review.author_id)?;

    review.apply(changes);
    let review = self.review_repo.update(review).await?;

    tracing::info!(title_id, review_id, "Review updated");
    Ok(review)
  }

  pub async fn delete_review(
    &self,
    actor: Option<&User>,
    title_id: i64,
    review_id: i64,
  ) -> Result<(), ReviewError> {
    require_authenticated(actor)?;
    self.ensure_title(title_id).await?;

    let review = self.find_review(title_id, review_id).await?;
    require_author_or_staff(actor, review.author_id)?;

    self.review_repo.delete(review.id).await?;
    tracing::info!(title_id, review_id, "Review deleted");
    Ok(())
  }

  // ==========================================================================
  // Comments
  // ==========================================================================

  pub async fn list_comments(
    &self,
    title_id: i64,
    review_id: i64,
    page: PageRequest,
  ) -> Result<Page<Comment>, ReviewError> {
    let review = self.get_review(title_id, review_id).await?;
    self.comment_repo.list(review.id, page).await
  }

  pub async fn get_comment(
    &self,
    title_id: i64,
    review_id: i64,
    comment_id: i64,
  ) -> Result<Comment, ReviewError> {
    let review = self.get_review(title_id, review_id).await?;
    self.find_comment(review.id, comment_id).await
  }

  pub async fn create_comment(
    &self,
    actor: Option<&User>,
    title_id: i64,
    review_id: i64,
    text: Text,
  ) -> Result<Comment, ReviewError> {
    let author = require_authenticated(actor)?;
    let review = self.get_review(title_id, review_id).await?;

    let comment = self
      .comment_repo
      .create(NewComment {
        review_id: review.id,
        author_id: author.id,
        text,
      })
      .await?;

    tracing::info!(review_id, comment_id = comment.id, author = %author.username, "Comment created");
    Ok(comment)
  }

  pub async fn update_comment(
    &self,
    actor: Option<&User>,
    title_id: i64,
    review_id: i64,
    comment_id: i64,
    text: Option<Text>,
  ) -> Result<Comment, ReviewError> {
    require_authenticated(actor)?;
    let review = self.get_review(title_id, review_id).await?;

    let mut comment = self.find_comment(review.id, comment_id).await?;
    require_author_or_staff(actor, comment.author_id)?;

    // Nothing to change on an empty partial update
    let Some(text) = text else {
      return Ok(comment);
    };

    comment.text = text.into_inner();
    let comment = self.comment_repo.update(comment).await?;

    tracing::info!(review_id, comment_id, "Comment updated");
    Ok(comment)
  }

  pub async fn delete_comment(
    &self,
    actor: Option<&User>,
    title_id: i64,
    review_id: i64,
    comment_id: i64,
  ) -> Result<(), ReviewError> {
    require_authenticated(actor)?;
    let review = self.get_review(title_id, review_id).await?;

    let comment = self.find_comment(review.id, comment_id).await?;
    require_author_or_staff(actor, comment.author_id)?;

    self.comment_repo.delete(comment.id).await?;
    tracing::info!(review_id, comment_id, "Comment deleted");
    Ok(())
  }

  async fn ensure_title(&self, title_id: i64) -> Result<(), ReviewError> {
    if !self.title_repo.exists(title_id).await? {
      return Err(ReviewError::TitleNotFound);
    }
    Ok(())
  }

  async fn find_review(&self, title_id: i64, review_id: i64) -> Result<Review, ReviewError> {
    self
      .review_repo
      .find(title_id, review_id)
      .await?
      .ok_or(ReviewError::ReviewNotFound)
  }

  async fn find_comment(&self, review_id: i64, comment_id: i64) -> Result<Comment, ReviewError> {
    self
      .comment_repo
      .find(review_id, comment_id)
      .await?
      .ok_or(ReviewError::CommentNotFound)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::{AuthError, Email, UserRole, Username};
  use crate::domain::catalog::TitleDraft;
  use crate::test_support::InMemoryStore;

  struct Fixture {
    store: Arc<InMemoryStore>,
    service: ReviewService,
    title_id: i64,
    author: User,
  }

  fn user(name: &str, role: UserRole) -> User {
    User::new(
      Username::new(name).unwrap(),
      Email::new(format!("{name}@example.com")).unwrap(),
      role,
    )
  }

  async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::default());
    let author = user("critic", UserRole::User);
    store.add_user(&author);

    let title = TitleRepository::create(
      store.as_ref(),
      TitleDraft {
        name: "Stalker".to_string(),
        year: 1979,
        description: None,
        category_id: None,
        genre_ids: vec![],
      },
    )
    .await
    .unwrap();

    let service = ReviewService::new(store.clone(), store.clone(), store.clone());
    Fixture {
      store,
      service,
      title_id: title.id,
      author,
    }
  }

  fn text(value: &str) -> Text {
    Text::new(value).unwrap()
  }

  fn score(value: i32) -> Score {
    Score::new(value).unwrap()
  }

  #[tokio::test]
  async fn test_create_review_and_rating() {
    let f = fixture().await;
    let other = user("reader", UserRole::User);
    f.store.add_user(&other);

    let review = f
      .service
      .create_review(Some(&f.author), f.title_id, text("Slow"), score(7))
      .await
      .unwrap();
    assert_eq!(review.author_username, "critic");
    assert_eq!(review.score, 7);

    f.service
      .create_review(Some(&other), f.title_id, text("Sublime"), score(10))
      .await
      .unwrap();

    let title = TitleRepository::find_by_id(f.store.as_ref(), f.title_id)
      .await
      .unwrap()
      .unwrap();
    // (7 + 10) / 2 = 8.5 rounds away from zero
    assert_eq!(title.rating, Some(9));
  }

  #[tokio::test]
  async fn test_second_review_by_same_author_is_rejected() {
    let f = fixture().await;
    f.service
      .create_review(Some(&f.author), f.title_id, text("First"), score(5))
      .await
      .unwrap();

    let result = f
      .service
      .create_review(Some(&f.author), f.title_id, text("Second"), score(6))
      .await;

    assert!(matches!(
      result,
      Err(ReviewError::Validation(ValidationError::AlreadyReviewed))
    ));
  }

  #[tokio::test]
  async fn test_anonymous_cannot_review() {
    let f = fixture().await;

    let result = f
      .service
      .create_review(None, f.title_id, text("Anon"), score(5))
      .await;

    assert!(matches!(
      result,
      Err(ReviewError::Auth(AuthError::NotAuthenticated))
    ));
  }

  #[tokio::test]
  async fn test_unknown_title() {
    let f = fixture().await;

    let result = f.service.list_reviews(9999, PageRequest::first(10)).await;

    assert!(matches!(result, Err(ReviewError::TitleNotFound)));
  }

  #[tokio::test]
  async fn test_review_is_scoped_to_title() {
    let f = fixture().await;
    let review = f
      .service
      .create_review(Some(&f.author), f.title_id, text("Slow"), score(7))
      .await
      .unwrap();

    let other_title = TitleRepository::create(
      f.store.as_ref(),
      TitleDraft {
        name: "Solaris".to_string(),
        year: 1972,
        description: None,
        category_id: None,
        genre_ids: vec![],
      },
    )
    .await
    .unwrap();

    let result = f.service.get_review(other_title.id, review.id).await;
    assert!(matches!(result, Err(ReviewError::ReviewNotFound)));
  }

  #[tokio::test]
  async fn test_only_author_or_staff_may_edit() {
    let f = fixture().await;
    let stranger = user("stranger", UserRole::User);
    let moderator = user("moderator", UserRole::Moderator);
    let review = f
      .service
      .create_review(Some(&f.author), f.title_id, text("Slow"), score(7))
      .await
      .unwrap();

    let denied = f
      .service
      .update_review(
        Some(&stranger),
        f.title_id,
        review.id,
        ReviewChanges {
          score: Some(score(1)),
          ..Default::default()
        },
      )
      .await;
    assert!(matches!(
      denied,
      Err(ReviewError::Auth(AuthError::PermissionDenied))
    ));

    let updated = f
      .service
      .update_review(
        Some(&moderator),
        f.title_id,
        review.id,
        ReviewChanges {
          score: Some(score(2)),
          ..Default::default()
        },
      )
      .await
      .unwrap();
    assert_eq!(updated.score, 2);
    assert_eq!(updated.text, "Slow");

    f.service
      .delete_review(Some(&f.author), f.title_id, review.id)
      .await
      .unwrap();
    assert!(matches!(
      f.service.get_review(f.title_id, review.id).await,
      Err(ReviewError::ReviewNotFound)
    ));
  }

  #[tokio::test]
  async fn test_comment_lifecycle() {
    let f = fixture().await;
    let reader = user("reader", UserRole::User);
    f.store.add_user(&reader);
    let review = f
      .service
      .create_review(Some(&f.author), f.title_id, text("Slow"), score(7))
      .await
      .unwrap();

    let comment = f
      .service
      .create_comment(Some(&reader), f.title_id, review.id, text("Agreed"))
      .await
      .unwrap();
    assert_eq!(comment.author_username, "reader");

    let denied = f
      .service
      .update_comment(
        Some(&f.author),
        f.title_id,
        review.id,
        comment.id,
        Some(text("Edited")),
      )
      .await;
    assert!(matches!(
      denied,
      Err(ReviewError::Auth(AuthError::PermissionDenied))
    ));

    let edited = f
      .service
      .update_comment(
        Some(&reader),
        f.title_id,
        review.id,
        comment.id,
        Some(text("Edited")),
      )
      .await
      .unwrap();
    assert_eq!(edited.text, "Edited");

    let page = f
      .service
      .list_comments(f.title_id, review.id, PageRequest::first(10))
      .await
      .unwrap();
    assert_eq!(page.total, 1);

    f.service
      .delete_comment(Some(&reader), f.title_id, review.id, comment.id)
      .await
      .unwrap();
    assert!(matches!(
      f.service.get_comment(f.title_id, review.id, comment.id).await,
      Err(ReviewError::CommentNotFound)
    ));
  }

  #[tokio::test]
  async fn test_comment_update_without_text_keeps_comment() {
    let f = fixture().await;
    let review = f
      .service
      .create_review(Some(&f.author), f.title_id, text("Slow"), score(7))
      .await
      .unwrap();
    let comment = f
      .service
      .create_comment(Some(&f.author), f.title_id, review.id, text("Agreed"))
      .await
      .unwrap();

    let unchanged = f
      .service
      .update_comment(Some(&f.author), f.title_id, review.id, comment.id, None)
      .await
      .unwrap();

    assert_eq!(unchanged, comment);
  }

  #[tokio::test]
  async fn test_deleting_review_removes_comments() {
    let f = fixture().await;
    let review = f
      .service
      .create_review(Some(&f.author), f.title_id, text("Slow"), score(7))
      .await
      .unwrap();
    f.service
      .create_comment(Some(&f.author), f.title_id, review.id, text("Self reply"))
      .await
      .unwrap();

    f.service
      .delete_review(Some(&f.author), f.title_id, review.id)
      .await
      .unwrap();

    assert_eq!(f.store.comment_count(), 0);
  }
}
