use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::review::{NewReview, Review, ReviewError, ReviewRepository, ValidationError};

pub struct PostgresReviewRepository {
  pool: PgPool,
}

impl PostgresReviewRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
  id: i64,
  title_id: i64,
  author_id: Uuid,
  author_username: String,
  text: String,
  score: i32,
  pub_date: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
  fn from(row: ReviewRow) -> Self {
    Review {
      id: row.id,
      title_id: row.title_id,
      author_id: row.author_id,
      author_username: row.author_username,
      text: row.text,
      score: row.score,
      pub_date: row.pub_date,
    }
  }
}

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.title_id, r.author_id, u.username AS author_username, r.text, r.score, r.pub_date
    FROM reviews r
    JOIN users u ON u.id = r.author_id
"#;

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
  async fn create(&self, review: NewReview) -> Result<Review, ReviewError> {
    let row = sqlx::query_as::<_, ReviewRow>(
      r#"
            WITH inserted AS (
                INSERT INTO reviews (title_id, author_id, text, score)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title_id, author_id, text, score, pub_date
            )
            SELECT i.id, i.title_id, i.author_id, u.username AS author_username,
                   i.text, i.score, i.pub_date
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
    )
    .bind(review.title_id)
    .bind(review.author_id)
    .bind(review.text.as_str())
    .bind(review.score.value())
    .fetch_one(&self.pool)
    .await
    .map_err(|e| match ReviewError::from(e) {
      // reviews_title_author_key, lost race against a concurrent review
      ReviewError::Repository(RepositoryError::DuplicateKey(_)) => {
        ReviewError::Validation(ValidationError::AlreadyReviewed)
      }
      other => other,
    })?;

    Ok(row.into())
  }

  async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, ReviewError> {
    let sql = format!("{} WHERE r.title_id = $1 AND r.id = $2", REVIEW_SELECT);
    let row = sqlx::query_as::<_, ReviewRow>(&sql)
      .bind(title_id)
      .bind(review_id)
      .fetch_optional(&self.pool)
      .await?;

    Ok(row.map(Review::from))
  }

  async fn list(&self, title_id: i64, page: PageRequest) -> Result<Page<Review>, ReviewError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
      .bind(title_id)
      .fetch_one(&self.pool)
      .await?;

    let sql = format!(
      "{} WHERE r.title_id = $1 ORDER BY r.id LIMIT $2 OFFSET $3",
      REVIEW_SELECT
    );
    let rows = sqlx::query_as::<_, ReviewRow>(&sql)
      .bind(title_id)
      .bind(page.limit())
      .bind(page.offset())
      .fetch_all(&self.pool)
      .await?;

    Ok(Page::new(
      rows.into_iter().map(Review::from).collect(),
      total,
      page,
    ))
  }

  async fn exists_for_author(&self, title_id: i64, author_id: Uuid) -> Result<bool, ReviewError> {
    let exists: bool = sqlx::query_scalar(
      "SELECT EXISTS (SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
    )
    .bind(title_id)
    .bind(author_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(exists)
  }

  async fn update(&self, review: Review) -> Result<Review, ReviewError> {
    let result = sqlx::query("UPDATE reviews SET text = $2, score = $3 WHERE id = $1")
      .bind(review.id)
      .bind(&review.text)
      .bind(review.score)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(ReviewError::ReviewNotFound);
    }

    self
      .find(review.title_id, review.id)
      .await?
      .ok_or(ReviewError::ReviewNotFound)
  }

  /// Comments cascade
  async fn delete(&self, id: i64) -> Result<(), ReviewError> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(ReviewError::ReviewNotFound);
    }
    Ok(())
  }
}
