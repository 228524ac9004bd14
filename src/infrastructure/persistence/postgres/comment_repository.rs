use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::review::{Comment, CommentRepository, NewComment, ReviewError};

pub struct PostgresCommentRepository {
  pool: PgPool,
}

impl PostgresCommentRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
  id: i64,
  review_id: i64,
  author_id: Uuid,
  author_username: String,
  text: String,
  pub_date: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
  fn from(row: CommentRow) -> Self {
    Comment {
      id: row.id,
      review_id: row.review_id,
      author_id: row.author_id,
      author_username: row.author_username,
      text: row.text,
      pub_date: row.pub_date,
    }
  }
}

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.review_id, c.author_id, u.username AS author_username, c.text, c.pub_date
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
  async fn create(&self, comment: NewComment) -> Result<Comment, ReviewError> {
    let row = sqlx::query_as::<_, CommentRow>(
      r#"
            WITH inserted AS (
                INSERT INTO comments (review_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, review_id, author_id, text, pub_date
            )
            SELECT i.id, i.review_id, i.author_id, u.username AS author_username,
                   i.text, i.pub_date
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
    )
    .bind(comment.review_id)
    .bind(comment.author_id)
    .bind(comment.text.as_str())
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, ReviewError> {
    let sql = format!("{} WHERE c.review_id = $1 AND c.id = $2", COMMENT_SELECT);
    let row = sqlx::query_as::<_, CommentRow>(&sql)
      .bind(review_id)
      .bind(comment_id)
      .fetch_optional(&self.pool)
      .await?;

    Ok(row.map(Comment::from))
  }

  async fn list(&self, review_id: i64, page: PageRequest) -> Result<Page<Comment>, ReviewError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
      .bind(review_id)
      .fetch_one(&self.pool)
      .await?;

    let sql = format!(
      "{} WHERE c.review_id = $1 ORDER BY c.id LIMIT $2 OFFSET $3",
      COMMENT_SELECT
    );
    let rows = sqlx::query_as::<_, CommentRow>(&sql)
      .bind(review_id)
      .bind(page.limit())
      .bind(page.offset())
      .fetch_all(&self.pool)
      .await?;

    Ok(Page::new(
      rows.into_iter().map(Comment::from).collect(),
      total,
      page,
    ))
  }

  async fn update(&self, comment: Comment) -> Result<Comment, ReviewError> {
    let result = sqlx::query("UPDATE comments SET text = $2 WHERE id = $1")
      .bind(comment.id)
      .bind(&comment.text)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(ReviewError::CommentNotFound);
    }

    self
      .find(comment.review_id, comment.id)
      .await?
      .ok_or(ReviewError::CommentNotFound)
  }

  async fn delete(&self, id: i64) -> Result<(), ReviewError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(ReviewError::CommentNotFound);
    }
    Ok(())
  }
}
