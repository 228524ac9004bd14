use async_trait::async_trait;
use sqlx::PgPool;

use super::category_repository::slug_conflict;
use super::user_repository::escape_like;
use crate::domain::catalog::{CatalogError, Genre, GenreRepository, Name, Slug};
use crate::domain::pagination::{Page, PageRequest};

pub struct PostgresGenreRepository {
  pool: PgPool,
}

impl PostgresGenreRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct GenreRow {
  id: i64,
  name: String,
  slug: String,
}

impl From<GenreRow> for Genre {
  fn from(row: GenreRow) -> Self {
    Genre {
      id: row.id,
      name: row.name,
      slug: row.slug,
    }
  }
}

#[async_trait]
impl GenreRepository for PostgresGenreRepository {
  async fn create(&self, name: Name, slug: Slug) -> Result<Genre, CatalogError> {
    let row = sqlx::query_as::<_, GenreRow>(
      "INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
    )
    .bind(name.as_str())
    .bind(slug.as_str())
    .fetch_one(&self.pool)
    .await
    .map_err(slug_conflict)?;

    Ok(row.into())
  }

  async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, CatalogError> {
    let row = sqlx::query_as::<_, GenreRow>(
      "SELECT id, name, slug FROM genres WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Genre::from))
  }

  async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Genre>, CatalogError> {
    if slugs.is_empty() {
      return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, GenreRow>(
      "SELECT id, name, slug FROM genres WHERE slug = ANY($1)",
    )
    .bind(slugs)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Genre::from).collect())
  }

  async fn list(
    &self,
    search: Option<&str>,
    page: PageRequest,
  ) -> Result<Page<Genre>, CatalogError> {
    let pattern = search.map(|s| format!("%{}%", escape_like(s)));

    let total: i64 = sqlx::query_scalar(
      "SELECT COUNT(*) FROM genres WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
    )
    .bind(&pattern)
    .fetch_one(&self.pool)
    .await?;

    let rows = sqlx::query_as::<_, GenreRow>(
      r#"
            SELECT id, name, slug
            FROM genres
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
    )
    .bind(&pattern)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&self.pool)
    .await?;

    Ok(Page::new(
      rows.into_iter().map(Genre::from).collect(),
      total,
      page,
    ))
  }

  /// `title_genres` rows cascade, the titles stay
  async fn delete(&self, id: i64) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM genres WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(CatalogError::GenreNotFound);
    }
    Ok(())
  }
}
