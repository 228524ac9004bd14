use async_trait::async_trait;
use sqlx::PgPool;

use super::user_repository::escape_like;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::catalog::{
  CatalogError, Category, CategoryRepository, Name, Slug, ValidationError,
};
use crate::domain::pagination::{Page, PageRequest};

pub struct PostgresCategoryRepository {
  pool: PgPool,
}

impl PostgresCategoryRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
  id: i64,
  name: String,
  slug: String,
}

impl From<CategoryRow> for Category {
  fn from(row: CategoryRow) -> Self {
    Category {
      id: row.id,
      name: row.name,
      slug: row.slug,
    }
  }
}

/// A unique violation on insert means another request took the slug first
pub(crate) fn slug_conflict(error: sqlx::Error) -> CatalogError {
  match CatalogError::from(error) {
    CatalogError::Repository(RepositoryError::DuplicateKey(_)) => ValidationError::SlugTaken.into(),
    other => other,
  }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
  async fn create(&self, name: Name, slug: Slug) -> Result<Category, CatalogError> {
    let row = sqlx::query_as::<_, CategoryRow>(
      "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
    )
    .bind(name.as_str())
    .bind(slug.as_str())
    .fetch_one(&self.pool)
    .await
    .map_err(slug_conflict)?;

    Ok(row.into())
  }

  async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError> {
    let row = sqlx::query_as::<_, CategoryRow>(
      "SELECT id, name, slug FROM categories WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Category::from))
  }

  async fn list(
    &self,
    search: Option<&str>,
    page: PageRequest,
  ) -> Result<Page<Category>, CatalogError> {
    let pattern = search.map(|s| format!("%{}%", escape_like(s)));

    let total: i64 = sqlx::query_scalar(
      "SELECT COUNT(*) FROM categories WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
    )
    .bind(&pattern)
    .fetch_one(&self.pool)
    .await?;

    let rows = sqlx::query_as::<_, CategoryRow>(
      r#"
            SELECT id, name, slug
            FROM categories
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
      rows.into_iter().map(Category::from).collect(),
      total,
      page,
    ))
  }

  /// `titles.category_id` is `ON DELETE SET NULL`
  async fn delete(&self, id: i64) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(CatalogError::CategoryNotFound);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_db::setup_test_db;

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_duplicate_slug_is_validation_error() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCategoryRepository::new(pool);

    repo
      .create(Name::new("Films").unwrap(), Slug::new("films").unwrap())
      .await
      .unwrap();
    let result = repo
      .create(Name::new("Movies").unwrap(), Slug::new("films").unwrap())
      .await;

    assert!(matches!(
      result,
      Err(CatalogError::Validation(ValidationError::SlugTaken))
    ));
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_list_orders_by_name_and_searches() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresCategoryRepository::new(pool);
    for (name, slug) in [("Music", "music"), ("Books", "books"), ("Films", "films")] {
      repo
        .create(Name::new(name).unwrap(), Slug::new(slug).unwrap())
        .await
        .unwrap();
    }

    let all = repo.list(None, PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(all.total, 3);
    let names: Vec<_> = all.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Books", "Films"]);

    let found = repo.list(Some("us"), PageRequest::new(1, 10)).await.unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].slug, "music");
  }
}
