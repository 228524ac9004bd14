use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;

use super::user_repository::escape_like;
use crate::domain::catalog::{
  CatalogError, Category, Genre, Title, TitleDraft, TitleFilter, TitleRepository,
};
use crate::domain::pagination::{Page, PageRequest};

pub struct PostgresTitleRepository {
  pool: PgPool,
}

impl PostgresTitleRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Title joined with its category and the rounded average score
#[derive(Debug, sqlx::FromRow)]
struct TitleRow {
  id: i64,
  name: String,
  year: i32,
  description: Option<String>,
  category_id: Option<i64>,
  category_name: Option<String>,
  category_slug: Option<String>,
  rating: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
struct TitleGenreRow {
  title_id: i64,
  id: i64,
  name: String,
  slug: String,
}

const TITLE_SELECT: &str = r#"
    SELECT
        t.id,
        t.name,
        t.year,
        t.description,
        c.id AS category_id,
        c.name AS category_name,
        c.slug AS category_slug,
        (SELECT ROUND(AVG(r.score))::INT FROM reviews r WHERE r.title_id = t.id) AS rating
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &TitleFilter) {
  query.push(" WHERE TRUE");

  if let Some(genre) = &filter.genre {
    query
      .push(
        " AND EXISTS (SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
         WHERE tg.title_id = t.id AND g.slug = ",
      )
      .push_bind(genre.clone())
      .push(")");
  }
  if let Some(category) = &filter.category {
    query.push(" AND c.slug = ").push_bind(category.clone());
  }
  if let Some(year) = filter.year {
    query.push(" AND t.year = ").push_bind(year);
  }
  if let Some(name) = &filter.name {
    query
      .push(" AND t.name ILIKE ")
      .push_bind(format!("%{}%", escape_like(name)));
  }
}

impl PostgresTitleRepository {
  /// Genres per title, in the order they were attached
  async fn load_genres(&self, title_ids: &[i64]) -> Result<HashMap<i64, Vec<Genre>>, CatalogError> {
    let mut genres: HashMap<i64, Vec<Genre>> = HashMap::new();
    if title_ids.is_empty() {
      return Ok(genres);
    }

    let rows = sqlx::query_as::<_, TitleGenreRow>(
      r#"
            SELECT tg.title_id, g.id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY tg.id
            "#,
    )
    .bind(title_ids)
    .fetch_all(&self.pool)
    .await?;

    for row in rows {
      genres.entry(row.title_id).or_default().push(Genre {
        id: row.id,
        name: row.name,
        slug: row.slug,
      });
    }
    Ok(genres)
  }

  async fn assemble(&self, rows: Vec<TitleRow>) -> Result<Vec<Title>, CatalogError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut genres = self.load_genres(&ids).await?;

    Ok(
      rows
        .into_iter()
        .map(|row| {
          let category = match (row.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
            _ => None,
          };
          Title {
            genres: genres.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            year: row.year,
            description: row.description,
            category,
            rating: row.rating,
          }
        })
        .collect(),
    )
  }

  async fn attach_genres(
    tx: &mut Transaction<'_, Postgres>,
    title_id: i64,
    genre_ids: &[i64],
  ) -> Result<(), CatalogError> {
    for genre_id in genre_ids {
      sqlx::query(
        r#"
            INSERT INTO title_genres (title_id, genre_id)
            VALUES ($1, $2)
            ON CONFLICT (title_id, genre_id) DO NOTHING
            "#,
      )
      .bind(title_id)
      .bind(genre_id)
      .execute(&mut **tx)
      .await?;
    }
    Ok(())
  }

  async fn reload(&self, id: i64) -> Result<Title, CatalogError> {
    self.find_by_id(id).await?.ok_or(CatalogError::TitleNotFound)
  }
}

#[async_trait]
impl TitleRepository for PostgresTitleRepository {
  async fn create(&self, draft: TitleDraft) -> Result<Title, CatalogError> {
    let mut tx = self.pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
      r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
    )
    .bind(&draft.name)
    .bind(draft.year)
    .bind(&draft.description)
    .bind(draft.category_id)
    .fetch_one(&mut *tx)
    .await?;

    Self::attach_genres(&mut tx, id, &draft.genre_ids).await?;
    tx.commit().await?;

    self.reload(id).await
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<Title>, CatalogError> {
    let sql = format!("{} WHERE t.id = $1", TITLE_SELECT);
    let Some(row) = sqlx::query_as::<_, TitleRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?
    else {
      return Ok(None);
    };

    Ok(self.assemble(vec![row]).await?.pop())
  }

  async fn exists(&self, id: i64) -> Result<bool, CatalogError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
      .bind(id)
      .fetch_one(&self.pool)
      .await?;
    Ok(exists)
  }

  async fn list(&self, filter: &TitleFilter, page: PageRequest) -> Result<Page<Title>, CatalogError> {
    let mut count =
      QueryBuilder::new("SELECT COUNT(*) FROM titles t LEFT JOIN categories c ON c.id = t.category_id");
    push_filter(&mut count, filter);
    let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

    let mut select = QueryBuilder::new(TITLE_SELECT);
    push_filter(&mut select, filter);
    select
      .push(" ORDER BY t.id LIMIT ")
      .push_bind(page.limit())
      .push(" OFFSET ")
      .push_bind(page.offset());
    let rows = select
      .build_query_as::<TitleRow>()
      .fetch_all(&self.pool)
      .await?;

    Ok(Page::new(self.assemble(rows).await?, total, page))
  }

  async fn update(&self, id: i64, draft: TitleDraft) -> Result<Title, CatalogError> {
    let mut tx = self.pool.begin().await?;

    let result = sqlx::query(
      r#"
            UPDATE titles
            SET name = $2, year = $3, description = $4, category_id = $5
            WHERE id = $1
            "#,
    )
    .bind(id)
    .bind(&draft.name)
    .bind(draft.year)
    .bind(&draft.description)
    .bind(draft.category_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
      return Err(CatalogError::TitleNotFound);
    }

    sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await?;
    Self::attach_genres(&mut tx, id, &draft.genre_ids).await?;
    tx.commit().await?;

    self.reload(id).await
  }

  /// Reviews, their comments and genre links cascade
  async fn delete(&self, id: i64) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM titles WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(CatalogError::TitleNotFound);
    }
    Ok(())
  }
}
