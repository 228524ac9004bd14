use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{User, UserRole},
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::Email,
};
use crate::domain::pagination::{Page, PageRequest};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  username: String,
  email: String,
  role: String,
  bio: String,
  first_name: String,
  last_name: String,
  confirmation_code: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = AuthError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let role = UserRole::parse(&row.role).map_err(|_| {
      AuthError::Repository(RepositoryError::DatabaseError(format!(
        "Unknown role '{}' for user {}",
        row.role, row.id
      )))
    })?;

    Ok(User {
      id: row.id,
      username: row.username,
      email: row.email,
      role,
      bio: row.bio,
      first_name: row.first_name,
      last_name: row.last_name,
      confirmation_code: row.confirmation_code,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

const USER_COLUMNS: &str =
  "id, username, email, role, bio, first_name, last_name, confirmation_code, created_at, updated_at";

impl PostgresUserRepository {
  async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, AuthError> {
    let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
    sqlx::query_as::<_, UserRow>(&sql)
      .bind(value)
      .fetch_optional(&self.pool)
      .await?
      .map(User::try_from)
      .transpose()
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let sql = format!(
      r#"
            INSERT INTO users (
                id, username, email, role, bio, first_name, last_name,
                confirmation_code, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
      USER_COLUMNS
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
      .bind(user.id)
      .bind(&user.username)
      .bind(&user.email)
      .bind(user.role.as_str())
      .bind(&user.bio)
      .bind(&user.first_name)
      .bind(&user.last_name)
      .bind(&user.confirmation_code)
      .bind(user.created_at)
      .bind(user.updated_at)
      .fetch_one(&self.pool)
      .await?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    sqlx::query_as::<_, UserRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?
      .map(User::try_from)
      .transpose()
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    self.find_one("email", email.as_str()).await
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
    self.find_one("username", username).await
  }

  async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<User>, AuthError> {
    let pattern = search.map(|s| format!("%{}%", escape_like(s)));

    let total: i64 = sqlx::query_scalar(
      "SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR username ILIKE $1)",
    )
    .bind(&pattern)
    .fetch_one(&self.pool)
    .await?;

    let sql = format!(
      r#"
            SELECT {}
            FROM users
            WHERE ($1::TEXT IS NULL OR username ILIKE $1)
            ORDER BY username
            LIMIT $2 OFFSET $3
            "#,
      USER_COLUMNS
    );
    let rows = sqlx::query_as::<_, UserRow>(&sql)
      .bind(&pattern)
      .bind(page.limit())
      .bind(page.offset())
      .fetch_all(&self.pool)
      .await?;

    let items = rows
      .into_iter()
      .map(User::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(items, total, page))
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let sql = format!(
      r#"
            UPDATE users
            SET username = $2,
                email = $3,
                role = $4,
                bio = $5,
                first_name = $6,
                last_name = $7,
                confirmation_code = $8,
                updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
      USER_COLUMNS
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
      .bind(user.id)
      .bind(&user.username)
      .bind(&user.email)
      .bind(user.role.as_str())
      .bind(&user.bio)
      .bind(&user.first_name)
      .bind(&user.last_name)
      .bind(&user.confirmation_code)
      .bind(user.updated_at)
      .fetch_one(&self.pool)
      .await?;

    row.try_into()
  }

  /// Reviews and comments go with the account through `ON DELETE CASCADE`
  async fn delete(&self, id: Uuid) -> Result<(), AuthError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }
    Ok(())
  }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside LIKE
pub(crate) fn escape_like(value: &str) -> String {
  let mut escaped = String::with_capacity(value.len());
  for c in value.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::Username;
  use crate::infrastructure::persistence::postgres::test_db::setup_test_db;

  fn user(username: &str) -> User {
    User::new(
      Username::new(username).unwrap(),
      Email::new(format!("{}@example.com", username)).unwrap(),
      UserRole::User,
    )
  }

  #[test]
  fn test_escape_like() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    assert_eq!(escape_like("plain"), "plain");
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_create_and_find_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let created = repo.create(user("critic")).await.unwrap();

    let by_email = repo
      .find_by_email(&Email::new("critic@example.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_email.role, UserRole::User);

    let by_username = repo.find_by_username("critic").await.unwrap();
    assert!(by_username.is_some());
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_duplicate_username_reports_constraint() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(user("critic")).await.unwrap();
    let mut clash = user("critic");
    clash.email = "other@example.com".to_string();

    match repo.create(clash).await {
      Err(AuthError::Repository(RepositoryError::DuplicateKey(constraint))) => {
        assert_eq!(constraint, "users_username_key");
      }
      other => panic!("Expected DuplicateKey, got {:?}", other),
    }
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_list_searches_username() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);
    for name in ["alice", "bob", "alicia"] {
      repo.create(user(name)).await.unwrap();
    }

    let page = repo
      .list(Some("ALI"), PageRequest::new(1, 10))
      .await
      .unwrap();

    assert_eq!(page.total, 2);
    let names: Vec<_> = page.items.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "alicia"]);
  }
}
