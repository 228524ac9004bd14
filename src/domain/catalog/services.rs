use std::sync::Arc;

use crate::domain::auth::{entities::User, permissions::require_admin};
use crate::domain::pagination::{Page, PageRequest};

use super::{
  entities::{Category, Genre, NewTitle, Title, TitleChanges, TitleDraft, TitleFilter},
  errors::{CatalogError, ValidationError},
  ports::{CategoryRepository, GenreRepository, TitleRepository},
  value_objects::{Name, Slug},
};

/// Categories, genres and titles. Reads are public, writes need an admin.
pub struct CatalogService {
  category_repo: Arc<dyn CategoryRepository>,
  genre_repo: Arc<dyn GenreRepository>,
  title_repo: Arc<dyn TitleRepository>,
}

impl CatalogService {
  pub fn new(
    category_repo: Arc<dyn CategoryRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    title_repo: Arc<dyn TitleRepository>,
  ) -> Self {
    Self {
      category_repo,
      genre_repo,
      title_repo,
    }
  }

  // ==========================================================================
  // Categories
  // ==========================================================================

  pub async fn list_categories(
    &self,
    search: Option<&str>,
    page: PageRequest,
  ) -> Result<Page<Category>, CatalogError> {
    self.category_repo.list(search, page).await
  }

  pub async fn create_category(
    &self,
    actor: Option<&User>,
    name: Name,
    slug: Slug,
  ) -> Result<Category, CatalogError> {
    require_admin(actor)?;

    if self
      .category_repo
      .find_by_slug(slug.as_str())
      .await?
      .is_some()
    {
      return Err(ValidationError::SlugTaken.into());
    }

    let category = self.category_repo.create(name, slug).await?;
    tracing::info!(slug = %category.slug, "Category created");
    Ok(category)
  }

  pub async fn delete_category(&self, actor: Option<&User>, slug: &str) -> Result<(), CatalogError> {
    require_admin(actor)?;

    let category = self
      .category_repo
      .find_by_slug(slug)
      .await?
      .ok_or(CatalogError::CategoryNotFound)?;

    self.category_repo.delete(category.id).await?;
    tracing::info!(slug = %category.slug, "Category deleted");
    Ok(())
  }

  // ==========================================================================
  // Genres
  // ==========================================================================

  pub async fn list_genres(
    &self,
    search: Option<&str>,
    page: PageRequest,
  ) -> Result<Page<Genre>, CatalogError> {
    self.genre_repo.list(search, page).await
  }

  pub async fn create_genre(
    &self,
    actor: Option<&User>,
    name: Name,
    slug: Slug,
  ) -> Result<Genre, CatalogError> {
    require_admin(actor)?;

    if self.genre_repo.find_by_slug(slug.as_str()).await?.is_some() {
      return Err(ValidationError::SlugTaken.into());
    }

    let genre = self.genre_repo.create(name, slug).await?;
    tracing::info!(slug = %genre.slug, "Genre created");
    Ok(genre)
  }

  pub async fn delete_genre(&self, actor: Option<&User>, slug: &str) -> Result<(), CatalogError> {
    require_admin(actor)?;

    let genre = self
      .genre_repo
      .find_by_slug(slug)
      .await?
      .ok_or(CatalogError::GenreNotFound)?;

    self.genre_repo.delete(genre.id).await?;
    tracing::info!(slug = %genre.slug, "Genre deleted");
    Ok(())
  }

  // ==========================================================================
  // Titles
  // ==========================================================================

  pub async fn list_titles(
    &self,
    filter: &TitleFilter,
    page: PageRequest,
  ) -> Result<Page<Title>, CatalogError> {
    self.title_repo.list(filter, page).await
  }

  pub async fn get_title(&self, id: i64) -> Result<Title, CatalogError> {
    self
      .title_repo
      .find_by_id(id)
      .await?
      .ok_or(CatalogError::TitleNotFound)
  }

  pub async fn create_title(
    &self,
    actor: Option<&User>,
    title: NewTitle,
  ) -> Result<Title, CatalogError> {
    require_admin(actor)?;

    let category = self.resolve_category(&title.category).await?;
    let genre_ids = self.resolve_genres(&title.genres).await?;

    let created = self
      .title_repo
      .create(TitleDraft {
        name: title.name.into_inner(),
        year: title.year.value(),
        description: title.description,
        category_id: Some(category.id),
        genre_ids,
      })
      .await?;

    tracing::info!(title_id = created.id, "Title created");
    Ok(created)
  }

  pub async fn update_title(
    &self,
    actor: Option<&User>,
    id: i64,
    changes: TitleChanges,
  ) -> Result<Title, CatalogError> {
    require_admin(actor)?;

    let current = self.get_title(id).await?;

    let category_id = match &changes.category {
      Some(slug) => Some(self.resolve_category(slug).await?.id),
      None => current.category.as_ref().map(|c| c.id),
    };
    let genre_ids = match &changes.genres {
      Some(slugs) => self.resolve_genres(slugs).await?,
      None => current.genres.iter().map(|g| g.id).collect(),
    };

    let draft = TitleDraft {
      name: changes
        .name
        .map(Name::into_inner)
        .unwrap_or(current.name),
      year: changes.year.map(|y| y.value()).unwrap_or(current.year),
      description: changes.description.unwrap_or(current.description),
      category_id,
      genre_ids,
    };

    let updated = self.title_repo.update(id, draft).await?;
    tracing::info!(title_id = id, "Title updated");
    Ok(updated)
  }

  pub async fn delete_title(&self, actor: Option<&User>, id: i64) -> Result<(), CatalogError> {
    require_admin(actor)?;

    if !self.title_repo.exists(id).await? {
      return Err(CatalogError::TitleNotFound);
    }

    self.title_repo.delete(id).await?;
    tracing::info!(title_id = id, "Title deleted");
    Ok(())
  }

  async fn resolve_category(&self, slug: &Slug) -> Result<Category, CatalogError> {
    self
      .category_repo
      .find_by_slug(slug.as_str())
      .await?
      .ok_or_else(|| {
        CatalogError::from(ValidationError::UnknownSlug {
          field: "category",
          slug: slug.to_string(),
        })
      })
  }

  /// Resolves genre slugs to ids, keeping request order and dropping repeats
  async fn resolve_genres(&self, slugs: &[Slug]) -> Result<Vec<i64>, CatalogError> {
    let mut wanted: Vec<String> = Vec::with_capacity(slugs.len());
    for slug in slugs {
      if !wanted.iter().any(|s| s == slug.as_str()) {
        wanted.push(slug.as_str().to_string());
      }
    }

    let found = self.genre_repo.find_by_slugs(&wanted).await?;

    wanted
      .iter()
      .map(|slug| {
        found
          .iter()
          .find(|g| &g.slug == slug)
          .map(|g| g.id)
          .ok_or_else(|| {
            CatalogError::from(ValidationError::UnknownSlug {
              field: "genre",
              slug: slug.clone(),
            })
          })
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::{AuthError, Email, UserRole, Username};
  use crate::domain::catalog::value_objects::Year;
  use crate::test_support::InMemoryStore;

  fn service(store: &Arc<InMemoryStore>) -> CatalogService {
    CatalogService::new(store.clone(), store.clone(), store.clone())
  }

  fn user(role: UserRole) -> User {
    User::new(
      Username::new("someone").unwrap(),
      Email::new("someone@example.com").unwrap(),
      role,
    )
  }

  fn name(value: &str) -> Name {
    Name::new(value).unwrap()
  }

  fn slug(value: &str) -> Slug {
    Slug::new(value).unwrap()
  }

  async fn seeded() -> (Arc<InMemoryStore>, CatalogService, User) {
    let store = Arc::new(InMemoryStore::default());
    let service = service(&store);
    let admin = user(UserRole::Admin);

    service
      .create_category(Some(&admin), name("Movie"), slug("movie"))
      .await
      .unwrap();
    service
      .create_category(Some(&admin), name("Book"), slug("book"))
      .await
      .unwrap();
    service
      .create_genre(Some(&admin), name("Drama"), slug("drama"))
      .await
      .unwrap();
    service
      .create_genre(Some(&admin), name("Crime"), slug("crime"))
      .await
      .unwrap();

    (store, service, admin)
  }

  fn new_title(title: &str, genres: &[&str]) -> NewTitle {
    NewTitle {
      name: name(title),
      year: Year::new(1972).unwrap(),
      description: None,
      category: slug("movie"),
      genres: genres.iter().map(|g| slug(g)).collect(),
    }
  }

  #[tokio::test]
  async fn test_catalog_writes_require_admin() {
    let (_, service, _) = seeded().await;

    let anonymous = service
      .create_category(None, name("Music"), slug("music"))
      .await;
    assert!(matches!(
      anonymous,
      Err(CatalogError::Auth(AuthError::NotAuthenticated))
    ));

    let moderator = user(UserRole::Moderator);
    let denied = service
      .create_genre(Some(&moderator), name("Jazz"), slug("jazz"))
      .await;
    assert!(matches!(
      denied,
      Err(CatalogError::Auth(AuthError::PermissionDenied))
    ));
  }

  #[tokio::test]
  async fn test_duplicate_slug_is_rejected() {
    let (_, service, admin) = seeded().await;

    let result = service
      .create_category(Some(&admin), name("Films"), slug("movie"))
      .await;

    assert!(matches!(
      result,
      Err(CatalogError::Validation(ValidationError::SlugTaken))
    ));
  }

  #[tokio::test]
  async fn test_list_categories_with_search() {
    let (_, service, _) = seeded().await;

    let page = service
      .list_categories(Some("MOV"), PageRequest::first(10))
      .await
      .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].slug, "movie");
  }

  #[tokio::test]
  async fn test_delete_unknown_genre() {
    let (_, service, admin) = seeded().await;

    let result = service.delete_genre(Some(&admin), "western").await;

    assert!(matches!(result, Err(CatalogError::GenreNotFound)));
  }

  #[tokio::test]
  async fn test_create_title_resolves_relations() {
    let (_, service, admin) = seeded().await;

    let title = service
      .create_title(Some(&admin), new_title("The Godfather", &["drama", "crime", "drama"]))
      .await
      .unwrap();

    assert_eq!(title.category.as_ref().unwrap().slug, "movie");
    let genres: Vec<_> = title.genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(genres, vec!["drama", "crime"]);
    assert_eq!(title.rating, None);
  }

  #[tokio::test]
  async fn test_create_title_with_unknown_genre() {
    let (_, service, admin) = seeded().await;

    let result = service
      .create_title(Some(&admin), new_title("Solaris", &["space-opera"]))
      .await;

    assert!(matches!(
      result,
      Err(CatalogError::Validation(ValidationError::UnknownSlug {
        field: "genre",
        ..
      }))
    ));
  }

  #[tokio::test]
  async fn test_partial_title_update_keeps_other_fields() {
    let (_, service, admin) = seeded().await;
    let title = service
      .create_title(Some(&admin), new_title("The Godfather", &["drama"]))
      .await
      .unwrap();

    let updated = service
      .update_title(
        Some(&admin),
        title.id,
        TitleChanges {
          category: Some(slug("book")),
          description: Some(Some("Novel".to_string())),
          ..Default::default()
        },
      )
      .await
      .unwrap();

    assert_eq!(updated.name, "The Godfather");
    assert_eq!(updated.year, 1972);
    assert_eq!(updated.description.as_deref(), Some("Novel"));
    assert_eq!(updated.category.unwrap().slug, "book");
    assert_eq!(updated.genres.len(), 1);
  }

  #[tokio::test]
  async fn test_deleting_category_detaches_titles() {
    let (_, service, admin) = seeded().await;
    let title = service
      .create_title(Some(&admin), new_title("The Godfather", &["drama"]))
      .await
      .unwrap();

    service.delete_category(Some(&admin), "movie").await.unwrap();
    service.delete_genre(Some(&admin), "drama").await.unwrap();

    let title = service.get_title(title.id).await.unwrap();
    assert!(title.category.is_none());
    assert!(title.genres.is_empty());
  }

  #[tokio::test]
  async fn test_deleting_genre_detaches_titles() {
    let (_, service, admin) = seeded().await;
    let title = service
      .create_title(Some(&admin), new_title("The Godfather", &["drama", "crime"]))
      .await
      .unwrap();

    service.delete_genre(Some(&admin), "drama").await.unwrap();

    let title = service.get_title(title.id).await.unwrap();
    let slugs: Vec<_> = title.genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, vec!["crime"]);
    assert!(title.category.is_some());

    let filter = TitleFilter {
      genre: Some("drama".to_string()),
      ..Default::default()
    };
    let page = service
      .list_titles(&filter, PageRequest::first(10))
      .await
      .unwrap();
    assert_eq!(page.total, 0);
  }

  #[tokio::test]
  async fn test_filter_titles() {
    let (_, service, admin) = seeded().await;
    service
      .create_title(Some(&admin), new_title("The Godfather", &["drama", "crime"]))
      .await
      .unwrap();
    service
      .create_title(Some(&admin), new_title("Amadeus", &["drama"]))
      .await
      .unwrap();

    let filter = TitleFilter {
      genre: Some("crime".to_string()),
      ..Default::default()
    };
    let page = service
      .list_titles(&filter, PageRequest::first(10))
      .await
      .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "The Godfather");
  }

  #[tokio::test]
  async fn test_delete_unknown_title() {
    let (_, service, admin) = seeded().await;

    let result = service.delete_title(Some(&admin), 404).await;

    assert!(matches!(result, Err(CatalogError::TitleNotFound)));
  }
}
