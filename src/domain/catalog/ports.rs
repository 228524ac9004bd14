use async_trait::async_trait;

use super::{
  entities::{Category, Genre, Title, TitleDraft, TitleFilter},
  errors::CatalogError,
  value_objects::{Name, Slug},
};
use crate::domain::pagination::{Page, PageRequest};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
  async fn create(&self, name: Name, slug: Slug) -> Result<Category, CatalogError>;
  async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError>;
  /// Ordered by name; `search` is a case-insensitive name substring
  async fn list(
    &self,
    search: Option<&str>,
    page: PageRequest,
  ) -> Result<Page<Category>, CatalogError>;
  /// Titles of the category keep existing without a category
  async fn delete(&self, id: i64) -> Result<(), CatalogError>;
}

#[async_trait]
pub trait GenreRepository: Send + Sync {
  async fn create(&self, name: Name, slug: Slug) -> Result<Genre, CatalogError>;
  async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, CatalogError>;
  /// Returns the genres whose slug is listed, in no particular order
  async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Genre>, CatalogError>;
  async fn list(&self, search: Option<&str>, page: PageRequest)
  -> Result<Page<Genre>, CatalogError>;
  /// Detaches the genre from every title before removing it
  async fn delete(&self, id: i64) -> Result<(), CatalogError>;
}

#[async_trait]
pub trait TitleRepository: Send + Sync {
  async fn create(&self, draft: TitleDraft) -> Result<Title, CatalogError>;
  async fn find_by_id(&self, id: i64) -> Result<Option<Title>, CatalogError>;
  async fn exists(&self, id: i64) -> Result<bool, CatalogError>;
  /// Ordered by id
  async fn list(&self, filter: &TitleFilter, page: PageRequest)
  -> Result<Page<Title>, CatalogError>;
  /// Replaces every field and the full genre set
  async fn update(&self, id: i64, draft: TitleDraft) -> Result<Title, CatalogError>;
  async fn delete(&self, id: i64) -> Result<(), CatalogError>;
}
