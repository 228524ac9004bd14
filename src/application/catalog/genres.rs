use std::sync::Arc;

use super::{GenreDto, NamedSlugFields};
use crate::domain::auth::{entities::User, permissions::require_admin};
use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::pagination::{Page, PageRequest};

pub struct ListGenresUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListGenresUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(
    &self,
    search: Option<String>,
    page: PageRequest,
  ) -> Result<Page<GenreDto>, CatalogError> {
    let search = search.as_deref().filter(|s| !s.is_empty());
    let page = self.catalog_service.list_genres(search, page).await?;
    Ok(page.map(GenreDto::from))
  }
}

pub struct CreateGenreUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateGenreUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    fields: NamedSlugFields,
  ) -> Result<GenreDto, CatalogError> {
    require_admin(actor)?;
    let (name, slug) = fields.parse()?;
    let created = self.catalog_service.create_genre(actor, name, slug).await?;
    Ok(created.into())
  }
}

pub struct DeleteGenreUseCase {
  catalog_service: Arc<CatalogService>,
}

impl DeleteGenreUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, actor: Option<&User>, slug: &str) -> Result<(), CatalogError> {
    self.catalog_service.delete_genre(actor, slug).await
  }
}
