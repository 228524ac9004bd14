use std::sync::Arc;

use super::{CategoryDto, NamedSlugFields};
use crate::domain::auth::{entities::User, permissions::require_admin};
use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::pagination::{Page, PageRequest};

pub struct ListCategoriesUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListCategoriesUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(
    &self,
    search: Option<String>,
    page: PageRequest,
  ) -> Result<Page<CategoryDto>, CatalogError> {
    let search = search.as_deref().filter(|s| !s.is_empty());
    let page = self.catalog_service.list_categories(search, page).await?;
    Ok(page.map(CategoryDto::from))
  }
}

pub struct CreateCategoryUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateCategoryUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    fields: NamedSlugFields,
  ) -> Result<CategoryDto, CatalogError> {
    require_admin(actor)?;
    let (name, slug) = fields.parse()?;
    let created = self.catalog_service.create_category(actor, name, slug).await?;
    Ok(created.into())
  }
}

pub struct DeleteCategoryUseCase {
  catalog_service: Arc<CatalogService>,
}

impl DeleteCategoryUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, actor: Option<&User>, slug: &str) -> Result<(), CatalogError> {
    self.catalog_service.delete_category(actor, slug).await
  }
}
