use std::sync::Arc;

use super::TitleDto;
use crate::domain::auth::{entities::User, permissions::require_admin};
use crate::domain::catalog::{
  CatalogError, CatalogService, Name, NewTitle, Slug, TitleChanges, TitleFilter, ValidationError,
  Year,
};
use crate::domain::pagination::{Page, PageRequest};

/// Raw title body; relations are referenced by slug
#[derive(Debug, Clone, Default)]
pub struct TitleFields {
  pub name: Option<String>,
  pub year: Option<i32>,
  /// `Some(None)` is an explicit null
  pub description: Option<Option<String>>,
  pub genre: Option<Vec<String>>,
  pub category: Option<String>,
}

impl TitleFields {
  fn into_new_title(self) -> Result<NewTitle, CatalogError> {
    let name = self
      .name
      .ok_or(ValidationError::MissingField { field: "name" })?;
    let year = self
      .year
      .ok_or(ValidationError::MissingField { field: "year" })?;
    let category = self
      .category
      .ok_or(ValidationError::MissingField { field: "category" })?;
    let genres = self
      .genre
      .ok_or(ValidationError::MissingField { field: "genre" })?;

    Ok(NewTitle {
      name: Name::new(name)?,
      year: Year::new(year)?,
      description: self.description.flatten(),
      category: parse_slug("category", category)?,
      genres: parse_slugs(genres)?,
    })
  }

  fn into_changes(self, partial: bool) -> Result<TitleChanges, CatalogError> {
    if !partial {
      // A full replacement has the same required fields as creation
      let title = self.into_new_title()?;
      return Ok(TitleChanges {
        name: Some(title.name),
        year: Some(title.year),
        description: Some(title.description),
        category: Some(title.category),
        genres: Some(title.genres),
      });
    }

    Ok(TitleChanges {
      name: self.name.map(Name::new).transpose()?,
      year: self.year.map(Year::new).transpose()?,
      description: self.description,
      category: self
        .category
        .map(|c| parse_slug("category", c))
        .transpose()?,
      genres: self.genre.map(parse_slugs).transpose()?,
    })
  }
}

/// Slug syntax errors on a relation are reported as unknown references
fn parse_slug(field: &'static str, slug: String) -> Result<Slug, CatalogError> {
  Slug::new(slug.clone()).map_err(|_| ValidationError::UnknownSlug { field, slug }.into())
}

fn parse_slugs(slugs: Vec<String>) -> Result<Vec<Slug>, CatalogError> {
  slugs.into_iter().map(|s| parse_slug("genre", s)).collect()
}

/// Query parameters of the title listing
#[derive(Debug, Clone)]
pub struct ListTitlesCommand {
  pub genre: Option<String>,
  pub category: Option<String>,
  pub year: Option<i32>,
  pub name: Option<String>,
  /// Alias of `name`, used when `name` is absent
  pub search: Option<String>,
  pub page: PageRequest,
}

pub struct ListTitlesUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListTitlesUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: ListTitlesCommand) -> Result<Page<TitleDto>, CatalogError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let filter = TitleFilter {
      genre: non_empty(command.genre),
      category: non_empty(command.category),
      year: command.year,
      name: non_empty(command.name).or(non_empty(command.search)),
    };

    let page = self
      .catalog_service
      .list_titles(&filter, command.page)
      .await?;
    Ok(page.map(TitleDto::from))
  }
}

pub struct GetTitleUseCase {
  catalog_service: Arc<CatalogService>,
}

impl GetTitleUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, id: i64) -> Result<TitleDto, CatalogError> {
    Ok(self.catalog_service.get_title(id).await?.into())
  }
}

pub struct CreateTitleUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateTitleUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    fields: TitleFields,
  ) -> Result<TitleDto, CatalogError> {
    require_admin(actor)?;
    let title = fields.into_new_title()?;
    Ok(self.catalog_service.create_title(actor, title).await?.into())
  }
}

#[derive(Debug, Clone)]
pub struct UpdateTitleCommand {
  pub id: i64,
  pub fields: TitleFields,
  /// PATCH semantics when true, PUT otherwise
  pub partial: bool,
}

pub struct UpdateTitleUseCase {
  catalog_service: Arc<CatalogService>,
}

impl UpdateTitleUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(
    &self,
    actor: Option<&User>,
    command: UpdateTitleCommand,
  ) -> Result<TitleDto, CatalogError> {
    require_admin(actor)?;
    let changes = command.fields.into_changes(command.partial)?;
    let title = self
      .catalog_service
      .update_title(actor, command.id, changes)
      .await?;
    Ok(title.into())
  }
}

pub struct DeleteTitleUseCase {
  catalog_service: Arc<CatalogService>,
}

impl DeleteTitleUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, actor: Option<&User>, id: i64) -> Result<(), CatalogError> {
    self.catalog_service.delete_title(actor, id).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fields() -> TitleFields {
    TitleFields {
      name: Some("Stalker".to_string()),
      year: Some(1979),
      description: None,
      genre: Some(vec!["drama".to_string()]),
      category: Some("movie".to_string()),
    }
  }

  #[test]
  fn test_new_title_requires_category() {
    let result = TitleFields {
      category: None,
      ..fields()
    }
    .into_new_title();

    assert!(matches!(
      result,
      Err(CatalogError::Validation(ValidationError::MissingField { field: "category" }))
    ));
  }

  #[test]
  fn test_malformed_relation_slug_is_unknown() {
    let result = TitleFields {
      genre: Some(vec!["not a slug".to_string()]),
      ..fields()
    }
    .into_new_title();

    assert!(matches!(
      result,
      Err(CatalogError::Validation(ValidationError::UnknownSlug { field: "genre", .. }))
    ));
  }

  #[test]
  fn test_partial_changes_only_carry_present_fields() {
    let changes = TitleFields {
      year: Some(1980),
      ..Default::default()
    }
    .into_changes(true)
    .unwrap();

    assert_eq!(changes.year.map(|y| y.value()), Some(1980));
    assert!(changes.name.is_none());
    assert!(changes.description.is_none());
    assert!(changes.genres.is_none());
  }

  #[test]
  fn test_partial_null_description_clears_it() {
    let changes = TitleFields {
      description: Some(None),
      ..Default::default()
    }
    .into_changes(true)
    .unwrap();

    assert_eq!(changes.description, Some(None));
    assert!(changes.name.is_none());
  }

  #[test]
  fn test_full_replacement_clears_description() {
    let changes = fields().into_changes(false).unwrap();

    assert_eq!(changes.description, Some(None));
  }

  #[test]
  fn test_future_year_rejected() {
    let result = TitleFields {
      year: Some(9999),
      ..fields()
    }
    .into_changes(true);

    assert!(matches!(
      result,
      Err(CatalogError::Validation(ValidationError::YearInFuture { .. }))
    ));
  }
}
