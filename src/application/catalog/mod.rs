//! Category, genre and title use cases

mod categories;
mod genres;
mod titles;

use serde::Serialize;

use crate::domain::catalog::{CatalogError, Category, Genre, Name, Slug, Title, ValidationError};

pub use categories::{CreateCategoryUseCase, DeleteCategoryUseCase, ListCategoriesUseCase};
pub use genres::{CreateGenreUseCase, DeleteGenreUseCase, ListGenresUseCase};
pub use titles::{
  CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesCommand, ListTitlesUseCase,
  TitleFields, UpdateTitleCommand, UpdateTitleUseCase,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDto {
  pub name: String,
  pub slug: String,
}

impl From<Category> for CategoryDto {
  fn from(category: Category) -> Self {
    Self {
      name: category.name,
      slug: category.slug,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreDto {
  pub name: String,
  pub slug: String,
}

impl From<Genre> for GenreDto {
  fn from(genre: Genre) -> Self {
    Self {
      name: genre.name,
      slug: genre.slug,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleDto {
  pub id: i64,
  pub name: String,
  pub year: i32,
  pub rating: Option<i32>,
  pub description: Option<String>,
  pub genre: Vec<GenreDto>,
  pub category: Option<CategoryDto>,
}

impl From<Title> for TitleDto {
  fn from(title: Title) -> Self {
    Self {
      id: title.id,
      name: title.name,
      year: title.year,
      rating: title.rating,
      description: title.description,
      genre: title.genres.into_iter().map(GenreDto::from).collect(),
      category: title.category.map(CategoryDto::from),
    }
  }
}

/// `{name, slug}` body shared by category and genre creation
#[derive(Debug, Clone, Default)]
pub struct NamedSlugFields {
  pub name: Option<String>,
  pub slug: Option<String>,
}

impl NamedSlugFields {
  fn parse(self) -> Result<(Name, Slug), CatalogError> {
    let name = self
      .name
      .ok_or(ValidationError::MissingField { field: "name" })?;
    let slug = self
      .slug
      .ok_or(ValidationError::MissingField { field: "slug" })?;
    Ok((Name::new(name)?, Slug::new(slug)?))
  }
}
