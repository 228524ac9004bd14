use super::value_objects::{Name, Slug, Year};

/// Kind of a title: film, book, music...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
  pub id: i64,
  pub name: String,
  pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
  pub id: i64,
  pub name: String,
  pub slug: String,
}

/// A reviewable work with its category, genres and aggregated rating
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
  pub id: i64,
  pub name: String,
  pub year: i32,
  pub description: Option<String>,
  /// `None` once the category has been deleted
  pub category: Option<Category>,
  pub genres: Vec<Genre>,
  /// Rounded average of review scores, `None` without reviews
  pub rating: Option<i32>,
}

/// Fully resolved title contents written by the repository
#[derive(Debug, Clone)]
pub struct TitleDraft {
  pub name: String,
  pub year: i32,
  pub description: Option<String>,
  pub category_id: Option<i64>,
  pub genre_ids: Vec<i64>,
}

/// Title as submitted for creation, relations referenced by slug
#[derive(Debug, Clone)]
pub struct NewTitle {
  pub name: Name,
  pub year: Year,
  pub description: Option<String>,
  pub category: Slug,
  pub genres: Vec<Slug>,
}

/// Partial title update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
  pub name: Option<Name>,
  pub year: Option<Year>,
  pub description: Option<Option<String>>,
  pub category: Option<Slug>,
  pub genres: Option<Vec<Slug>>,
}

/// Listing filters, all optional and combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
  /// Genre slug
  pub genre: Option<String>,
  /// Category slug
  pub category: Option<String>,
  pub year: Option<i32>,
  /// Case-insensitive substring of the title name
  pub name: Option<String>,
}

impl TitleFilter {
  /// Checks a title against the filter; mirrors the SQL predicate
  pub fn matches(&self, title: &Title) -> bool {
    let genre_ok = self
      .genre
      .as_ref()
      .is_none_or(|slug| title.genres.iter().any(|g| &g.slug == slug));
    let category_ok = self
      .category
      .as_ref()
      .is_none_or(|slug| title.category.as_ref().is_some_and(|c| &c.slug == slug));
    let year_ok = self.year.is_none_or(|year| title.year == year);
    let name_ok = self
      .name
      .as_ref()
      .is_none_or(|name| title.name.to_lowercase().contains(&name.to_lowercase()));

    genre_ok && category_ok && year_ok && name_ok
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn title() -> Title {
    Title {
      id: 1,
      name: "The Godfather".to_string(),
      year: 1972,
      description: None,
      category: Some(Category {
        id: 1,
        name: "Movie".to_string(),
        slug: "movie".to_string(),
      }),
      genres: vec![Genre {
        id: 1,
        name: "Drama".to_string(),
        slug: "drama".to_string(),
      }],
      rating: None,
    }
  }

  #[test]
  fn test_empty_filter_matches_everything() {
    assert!(TitleFilter::default().matches(&title()));
  }

  #[test]
  fn test_filter_by_relations() {
    let title = title();

    let by_genre = TitleFilter {
      genre: Some("drama".to_string()),
      ..Default::default()
    };
    assert!(by_genre.matches(&title));

    let wrong_category = TitleFilter {
      category: Some("book".to_string()),
      ..Default::default()
    };
    assert!(!wrong_category.matches(&title));
  }

  #[test]
  fn test_filter_name_is_case_insensitive_substring() {
    let filter = TitleFilter {
      name: Some("godf".to_string()),
      year: Some(1972),
      ..Default::default()
    };
    assert!(filter.matches(&title()));
  }

  #[test]
  fn test_filter_without_category() {
    let mut title = title();
    title.category = None;

    let filter = TitleFilter {
      category: Some("movie".to_string()),
      ..Default::default()
    };
    assert!(!filter.matches(&title));
  }
}
