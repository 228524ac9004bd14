use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::errors::ValidationError;

lazy_static! {
  static ref SLUG_RE: Regex = Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex");
}

/// URL-safe identifier of a category or genre
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
  pub const MAX_LENGTH: usize = 50;

  pub fn new(slug: impl Into<String>) -> Result<Self, ValidationError> {
    let slug = slug.into().trim().to_string();

    if slug.is_empty() {
      return Err(ValidationError::Blank { field: "slug" });
    }

    if slug.len() > Self::MAX_LENGTH {
      return Err(ValidationError::TooLong {
        field: "slug",
        max: Self::MAX_LENGTH,
      });
    }

    if !SLUG_RE.is_match(&slug) {
      return Err(ValidationError::InvalidSlug);
    }

    Ok(Self(slug))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Slug {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Display name of a category, genre or title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
  pub const MAX_LENGTH: usize = 256;

  pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
    let name = name.into().trim().to_string();

    if name.is_empty() {
      return Err(ValidationError::Blank { field: "name" });
    }

    if name.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::TooLong {
        field: "name",
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

/// Release year, never in the future
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Year(i32);

impl Year {
  pub fn new(year: i32) -> Result<Self, ValidationError> {
    let current = Utc::now().year();
    if year > current {
      return Err(ValidationError::YearInFuture { max: current });
    }
    Ok(Self(year))
  }

  pub fn value(&self) -> i32 {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slug_validation() {
    assert!(Slug::new("sci-fi_2").is_ok());
    assert_eq!(Slug::new("no spaces"), Err(ValidationError::InvalidSlug));
    assert_eq!(Slug::new("çava"), Err(ValidationError::InvalidSlug));
    assert_eq!(Slug::new(""), Err(ValidationError::Blank { field: "slug" }));
    assert_eq!(
      Slug::new("a".repeat(51)),
      Err(ValidationError::TooLong {
        field: "slug",
        max: 50
      })
    );
  }

  #[test]
  fn test_name_validation() {
    assert_eq!(Name::new("  Drama ").unwrap().as_str(), "Drama");
    assert!(Name::new("   ").is_err());
    assert!(Name::new("x".repeat(256)).is_ok());
    assert!(Name::new("x".repeat(257)).is_err());
  }

  #[test]
  fn test_year_not_in_future() {
    let current = Utc::now().year();

    assert!(Year::new(1895).is_ok());
    assert!(Year::new(current).is_ok());
    assert_eq!(
      Year::new(current + 1),
      Err(ValidationError::YearInFuture { max: current })
    );
  }
}
