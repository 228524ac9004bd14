use super::errors::ValidationError;

/// Review score on a 1 to 10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score(i32);

impl Score {
  pub const MIN: i32 = 1;
  pub const MAX: i32 = 10;

  pub fn new(score: i32) -> Result<Self, ValidationError> {
    if !(Self::MIN..=Self::MAX).contains(&score) {
      return Err(ValidationError::ScoreOutOfRange {
        min: Self::MIN,
        max: Self::MAX,
      });
    }
    Ok(Self(score))
  }

  pub fn value(&self) -> i32 {
    self.0
  }
}

/// Non-blank body of a review or comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(String);

impl Text {
  pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
    let text = text.into();
    if text.trim().is_empty() {
      return Err(ValidationError::Blank { field: "text" });
    }
    Ok(Self(text))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_score_bounds() {
    assert!(Score::new(1).is_ok());
    assert!(Score::new(10).is_ok());
    assert_eq!(
      Score::new(0),
      Err(ValidationError::ScoreOutOfRange { min: 1, max: 10 })
    );
    assert!(Score::new(11).is_err());
  }

  #[test]
  fn test_text_must_not_be_blank() {
    assert_eq!(Text::new("Great").unwrap().as_str(), "Great");
    assert_eq!(
      Text::new(" \n"),
      Err(ValidationError::Blank { field: "text" })
    );
  }
}
