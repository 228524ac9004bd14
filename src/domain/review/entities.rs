use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{Score, Text};

/// A user's scored review of a title; one per author and title
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
  pub id: i64,
  pub title_id: i64,
  pub author_id: Uuid,
  pub author_username: String,
  pub text: String,
  pub score: i32,
  pub pub_date: DateTime<Utc>,
}

impl Review {
  pub fn apply(&mut self, changes: ReviewChanges) {
    if let Some(text) = changes.text {
      self.text = text.into_inner();
    }
    if let Some(score) = changes.score {
      self.score = score.value();
    }
  }
}

#[derive(Debug, Clone)]
pub struct NewReview {
  pub title_id: i64,
  pub author_id: Uuid,
  pub text: Text,
  pub score: Score,
}

/// Partial review update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
  pub text: Option<Text>,
  pub score: Option<Score>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
  pub id: i64,
  pub review_id: i64,
  pub author_id: Uuid,
  pub author_username: String,
  pub text: String,
  pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
  pub review_id: i64,
  pub author_id: Uuid,
  pub text: Text,
}
