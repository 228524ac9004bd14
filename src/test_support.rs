//! In-memory doubles of the persistence and delivery ports used by unit
//! and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{EmailMessage, User},
  errors::{AuthError, RepositoryError},
  ports::{ConfirmationCodeHasher, Mailer, TokenService, UserRepository},
  value_objects::{AccessToken, ConfirmationCode, Email},
};
use crate::domain::catalog::{
  Category, CatalogError, CategoryRepository, Genre, GenreRepository, Name, Slug, Title,
  TitleDraft, TitleFilter, TitleRepository,
};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::review::{
  Comment, CommentRepository, NewComment, NewReview, Review, ReviewError, ReviewRepository,
};

#[derive(Debug, Clone)]
struct TitleRow {
  id: i64,
  name: String,
  year: i32,
  description: Option<String>,
  category_id: Option<i64>,
}

#[derive(Default)]
struct State {
  next_id: i64,
  users: Vec<User>,
  categories: Vec<Category>,
  genres: Vec<Genre>,
  titles: Vec<TitleRow>,
  /// (title_id, genre_id) in insertion order
  title_genres: Vec<(i64, i64)>,
  reviews: Vec<Review>,
  comments: Vec<Comment>,
}

impl State {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }

  fn username_of(&self, id: Uuid) -> String {
    self
      .users
      .iter()
      .find(|u| u.id == id)
      .map(|u| u.username.clone())
      .unwrap_or_default()
  }

  fn build_title(&self, row: &TitleRow) -> Title {
    let category = row
      .category_id
      .and_then(|id| self.categories.iter().find(|c| c.id == id).cloned());
    let genres = self
      .title_genres
      .iter()
      .filter(|(title_id, _)| *title_id == row.id)
      .filter_map(|(_, genre_id)| self.genres.iter().find(|g| g.id == *genre_id).cloned())
      .collect();

    let scores: Vec<i32> = self
      .reviews
      .iter()
      .filter(|r| r.title_id == row.id)
      .map(|r| r.score)
      .collect();
    let rating = if scores.is_empty() {
      None
    } else {
      let avg = scores.iter().sum::<i32>() as f64 / scores.len() as f64;
      Some(avg.round() as i32)
    };

    Title {
      id: row.id,
      name: row.name.clone(),
      year: row.year,
      description: row.description.clone(),
      category,
      genres,
      rating,
    }
  }

  fn with_author_review(&self, review: &Review) -> Review {
    Review {
      author_username: self.username_of(review.author_id),
      ..review.clone()
    }
  }

  fn with_author_comment(&self, comment: &Comment) -> Comment {
    Comment {
      author_username: self.username_of(comment.author_id),
      ..comment.clone()
    }
  }

  fn remove_reviews(&mut self, keep: impl Fn(&Review) -> bool) {
    let removed: Vec<i64> = self
      .reviews
      .iter()
      .filter(|r| !keep(r))
      .map(|r| r.id)
      .collect();
    self.reviews.retain(|r| keep(r));
    self.comments.retain(|c| !removed.contains(&c.review_id));
  }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
  needle.is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

/// Single store behind every repository port, so relations behave like
/// the database: cascades, `SET NULL` and computed ratings.
#[derive(Default)]
pub struct InMemoryStore {
  state: Mutex<State>,
}

/// Auth tests only care about the users table
pub type InMemoryUserRepository = InMemoryStore;

impl InMemoryStore {
  pub fn add_user(&self, user: &User) {
    self.state.lock().unwrap().users.push(user.clone());
  }

  pub fn count(&self) -> usize {
    self.state.lock().unwrap().users.len()
  }

  pub fn comment_count(&self) -> usize {
    self.state.lock().unwrap().comments.len()
  }
}

#[async_trait]
impl UserRepository for InMemoryStore {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut state = self.state.lock().unwrap();
    if state.users.iter().any(|u| u.username == user.username) {
      return Err(RepositoryError::DuplicateKey("users_username_key".to_string()).into());
    }
    if state.users.iter().any(|u| u.email == user.email) {
      return Err(RepositoryError::DuplicateKey("users_email_key".to_string()).into());
    }
    state.users.push(user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let state = self.state.lock().unwrap();
    Ok(state.users.iter().find(|u| u.id == id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let state = self.state.lock().unwrap();
    Ok(state.users.iter().find(|u| u.email == email.as_str()).cloned())
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
    let state = self.state.lock().unwrap();
    Ok(state.users.iter().find(|u| u.username == username).cloned())
  }

  async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<User>, AuthError> {
    let state = self.state.lock().unwrap();
    let mut users: Vec<User> = state
      .users
      .iter()
      .filter(|u| contains_ci(&u.username, search))
      .cloned()
      .collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(Page::from_vec(users, page))
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let mut state = self.state.lock().unwrap();
    if state
      .users
      .iter()
      .any(|u| u.id != user.id && u.username == user.username)
    {
      return Err(RepositoryError::DuplicateKey("users_username_key".to_string()).into());
    }
    if state
      .users
      .iter()
      .any(|u| u.id != user.id && u.email == user.email)
    {
      return Err(RepositoryError::DuplicateKey("users_email_key".to_string()).into());
    }
    let slot = state
      .users
      .iter_mut()
      .find(|u| u.id == user.id)
      .ok_or(RepositoryError::NotFound)?;
    *slot = user.clone();
    Ok(user)
  }

  async fn delete(&self, id: Uuid) -> Result<(), AuthError> {
    let mut state = self.state.lock().unwrap();
    state.users.retain(|u| u.id != id);
    state.remove_reviews(|r| r.author_id != id);
    state.comments.retain(|c| c.author_id != id);
    Ok(())
  }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
  async fn create(&self, name: Name, slug: Slug) -> Result<Category, CatalogError> {
    let mut state = self.state.lock().unwrap();
    let category = Category {
      id: state.next_id(),
      name: name.into_inner(),
      slug: slug.into_inner(),
    };
    state.categories.push(category.clone());
    Ok(category)
  }

  async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError> {
    let state = self.state.lock().unwrap();
    Ok(state.categories.iter().find(|c| c.slug == slug).cloned())
  }

  async fn list(
    &self,
    search: Option<&str>,
    page: PageRequest,
  ) -> Result<Page<Category>, CatalogError> {
    let state = self.state.lock().unwrap();
    let mut categories: Vec<Category> = state
      .categories
      .iter()
      .filter(|c| contains_ci(&c.name, search))
      .cloned()
      .collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Page::from_vec(categories, page))
  }

  async fn delete(&self, id: i64) -> Result<(), CatalogError> {
    let mut state = self.state.lock().unwrap();
    state.categories.retain(|c| c.id != id);
    for title in state.titles.iter_mut() {
      if title.category_id == Some(id) {
        title.category_id = None;
      }
    }
    Ok(())
  }
}

#[async_trait]
impl GenreRepository for InMemoryStore {
  async fn create(&self, name: Name, slug: Slug) -> Result<Genre, CatalogError> {
    let mut state = self.state.lock().unwrap();
    let genre = Genre {
      id: state.next_id(),
      name: name.into_inner(),
      slug: slug.into_inner(),
    };
    state.genres.push(genre.clone());
    Ok(genre)
  }

  async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, CatalogError> {
    let state = self.state.lock().unwrap();
    Ok(state.genres.iter().find(|g| g.slug == slug).cloned())
  }

  async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Genre>, CatalogError> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .genres
        .iter()
        .filter(|g| slugs.contains(&g.slug))
        .cloned()
        .collect(),
    )
  }

  async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<Genre>, CatalogError> {
    let state = self.state.lock().unwrap();
    let mut genres: Vec<Genre> = state
      .genres
      .iter()
      .filter(|g| contains_ci(&g.name, search))
      .cloned()
      .collect();
    genres.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Page::from_vec(genres, page))
  }

  async fn delete(&self, id: i64) -> Result<(), CatalogError> {
    let mut state = self.state.lock().unwrap();
    state.genres.retain(|g| g.id != id);
    state.title_genres.retain(|(_, genre_id)| *genre_id != id);
    Ok(())
  }
}

#[async_trait]
impl TitleRepository for InMemoryStore {
  async fn create(&self, draft: TitleDraft) -> Result<Title, CatalogError> {
    let mut state = self.state.lock().unwrap();
    let row = TitleRow {
      id: state.next_id(),
      name: draft.name,
      year: draft.year,
      description: draft.description,
      category_id: draft.category_id,
    };
    for genre_id in draft.genre_ids {
      state.title_genres.push((row.id, genre_id));
    }
    state.titles.push(row.clone());
    Ok(state.build_title(&row))
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<Title>, CatalogError> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .titles
        .iter()
        .find(|t| t.id == id)
        .map(|row| state.build_title(row)),
    )
  }

  async fn exists(&self, id: i64) -> Result<bool, CatalogError> {
    let state = self.state.lock().unwrap();
    Ok(state.titles.iter().any(|t| t.id == id))
  }

  async fn list(&self, filter: &TitleFilter, page: PageRequest) -> Result<Page<Title>, CatalogError> {
    let state = self.state.lock().unwrap();
    let mut titles: Vec<Title> = state
      .titles
      .iter()
      .map(|row| state.build_title(row))
      .filter(|t| filter.matches(t))
      .collect();
    titles.sort_by_key(|t| t.id);
    Ok(Page::from_vec(titles, page))
  }

  async fn update(&self, id: i64, draft: TitleDraft) -> Result<Title, CatalogError> {
    let mut state = self.state.lock().unwrap();
    let row = {
      let row = state
        .titles
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(CatalogError::TitleNotFound)?;
      row.name = draft.name;
      row.year = draft.year;
      row.description = draft.description;
      row.category_id = draft.category_id;
      row.clone()
    };
    state.title_genres.retain(|(title_id, _)| *title_id != id);
    for genre_id in draft.genre_ids {
      state.title_genres.push((id, genre_id));
    }
    Ok(state.build_title(&row))
  }

  async fn delete(&self, id: i64) -> Result<(), CatalogError> {
    let mut state = self.state.lock().unwrap();
    state.titles.retain(|t| t.id != id);
    state.title_genres.retain(|(title_id, _)| *title_id != id);
    state.remove_reviews(|r| r.title_id != id);
    Ok(())
  }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
  async fn create(&self, review: NewReview) -> Result<Review, ReviewError> {
    let mut state = self.state.lock().unwrap();
    if state
      .reviews
      .iter()
      .any(|r| r.title_id == review.title_id && r.author_id == review.author_id)
    {
      return Err(RepositoryError::DuplicateKey("reviews_title_author_key".to_string()).into());
    }
    let created = Review {
      id: state.next_id(),
      title_id: review.title_id,
      author_id: review.author_id,
      author_username: state.username_of(review.author_id),
      text: review.text.into_inner(),
      score: review.score.value(),
      pub_date: Utc::now(),
    };
    state.reviews.push(created.clone());
    Ok(created)
  }

  async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, ReviewError> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .reviews
        .iter()
        .find(|r| r.id == review_id && r.title_id == title_id)
        .map(|r| state.with_author_review(r)),
    )
  }

  async fn list(&self, title_id: i64, page: PageRequest) -> Result<Page<Review>, ReviewError> {
    let state = self.state.lock().unwrap();
    let reviews: Vec<Review> = state
      .reviews
      .iter()
      .filter(|r| r.title_id == title_id)
      .map(|r| state.with_author_review(r))
      .collect();
    Ok(Page::from_vec(reviews, page))
  }

  async fn exists_for_author(&self, title_id: i64, author_id: Uuid) -> Result<bool, ReviewError> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .reviews
        .iter()
        .any(|r| r.title_id == title_id && r.author_id == author_id),
    )
  }

  async fn update(&self, review: Review) -> Result<Review, ReviewError> {
    let mut state = self.state.lock().unwrap();
    let slot = state
      .reviews
      .iter_mut()
      .find(|r| r.id == review.id)
      .ok_or(ReviewError::ReviewNotFound)?;
    slot.text = review.text.clone();
    slot.score = review.score;
    let updated = slot.clone();
    Ok(state.with_author_review(&updated))
  }

  async fn delete(&self, id: i64) -> Result<(), ReviewError> {
    let mut state = self.state.lock().unwrap();
    state.remove_reviews(|r| r.id != id);
    Ok(())
  }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
  async fn create(&self, comment: NewComment) -> Result<Comment, ReviewError> {
    let mut state = self.state.lock().unwrap();
    let created = Comment {
      id: state.next_id(),
      review_id: comment.review_id,
      author_id: comment.author_id,
      author_username: state.username_of(comment.author_id),
      text: comment.text.into_inner(),
      pub_date: Utc::now(),
    };
    state.comments.push(created.clone());
    Ok(created)
  }

  async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, ReviewError> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .comments
        .iter()
        .find(|c| c.id == comment_id && c.review_id == review_id)
        .map(|c| state.with_author_comment(c)),
    )
  }

  async fn list(&self, review_id: i64, page: PageRequest) -> Result<Page<Comment>, ReviewError> {
    let state = self.state.lock().unwrap();
    let comments: Vec<Comment> = state
      .comments
      .iter()
      .filter(|c| c.review_id == review_id)
      .map(|c| state.with_author_comment(c))
      .collect();
    Ok(Page::from_vec(comments, page))
  }

  async fn update(&self, comment: Comment) -> Result<Comment, ReviewError> {
    let mut state = self.state.lock().unwrap();
    let slot = state
      .comments
      .iter_mut()
      .find(|c| c.id == comment.id)
      .ok_or(ReviewError::CommentNotFound)?;
    slot.text = comment.text.clone();
    let updated = slot.clone();
    Ok(state.with_author_comment(&updated))
  }

  async fn delete(&self, id: i64) -> Result<(), ReviewError> {
    let mut state = self.state.lock().unwrap();
    state.comments.retain(|c| c.id != id);
    Ok(())
  }
}

/// Stores codes with a marker prefix instead of hashing them
pub struct PlainCodeHasher;

#[async_trait]
impl ConfirmationCodeHasher for PlainCodeHasher {
  async fn hash(&self, code: &ConfirmationCode) -> Result<String, AuthError> {
    Ok(format!("plain${}", code.as_str()))
  }

  async fn verify(&self, code: &ConfirmationCode, hash: &str) -> Result<bool, AuthError> {
    Ok(hash.strip_prefix("plain$") == Some(code.as_str()))
  }
}

/// Tokens are `token:<user id>`
pub struct StaticTokenService;

impl TokenService for StaticTokenService {
  fn issue(&self, user: &User) -> Result<AccessToken, AuthError> {
    Ok(AccessToken::new(format!("token:{}", user.id)))
  }

  fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
    token
      .strip_prefix("token:")
      .and_then(|id| Uuid::parse_str(id).ok())
      .ok_or(AuthError::InvalidToken)
  }
}

#[derive(Default)]
pub struct RecordingMailer {
  sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
  pub fn sent(&self) -> Vec<EmailMessage> {
    self.sent.lock().unwrap().clone()
  }
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, message: EmailMessage) -> Result<(), AuthError> {
    self.sent.lock().unwrap().push(message);
    Ok(())
  }
}
