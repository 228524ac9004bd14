use thiserror::Error;

/// Main authentication and user management error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Authentication credentials were not provided")]
  NotAuthenticated,

  #[error("You do not have permission to perform this action")]
  PermissionDenied,

  #[error("Given token not valid for any token type")]
  InvalidToken,

  #[error("Wrong confirmation code")]
  InvalidConfirmationCode,

  #[error("User not found")]
  UserNotFound,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Mail error: {0}")]
  Mail(#[from] MailError),

  #[error("Token error: {0}")]
  Token(String),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  /// Carries the name of the violated constraint
  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Confirmation code hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash confirmation code: {0}")]
  HashingFailed(String),

  #[error("Failed to verify confirmation code: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Outgoing mail errors
#[derive(Debug, Error)]
pub enum MailError {
  #[error("Invalid mail address: {0}")]
  InvalidAddress(String),

  #[error("Failed to build message: {0}")]
  BuildFailed(String),

  #[error("Failed to send message: {0}")]
  SendFailed(String),
}

/// Input validation errors for users
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Enter a valid email address")]
  InvalidEmail,

  #[error("Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters")]
  InvalidUsername,

  #[error("Using \"me\" as a username is not allowed")]
  ReservedUsername,

  #[error("Ensure this field has no more than {max} characters")]
  TooLong { field: &'static str, max: usize },

  #[error("This field may not be blank")]
  Blank { field: &'static str },

  #[error("This field is required")]
  MissingField { field: &'static str },

  #[error("\"{0}\" is not a valid choice")]
  InvalidRole(String),

  #[error("A user with that username already exists")]
  UsernameTaken,

  #[error("A user with that email already exists")]
  EmailTaken,
}

impl ValidationError {
  /// Name of the request field the error refers to
  pub fn field(&self) -> &'static str {
    match self {
      ValidationError::InvalidEmail | ValidationError::EmailTaken => "email",
      ValidationError::InvalidUsername
      | ValidationError::ReservedUsername
      | ValidationError::UsernameTaken => "username",
      ValidationError::InvalidRole(_) => "role",
      ValidationError::TooLong { field, .. }
      | ValidationError::Blank { field }
      | ValidationError::MissingField { field } => field,
    }
  }
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(
            db_err
              .constraint()
              .map(str::to_string)
              .unwrap_or_else(|| db_err.message().to_string()),
          )
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl From<argon2::password_hash::Error> for HashError {
  fn from(error: argon2::password_hash::Error) -> Self {
    use argon2::password_hash::Error;
    match error {
      Error::PhcStringField | Error::PhcStringTrailingData => HashError::InvalidFormat,
      Error::Password => HashError::VerificationFailed("Code does not match".to_string()),
      _ => HashError::HashingFailed(error.to_string()),
    }
  }
}
