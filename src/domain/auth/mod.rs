pub mod entities;
pub mod errors;
pub mod permissions;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{EmailMessage, ProfileUpdate, User, UserRole};
pub use errors::{AuthError, HashError, MailError, RepositoryError, ValidationError};
pub use services::{AuthService, UserService};
pub use value_objects::{AccessToken, ConfirmationCode, Email, Username};
