pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Comment, NewComment, NewReview, Review, ReviewChanges};
pub use errors::{ReviewError, ValidationError};
pub use ports::{CommentRepository, ReviewRepository};
pub use services::ReviewService;
pub use value_objects::{Score, Text};
