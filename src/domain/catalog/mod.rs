pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Category, Genre, NewTitle, Title, TitleChanges, TitleDraft, TitleFilter};
pub use errors::{CatalogError, ValidationError};
pub use ports::{CategoryRepository, GenreRepository, TitleRepository};
pub use services::CatalogService;
pub use value_objects::{Name, Slug, Year};
