pub mod category_repository;
pub mod comment_repository;
pub mod genre_repository;
pub mod review_repository;
pub mod title_repository;
pub mod user_repository;

#[cfg(test)]
pub(crate) mod test_db;

pub use category_repository::PostgresCategoryRepository;
pub use comment_repository::PostgresCommentRepository;
pub use genre_repository::PostgresGenreRepository;
pub use review_repository::PostgresReviewRepository;
pub use title_repository::PostgresTitleRepository;
pub use user_repository::PostgresUserRepository;
