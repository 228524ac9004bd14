pub mod auth;
pub mod catalog;
pub mod pagination;
pub mod review;

// Re-export auth module for easier access
pub use auth::*;
pub use pagination::{Page, PageRequest};
