//! Application layer
//!
//! Use cases turn raw request input into domain values, call the domain
//! services and shape the results for the adapters.

pub mod auth;
pub mod catalog;
pub mod reviews;
pub mod users;
