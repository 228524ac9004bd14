pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod pagination;
pub mod routes;

pub use dtos::{ErrorResponse, PaginatedResponse};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{AuthMiddleware, AuthUser, RequestId, RequestIdExt, RequestIdMiddleware};
pub use pagination::PaginationSettings;
pub use routes::{ApiUseCases, AuthRateLimit, configure_api};
