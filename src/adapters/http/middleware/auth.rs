use actix_web::{
  Error, HttpMessage, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  application::auth::GetCurrentUserUseCase,
  domain::auth::{entities::User, errors::AuthError},
};

/// Bearer token authentication.
///
/// Requests without an `Authorization` header pass through anonymously
/// and permissions are decided by the handlers. A header that is present
/// but malformed, expired or for an unknown user is rejected with 401.
/// On success the `User` is stored in the request extensions.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use yamdb::application::auth::GetCurrentUserUseCase;
/// # use yamdb::adapters::http::middleware::auth::AuthMiddleware;
///
/// # async fn example(get_user_use_case: Arc<GetCurrentUserUseCase>) {
/// let app = App::new()
///   .wrap(AuthMiddleware::new(get_user_use_case))
///   .service(
///     web::resource("/titles")
///       .route(web::get().to(|| async { "Public listing" }))
///   );
/// # }
/// ```
pub struct AuthMiddleware {
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl AuthMiddleware {
  pub fn new(get_user_use_case: Arc<GetCurrentUserUseCase>) -> Self {
    Self { get_user_use_case }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      get_user_use_case: self.get_user_use_case.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  get_user_use_case: Arc<GetCurrentUserUseCase>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let get_user_use_case = self.get_user_use_case.clone();

    Box::pin(async move {
      let token = match extract_bearer_token(&req) {
        Ok(None) => {
          let res = service.call(req).await?;
          return Ok(res.map_into_left_body());
        }
        Ok(Some(token)) => token,
        Err(e) => return Ok(reject(req, e)),
      };

      let user = match get_user_use_case.execute(token).await {
        Ok(user) => user,
        Err(AuthError::InvalidToken) => {
          tracing::debug!(path = %req.path(), "Rejected bearer token");
          return Ok(reject(req, ApiError::Auth(AuthErrorKind::InvalidToken)));
        }
        // Anything else, such as a storage failure, keeps its own status
        Err(e) => return Ok(reject(req, ApiError::from(e))),
      };

      req.extensions_mut().insert(user);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn reject<B>(req: ServiceRequest, error: ApiError) -> ServiceResponse<EitherBody<B>> {
  let (request, _) = req.into_parts();
  let response = error.error_response().map_into_right_body();
  ServiceResponse::new(request, response)
}

/// `Ok(None)` without an Authorization header, an error for any scheme
/// other than `Bearer`
fn extract_bearer_token(req: &ServiceRequest) -> Result<Option<String>, ApiError> {
  let Some(value) = req.headers().get(header::AUTHORIZATION) else {
    return Ok(None);
  };

  value
    .to_str()
    .ok()
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim())
    .filter(|s| !s.is_empty())
    .map(|s| Some(s.to_string()))
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extension trait to read the caller from request extensions
pub trait AuthUser {
  /// `None` for anonymous requests
  fn current_user(&self) -> Option<User>;
}

impl AuthUser for actix_web::HttpRequest {
  fn current_user(&self) -> Option<User> {
    self.extensions().get::<User>().cloned()
  }
}
