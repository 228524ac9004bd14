use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Condition, web};
use std::sync::Arc;

use crate::application::auth::{ObtainTokenUseCase, SendConfirmationCodeUseCase};
use crate::application::catalog::{
  CreateCategoryUseCase, CreateGenreUseCase, CreateTitleUseCase, DeleteCategoryUseCase,
  DeleteGenreUseCase, DeleteTitleUseCase, GetTitleUseCase, ListCategoriesUseCase,
  ListGenresUseCase, ListTitlesUseCase, UpdateTitleUseCase,
};
use crate::application::reviews::{
  CreateCommentUseCase, CreateReviewUseCase, DeleteCommentUseCase, DeleteReviewUseCase,
  GetCommentUseCase, GetReviewUseCase, ListCommentsUseCase, ListReviewsUseCase,
  UpdateCommentUseCase, UpdateReviewUseCase,
};
use crate::application::users::{
  CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, GetUserUseCase, ListUsersUseCase,
  UpdateMeUseCase, UpdateUserUseCase,
};
use crate::domain::auth::{AuthService, UserService};
use crate::domain::catalog::CatalogService;
use crate::domain::review::ReviewService;

use super::errors::{json_error_handler, path_error_handler, query_error_handler};
use super::handlers::{auth, categories, comments, genres, reviews, titles, users};

/// Every use case reachable over HTTP
#[derive(Clone)]
pub struct ApiUseCases {
  pub send_code: Arc<SendConfirmationCodeUseCase>,
  pub obtain_token: Arc<ObtainTokenUseCase>,

  pub list_users: Arc<ListUsersUseCase>,
  pub create_user: Arc<CreateUserUseCase>,
  pub get_user: Arc<GetUserUseCase>,
  pub update_user: Arc<UpdateUserUseCase>,
  pub delete_user: Arc<DeleteUserUseCase>,
  pub get_me: Arc<GetMeUseCase>,
  pub update_me: Arc<UpdateMeUseCase>,

  pub list_categories: Arc<ListCategoriesUseCase>,
  pub create_category: Arc<CreateCategoryUseCase>,
  pub delete_category: Arc<DeleteCategoryUseCase>,
  pub list_genres: Arc<ListGenresUseCase>,
  pub create_genre: Arc<CreateGenreUseCase>,
  pub delete_genre: Arc<DeleteGenreUseCase>,
  pub list_titles: Arc<ListTitlesUseCase>,
  pub get_title: Arc<GetTitleUseCase>,
  pub create_title: Arc<CreateTitleUseCase>,
  pub update_title: Arc<UpdateTitleUseCase>,
  pub delete_title: Arc<DeleteTitleUseCase>,

  pub list_reviews: Arc<ListReviewsUseCase>,
  pub get_review: Arc<GetReviewUseCase>,
  pub create_review: Arc<CreateReviewUseCase>,
  pub update_review: Arc<UpdateReviewUseCase>,
  pub delete_review: Arc<DeleteReviewUseCase>,
  pub list_comments: Arc<ListCommentsUseCase>,
  pub get_comment: Arc<GetCommentUseCase>,
  pub create_comment: Arc<CreateCommentUseCase>,
  pub update_comment: Arc<UpdateCommentUseCase>,
  pub delete_comment: Arc<DeleteCommentUseCase>,
}

impl ApiUseCases {
  pub fn new(
    auth_service: Arc<AuthService>,
    user_service: Arc<UserService>,
    catalog_service: Arc<CatalogService>,
    review_service: Arc<ReviewService>,
  ) -> Self {
    Self {
      send_code: Arc::new(SendConfirmationCodeUseCase::new(auth_service.clone())),
      obtain_token: Arc::new(ObtainTokenUseCase::new(auth_service)),

      list_users: Arc::new(ListUsersUseCase::new(user_service.clone())),
      create_user: Arc::new(CreateUserUseCase::new(user_service.clone())),
      get_user: Arc::new(GetUserUseCase::new(user_service.clone())),
      update_user: Arc::new(UpdateUserUseCase::new(user_service.clone())),
      delete_user: Arc::new(DeleteUserUseCase::new(user_service.clone())),
      get_me: Arc::new(GetMeUseCase::new(user_service.clone())),
      update_me: Arc::new(UpdateMeUseCase::new(user_service)),

      list_categories: Arc::new(ListCategoriesUseCase::new(catalog_service.clone())),
      create_category: Arc::new(CreateCategoryUseCase::new(catalog_service.clone())),
      delete_category: Arc::new(DeleteCategoryUseCase::new(catalog_service.clone())),
      list_genres: Arc::new(ListGenresUseCase::new(catalog_service.clone())),
      create_genre: Arc::new(CreateGenreUseCase::new(catalog_service.clone())),
      delete_genre: Arc::new(DeleteGenreUseCase::new(catalog_service.clone())),
      list_titles: Arc::new(ListTitlesUseCase::new(catalog_service.clone())),
      get_title: Arc::new(GetTitleUseCase::new(catalog_service.clone())),
      create_title: Arc::new(CreateTitleUseCase::new(catalog_service.clone())),
      update_title: Arc::new(UpdateTitleUseCase::new(catalog_service.clone())),
      delete_title: Arc::new(DeleteTitleUseCase::new(catalog_service)),

      list_reviews: Arc::new(ListReviewsUseCase::new(review_service.clone())),
      get_review: Arc::new(GetReviewUseCase::new(review_service.clone())),
      create_review: Arc::new(CreateReviewUseCase::new(review_service.clone())),
      update_review: Arc::new(UpdateReviewUseCase::new(review_service.clone())),
      delete_review: Arc::new(DeleteReviewUseCase::new(review_service.clone())),
      list_comments: Arc::new(ListCommentsUseCase::new(review_service.clone())),
      get_comment: Arc::new(GetCommentUseCase::new(review_service.clone())),
      create_comment: Arc::new(CreateCommentUseCase::new(review_service.clone())),
      update_comment: Arc::new(UpdateCommentUseCase::new(review_service.clone())),
      delete_comment: Arc::new(DeleteCommentUseCase::new(review_service)),
    }
  }
}

/// Token bucket applied to the `/auth` scope
#[derive(Debug, Clone, Copy)]
pub struct AuthRateLimit {
  /// Seconds needed to replenish one request
  pub per_second: u64,
  pub burst_size: u32,
}

/// Configure the versioned API
///
/// Mounts every resource under the enclosing scope (`/api/v1` in the
/// server). Paths are registered without trailing slashes, the server
/// normalizes them with `NormalizePath::trim`.
///
/// # Routes
///
/// - POST /auth/email, POST /auth/token
/// - /users, /users/me, /users/{username}
/// - /categories, /categories/{slug}
/// - /genres, /genres/{slug}
/// - /titles, /titles/{title_id}
/// - /titles/{title_id}/reviews, /titles/{title_id}/reviews/{review_id}
/// - /titles/{title_id}/reviews/{review_id}/comments[/{comment_id}]
///
/// Methods not listed for a resource answer 405.
pub fn configure_api(
  cfg: &mut web::ServiceConfig,
  use_cases: ApiUseCases,
  rate_limit: Option<AuthRateLimit>,
) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler));

  configure_auth_routes(cfg, &use_cases, rate_limit);
  configure_user_routes(cfg, &use_cases);
  configure_catalog_routes(cfg, &use_cases);
  configure_review_routes(cfg, &use_cases);
}

fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  use_cases: &ApiUseCases,
  rate_limit: Option<AuthRateLimit>,
) {
  // Keyed by peer IP; disabled when no limit is configured.
  let config = rate_limit.and_then(|limit| {
    GovernorConfigBuilder::default()
      .per_second(limit.per_second)
      .burst_size(limit.burst_size)
      .finish()
  });
  let enabled = config.is_some();
  let governor = Governor::new(&config.unwrap_or_default());

  cfg.service(
    web::scope("/auth")
      .wrap(Condition::new(enabled, governor))
      .app_data(web::Data::new(use_cases.send_code.clone()))
      .app_data(web::Data::new(use_cases.obtain_token.clone()))
      .route("/email", web::post().to(auth::send_code_handler))
      .route("/token", web::post().to(auth::obtain_token_handler)),
  );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig, use_cases: &ApiUseCases) {
  cfg
    .app_data(web::Data::new(use_cases.list_users.clone()))
    .app_data(web::Data::new(use_cases.create_user.clone()))
    .app_data(web::Data::new(use_cases.get_user.clone()))
    .app_data(web::Data::new(use_cases.update_user.clone()))
    .app_data(web::Data::new(use_cases.delete_user.clone()))
    .app_data(web::Data::new(use_cases.get_me.clone()))
    .app_data(web::Data::new(use_cases.update_me.clone()))
    .service(
      web::resource("/users")
        .route(web::get().to(users::list_users_handler))
        .route(web::post().to(users::create_user_handler)),
    )
    // Must precede /users/{username}
    .service(
      web::resource("/users/me")
        .route(web::get().to(users::get_me_handler))
        .route(web::patch().to(users::patch_me_handler)),
    )
    .service(
      web::resource("/users/{username}")
        .route(web::get().to(users::get_user_handler))
        .route(web::put().to(users::put_user_handler))
        .route(web::patch().to(users::patch_user_handler))
        .route(web::delete().to(users::delete_user_handler)),
    );
}

fn configure_catalog_routes(cfg: &mut web::ServiceConfig, use_cases: &ApiUseCases) {
  cfg
    .app_data(web::Data::new(use_cases.list_categories.clone()))
    .app_data(web::Data::new(use_cases.create_category.clone()))
    .app_data(web::Data::new(use_cases.delete_category.clone()))
    .app_data(web::Data::new(use_cases.list_genres.clone()))
    .app_data(web::Data::new(use_cases.create_genre.clone()))
    .app_data(web::Data::new(use_cases.delete_genre.clone()))
    .app_data(web::Data::new(use_cases.list_titles.clone()))
    .app_data(web::Data::new(use_cases.get_title.clone()))
    .app_data(web::Data::new(use_cases.create_title.clone()))
    .app_data(web::Data::new(use_cases.update_title.clone()))
    .app_data(web::Data::new(use_cases.delete_title.clone()))
    .service(
      web::resource("/categories")
        .route(web::get().to(categories::list_categories_handler))
        .route(web::post().to(categories::create_category_handler)),
    )
    .service(
      web::resource("/categories/{slug}")
        .route(web::delete().to(categories::delete_category_handler)),
    )
    .service(
      web::resource("/genres")
        .route(web::get().to(genres::list_genres_handler))
        .route(web::post().to(genres::create_genre_handler)),
    )
    .service(web::resource("/genres/{slug}").route(web::delete().to(genres::delete_genre_handler)))
    .service(
      web::resource("/titles")
        .route(web::get().to(titles::list_titles_handler))
        .route(web::post().to(titles::create_title_handler)),
    )
    .service(
      web::resource("/titles/{title_id}")
        .route(web::get().to(titles::get_title_handler))
        .route(web::put().to(titles::put_title_handler))
        .route(web::patch().to(titles::patch_title_handler))
        .route(web::delete().to(titles::delete_title_handler)),
    );
}

fn configure_review_routes(cfg: &mut web::ServiceConfig, use_cases: &ApiUseCases) {
  cfg
    .app_data(web::Data::new(use_cases.list_reviews.clone()))
    .app_data(web::Data::new(use_cases.get_review.clone()))
    .app_data(web::Data::new(use_cases.create_review.clone()))
    .app_data(web::Data::new(use_cases.update_review.clone()))
    .app_data(web::Data::new(use_cases.delete_review.clone()))
    .app_data(web::Data::new(use_cases.list_comments.clone()))
    .app_data(web::Data::new(use_cases.get_comment.clone()))
    .app_data(web::Data::new(use_cases.create_comment.clone()))
    .app_data(web::Data::new(use_cases.update_comment.clone()))
    .app_data(web::Data::new(use_cases.delete_comment.clone()))
    .service(
      web::resource("/titles/{title_id}/reviews")
        .route(web::get().to(reviews::list_reviews_handler))
        .route(web::post().to(reviews::create_review_handler)),
    )
    .service(
      web::resource("/titles/{title_id}/reviews/{review_id}")
        .route(web::get().to(reviews::get_review_handler))
        .route(web::put().to(reviews::put_review_handler))
        .route(web::patch().to(reviews::patch_review_handler))
        .route(web::delete().to(reviews::delete_review_handler)),
    )
    .service(
      web::resource("/titles/{title_id}/reviews/{review_id}/comments")
        .route(web::get().to(comments::list_comments_handler))
        .route(web::post().to(comments::create_comment_handler)),
    )
    .service(
      web::resource("/titles/{title_id}/reviews/{review_id}/comments/{comment_id}")
        .route(web::get().to(comments::get_comment_handler))
        .route(web::put().to(comments::put_comment_handler))
        .route(web::patch().to(comments::patch_comment_handler))
        .route(web::delete().to(comments::delete_comment_handler)),
    );
}
