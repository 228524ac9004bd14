use actix_web::{
  App, HttpServer,
  middleware::{Logger, NormalizePath},
  web,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yamdb::{
  adapters::http::{
    ApiUseCases, AuthMiddleware, AuthRateLimit, PaginationSettings, RequestIdMiddleware,
    configure_api, handlers::health::health_handler,
  },
  application::auth::GetCurrentUserUseCase,
  domain::auth::{
    AuthService, Email, UserService, Username,
    ports::{Mailer, TokenService},
  },
  domain::catalog::CatalogService,
  domain::review::ReviewService,
  infrastructure::{
    config::{Config, MailBackend, MailConfig},
    mail::{ConsoleMailer, SmtpMailer, SmtpSettings},
    persistence::postgres::{
      PostgresCategoryRepository, PostgresCommentRepository, PostgresGenreRepository,
      PostgresReviewRepository, PostgresTitleRepository, PostgresUserRepository,
    },
    security::{Argon2CodeHasher, JwtTokenService},
  },
};

fn io_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
  tracing::error!("{}: {}", context, error);
  std::io::Error::other(format!("{}: {}", context, error))
}

fn build_mailer(config: &MailConfig) -> std::io::Result<Arc<dyn Mailer>> {
  match config.backend {
    MailBackend::Console => {
      tracing::warn!("Mail backend is console, messages are only logged");
      Ok(Arc::new(ConsoleMailer::new(config.from_mailbox())))
    }
    MailBackend::Smtp => {
      let smtp = config.smtp.as_ref().ok_or_else(|| {
        io_error(
          "Invalid mail configuration",
          "mail.smtp section is required for the smtp backend",
        )
      })?;
      let settings = SmtpSettings {
        host: smtp.host.clone(),
        port: smtp.port,
        username: smtp.username.clone(),
        password: smtp.password.clone(),
        tls: smtp.tls,
      };
      let mailer = SmtpMailer::new(&settings, &config.from_mailbox())
        .map_err(|e| io_error("Failed to configure SMTP", e))?;
      Ok(Arc::new(mailer))
    }
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "yamdb=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting YaMDb API");

  let config = Config::load().map_err(|e| io_error("Failed to load configuration", e))?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| io_error("Failed to run database migrations", e))?;
  tracing::info!("Database migrations completed");

  // Repositories
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let category_repo = Arc::new(PostgresCategoryRepository::new(db_pool.clone()));
  let genre_repo = Arc::new(PostgresGenreRepository::new(db_pool.clone()));
  let title_repo = Arc::new(PostgresTitleRepository::new(db_pool.clone()));
  let review_repo = Arc::new(PostgresReviewRepository::new(db_pool.clone()));
  let comment_repo = Arc::new(PostgresCommentRepository::new(db_pool.clone()));

  // Security and delivery
  let code_hasher =
    Arc::new(Argon2CodeHasher::new().map_err(|e| io_error("Failed to set up hasher", e))?);
  let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
    &config.security.jwt_secret,
    config.security.token_ttl_seconds,
  ));
  let mailer = build_mailer(&config.mail)?;

  // Services
  let auth_service = Arc::new(AuthService::new(
    user_repo.clone(),
    code_hasher,
    token_service,
    mailer,
  ));
  let user_service = Arc::new(UserService::new(user_repo));
  let catalog_service = Arc::new(CatalogService::new(
    category_repo,
    genre_repo,
    title_repo.clone(),
  ));
  let review_service = Arc::new(ReviewService::new(title_repo, review_repo, comment_repo));

  if let Some(bootstrap) = &config.bootstrap {
    let username = Username::new(bootstrap.admin_username.as_str())
      .map_err(|e| io_error("Invalid bootstrap admin username", e))?;
    let email = Email::new(bootstrap.admin_email.as_str())
      .map_err(|e| io_error("Invalid bootstrap admin email", e))?;
    let admin = user_service
      .ensure_admin(username, email)
      .await
      .map_err(|e| io_error("Failed to bootstrap admin", e))?;
    tracing::info!(username = %admin.username, "Admin account available");
  }

  let get_user_use_case = Arc::new(GetCurrentUserUseCase::new(auth_service.clone()));
  let use_cases = ApiUseCases::new(auth_service, user_service, catalog_service, review_service);

  let pagination = PaginationSettings {
    page_size: config.pagination.page_size,
  };
  let rate_limit = config.rate_limit.as_ref().map(|limit| AuthRateLimit {
    per_second: limit.per_second,
    burst_size: limit.burst_size,
  });

  let bind_address = format!("{}:{}", config.server.host, config.server.port);
  tracing::info!("Starting HTTP server on {}", bind_address);

  HttpServer::new(move || {
    let use_cases = use_cases.clone();

    App::new()
      .wrap(NormalizePath::trim())
      .wrap(Logger::default())
      // Outermost, so access logs carry the request id span
      .wrap(RequestIdMiddleware::new())
      .app_data(web::Data::new(db_pool.clone()))
      .app_data(web::Data::new(pagination))
      .route("/health", web::get().to(health_handler))
      .service(
        web::scope("/api/v1")
          .wrap(AuthMiddleware::new(get_user_use_case.clone()))
          .configure(move |cfg| configure_api(cfg, use_cases, rate_limit)),
      )
  })
  .bind(&bind_address)?
  .run()
  .await
}
