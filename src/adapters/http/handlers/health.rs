use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::adapters::http::dtos::HealthResponse;

/// GET /health
///
/// Reports 503 when the database does not answer
pub async fn health_handler(pool: Option<web::Data<PgPool>>) -> HttpResponse {
  let database = match pool {
    Some(pool) => match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
      Ok(_) => "up",
      Err(e) => {
        tracing::warn!(error = %e, "Health check database probe failed");
        "down"
      }
    },
    None => "not configured",
  };

  let body = HealthResponse {
    status: if database == "down" { "degraded" } else { "ok" }.to_string(),
    database: database.to_string(),
  };

  if database == "down" {
    HttpResponse::ServiceUnavailable().json(body)
  } else {
    HttpResponse::Ok().json(body)
  }
}
