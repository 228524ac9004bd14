//! Page-number pagination for list endpoints.
//!
//! `?page=N` selects the page; `next` and `previous` links repeat the
//! original query with only the page number changed.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use super::dtos::PaginatedResponse;
use super::errors::ApiError;
use crate::domain::pagination::{Page, PageRequest};

const INVALID_PAGE: &str = "Invalid page.";

/// Page size applied to every listing
#[derive(Debug, Clone, Copy)]
pub struct PaginationSettings {
  pub page_size: u32,
}

impl Default for PaginationSettings {
  fn default() -> Self {
    Self { page_size: 10 }
  }
}

/// Reads `?page=` from the request; anything but a positive integer is 404
pub fn page_request(req: &HttpRequest) -> Result<PageRequest, ApiError> {
  let page_size = req
    .app_data::<web::Data<PaginationSettings>>()
    .map(|s| s.page_size)
    .unwrap_or_else(|| PaginationSettings::default().page_size);

  let pairs = query_pairs(req);
  let page = match pairs.iter().find(|(key, _)| key == "page") {
    None => 1,
    Some((_, value)) => match value.parse::<u32>() {
      Ok(page) if page >= 1 => page,
      _ => return Err(ApiError::not_found(INVALID_PAGE)),
    },
  };

  Ok(PageRequest::new(page, page_size))
}

/// Renders a page in the `{count, next, previous, results}` envelope
pub fn paginated<T: Serialize>(req: &HttpRequest, page: Page<T>) -> Result<HttpResponse, ApiError> {
  if page.is_out_of_range() {
    return Err(ApiError::not_found(INVALID_PAGE));
  }

  let current = page.request.page;
  let next = page.has_next().then(|| page_url(req, Some(current + 1)));
  let previous = page.has_previous().then(|| {
    // The first page is addressed without a page parameter
    let target = current - 1;
    page_url(req, (target > 1).then_some(target))
  });

  Ok(HttpResponse::Ok().json(PaginatedResponse {
    count: page.total,
    next,
    previous,
    results: page.items,
  }))
}

fn query_pairs(req: &HttpRequest) -> Vec<(String, String)> {
  serde_urlencoded::from_str(req.query_string()).unwrap_or_default()
}

fn page_url(req: &HttpRequest, page: Option<u32>) -> String {
  let mut pairs: Vec<(String, String)> = query_pairs(req)
    .into_iter()
    .filter(|(key, _)| key != "page")
    .collect();
  if let Some(page) = page {
    pairs.push(("page".to_string(), page.to_string()));
  }

  let info = req.connection_info();
  let base = format!("{}://{}{}", info.scheme(), info.host(), req.path());

  match serde_urlencoded::to_string(&pairs) {
    Ok(query) if !query.is_empty() => format!("{}?{}", base, query),
    _ => base,
  }
}
