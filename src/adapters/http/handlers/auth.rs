use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{SendCodeRequest, TokenRequest, TokenResponse},
  errors::ApiError,
};
use crate::application::auth::{
  ObtainTokenCommand, ObtainTokenUseCase, SendConfirmationCodeCommand,
  SendConfirmationCodeUseCase,
};

/// Handler for requesting a confirmation code
///
/// POST /api/v1/auth/email/
/// Body: SendCodeRequest (JSON)
/// Response: confirmation message as a JSON string with status 200
pub async fn send_code_handler(
  request: web::Json<SendCodeRequest>,
  use_case: web::Data<Arc<SendConfirmationCodeUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let response = use_case
    .execute(SendConfirmationCodeCommand {
      email: request.email,
      username: request.username,
    })
    .await?;

  Ok(HttpResponse::Ok().json(response.message()))
}

/// Handler for exchanging a confirmation code for a token
///
/// POST /api/v1/auth/token/
/// Body: TokenRequest (JSON)
/// Response: TokenResponse (JSON) with status 200
pub async fn obtain_token_handler(
  request: web::Json<TokenRequest>,
  use_case: web::Data<Arc<ObtainTokenUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let response = use_case
    .execute(ObtainTokenCommand {
      email: request.email,
      confirmation_code: request.confirmation_code,
    })
    .await?;

  Ok(HttpResponse::Ok().json(TokenResponse {
    token: response.token,
  }))
}
