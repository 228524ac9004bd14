use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::{
  entities::User, errors::AuthError, ports::TokenService, value_objects::AccessToken,
};

const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  token_type: String,
  user_id: Uuid,
  exp: i64,
  iat: i64,
  jti: Uuid,
}

/// HS256 access tokens signed with a shared secret
pub struct JwtTokenService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  ttl: Duration,
}

impl JwtTokenService {
  pub fn new(secret: &str, ttl_seconds: i64) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      ttl: Duration::seconds(ttl_seconds),
    }
  }
}

impl TokenService for JwtTokenService {
  fn issue(&self, user: &User) -> Result<AccessToken, AuthError> {
    let now = Utc::now();
    let claims = Claims {
      token_type: ACCESS_TOKEN_TYPE.to_string(),
      user_id: user.id,
      exp: (now + self.ttl).timestamp(),
      iat: now.timestamp(),
      jti: Uuid::new_v4(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map(AccessToken::new)
      .map_err(|e| AuthError::Token(e.to_string()))
  }

  fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
    let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
      tracing::debug!(error = %e, "Token rejected");
      AuthError::InvalidToken
    })?;

    if data.claims.token_type != ACCESS_TOKEN_TYPE {
      return Err(AuthError::InvalidToken);
    }

    Ok(data.claims.user_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::{Email, UserRole, Username};

  fn user() -> User {
    User::new(
      Username::new("critic").unwrap(),
      Email::new("critic@example.com").unwrap(),
      UserRole::User,
    )
  }

  #[test]
  fn test_issued_token_verifies_to_user_id() {
    let service = JwtTokenService::new("test-secret", 3600);
    let user = user();

    let token = service.issue(&user).unwrap();

    assert_eq!(token.as_str().split('.').count(), 3);
    assert_eq!(service.verify(token.as_str()).unwrap(), user.id);
  }

  #[test]
  fn test_token_signed_with_other_secret_is_rejected() {
    let issuer = JwtTokenService::new("secret-a", 3600);
    let verifier = JwtTokenService::new("secret-b", 3600);

    let token = issuer.issue(&user()).unwrap();

    assert!(matches!(
      verifier.verify(token.as_str()),
      Err(AuthError::InvalidToken)
    ));
  }

  #[test]
  fn test_expired_token_is_rejected() {
    let service = JwtTokenService::new("test-secret", -60);

    let token = service.issue(&user()).unwrap();

    assert!(matches!(
      service.verify(token.as_str()),
      Err(AuthError::InvalidToken)
    ));
  }

  #[test]
  fn test_garbage_is_rejected() {
    let service = JwtTokenService::new("test-secret", 3600);

    assert!(service.verify("not.a.token").is_err());
  }
}
