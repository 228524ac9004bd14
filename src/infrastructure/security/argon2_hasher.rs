use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier},
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::ConfirmationCodeHasher;
use crate::domain::auth::value_objects::ConfirmationCode;

/// Argon2id hasher for confirmation codes
///
/// Codes are only ever stored as PHC strings. Parameters:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
pub struct Argon2CodeHasher {
  argon2: Argon2<'static>,
}

impl Argon2CodeHasher {
  pub fn new() -> Result<Self, AuthError> {
    let params = Params::new(19456, 2, 1, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }
}

#[async_trait]
impl ConfirmationCodeHasher for Argon2CodeHasher {
  async fn hash(&self, code: &ConfirmationCode) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = self
      .argon2
      .hash_password(code.as_str().as_bytes(), &salt)
      .map_err(|e| AuthError::Hash(HashError::from(e)))?;

    Ok(hash.to_string())
  }

  /// `Ok(false)` on mismatch, an error only when `hash` is not a PHC string
  async fn verify(&self, code: &ConfirmationCode, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::Hash(HashError::InvalidFormat))?;

    match self.argon2.verify_password(code.as_str().as_bytes(), &parsed) {
      Ok(()) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(AuthError::Hash(HashError::from(e))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_hash_is_argon2id() {
    let hasher = Argon2CodeHasher::new().unwrap();
    let code = ConfirmationCode::generate();

    let hash = hasher.hash(&code).await.unwrap();

    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains(code.as_str()));
  }

  #[tokio::test]
  async fn test_verify_matching_and_wrong_code() {
    let hasher = Argon2CodeHasher::new().unwrap();
    let code = ConfirmationCode::generate();
    let hash = hasher.hash(&code).await.unwrap();

    assert!(hasher.verify(&code, &hash).await.unwrap());
    assert!(
      !hasher
        .verify(&ConfirmationCode::from_string("guess"), &hash)
        .await
        .unwrap()
    );
  }

  #[tokio::test]
  async fn test_same_code_gets_different_salts() {
    let hasher = Argon2CodeHasher::new().unwrap();
    let code = ConfirmationCode::from_string("fixed-code");

    let first = hasher.hash(&code).await.unwrap();
    let second = hasher.hash(&code).await.unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify(&code, &second).await.unwrap());
  }

  #[tokio::test]
  async fn test_verify_rejects_malformed_hash() {
    let hasher = Argon2CodeHasher::new().unwrap();
    let code = ConfirmationCode::generate();

    let result = hasher.verify(&code, "not-a-phc-string").await;

    assert!(matches!(result, Err(AuthError::Hash(HashError::InvalidFormat))));
  }
}
