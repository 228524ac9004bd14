use async_trait::async_trait;

use crate::domain::auth::{entities::EmailMessage, errors::AuthError, ports::Mailer};

/// Writes outgoing mail to the log instead of delivering it
///
/// Meant for local development, where the confirmation code is read from
/// the server output.
pub struct ConsoleMailer {
  from: String,
}

impl ConsoleMailer {
  pub fn new(from: impl Into<String>) -> Self {
    Self { from: from.into() }
  }
}

#[async_trait]
impl Mailer for ConsoleMailer {
  async fn send(&self, message: EmailMessage) -> Result<(), AuthError> {
    tracing::info!(
      from = %self.from,
      to = %message.to,
      subject = %message.subject,
      body = %message.body,
      "Outgoing mail"
    );
    Ok(())
  }
}
