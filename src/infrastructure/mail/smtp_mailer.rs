use async_trait::async_trait;
use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::{Mailbox, header::ContentType},
  transport::smtp::authentication::Credentials,
};

use crate::domain::auth::{
  entities::EmailMessage,
  errors::{AuthError, MailError},
  ports::Mailer,
};

/// Connection settings for the SMTP relay
#[derive(Debug, Clone)]
pub struct SmtpSettings {
  pub host: String,
  pub port: u16,
  pub username: Option<String>,
  pub password: Option<String>,
  /// Plain connection when false (local catch-all servers)
  pub tls: bool,
}

/// Delivers mail through an SMTP relay
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
}

impl SmtpMailer {
  /// `from` is a mailbox such as `Yamdb.ru <admin@yamdb.ru>`
  pub fn new(settings: &SmtpSettings, from: &str) -> Result<Self, MailError> {
    let from = from
      .parse::<Mailbox>()
      .map_err(|e| MailError::InvalidAddress(format!("{}: {}", from, e)))?;

    let builder = if settings.tls {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        .map_err(|e| MailError::SendFailed(e.to_string()))?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
    };

    let mut builder = builder.port(settings.port);
    if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
      builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    Ok(Self {
      transport: builder.build(),
      from,
    })
  }

  fn build_message(&self, message: EmailMessage) -> Result<Message, MailError> {
    let to = message
      .to
      .parse::<Mailbox>()
      .map_err(|e| MailError::InvalidAddress(format!("{}: {}", message.to, e)))?;

    Message::builder()
      .from(self.from.clone())
      .to(to)
      .subject(message.subject)
      .header(ContentType::TEXT_PLAIN)
      .body(message.body)
      .map_err(|e| MailError::BuildFailed(e.to_string()))
  }
}

#[async_trait]
impl Mailer for SmtpMailer {
  async fn send(&self, message: EmailMessage) -> Result<(), AuthError> {
    let to = message.to.clone();
    let email = self.build_message(message)?;

    self.transport.send(email).await.map_err(|e| {
      tracing::error!(error = %e, to = %to, "SMTP delivery failed");
      MailError::SendFailed(e.to_string())
    })?;

    tracing::debug!(to = %to, "Mail delivered");
    Ok(())
  }
}
