pub mod console_mailer;
pub mod smtp_mailer;

pub use console_mailer::ConsoleMailer;
pub use smtp_mailer::{SmtpMailer, SmtpSettings};
