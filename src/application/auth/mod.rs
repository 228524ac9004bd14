//! Authentication use cases

mod get_current_user;
mod obtain_token;
mod send_confirmation_code;

pub use get_current_user::GetCurrentUserUseCase;
pub use obtain_token::{ObtainTokenCommand, ObtainTokenResponse, ObtainTokenUseCase};
pub use send_confirmation_code::{
  SendConfirmationCodeCommand, SendConfirmationCodeResponse, SendConfirmationCodeUseCase,
};
