pub mod confirm_email;
pub mod register_user;
pub mod request_email_confirmation;
pub mod request_password_reset;
pub mod reset_password;

pub use confirm_email::{ConfirmEmailError, ConfirmEmailUseCase};
pub use register_user::{RegisterUserError, RegisterUserUseCase};
pub use request_email_confirmation::{
    RequestEmailConfirmationError, RequestEmailConfirmationUseCase,
};
pub use request_password_reset::{RequestPasswordResetError, RequestPasswordResetUseCase};
pub use reset_password::{ResetPasswordError, ResetPasswordUseCase};
