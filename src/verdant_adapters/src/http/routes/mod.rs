pub mod email_confirmation;
pub mod error;
pub mod password_reset;
pub mod register_user;
pub mod responses;

pub use email_confirmation::{
    ConfirmEmailRequest, EmailConfirmationRequest, confirm_email, request_email_confirmation,
};
pub use error::{AccountApiError, ErrorResponse};
pub use password_reset::{
    PasswordResetRequest, ResetPasswordRequest, request_password_reset, reset_password,
};
pub use register_user::{RegisterUserRequest, register_user};
pub use responses::{EmailDetail, UserSelfDetail};
