mod confirm_email;
mod helpers;
mod password_reset;
mod register_user;
