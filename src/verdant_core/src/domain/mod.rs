pub mod confirmation;
pub mod email;
pub mod email_address;
pub mod password;
pub mod user;
pub mod username;
