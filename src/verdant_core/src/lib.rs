pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    confirmation::{
        Confirmation, ConfirmationKind, EmailConfirmation, EmailVerification, PasswordReset,
        PasswordResetConfirmation,
    },
    email::{Email, EmailError},
    email_address::{EmailAddress, EmailAddressError},
    password::{Password, PasswordError, PasswordHash},
    user::{User, UserError, UserId, UserParts},
    username::{Username, UsernameError},
};

pub use ports::{
    repositories::{UserStore, UserStoreError},
    services::{EmailClient, PasswordHasher, PasswordHasherError, TokenGenerator},
};
