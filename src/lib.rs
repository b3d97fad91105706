//! # Verdant - Account Service Library
//!
//! Facade crate re-exporting the public APIs of the account service
//! components: registration, email verification and password reset.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `EmailAddress`, `Confirmation`, `User`, etc.
//! - **Ports**: `UserStore`, `EmailClient`, `PasswordHasher`, `TokenGenerator`
//! - **Use cases**: `RegisterUserUseCase`, `ConfirmEmailUseCase`, etc.
//! - **Adapters**: `PostgresUserStore`, `Argon2PasswordHasher`, `PostmarkEmailClient`, etc.
//! - **Service**: `AccountService`, the axum router for all account routes

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use verdant_core::*;
}

pub use verdant_core::{
    Confirmation, Email, EmailAddress, EmailConfirmation, EmailError, Password, PasswordHash,
    PasswordResetConfirmation, User, UserError, UserId, Username,
};

// ============================================================================
// Ports
// ============================================================================

pub use verdant_core::{
    EmailClient, PasswordHasher, PasswordHasherError, TokenGenerator, UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use verdant_application::*;
}

pub use verdant_application::{
    ConfirmEmailUseCase, RegisterUserUseCase, RequestEmailConfirmationUseCase,
    RequestPasswordResetUseCase, ResetPasswordUseCase, VerificationPolicy,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers
    pub mod http {
        pub use verdant_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use verdant_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use verdant_adapters::email::*;
    }

    /// Password hashing and key generation
    pub mod security {
        pub use verdant_adapters::security::*;
    }

    /// Configuration
    pub mod config {
        pub use verdant_adapters::config::*;
    }
}

pub use verdant_adapters::{
    email::{MockEmailClient, PostmarkEmailClient},
    persistence::{HashMapUserStore, PostgresUserStore},
    security::{Argon2PasswordHasher, RandomTokenGenerator},
};

// ============================================================================
// Account Service (Main Entry Point)
// ============================================================================

pub use verdant_account_service::{AccountService, configure_postgresql, get_postgres_pool};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
