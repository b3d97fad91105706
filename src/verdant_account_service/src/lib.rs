mod account_service;
mod helpers;
mod telemetry;

pub use account_service::AccountService;
pub use helpers::{configure_postgresql, get_postgres_pool};
pub use telemetry::{init_tracing, make_span_with_request_id, on_request, on_response};

// Re-export commonly used types
pub use verdant_core::{EmailClient, PasswordHasher, TokenGenerator, UserStore};
