pub mod argon2_password_hasher;
pub mod random_token_generator;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use random_token_generator::RandomTokenGenerator;
