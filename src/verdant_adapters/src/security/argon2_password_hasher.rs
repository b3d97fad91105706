use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};
use verdant_core::{Password, PasswordHash, PasswordHasher, PasswordHasherError};

const MEMORY_COST_KIB: u32 = 15000;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash_password(&self, password: Password) -> Result<PasswordHash, PasswordHasherError> {
        let current_span: tracing::Span = tracing::Span::current();

        let result = tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt: SaltString = SaltString::generate(rand_core::OsRng);
                let hasher = Argon2::new(
                    Algorithm::Argon2id,
                    Version::V0x13,
                    Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, None)
                        .map_err(|e| e.to_string())?,
                );
                hasher
                    .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                    .map(|h| PasswordHash::new(Secret::from(h.to_string())))
                    .map_err(|e| e.to_string())
            })
        })
        .await
        .map_err(|e| PasswordHasherError(e.to_string()))?;

        result.map_err(PasswordHasherError)
    }
}
