use rand::{Rng, distr::Alphanumeric};
use verdant_core::TokenGenerator;

pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Alphanumeric confirmation keys drawn from the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct RandomTokenGenerator {
    length: usize,
}

impl RandomTokenGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LENGTH)
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}
