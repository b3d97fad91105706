//! Port doubles shared by the use case tests.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;
use url::Url;
use verdant_core::{
    EmailAddress, EmailClient, Password, PasswordHash, PasswordHasher, PasswordHasherError,
    TokenGenerator, User, UserId, UserStore, UserStoreError, Username,
};

use crate::policy::VerificationPolicy;

pub fn policy() -> VerificationPolicy {
    VerificationPolicy::new(24, 2, Url::parse("https://verdant.test/").unwrap())
}

pub fn address(value: &str) -> EmailAddress {
    EmailAddress::try_from(value).unwrap()
}

pub fn username(value: &str) -> Username {
    Username::try_from(value.to_string()).unwrap()
}

pub fn password(value: &str) -> Password {
    Password::try_from(Secret::from(value.to_string())).unwrap()
}

#[derive(Clone, Default)]
pub struct MockUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl MockUserStore {
    pub async fn with_user(user: User) -> Self {
        let store = Self::default();
        store.users.write().await.insert(user.id(), user);
        store
    }
}

#[async_trait::async_trait]
impl UserStore for MockUserStore {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let taken = users.values().any(|existing| {
            existing.username() == user.username()
                || user.emails().iter().any(|e| existing.owns_address(e.address()))
        });
        if taken {
            return Err(UserStoreError::UserAlreadyExists);
        }
        users.insert(user.id(), user);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_email(&self, address: &EmailAddress) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .values()
            .find(|user| user.owns_address(address))
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn update_user(&self, mut user: User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let stored = users.get(&user.id()).ok_or(UserStoreError::UserNotFound)?;
        if stored.version() != user.version() {
            return Err(UserStoreError::VersionConflict);
        }
        user.mark_persisted();
        users.insert(user.id(), user);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct PrefixPasswordHasher;

#[async_trait::async_trait]
impl PasswordHasher for PrefixPasswordHasher {
    async fn hash_password(&self, password: Password) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(Secret::from(format!(
            "hashed:{}",
            password.as_ref().expose_secret()
        ))))
    }
}

/// Yields `token-1`, `token-2`, ...
#[derive(Clone, Default)]
pub struct SequenceTokenGenerator {
    next: Arc<AtomicUsize>,
}

impl TokenGenerator for SequenceTokenGenerator {
    fn generate(&self) -> String {
        format!("token-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

#[derive(Clone, Default)]
pub struct RecordingEmailClient {
    sent: Arc<RwLock<Vec<SentEmail>>>,
    fail: bool,
}

impl RecordingEmailClient {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        if self.fail {
            return Err("mail server unavailable".to_string());
        }
        self.sent.write().await.push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}
