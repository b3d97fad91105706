use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use verdant_core::{EmailAddress, User, UserId, UserStore, UserStoreError};

#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Whether `candidate` shares a username or address with a different user.
fn collides(existing: &User, candidate: &User) -> bool {
    existing.id() != candidate.id()
        && (existing.username() == candidate.username()
            || candidate
                .emails()
                .iter()
                .any(|email| existing.owns_address(email.address())))
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    #[tracing::instrument(name = "Adding user to HashMap store", skip_all)]
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id()) || users.values().any(|u| collides(u, &user)) {
            return Err(UserStoreError::UserAlreadyExists);
        }
        users.insert(user.id(), user);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users.get(id).cloned().ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_email(&self, address: &EmailAddress) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .values()
            .find(|user| user.owns_address(address))
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    #[tracing::instrument(name = "Updating user in HashMap store", skip_all)]
    async fn update_user(&self, mut user: User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;

        let stored = users.get(&user.id()).ok_or(UserStoreError::UserNotFound)?;
        if stored.version() != user.version() {
            return Err(UserStoreError::VersionConflict);
        }
        if users.values().any(|u| collides(u, &user)) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        user.mark_persisted();
        users.insert(user.id(), user);
        Ok(())
    }
}
