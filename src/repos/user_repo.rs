/*
 * Responsibility
 * - User lookup for the login flow (subject -> password hash + role)
 * - Storage strategy is not fixed: `UserDirectory` is the seam, the in-memory
 *   implementation backs the service and the tests
 */
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::auth::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub subject: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_subject(&self, subject: &str) -> Option<UserRow>;

    /// Insert or replace by subject.
    async fn save(&self, user: UserRow) -> UserRow;

    /// Returns whether a user was removed.
    async fn remove(&self, subject: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRow>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_subject(&self, subject: &str) -> Option<UserRow> {
        self.users.read().await.get(subject).cloned()
    }

    async fn save(&self, user: UserRow) -> UserRow {
        self.users
            .write()
            .await
            .insert(user.subject.clone(), user.clone());
        user
    }

    async fn remove(&self, subject: &str) -> bool {
        self.users.write().await.remove(subject).is_some()
    }
}
