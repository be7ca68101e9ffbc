use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::{Collection, Document};
use crate::core::models::User;

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Account records, unique by email
pub struct UserStore {
    users: Collection<User>,
}

impl UserStore {
    pub async fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            users: Collection::open(data_dir).await?,
        })
    }

    /// Persist `user` unless its email is taken. Returns `false` on a duplicate.
    pub async fn create(&self, user: User) -> Result<bool> {
        let email = user.email.clone();
        let created = self
            .users
            .insert_unless(user, |existing| existing.email == email)
            .await?;
        if created {
            info!("[Users] Registered {}", email);
        }
        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.get(id).await
    }

    /// Lookup by already-normalised email
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.find_one(|u| u.email == email).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<User>> {
        self.users.delete(id).await
    }

    pub async fn count(&self) -> usize {
        self.users.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            name: "A".into(),
            email: email.into(),
            password: "hash".into(),
            avatar: String::new(),
            date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::open(temp_dir.path()).await.unwrap();

        assert!(store.create(user("u1", "a@x.com")).await.unwrap());
        assert!(!store.create(user("u2", "a@x.com")).await.unwrap());
        assert_eq!(store.count().await, 1);
        assert_eq!(store.find_by_email("a@x.com").await.unwrap().id, "u1");
        assert!(store.find_by_id("u2").await.is_none());
    }
}
