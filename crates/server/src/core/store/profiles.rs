use anyhow::Result;
use std::path::Path;

use super::{Collection, Document};
use crate::core::models::{Profile, ProfileInput};

impl Document for Profile {
    const COLLECTION: &'static str = "profiles";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Profiles, at most one per user
pub struct ProfileStore {
    profiles: Collection<Profile>,
}

impl ProfileStore {
    pub async fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            profiles: Collection::open(data_dir).await?,
        })
    }

    /// Merge `input` into the user's profile, creating it if absent
    pub async fn upsert(&self, user_id: &str, input: ProfileInput) -> Result<Profile> {
        let merge = input.clone();
        self.profiles
            .upsert(
                |p| p.user == user_id,
                move |p| p.apply(merge),
                move || Profile::create(user_id, input),
            )
            .await
    }

    pub async fn find_by_user(&self, user_id: &str) -> Option<Profile> {
        self.profiles.find_one(|p| p.user == user_id).await
    }

    /// All profiles, newest first
    pub async fn all(&self) -> Vec<Profile> {
        let mut profiles = self.profiles.all().await;
        profiles.sort_by(|a, b| b.details.date.cmp(&a.details.date));
        profiles
    }

    /// Mutate the user's profile atomically; `Ok(None)` if they have none
    pub async fn update_by_user<T, E>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut Profile) -> std::result::Result<T, E>,
    ) -> std::result::Result<Option<(Profile, T)>, E>
    where
        E: From<anyhow::Error>,
    {
        self.profiles.update_where(|p| p.user == user_id, f).await
    }

    pub async fn delete_by_user(&self, user_id: &str) -> Result<usize> {
        self.profiles.delete_where(|p| p.user == user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn input(skills: &str) -> ProfileInput {
        ProfileInput {
            status: "Developer".into(),
            skills: skills.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_profile_per_user() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::open(temp_dir.path()).await.unwrap();

        let first = store.upsert("u1", input("a")).await.unwrap();
        let second = store.upsert("u1", input("b, c")).await.unwrap();
        store.upsert("u2", input("d")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.details.skills, vec!["b", "c"]);
        assert_eq!(store.all().await.len(), 2);
        assert_eq!(store.find_by_user("u1").await.unwrap().details.skills, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_by_user() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::open(temp_dir.path()).await.unwrap();
        store.upsert("u1", input("a")).await.unwrap();

        let updated: std::result::Result<_, anyhow::Error> = store
            .update_by_user("u1", |p| {
                p.details.bio = Some("hi".into());
                Ok(())
            })
            .await;
        assert_eq!(updated.unwrap().unwrap().0.details.bio.as_deref(), Some("hi"));

        let missing: std::result::Result<_, anyhow::Error> =
            store.update_by_user("u2", |_| Ok(())).await;
        assert!(missing.unwrap().is_none());

        assert_eq!(store.delete_by_user("u1").await.unwrap(), 1);
        assert!(store.find_by_user("u1").await.is_none());
    }
}
