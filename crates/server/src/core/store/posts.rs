use anyhow::Result;
use std::path::Path;

use super::{Collection, Document};
use crate::core::models::Post;

impl Document for Post {
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Posts with their embedded likes and comments
pub struct PostStore {
    posts: Collection<Post>,
}

impl PostStore {
    pub async fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            posts: Collection::open(data_dir).await?,
        })
    }

    pub async fn insert(&self, post: Post) -> Result<Post> {
        self.posts.insert_unless(post.clone(), |_| false).await?;
        Ok(post)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Post> {
        self.posts.get(id).await
    }

    /// All posts, newest first
    pub async fn all(&self) -> Vec<Post> {
        let mut posts = self.posts.all().await;
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    /// Mutate one post atomically; `Ok(None)` if it does not exist
    pub async fn update<T, E>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Post) -> std::result::Result<T, E>,
    ) -> std::result::Result<Option<(Post, T)>, E>
    where
        E: From<anyhow::Error>,
    {
        self.posts.update(id, f).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Post>> {
        self.posts.delete(id).await
    }

    pub async fn delete_by_author(&self, user_id: &str) -> Result<usize> {
        self.posts.delete_where(|p| p.user == user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::User;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn author(id: &str) -> User {
        User {
            id: id.into(),
            name: id.to_uppercase(),
            email: format!("{}@x.com", id),
            password: "hash".into(),
            avatar: String::new(),
            date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_all_is_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = PostStore::open(temp_dir.path()).await.unwrap();

        let mut old = Post::new(&author("u1"), "old");
        old.date = Utc::now() - Duration::days(1);
        store.insert(old).await.unwrap();
        store.insert(Post::new(&author("u1"), "new")).await.unwrap();

        let texts: Vec<_> = store.all().await.into_iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_delete_by_author() {
        let temp_dir = TempDir::new().unwrap();
        let store = PostStore::open(temp_dir.path()).await.unwrap();
        store.insert(Post::new(&author("u1"), "a")).await.unwrap();
        store.insert(Post::new(&author("u1"), "b")).await.unwrap();
        let kept = store.insert(Post::new(&author("u2"), "c")).await.unwrap();

        assert_eq!(store.delete_by_author("u1").await.unwrap(), 2);
        assert_eq!(store.all().await, vec![kept]);
    }
}
