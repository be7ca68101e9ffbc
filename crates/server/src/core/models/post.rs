use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{new_id, User};
use crate::core::validate::not_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// A post; `name` and `avatar` are snapshots of the author at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    /// At most one entry per user, most recent first
    #[serde(default)]
    pub likes: Vec<Like>,
    /// Most recent first
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

impl Post {
    pub fn new(author: &User, text: &str) -> Self {
        Self {
            id: new_id(),
            user: author.id.clone(),
            text: text.trim().to_string(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user == user_id)
    }

    /// Prepend a like; `false` if `user_id` already liked the post
    pub fn like(&mut self, user_id: &str) -> bool {
        if self.is_liked_by(user_id) {
            return false;
        }
        self.likes.insert(
            0,
            Like {
                user: user_id.to_string(),
            },
        );
        true
    }

    /// Drop the like by `user_id`; `false` if there was none
    pub fn unlike(&mut self, user_id: &str) -> bool {
        match self.likes.iter().position(|like| like.user == user_id) {
            Some(index) => {
                self.likes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Prepend a comment by `author`, snapshotting their name and avatar
    pub fn add_comment(&mut self, author: &User, text: &str) -> &Comment {
        self.comments.insert(
            0,
            Comment {
                id: new_id(),
                user: author.id.clone(),
                text: text.trim().to_string(),
                name: author.name.clone(),
                avatar: author.avatar.clone(),
                date: Utc::now(),
            },
        );
        &self.comments[0]
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Remove exactly the comment with `comment_id`
    pub fn remove_comment(&mut self, comment_id: &str) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == comment_id)?;
        Some(self.comments.remove(index))
    }
}

/// Body of `POST /api/posts`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreatePostInput {
    #[validate(custom(function = "not_blank", message = "Text is required"))]
    pub text: String,
}

/// Body of `POST /api/posts/comment/:id`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateCommentInput {
    #[validate(custom(function = "not_blank", message = "Text is required"))]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            name: name.into(),
            email: format!("{}@x.com", id),
            password: "hash".into(),
            avatar: format!("https://avatars/{}", id),
            date: Utc::now(),
        }
    }

    #[test]
    fn test_post_snapshots_author() {
        let mut author = user("u1", "Alice");
        let post = Post::new(&author, "  hello  ");
        author.name = "Renamed".into();
        assert_eq!(post.name, "Alice");
        assert_eq!(post.avatar, "https://avatars/u1");
        assert_eq!(post.text, "hello");
    }

    #[test]
    fn test_like_is_a_set() {
        let mut post = Post::new(&user("u1", "Alice"), "hi");
        assert!(post.like("u2"));
        assert!(!post.like("u2"));
        assert!(post.like("u3"));
        assert_eq!(post.likes.len(), 2);
        assert_eq!(post.likes[0].user, "u3");

        assert!(post.unlike("u2"));
        assert!(!post.unlike("u2"));
        assert_eq!(post.likes, vec![Like { user: "u3".into() }]);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let blank = CreatePostInput { text: " \n ".into() };
        assert!(blank.validate().is_err());
        let comment = CreateCommentInput { text: "ok".into() };
        assert!(comment.validate().is_ok());
    }

    #[test]
    fn test_remove_comment_removes_exact_entry() {
        let alice = user("u1", "Alice");
        let bob = user("u2", "Bob");
        let mut post = Post::new(&alice, "hi");

        let first = post.add_comment(&bob, "first").id.clone();
        let second = post.add_comment(&bob, "second").id.clone();
        post.add_comment(&alice, "third");
        assert_eq!(post.comments[0].text, "third");

        let removed = post.remove_comment(&first).unwrap();
        assert_eq!(removed.text, "first");
        let left: Vec<_> = post.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(left, vec!["third", "second"]);
        assert!(post.comment(&second).is_some());
        assert!(post.remove_comment(&first).is_none());
    }
}
