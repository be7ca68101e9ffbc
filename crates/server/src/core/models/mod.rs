//! Document types stored in the collections, plus their request bodies

pub mod post;
pub mod profile;
pub mod user;

pub use post::{Comment, CreateCommentInput, CreatePostInput, Like, Post};
pub use profile::{
    EducationInput, Education, Experience, ExperienceInput, Profile, ProfileDetails,
    ProfileInput, ProfileView, Socials,
};
pub use user::{LoginInput, RegisterInput, User, UserInfo, UserSummary};

use uuid::Uuid;

/// Fresh document identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Canonical form of a client-supplied identifier, or `None` if it cannot name a document
pub fn parse_id(raw: &str) -> Option<String> {
    Uuid::parse_str(raw).ok().map(|id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = new_id();
        assert_eq!(parse_id(&id), Some(id.clone()));
        assert_eq!(parse_id(&id.to_uppercase()), Some(id));
        assert_eq!(parse_id("5f8d0d55b54764421b7156c9"), None);
        assert_eq!(parse_id(""), None);
    }
}
