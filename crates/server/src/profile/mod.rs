//! Profiles: upsert, experience/education lists, account deletion and the
//! GitHub lookup

pub mod github;
pub mod handlers;

pub use handlers::{
    add_education, add_experience, delete_account, delete_education, delete_experience,
    get_by_user, get_github_profile, get_me, list_profiles, upsert_profile,
};
