//! Posts with likes and comments

pub mod handlers;

pub use handlers::{
    add_comment, create_post, delete_comment, delete_post, get_post, like_post, list_posts,
    unlike_post,
};
