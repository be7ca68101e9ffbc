//! Account handlers: registration, login and the current user

pub mod auth;
pub mod users;

pub use auth::{login, me};
pub use users::register;
