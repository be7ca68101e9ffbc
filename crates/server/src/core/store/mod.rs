//! Document storage
//!
//! One [`Collection`] per document type, wrapped by a store exposing the
//! queries the handlers need.

pub mod collection;
pub mod posts;
pub mod profiles;
pub mod users;

pub use collection::{Collection, Document};
pub use posts::PostStore;
pub use profiles::ProfileStore;
pub use users::UserStore;
