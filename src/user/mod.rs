pub mod auth;
pub mod permissions;
pub mod user_models;
mod user_store;

pub use auth::AuthTokenValue;
pub use permissions::PermissionGrant;
pub use user_models::{Principal, ANONYMOUS_USER_ID};
pub use user_store::{InMemoryUserStore, UserStore};
