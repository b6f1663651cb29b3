//! User accounts.

mod models;
mod repository;

pub use models::{NewUser, User, UserInfo, is_valid_role};
pub use repository::UserRepository;
