//! Discussion forum.

mod models;
mod repository;

pub use models::{ForumReply, ForumThread, ThreadSummary};
pub use repository::ForumRepository;
