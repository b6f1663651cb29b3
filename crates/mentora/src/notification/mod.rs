//! Notifications.

mod models;
mod repository;

pub use models::{Notification, kinds};
pub use repository::NotificationRepository;
