//! API handlers, grouped by domain.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod content;
pub mod forum;
pub mod mentors;
pub mod misc;
pub mod notifications;
pub mod quizzes;
pub mod tutor;
