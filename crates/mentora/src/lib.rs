//! Mentora - education platform API server.
//!
//! A REST backend for an education platform: accounts and JWT auth, subject
//! and chapter content, quizzes, an AI tutor, a discussion forum, mentor
//! booking, leaderboards, and notifications. Storage is SQLite via sqlx;
//! the HTTP layer is axum.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod content;
pub mod db;
pub mod forum;
pub mod mentorship;
pub mod notification;
pub mod quiz;
pub mod settings;
pub mod tutor;
pub mod user;
