//! Application state shared across handlers.

use std::sync::Arc;

use crate::analytics::AnalyticsRepository;
use crate::auth::AuthState;
use crate::content::ContentRepository;
use crate::db::Database;
use crate::forum::ForumRepository;
use crate::mentorship::MentorshipRepository;
use crate::notification::NotificationRepository;
use crate::quiz::QuizRepository;
use crate::tutor::{TutorBackend, TutorRepository};
use crate::user::UserRepository;

/// Shared application state. Clone-cheap: repositories hold pool handles and
/// the tutor backend sits behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthState,
    pub users: UserRepository,
    pub content: ContentRepository,
    pub quizzes: QuizRepository,
    pub tutor: TutorRepository,
    pub tutor_backend: Arc<dyn TutorBackend>,
    pub forum: ForumRepository,
    pub mentorship: MentorshipRepository,
    pub notifications: NotificationRepository,
    pub analytics: AnalyticsRepository,
    /// Allowed CORS origins from config.
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Wire up all repositories over one database.
    pub fn new(
        db: Database,
        auth: AuthState,
        tutor_backend: Arc<dyn TutorBackend>,
        allowed_origins: Vec<String>,
    ) -> Self {
        let pool = db.pool().clone();

        Self {
            auth,
            users: UserRepository::new(pool.clone()),
            content: ContentRepository::new(pool.clone()),
            quizzes: QuizRepository::new(pool.clone()),
            tutor: TutorRepository::new(pool.clone()),
            tutor_backend,
            forum: ForumRepository::new(pool.clone()),
            mentorship: MentorshipRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            analytics: AnalyticsRepository::new(pool),
            allowed_origins,
            db,
        }
    }
}
