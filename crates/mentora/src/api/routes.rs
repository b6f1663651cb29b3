//! API route definitions.
//!
//! Role gates are configured here, at route registration: the admin group
//! accepts `{ADMIN}`, the mentor group `{MENTOR, ADMIN}`. Everything outside
//! the public router sits behind the authenticator.

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::{RoleSet, auth_middleware, require_role, roles};

use super::handlers::{
    admin, analytics, auth, content, forum, mentors, misc, notifications, quizzes, tutor,
};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    // Tracing layer with request timing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Clone auth state for middleware
    let auth_state = state.auth.clone();

    // Public routes (no authentication)
    let public_routes = Router::new()
        .route("/health", get(misc::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Mentor routes (mentor or admin role)
    let mentor_routes = Router::new()
        .route("/mentorship/slots", post(mentors::create_slot))
        .route("/mentorship/slots/{slot_id}", delete(mentors::delete_slot))
        .route("/mentorship/bookings", get(mentors::mentor_bookings))
        .layer(middleware::from_fn_with_state(
            RoleSet::new([roles::MENTOR, roles::ADMIN]),
            require_role,
        ));

    // Admin routes (admin role only)
    let admin_routes = Router::new()
        // User management
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/{user_id}",
            get(admin::get_user).delete(admin::delete_user),
        )
        .route("/admin/users/{user_id}/role", put(admin::update_user_role))
        .route("/admin/users/{user_id}/activate", post(admin::activate_user))
        .route(
            "/admin/users/{user_id}/deactivate",
            post(admin::deactivate_user),
        )
        // Content authoring
        .route("/admin/subjects", post(content::create_subject))
        .route(
            "/admin/subjects/{subject_id}",
            put(content::update_subject).delete(content::delete_subject),
        )
        .route(
            "/admin/subjects/{subject_id}/chapters",
            post(content::create_chapter),
        )
        .route(
            "/admin/chapters/{chapter_id}",
            put(content::update_chapter).delete(content::delete_chapter),
        )
        .route(
            "/admin/chapters/{chapter_id}/questions",
            get(content::list_questions_admin).post(content::create_question),
        )
        .route(
            "/admin/questions/{question_id}",
            delete(content::delete_question),
        )
        // Platform analytics
        .route("/admin/analytics", get(admin::platform_analytics))
        .layer(middleware::from_fn_with_state(
            RoleSet::new([roles::ADMIN]),
            require_role,
        ));

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        // Account
        .route("/auth/me", get(auth::me).put(auth::update_profile))
        // Content delivery
        .route("/subjects", get(content::list_subjects))
        .route("/subjects/{subject_id}", get(content::get_subject))
        .route(
            "/subjects/{subject_id}/chapters",
            get(content::list_chapters),
        )
        .route("/chapters/{chapter_id}", get(content::get_chapter))
        .route(
            "/chapters/{chapter_id}/questions",
            get(content::list_questions),
        )
        // Quizzes
        .route(
            "/chapters/{chapter_id}/quiz",
            get(quizzes::get_quiz).post(quizzes::submit_quiz),
        )
        .route("/me/attempts", get(quizzes::my_attempts))
        .route("/me/summary", get(analytics::my_summary))
        // AI tutor
        .route(
            "/tutor/conversations",
            get(tutor::list_conversations).post(tutor::create_conversation),
        )
        .route(
            "/tutor/conversations/{conversation_id}",
            get(tutor::get_conversation).delete(tutor::delete_conversation),
        )
        .route(
            "/tutor/conversations/{conversation_id}/messages",
            post(tutor::send_message),
        )
        // Forum
        .route(
            "/forum/threads",
            get(forum::list_threads).post(forum::create_thread),
        )
        .route(
            "/forum/threads/{thread_id}",
            get(forum::get_thread).delete(forum::delete_thread),
        )
        .route("/forum/threads/{thread_id}/replies", post(forum::create_reply))
        // Mentors and bookings
        .route("/mentors", get(mentors::list_mentors))
        .route("/mentors/{mentor_id}/slots", get(mentors::list_mentor_slots))
        .route(
            "/bookings",
            get(mentors::my_bookings).post(mentors::create_booking),
        )
        .route("/bookings/{booking_id}/cancel", post(mentors::cancel_booking))
        // Leaderboard
        .route("/leaderboard", get(analytics::leaderboard))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route(
            "/notifications/{notification_id}/read",
            post(notifications::mark_read),
        )
        .merge(mentor_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
