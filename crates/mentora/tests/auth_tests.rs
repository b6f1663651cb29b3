//! Authentication and authorization integration tests.
//!
//! These exercise the bearer-token pipeline end to end over the router:
//! header parsing, token validation, the exact error bodies clients key on,
//! and the role gates on the admin and mentor route groups.

use axum::http::{StatusCode, header};
use axum::{
    body::Body,
    http::{Method, Request},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use tower::ServiceExt;

use mentora::auth::Claims;
use mentora::user::NewUser;

mod common;
use common::{TEST_JWT_SECRET, body_json, get, post_json, seed_user, test_app};

fn make_token(secret: &str, claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encode token")
}

fn claims_for(id: Option<&str>, user_id: Option<&str>, role: &str, exp: i64) -> Claims {
    Claims {
        id: id.map(str::to_string),
        user_id: user_id.map(str::to_string),
        role: role.to_string(),
        exp,
        iat: None,
    }
}

fn in_an_hour() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

/// Health endpoint works without authentication.
#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let response = app.router().oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_missing_token() {
    let app = test_app().await;

    let response = app.router().oneshot(get("/subjects", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "No token provided");
}

/// "Bearer" with nothing after it is treated the same as no header at all.
#[tokio::test]
async fn test_bearer_without_token() {
    let app = test_app().await;

    let request = Request::builder()
        .uri("/subjects")
        .method(Method::GET)
        .header(header::AUTHORIZATION, "Bearer ")
        .body(Body::empty())
        .unwrap();

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "No token provided");
}

#[tokio::test]
async fn test_garbage_token() {
    let app = test_app().await;

    let response = app
        .router()
        .oneshot(get("/subjects", Some("not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid token");
}

/// A token that expired even one second ago is rejected; no leeway.
#[tokio::test]
async fn test_expired_token() {
    let app = test_app().await;

    let expired = chrono::Utc::now().timestamp() - 1;
    let token = make_token(
        TEST_JWT_SECRET,
        &claims_for(Some("u1"), None, "STUDENT", expired),
    );

    let response = app
        .router()
        .oneshot(get("/subjects", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid token");
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret() {
    let app = test_app().await;

    let token = make_token(
        "a-different-secret-that-is-also-32-chars",
        &claims_for(Some("u1"), None, "STUDENT", in_an_hour()),
    );

    let response = app
        .router()
        .oneshot(get("/subjects", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid token");
}

/// A well-signed token carrying neither subject field is its own error case.
#[tokio::test]
async fn test_token_missing_subject() {
    let app = test_app().await;

    let token = make_token(
        TEST_JWT_SECRET,
        &claims_for(None, None, "STUDENT", in_an_hour()),
    );

    let response = app
        .router()
        .oneshot(get("/subjects", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Token invalid: Missing user ID");
}

/// Tokens issued by older deployments carry the subject as `userId`.
#[tokio::test]
async fn test_legacy_user_id_claim_accepted() {
    let app = test_app().await;

    let token = make_token(
        TEST_JWT_SECRET,
        &claims_for(None, Some("legacy-7"), "STUDENT", in_an_hour()),
    );

    let response = app
        .router()
        .oneshot(get("/auth/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["subject_id"], "legacy-7");
}

/// When both subject fields are present, `id` wins.
#[tokio::test]
async fn test_id_claim_takes_precedence() {
    let app = test_app().await;

    let token = make_token(
        TEST_JWT_SECRET,
        &claims_for(Some("primary"), Some("legacy"), "STUDENT", in_an_hour()),
    );

    let response = app
        .router()
        .oneshot(get("/auth/me", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["subject_id"], "primary");
}

#[tokio::test]
async fn test_student_rejected_from_admin_routes() {
    let app = test_app().await;
    let (_, token) = seed_user(&app.state, "student1", "STUDENT").await;

    let response = app
        .router()
        .oneshot(get("/admin/users", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User role is not authorized");
}

#[tokio::test]
async fn test_mentor_rejected_from_admin_routes() {
    let app = test_app().await;
    let (_, token) = seed_user(&app.state, "mentor1", "MENTOR").await;

    let response = app
        .router()
        .oneshot(get("/admin/users", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User role is not authorized");
}

#[tokio::test]
async fn test_admin_allowed_on_admin_routes() {
    let app = test_app().await;
    let (_, token) = seed_user(&app.state, "admin1", "ADMIN").await;

    let response = app
        .router()
        .oneshot(get("/admin/users", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Role comparison is exact; "Admin" is not "ADMIN".
#[tokio::test]
async fn test_role_comparison_is_case_sensitive() {
    let app = test_app().await;

    let token = make_token(
        TEST_JWT_SECRET,
        &claims_for(Some("u1"), None, "Admin", in_an_hour()),
    );

    let response = app
        .router()
        .oneshot(get("/admin/users", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User role is not authorized");
}

/// The mentor group admits both mentors and admins.
#[tokio::test]
async fn test_mentor_group_admits_mentor_and_admin() {
    let app = test_app().await;
    let (_, mentor_token) = seed_user(&app.state, "mentor2", "MENTOR").await;
    let (_, admin_token) = seed_user(&app.state, "admin2", "ADMIN").await;
    let (_, student_token) = seed_user(&app.state, "student2", "STUDENT").await;

    let slot = json!({
        "starts_at": "2026-09-01 10:00:00",
        "ends_at": "2026-09-01 11:00:00",
        "topic": "Fractions",
    });

    let response = app
        .router()
        .oneshot(post_json("/mentorship/slots", Some(&mentor_token), slot.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router()
        .oneshot(post_json("/mentorship/slots", Some(&admin_token), slot.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router()
        .oneshot(post_json("/mentorship/slots", Some(&student_token), slot))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_and_login() {
    let app = test_app().await;

    let response = app
        .router()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({
                "username": "newstudent",
                "email": "newstudent@example.com",
                "password": "correct-horse-battery",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["role"], "STUDENT");

    let response = app
        .router()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({
                "username": "newstudent",
                "password": "correct-horse-battery",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["token"].as_str().unwrap().to_string();

    // The issued token works against protected routes
    let response = app
        .router()
        .oneshot(get("/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], "newstudent");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = test_app().await;
    seed_user(&app.state, "taken", "STUDENT").await;

    let response = app
        .router()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({
                "username": "taken",
                "email": "other@example.com",
                "password": "long-enough-password",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Registrations racing past the duplicate pre-checks are settled by the
/// unique constraint: the insert reports the conflict instead of erroring.
#[tokio::test]
async fn test_duplicate_user_insert_reports_conflict() {
    let app = test_app().await;
    let (existing, _) = seed_user(&app.state, "race", "STUDENT").await;

    let duplicate = app
        .state
        .users
        .create(NewUser {
            username: "race".to_string(),
            email: "race-second@example.com".to_string(),
            password_hash: "irrelevant".to_string(),
            display_name: "race".to_string(),
            role: "STUDENT".to_string(),
        })
        .await
        .unwrap();

    assert!(duplicate.is_none());
    // The first account is untouched
    assert!(app.state.users.get(&existing.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_app().await;
    seed_user(&app.state, "someone", "STUDENT").await;

    let response = app
        .router()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({"username": "someone", "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_user_cannot_login() {
    let app = test_app().await;
    let (user, _) = seed_user(&app.state, "benched", "STUDENT").await;
    app.state.users.set_active(&user.id, false).await.unwrap();

    let response = app
        .router()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({"username": "benched", "password": "password123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
