//! Account handlers: registration, login, profile.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::{Identity, roles};
use crate::user::{NewUser, UserInfo};

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token plus profile, returned by both register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    let username = request.username.trim();
    if username.len() < 3 || username.len() > 64 {
        return Err(ApiError::bad_request(
            "username must be between 3 and 64 characters",
        ));
    }
    if !request.email.contains('@') {
        return Err(ApiError::bad_request("email address is not valid"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::bad_request(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

/// Register a new student account.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&request)?;

    let username = request.username.trim().to_string();

    if state.users.get_by_username(&username).await?.is_some() {
        return Err(ApiError::conflict("username already taken"));
    }
    if state.users.get_by_email(&request.email).await?.is_some() {
        return Err(ApiError::conflict("email already registered"));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("hashing password: {e}")))?;

    // The unique constraints catch registrations racing past the checks above
    let user = state
        .users
        .create(NewUser {
            display_name: request.display_name.unwrap_or_else(|| username.clone()),
            username,
            email: request.email,
            password_hash,
            role: roles::STUDENT.to_string(),
        })
        .await?
        .ok_or_else(|| ApiError::conflict("username or email already taken"))?;

    info!(user_id = %user.id, "account registered");

    let token = state.auth.issue_token(&user.id, &user.role)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            expires_in: state.auth.token_ttl_seconds(),
            user: user.info(),
        }),
    ))
}

/// Log in with username (or email) and password.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = match state.users.get_by_username(&request.username).await? {
        Some(user) => Some(user),
        None => state.users.get_by_email(&request.username).await?,
    };

    let Some(user) = user else {
        // Same response as a bad password; do not reveal which part failed
        return Err(ApiError::unauthorized("invalid credentials"));
    };

    let password_ok = bcrypt::verify(&request.password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        warn!(user_id = %user.id, "login failed: bad password");
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    if !user.is_active {
        return Err(ApiError::unauthorized("account is deactivated"));
    }

    state.users.touch_last_login(&user.id).await?;

    let token = state.auth.issue_token(&user.id, &user.role)?;

    Ok(Json(AuthResponse {
        token,
        expires_in: state.auth.token_ttl_seconds(),
        user: user.info(),
    }))
}

/// Identity and stored profile of the caller.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject_id: String,
    pub role: String,
    pub user: Option<UserInfo>,
}

/// Get current user info.
pub async fn me(State(state): State<AppState>, identity: Identity) -> ApiResult<Json<MeResponse>> {
    let user = state.users.get(&identity.subject_id).await?;

    Ok(Json(MeResponse {
        subject_id: identity.subject_id,
        role: identity.role,
        user: user.map(|u| u.info()),
    }))
}

/// Profile update request.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

/// Update the caller's profile.
#[instrument(skip(state, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserInfo>> {
    let updated = state
        .users
        .update_profile(
            &identity.subject_id,
            request.display_name.as_deref(),
            request.bio.as_deref(),
        )
        .await?;

    if !updated {
        return Err(ApiError::not_found("user not found"));
    }

    let user = state
        .users
        .get(&identity.subject_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user.info()))
}
