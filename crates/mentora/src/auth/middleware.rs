//! Authentication and authorization middleware.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation, decode, encode};
use tracing::warn;

use super::{AuthConfig, AuthError, Claims, ConfigValidationError, Identity};

/// Extract a Bearer token from an Authorization header value.
///
/// A missing token segment (including the bare `"Bearer "` form) is treated
/// the same as an absent header. Anything after the token is ignored.
fn bearer_token_from_header(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::NoToken)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::NoToken);
    }

    let token = parts.next().ok_or(AuthError::NoToken)?;
    if token.is_empty() {
        return Err(AuthError::NoToken);
    }

    Ok(token)
}

/// Authentication state shared across handlers.
///
/// Holds the derived signing keys for the process lifetime; construction fails
/// if the configured secret does not pass validation, so a running server
/// always has a usable key pair.
#[derive(Clone)]
pub struct AuthState {
    config: Arc<AuthConfig>,
    decoding_key: Arc<DecodingKey>,
    encoding_key: Arc<EncodingKey>,
}

impl AuthState {
    /// Create new auth state from config.
    /// Resolves `env:VAR_NAME` syntax in jwt_secret at construction time.
    pub fn new(config: AuthConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;

        let secret = config
            .resolve_jwt_secret()?
            .ok_or(ConfigValidationError::MissingJwtSecret)?;

        Ok(Self {
            config: Arc::new(config),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
        })
    }

    /// Validate a bearer token and derive the request identity.
    ///
    /// Stateless: signature and expiry only, no database lookup. The identity
    /// is built in one step so callers never see a partial one.
    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // A token expired one second ago is expired
        validation.leeway = 0;
        validation.required_spec_claims.clear(); // iss/aud are not issued

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!(error = ?e, "token verification failed");
            AuthError::InvalidToken
        })?;

        let claims = token_data.claims;
        let subject = claims.subject().ok_or(AuthError::MissingSubject)?;

        Ok(Identity {
            subject_id: subject.to_string(),
            role: claims.role.clone(),
        })
    }

    /// Issue a signed token for a subject with the configured lifetime.
    pub fn issue_token(&self, subject_id: &str, role: &str) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: Some(subject_id.to_string()),
            user_id: None,
            role: role.to_string(),
            exp: now + self.config.token_ttl_hours * 3600,
            iat: Some(now),
        };

        let token = encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Issued token lifetime in seconds, for cookie/expiry hints.
    pub fn token_ttl_seconds(&self) -> i64 {
        self.config.token_ttl_hours * 3600
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extract the authenticated identity from request extensions.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::NoToken)
    }
}

/// Authentication middleware.
///
/// Validates the `Authorization: Bearer <token>` header and injects
/// `Identity` into request extensions. The identity exists downstream if and
/// only if validation succeeded.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::NoToken)?;

    let token = bearer_token_from_header(header)?;
    let identity = auth.authenticate(token)?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Accepted role labels for a route group, fixed at route registration.
#[derive(Debug, Clone)]
pub struct RoleSet {
    allowed: Arc<HashSet<String>>,
}

impl RoleSet {
    /// Build a role set from explicit labels.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Arc::new(roles.into_iter().map(Into::into).collect()),
        }
    }

    /// Exact membership check. No normalization.
    pub fn allows(&self, role: &str) -> bool {
        self.allowed.contains(role)
    }
}

/// Authorization middleware.
///
/// Pure predicate over the identity already attached by `auth_middleware`:
/// passes the request through unchanged when the identity's role is a member
/// of the configured set, otherwise rejects with 403.
pub async fn require_role(
    State(roles): State<RoleSet>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let allowed = req
        .extensions()
        .get::<Identity>()
        .is_some_and(|identity| roles.allows(&identity.role));

    if !allowed {
        return Err(AuthError::RoleNotAuthorized);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth_state() -> AuthState {
        let config = AuthConfig {
            jwt_secret: Some("test-secret-for-unit-tests-minimum-32-chars-long".to_string()),
            ..AuthConfig::default()
        };
        AuthState::new(config).unwrap()
    }

    fn encode_claims(state_secret: &str, claims: &Claims) -> String {
        encode(
            &jsonwebtoken::Header::default(),
            claims,
            &EncodingKey::from_secret(state_secret.as_bytes()),
        )
        .unwrap()
    }

    const TEST_SECRET: &str = "test-secret-for-unit-tests-minimum-32-chars-long";

    #[test]
    fn test_bearer_token_from_header_valid() {
        assert_eq!(
            bearer_token_from_header("Bearer abc.def.ghi").unwrap(),
            "abc.def.ghi"
        );
        assert_eq!(
            bearer_token_from_header("bearer   token123").unwrap(),
            "token123"
        );
    }

    #[test]
    fn test_bearer_token_from_header_missing_segment() {
        let cases = ["", "Bearer", "Bearer ", "Token something", "bear token"];

        for case in cases {
            assert_eq!(
                bearer_token_from_header(case),
                Err(AuthError::NoToken),
                "{case:?} should be treated as no token"
            );
        }
    }

    #[test]
    fn test_issue_and_authenticate_round_trip() {
        let state = test_auth_state();
        let token = state.issue_token("u1", "ADMIN").unwrap();

        let identity = state.authenticate(&token).unwrap();
        assert_eq!(identity.subject_id, "u1");
        assert_eq!(identity.role, "ADMIN");
    }

    #[test]
    fn test_authenticate_garbage_token() {
        let state = test_auth_state();
        assert_eq!(
            state.authenticate("not-a-jwt"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_authenticate_wrong_signature() {
        let state = test_auth_state();
        let claims = Claims {
            id: Some("u1".to_string()),
            user_id: None,
            role: "STUDENT".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: None,
        };
        let token = encode_claims("another-secret-that-is-also-32-chars-long!!", &claims);

        assert_eq!(state.authenticate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_authenticate_expired_token() {
        let state = test_auth_state();
        let claims = Claims {
            id: Some("u1".to_string()),
            user_id: None,
            role: "STUDENT".to_string(),
            // Expired one second ago; there is no leeway
            exp: Utc::now().timestamp() - 1,
            iat: None,
        };
        let token = encode_claims(TEST_SECRET, &claims);

        assert_eq!(state.authenticate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_authenticate_missing_subject() {
        let state = test_auth_state();
        let claims = Claims {
            id: None,
            user_id: None,
            role: "STUDENT".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: None,
        };
        let token = encode_claims(TEST_SECRET, &claims);

        assert_eq!(state.authenticate(&token), Err(AuthError::MissingSubject));
    }

    #[test]
    fn test_authenticate_legacy_subject_field() {
        let state = test_auth_state();
        let claims = Claims {
            id: None,
            user_id: Some("legacy-7".to_string()),
            role: "MENTOR".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: None,
        };
        let token = encode_claims(TEST_SECRET, &claims);

        let identity = state.authenticate(&token).unwrap();
        assert_eq!(identity.subject_id, "legacy-7");
    }

    #[test]
    fn test_authenticate_role_carried_exactly() {
        let state = test_auth_state();
        let claims = Claims {
            id: Some("u1".to_string()),
            user_id: None,
            role: "Admin".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: None,
        };
        let token = encode_claims(TEST_SECRET, &claims);

        // Mixed case is preserved, and therefore not a member of {"ADMIN"}
        let identity = state.authenticate(&token).unwrap();
        assert_eq!(identity.role, "Admin");
        assert!(!RoleSet::new(["ADMIN"]).allows(&identity.role));
    }

    #[test]
    fn test_role_set_membership() {
        let roles = RoleSet::new(["MENTOR", "ADMIN"]);
        assert!(roles.allows("ADMIN"));
        assert!(roles.allows("MENTOR"));
        assert!(!roles.allows("STUDENT"));
        assert!(!roles.allows(""));
        assert!(!roles.allows("admin"));
    }
}
