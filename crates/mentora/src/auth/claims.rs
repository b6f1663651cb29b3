//! JWT claims and the request identity derived from them.

use serde::{Deserialize, Serialize};

/// JWT payload issued by the platform.
///
/// The subject identifier historically lived under two different field names.
/// Older tokens carry `userId`, newer ones carry `id`; both are accepted and
/// `id` wins when both are present. This is a compatibility shim, not a
/// designed invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (current field name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Subject identifier (legacy field name).
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Role label, carried exactly as issued. Absent means empty, which no
    /// role set accepts.
    #[serde(default)]
    pub role: String,

    /// Expiration time (as Unix timestamp).
    pub exp: i64,

    /// Issued at (as Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Resolve the subject identifier, preferring the current field name.
    pub fn subject(&self) -> Option<&str> {
        self.id.as_deref().or(self.user_id.as_deref())
    }
}

/// Request-scoped identity context.
///
/// Constructed only by the authenticator, after full token validation, and
/// inserted into the request extensions in one step. Downstream handlers never
/// observe a partially populated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Verified subject identifier.
    pub subject_id: String,
    /// Role label exactly as embedded in the token. No normalization.
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: Option<&str>, user_id: Option<&str>) -> Claims {
        Claims {
            id: id.map(str::to_string),
            user_id: user_id.map(str::to_string),
            role: "STUDENT".to_string(),
            exp: 0,
            iat: None,
        }
    }

    #[test]
    fn test_subject_prefers_current_field() {
        assert_eq!(claims(Some("u1"), Some("legacy")).subject(), Some("u1"));
    }

    #[test]
    fn test_subject_falls_back_to_legacy_field() {
        assert_eq!(claims(None, Some("legacy")).subject(), Some("legacy"));
    }

    #[test]
    fn test_subject_missing() {
        assert_eq!(claims(None, None).subject(), None);
    }

    #[test]
    fn test_claims_deserialize_legacy_payload() {
        let claims: Claims =
            serde_json::from_str(r#"{"userId":"u42","role":"MENTOR","exp":1234}"#).unwrap();
        assert_eq!(claims.subject(), Some("u42"));
        assert_eq!(claims.role, "MENTOR");
    }

    #[test]
    fn test_claims_deserialize_missing_role() {
        let claims: Claims = serde_json::from_str(r#"{"id":"u1","exp":1234}"#).unwrap();
        assert_eq!(claims.role, "");
    }
}
