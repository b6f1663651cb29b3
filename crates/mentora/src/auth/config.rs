//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT signing secret for HS256. Supports `env:VAR_NAME` indirection.
    /// REQUIRED; the server refuses to start without it.
    pub jwt_secret: Option<String>,

    /// Issued token lifetime in hours.
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // No default JWT secret - must be explicitly configured
            jwt_secret: None,
            token_ttl_hours: 24,
        }
    }
}

impl AuthConfig {
    /// Resolve the JWT secret, expanding `env:VAR_NAME` syntax.
    /// Returns the resolved secret or None if not configured.
    pub fn resolve_jwt_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        match &self.jwt_secret {
            None => Ok(None),
            Some(value) => {
                if let Some(var_name) = value.strip_prefix("env:") {
                    match std::env::var(var_name) {
                        Ok(secret) if !secret.is_empty() => Ok(Some(secret)),
                        Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                        Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
                    }
                } else {
                    Ok(Some(value.clone()))
                }
            }
        }
    }

    /// Validate the configuration. Runs at startup, before the listener binds.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let secret = self.resolve_jwt_secret()?;

        let Some(secret) = secret else {
            return Err(ConfigValidationError::MissingJwtSecret);
        };

        // Reject the weak defaults older deployments shipped with
        if secret == "secret" || secret == "dev-secret-change-in-production" {
            return Err(ConfigValidationError::InsecureJwtSecret);
        }

        if secret.len() < 32 {
            return Err(ConfigValidationError::JwtSecretTooShort);
        }

        if self.token_ttl_hours <= 0 {
            return Err(ConfigValidationError::InvalidTokenTtl);
        }

        Ok(())
    }

    /// Generate a secure random JWT secret using cryptographically secure RNG.
    ///
    /// Uses the `rand` crate with `ThreadRng` which is backed by the OS's
    /// cryptographically secure random number generator (via `getrandom`).
    pub fn generate_jwt_secret() -> String {
        use rand::Rng;

        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        const SECRET_LENGTH: usize = 64;

        let mut rng = rand::rng();
        (0..SECRET_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    /// JWT secret is required.
    #[error("auth.jwt_secret is required; refusing to start without one")]
    MissingJwtSecret,

    /// JWT secret is a known insecure default.
    #[error("auth.jwt_secret is a known insecure default; generate a real secret")]
    InsecureJwtSecret,

    /// JWT secret is too short.
    #[error("auth.jwt_secret must be at least 32 characters")]
    JwtSecretTooShort,

    /// Token TTL must be positive.
    #[error("auth.token_ttl_hours must be positive")]
    InvalidTokenTtl,

    /// Referenced environment variable was not found.
    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Referenced environment variable is empty.
    #[error("environment variable is empty: {0}")]
    EnvVarEmpty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: Some(secret.to_string()),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_validate_missing_secret() {
        let config = AuthConfig::default();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::MissingJwtSecret)
        );
    }

    #[test]
    fn test_validate_rejects_weak_default() {
        let config = config_with_secret("secret");
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InsecureJwtSecret)
        );
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let config = config_with_secret("too-short");
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::JwtSecretTooShort)
        );
    }

    #[test]
    fn test_validate_accepts_strong_secret() {
        let config = config_with_secret(&AuthConfig::generate_jwt_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_env_indirection() {
        // SAFETY: test-local variable name, no concurrent reader cares.
        unsafe { std::env::set_var("MENTORA_TEST_JWT_SECRET", "from-environment") };
        let config = config_with_secret("env:MENTORA_TEST_JWT_SECRET");
        assert_eq!(
            config.resolve_jwt_secret().unwrap().as_deref(),
            Some("from-environment")
        );
    }

    #[test]
    fn test_resolve_env_missing() {
        let config = config_with_secret("env:MENTORA_TEST_NO_SUCH_VAR");
        assert!(matches!(
            config.resolve_jwt_secret(),
            Err(ConfigValidationError::EnvVarNotFound(_))
        ));
    }

    #[test]
    fn test_generated_secret_is_long_enough() {
        assert!(AuthConfig::generate_jwt_secret().len() >= 32);
    }
}
