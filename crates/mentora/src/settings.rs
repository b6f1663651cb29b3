//! Application configuration: file discovery, defaults, and loading.
//!
//! Configuration is layered: built-in defaults, then the TOML config file,
//! then `MENTORA__` environment variables (double underscore separates
//! nesting, e.g. `MENTORA__AUTH__JWT_SECRET`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::tutor::TutorConfig;

pub const APP_NAME: &str = "mentora";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub tutor: TutorConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. Created if absent.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("mentora.db"),
        }
    }
}

/// Cross-origin configuration for browser clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

/// Resolve the config file path: explicit override, then XDG config dir.
pub fn config_file_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    Ok(default_config_dir()?.join("config.toml"))
}

/// Load configuration: defaults, then the config file (optional), then
/// `MENTORA__` environment variables.
pub fn load_config(config_file: &Path) -> Result<AppConfig> {
    let built = Config::builder()
        .add_source(
            File::from(config_file)
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(Environment::with_prefix(env_prefix().as_str()).separator("__"))
        .build()
        .context("building configuration")?;

    // Every section carries #[serde(default)], so a sparse config file still
    // deserializes into a complete AppConfig.
    let config: AppConfig = built.try_deserialize().context("parsing configuration")?;

    Ok(config)
}

/// Write a commented default config file, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {parent:?}"))?;
    }

    let config = AppConfig::default();
    let toml = toml::to_string_pretty(&config).context("serializing default config to TOML")?;
    let mut body = String::new();
    body.push_str("# Configuration for ");
    body.push_str(APP_NAME);
    body.push('\n');
    body.push_str("# auth.jwt_secret is required. Generate one with `mentora secret`\n");
    body.push_str("# or reference an environment variable: jwt_secret = \"env:MENTORA_JWT_SECRET\"\n");
    body.push('\n');
    body.push_str(&toml);
    fs::write(path, body).with_context(|| format!("writing config file to {}", path.display()))
}

pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn default_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        let mut path = PathBuf::from(dir);
        path.push(APP_NAME);
        return Ok(path);
    }

    if let Some(mut dir) = dirs::config_dir() {
        dir.push(APP_NAME);
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine configuration directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_prefix() {
        assert_eq!(env_prefix(), "MENTORA");
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.cors.allowed_origins, config.cors.allowed_origins);
    }

    #[test]
    fn test_load_config_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_load_config_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        // Untouched sections keep their defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.path, PathBuf::from("mentora.db"));
    }
}
