//! Application configuration
//!
//! Loaded from a TOML file (see [`default_config_path`]); a missing file
//! means defaults. Environment variables are applied on top:
//!
//! | Variable | Field |
//! |---|---|
//! | `DATABASE_URL` (alias `MONGO_URL`) | `database.url` |
//! | `DB_NAME` | `database.name` |
//! | `SECRET_KEY` | `security.secret_key` |
//! | `JWT_ALGORITHM` | `security.algorithm` |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | `security.access_token_expire_minutes` |
//! | `API_HOST` / `API_PORT` | `server.host` / `server.port` |
//! | `LOG_LEVEL` | `logging.level` |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;

pub const CONFIG_ENV: &str = "SCHOOL29_CONFIG";
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-here-change-in-production";

const SUPPORTED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    Env { key: &'static str, value: String },
    #[error("{0}")]
    Invalid(String),
}

/// `$SCHOOL29_CONFIG`, else `~/.config/school29/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("school29")
        .join("config.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Full connection string; wins over `name`
    pub url: Option<String>,
    pub name: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            name: "school29".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!("sqlite://./{}.db?mode=rwc", self.name),
        }
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            bcrypt_cost: 12,
        }
    }
}

impl SecurityConfig {
    pub fn jwt_config(&self) -> Result<JwtConfig, ConfigError> {
        if !SUPPORTED_ALGORITHMS.contains(&self.algorithm.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "security.algorithm must be one of {:?}, got {}",
                SUPPORTED_ALGORITHMS, self.algorithm
            )));
        }
        let algorithm = Algorithm::from_str(&self.algorithm)
            .map_err(|e| ConfigError::Invalid(format!("security.algorithm: {}", e)))?;

        Ok(JwtConfig {
            secret: self.secret_key.clone(),
            algorithm,
            expiration_minutes: self.access_token_expire_minutes,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// Bootstrap admin created at startup when no admin account exists
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub enabled: bool,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("enabled", &self.enabled)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            username: "admin".to_string(),
            email: "admin@school29.local".to_string(),
            full_name: "School Administrator".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Read `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// File, then process environment, then validation.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").or_else(|| lookup("MONGO_URL")) {
            self.database.url = Some(url);
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(secret) = lookup("SECRET_KEY") {
            self.security.secret_key = secret;
        }
        if let Some(algorithm) = lookup("JWT_ALGORITHM") {
            self.security.algorithm = algorithm.to_uppercase();
        }
        if let Some(minutes) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.access_token_expire_minutes =
                parse_env("ACCESS_TOKEN_EXPIRE_MINUTES", minutes)?;
        }
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = parse_env("API_PORT", port)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "security.secret_key must not be empty".into(),
            ));
        }
        self.security.jwt_config()?;
        if self.security.access_token_expire_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "security.access_token_expire_minutes must be positive".into(),
            ));
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.bcrypt_cost must be between 4 and 31, got {}",
                self.security.bcrypt_cost
            )));
        }
        if self.admin.enabled && self.admin.password.is_empty() {
            return Err(ConfigError::Invalid(
                "admin.password must be set when admin.enabled".into(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.security.access_token_expire_minutes, 30);
        assert_eq!(
            config.database.connection_url(),
            "sqlite://./school29.db?mode=rwc"
        );
        assert!(config.security.uses_default_secret());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9100

            [database]
            name = "school_test"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.database.connection_url(),
            "sqlite://./school_test.db?mode=rwc"
        );
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.security.algorithm, "HS256");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/school29/config.toml")).unwrap();
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("SECRET_KEY", "s3cret"),
                ("JWT_ALGORITHM", "hs512"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", "15"),
                ("API_PORT", "8080"),
            ]))
            .unwrap();

        assert_eq!(config.database.connection_url(), "sqlite::memory:");
        assert_eq!(config.server.port, 8080);

        let jwt = config.security.jwt_config().unwrap();
        assert_eq!(jwt.secret, "s3cret");
        assert_eq!(jwt.algorithm, Algorithm::HS512);
        assert_eq!(jwt.expiration_minutes, 15);
    }

    #[test]
    fn unparsable_env_value_is_reported() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("API_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "API_PORT", .. }));
    }

    #[test]
    fn validation_rejects_bad_security_settings() {
        let mut config = AppConfig::default();
        config.security.secret_key = "  ".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.security.algorithm = "RS256".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.security.access_token_expire_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.security.bcrypt_cost = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", AppConfig::default());
        assert!(!rendered.contains(DEFAULT_SECRET_KEY));
        assert!(!rendered.contains("admin123"));
    }
}
