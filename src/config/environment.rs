// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::generate_jwt_secret;
use crate::constants::{pagination, ports};

/// bcrypt accepts work factors in this range
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debugging detail
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:"));
        match path_str {
            Some(":memory:") => Self::Memory,
            Some(path) => Self::SQLite {
                path: PathBuf::from(path),
            },
            // Fallback: treat as SQLite file path
            None => Self::SQLite {
                path: PathBuf::from(s),
            },
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/foodgram.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP listener binds to
    pub http_host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Uploaded media configuration
    pub media: MediaConfig,
    /// List pagination
    pub pagination: PaginationConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Pool size
    pub max_connections: u32,
    /// Run schema migrations on startup
    pub auto_migrate: bool,
}

/// Token and password settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    #[serde(skip)]
    pub jwt_secret: String,
    /// JWT expiry time in hours
    pub jwt_expiry_hours: u64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

/// Where decoded images live and how they are addressed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Filesystem directory for stored media
    pub root: PathBuf,
    /// Public URL prefix, always ending with `/`
    pub url_prefix: String,
}

/// Page-number pagination defaults
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size when `limit` is absent
    pub default_page_size: u32,
    /// Upper bound for `limit`
    pub max_page_size: u32,
}

/// CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// `*` or a comma-separated origin list
    pub allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparsable value, or if
    /// `JWT_SECRET` is missing in production
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => {
                return Err(anyhow!("JWT_SECRET must be set in production"));
            }
            _ => {
                warn!("JWT_SECRET not set; generated an ephemeral secret, tokens will not survive a restart");
                generate_jwt_secret()
            }
        };

        let config = Self {
            http_host: env_var_or("HTTP_HOST", "0.0.0.0"),
            http_port: env_var_or("HTTP_PORT", &ports::DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            log_level: LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info")),
            environment,

            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    "DATABASE_URL",
                    "sqlite:./data/foodgram.db",
                )),
                max_connections: env_var_or("DATABASE_MAX_CONNECTIONS", "5")
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS value")?,
                auto_migrate: env_var_or("AUTO_MIGRATE", "true")
                    .parse()
                    .context("Invalid AUTO_MIGRATE value")?,
            },

            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours: env_var_or("JWT_EXPIRY_HOURS", "24")
                    .parse()
                    .context("Invalid JWT_EXPIRY_HOURS value")?,
                bcrypt_cost: env_var_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
                    .parse()
                    .context("Invalid BCRYPT_COST value")?,
            },

            media: MediaConfig {
                root: PathBuf::from(env_var_or("MEDIA_ROOT", "./media")),
                url_prefix: normalize_url_prefix(&env_var_or("MEDIA_URL", "/media/")),
            },

            pagination: PaginationConfig {
                default_page_size: env_var_or(
                    "DEFAULT_PAGE_SIZE",
                    &pagination::DEFAULT_PAGE_SIZE.to_string(),
                )
                .parse()
                .context("Invalid DEFAULT_PAGE_SIZE value")?,
                max_page_size: pagination::MAX_PAGE_SIZE,
            },

            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when a value is outside its usable range
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(anyhow!("DATABASE_MAX_CONNECTIONS must be at least 1"));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow!(
                "BCRYPT_COST must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            ));
        }
        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(anyhow!(
                "DEFAULT_PAGE_SIZE must be between 1 and {}",
                self.pagination.max_page_size
            ));
        }
        if self.auth.jwt_expiry_hours == 0 {
            return Err(anyhow!("JWT_EXPIRY_HOURS must be at least 1"));
        }
        if self.environment.is_production() && self.cors.allowed_origins.trim() == "*" {
            warn!("CORS allows any origin in production");
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Foodgram Server Configuration:\n\
             - Environment: {}\n\
             - HTTP: {}:{}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Media Root: {}\n\
             - Media URL: {}\n\
             - Page Size: {}\n\
             - CORS Origins: {}",
            self.environment,
            self.http_host,
            self.http_port,
            self.log_level,
            if self.database.url.is_memory() {
                "SQLite (in-memory)".to_owned()
            } else {
                self.database.url.to_string()
            },
            self.media.root.display(),
            self.media.url_prefix,
            self.pagination.default_page_size,
            self.cors.allowed_origins,
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "127.0.0.1".to_owned(),
            http_port: ports::DEFAULT_HTTP_PORT,
            log_level: LogLevel::Info,
            environment: Environment::Testing,
            database: DatabaseConfig {
                url: DatabaseUrl::Memory,
                max_connections: 1,
                auto_migrate: true,
            },
            auth: AuthConfig {
                jwt_secret: generate_jwt_secret(),
                jwt_expiry_hours: 24,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            media: MediaConfig {
                root: PathBuf::from("./media"),
                url_prefix: "/media/".to_owned(),
            },
            pagination: PaginationConfig {
                default_page_size: pagination::DEFAULT_PAGE_SIZE,
                max_page_size: pagination::MAX_PAGE_SIZE,
            },
            cors: CorsConfig {
                allowed_origins: "*".to_owned(),
            },
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Ensure the media URL prefix starts and ends with `/` unless absolute
fn normalize_url_prefix(prefix: &str) -> String {
    let mut value = prefix.trim().to_owned();
    if !value.starts_with('/') && !value.contains("://") {
        value.insert(0, '/');
    }
    if !value.ends_with('/') {
        value.push('/');
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/foodgram.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/foodgram.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/var/lib/foodgram.db").to_connection_string(),
            "sqlite:/var/lib/foodgram.db"
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("prod"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("TEST"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("other"), Environment::Development);
    }

    #[test]
    fn test_normalize_url_prefix() {
        assert_eq!(normalize_url_prefix("media"), "/media/");
        assert_eq!(normalize_url_prefix("/media/"), "/media/");
        assert_eq!(
            normalize_url_prefix("https://cdn.example.com/m"),
            "https://cdn.example.com/m/"
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.summary().contains("in-memory"));
    }
}
