//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Secret used when none is configured; refused in production
const DEV_SESSION_SECRET: &str = "dev-secret";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Gate write routes behind a valid session cookie
    pub require_auth: bool,

    /// Seed demo customers and accounts into an empty ledger
    pub demo_mode: bool,

    /// Drop and recreate the schema on startup
    pub reset_on_start: bool,

    /// Name of the session cookie
    pub session_cookie_name: String,

    /// Key for signing session cookies
    pub session_secret: String,

    /// Link shown on the overview page
    pub repo_url: String,

    /// `json` for structured logs, anything else for human-readable
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = var("DATABASE_URL", "sqlite://bank_system.db?mode=rwc");

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = var("HOST", "127.0.0.1");

        let port = var("PORT", "3000")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = var("ENVIRONMENT", "development");

        let require_auth = parse_bool(&var("REQUIRE_AUTH", "true"))
            .ok_or(ConfigError::InvalidValue("REQUIRE_AUTH"))?;

        let demo_mode = parse_bool(&var("DEMO_MODE", "false"))
            .ok_or(ConfigError::InvalidValue("DEMO_MODE"))?;

        let reset_on_start = parse_bool(&var("RESET_ON_START", "true"))
            .ok_or(ConfigError::InvalidValue("RESET_ON_START"))?;

        let session_cookie_name = var("SESSION_COOKIE_NAME", "session");
        if session_cookie_name.is_empty()
            || !session_cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::InvalidValue("SESSION_COOKIE_NAME"));
        }

        let session_secret = var("SESSION_SECRET", DEV_SESSION_SECRET);

        let config = Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            require_auth,
            demo_mode,
            reset_on_start,
            session_cookie_name,
            session_secret,
            repo_url: var("GITHUB_REPO_URL", ""),
            log_format: var("LOG_FORMAT", "pretty"),
        };

        if config.is_production() && config.session_secret == DEV_SESSION_SECRET {
            return Err(ConfigError::MissingEnv("SESSION_SECRET"));
        }

        Ok(config)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("require_auth", &self.require_auth)
            .field("demo_mode", &self.demo_mode)
            .field("reset_on_start", &self.reset_on_start)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_secret", &"[REDACTED]")
            .field("repo_url", &self.repo_url)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
