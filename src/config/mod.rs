//! Configuration loading and management
//!
//! Values come from, in increasing precedence: built-in defaults, an optional
//! YAML file (`PAYROLL_CONFIG`), and environment variables. A `.env` file in
//! the working directory is loaded into the environment first.

use crate::core::error::{ConfigError, PayrollResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Host, optionally with a port (`db.internal:3306`)
    #[validate(length(min = 1, message = "must not be empty"))]
    pub host: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,

    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            name: "swinpayroll".to_string(),
            username: "root".to_string(),
            password: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Connection URL for the MySQL driver
    pub fn url(&self) -> String {
        if self.password.is_empty() {
            format!("mysql://{}@{}/{}", self.username, self.host, self.name)
        } else {
            format!(
                "mysql://{}:{}@{}/{}",
                self.username, self.password, self.host, self.name
            )
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(range(min = 1, message = "must be a valid port"))]
    pub http_port: u16,

    #[validate(nested)]
    pub database: DatabaseConfig,

    /// HMAC secret used to sign session tokens
    #[validate(length(min = 1, message = "must not be empty"))]
    pub token_secret: String,

    #[validate(range(min = 1, max = 3650))]
    pub token_expiry_days: i64,

    /// Insert the default staff account on startup when it is missing
    pub seed_default_user: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            database: DatabaseConfig::default(),
            token_secret: String::new(),
            token_expiry_days: 30,
            seed_default_user: false,
        }
    }
}

impl AppConfig {
    /// Load from `.env`, `PAYROLL_CONFIG`, and the process environment
    pub fn load() -> PayrollResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        let file = std::env::var("PAYROLL_CONFIG").ok();
        Self::from_sources(file.as_deref().map(Path::new), |key| {
            std::env::var(key).ok()
        })
    }

    /// Load from an optional YAML file, then apply overrides from `env`
    pub fn from_sources(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> PayrollResult<Self> {
        let mut config = match file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(env)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> PayrollResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> PayrollResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> PayrollResult<()> {
        if let Some(port) = env("PORT") {
            self.http_port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                message: format!("'{}' is not a port number", port),
            })?;
        }
        if let Some(host) = env("DB_HOST") {
            self.database.host = host;
        }
        if let Some(name) = env("DB_NAME") {
            self.database.name = name;
        }
        if let Some(username) = env("DB_USER") {
            self.database.username = username;
        }
        if let Some(password) = env("DB_PASS") {
            self.database.password = password;
        }
        if let Some(secret) = env("TOKEN_SECRET") {
            self.token_secret = secret;
        }
        Ok(())
    }

    /// Run the declarative field checks
    pub fn check(&self) -> PayrollResult<()> {
        self.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
            fields.sort();
            ConfigError::InvalidValue {
                field: fields.join(", "),
                message: errors.to_string(),
            }
            .into()
        })
    }
}
