use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::auth::password::DEFAULT_PASSWORD_COST;

/// Signing secret used when `JWT_SECRET` is not configured. Development only.
pub const DEV_FALLBACK_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Raw `JWT_SECRET` value; `None` falls back to [`DEV_FALLBACK_SECRET`]
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    /// bcrypt cost used when hashing seeded passwords
    pub password_cost: u32,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub default_page_size: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("LEADBLOCKS_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_PATH") {
            self.database.path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_BUSY_TIMEOUT_SECS") {
            self.database.busy_timeout_secs = v.parse().unwrap_or(self.database.busy_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = Some(v);
        }
        if let Ok(v) = env::var("SECURITY_PASSWORD_COST") {
            self.security.password_cost = v.parse().unwrap_or(self.security.password_cost);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = parse_origins(&v);
        }

        // Listing overrides
        if let Ok(v) = env::var("LISTING_DEFAULT_PAGE_SIZE") {
            self.listing.default_page_size = v.parse().unwrap_or(self.listing.default_page_size);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                path: PathBuf::from("data/app.db"),
                max_connections: 5,
                busy_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: None,
                password_cost: DEFAULT_PASSWORD_COST,
                cors_origins: vec![],
            },
            listing: ListingConfig { default_page_size: 10 },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            security: SecurityConfig {
                jwt_secret: None,
                password_cost: DEFAULT_PASSWORD_COST,
                cors_origins: vec!["https://staging.leadblocks.com".to_string()],
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                path: PathBuf::from("data/app.db"),
                max_connections: 10,
                busy_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: None,
                password_cost: 12,
                cors_origins: vec!["https://app.leadblocks.com".to_string()],
            },
            ..Self::development()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl SecurityConfig {
    /// The configured signing secret, or `None` when unset or blank.
    pub fn configured_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
