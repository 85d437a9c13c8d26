/// Configuration management for the API server
///
/// Configuration comes from environment variables (a `.env` file is loaded
/// first if present). Missing required values fail startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `JWT_SECRET`: session signing secret, at least 32 characters (required)
/// - `API_PORT`: port to listen on (required)
/// - `CORS_ORIGINS`: comma-separated allowed frontend origins, `*` for any (required)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `APP_ENV`: `prod` or `production` enables production cookie flags
///
/// # Example
///
/// ```no_run
/// use orgauth_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;

/// Minimum accepted length for `JWT_SECRET`
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed cross-origin frontends; `["*"]` allows any origin
    pub cors_origins: Vec<String>,

    /// Production runtime mode (strict session cookie flags)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HMAC secret. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or empty, a number
    /// does not parse, or the secret is shorter than [`MIN_SECRET_LEN`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} environment variable is required", key))
        };

        let database_url = required("DATABASE_URL")?;

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let port = required("API_PORT")?
            .trim()
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let cors_origins: Vec<String> = required("CORS_ORIGINS")?
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if cors_origins.is_empty() {
            bail!("CORS_ORIGINS must list at least one origin");
        }

        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let production = lookup("APP_ENV")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "prod" | "production"))
            .unwrap_or(false);

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
