//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for local development.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// JWT refresh token lifetime in seconds
    pub jwt_refresh_lifetime_secs: i64,

    /// Page size used when the client does not ask for one
    pub default_page_size: u32,

    /// Upper bound on the page size a client may request
    pub max_page_size: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("NOVA_HTTP_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NOVA_HTTP_PORT".to_string()))?,

            database_path: env::var("NOVA_DATABASE_PATH")
                .unwrap_or_else(|_| "./nova.db".to_string()),

            jwt_secret: env::var("NOVA_JWT_SECRET").unwrap_or_else(|_| {
                // Development fallback only
                // In production, this MUST be set via environment variable
                "novarail-dev-secret-change-in-production".to_string()
            }),

            jwt_access_lifetime_secs: env::var("NOVA_JWT_ACCESS_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("NOVA_JWT_ACCESS_LIFETIME_SECS".to_string())
                })?,

            jwt_refresh_lifetime_secs: env::var("NOVA_JWT_REFRESH_LIFETIME_SECS")
                .unwrap_or_else(|_| "604800".to_string()) // 7 days
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("NOVA_JWT_REFRESH_LIFETIME_SECS".to_string())
                })?,

            default_page_size: env::var("NOVA_DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NOVA_DEFAULT_PAGE_SIZE".to_string()))?,

            max_page_size: env::var("NOVA_MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NOVA_MAX_PAGE_SIZE".to_string()))?,
        };

        if config.default_page_size == 0 || config.max_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "page sizes must be positive".to_string(),
            ));
        }

        if config.default_page_size > config.max_page_size {
            return Err(ConfigError::InvalidValue(
                "NOVA_DEFAULT_PAGE_SIZE exceeds NOVA_MAX_PAGE_SIZE".to_string(),
            ));
        }

        Ok(config)
    }

    /// Configuration for tests: in-memory database, small fixed page sizes.
    pub fn for_tests() -> Self {
        ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_access_lifetime_secs: 3600,
            jwt_refresh_lifetime_secs: 604800,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
