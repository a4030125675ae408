use axum::http::HeaderValue;
use std::net::SocketAddr;
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Frontends that are always allowed to call the API
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:4173",
    "https://hushhour.app",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Server configuration read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Reads `HUSHHOUR_BIND_ADDR` and `CORS_ORIGINS`, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("HUSHHOUR_BIND_ADDR").ok().as_deref(),
            std::env::var("CORS_ORIGINS").ok().as_deref(),
        )
    }

    fn from_values(bind_addr: Option<&str>, cors_origins: Option<&str>) -> Result<Self, ConfigError> {
        let bind_addr = bind_addr.unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind_addr.to_string(),
                reason: e.to_string(),
            })?;

        // Extra origins are appended to the built-in list
        let mut origins: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect();
        if let Some(extra) = cors_origins {
            origins.extend(
                extra
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string),
            );
        }

        Ok(Self {
            bind_addr,
            cors_origins: origins,
        })
    }

    /// CORS policy for the configured origins, with credentials allowed
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Skipping invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}
