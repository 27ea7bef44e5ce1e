use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub run_migrations: bool,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub storage_bucket: String,
    pub signed_url_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        let run_migrations = get("RUN_MIGRATIONS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let ttl_secs = match get("SIGNED_URL_TTL_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "SIGNED_URL_TTL_SECS",
                reason: e.to_string(),
            })?,
            None => 3600,
        };
        if ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SIGNED_URL_TTL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            port,
            run_migrations,
            supabase_url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            supabase_service_key: required("SUPABASE_SERVICE_KEY")?,
            storage_bucket: get("STORAGE_BUCKET").unwrap_or_else(|| "attachments".to_string()),
            signed_url_ttl: Duration::from_secs(ttl_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
