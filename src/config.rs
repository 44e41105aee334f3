//! Runtime configuration read from the environment.

use std::env::VarError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub log_level: String,
    pub nats_url: Option<String>,
    pub db_max_connections: u32,
    pub upload_dir: PathBuf,
    pub public_media_url: String,
    pub default_admin_username: String,
    pub default_admin_password: String,
    pub share_delay: Duration,
    /// Largest accepted `/api/upload` body, in bytes.
    pub upload_max_bytes: usize,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());
        let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar { var: var.to_string(), reason };

        let database_url = lookup("DATABASE_URL").map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".into()))?;
        let port = or_default("PORT", "8083").parse::<u16>().map_err(|e| invalid("PORT", e.to_string()))?;
        let db_max_connections = or_default("DB_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| invalid("DB_MAX_CONNECTIONS", e.to_string()))?;
        let share_delay_ms = or_default("SHARE_DELAY_MS", "500")
            .parse::<u64>()
            .map_err(|e| invalid("SHARE_DELAY_MS", e.to_string()))?;
        let upload_max_bytes = or_default("UPLOAD_MAX_BYTES", "104857600")
            .parse::<usize>()
            .map_err(|e| invalid("UPLOAD_MAX_BYTES", e.to_string()))?;

        Ok(Self {
            database_url,
            port,
            log_level: or_default("LOG_LEVEL", "info"),
            nats_url: lookup("NATS_URL").ok().filter(|u| !u.trim().is_empty()),
            db_max_connections,
            upload_dir: PathBuf::from(or_default("UPLOAD_DIR", "./uploads")),
            public_media_url: or_default("PUBLIC_MEDIA_URL", "/uploads").trim_end_matches('/').to_string(),
            default_admin_username: or_default("DEFAULT_ADMIN_USERNAME", "admin"),
            default_admin_password: or_default("DEFAULT_ADMIN_PASSWORD", "admin123"),
            share_delay: Duration::from_millis(share_delay_ms),
            upload_max_bytes,
        })
    }

    pub fn bind_addr(&self) -> String { format!("0.0.0.0:{}", self.port) }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("nats_url", &self.nats_url)
            .field("db_max_connections", &self.db_max_connections)
            .field("upload_dir", &self.upload_dir)
            .field("public_media_url", &self.public_media_url)
            .field("default_admin_username", &self.default_admin_username)
            .field("default_admin_password", &"[redacted]")
            .field("share_delay", &self.share_delay)
            .field("upload_max_bytes", &self.upload_max_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from_map<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| map.get(key).map(|v| (*v).to_string()).ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_missing_database_url() {
        let map = HashMap::new();
        assert_eq!(AppConfig::from_lookup(lookup_from_map(&map)).unwrap_err(), ConfigError::MissingEnvVar("DATABASE_URL".into()));
    }

    #[test]
    fn test_defaults() {
        let map = HashMap::from([("DATABASE_URL", "postgres://u:p@localhost/farm")]);
        let config = AppConfig::from_lookup(lookup_from_map(&map)).unwrap();
        assert_eq!(config.port, 8083);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.nats_url, None);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.public_media_url, "/uploads");
        assert_eq!(config.default_admin_username, "admin");
        assert_eq!(config.share_delay, Duration::from_millis(500));
        assert_eq!(config.upload_max_bytes, 100 * 1024 * 1024);
        assert_eq!(config.bind_addr(), "0.0.0.0:8083");
    }

    #[test]
    fn test_invalid_port() {
        let map = HashMap::from([("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]);
        let err = AppConfig::from_lookup(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PORT"));
    }

    #[test]
    fn test_invalid_upload_limit() {
        let map = HashMap::from([("DATABASE_URL", "postgres://x"), ("UPLOAD_MAX_BYTES", "100MB")]);
        let err = AppConfig::from_lookup(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "UPLOAD_MAX_BYTES"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let map = HashMap::from([("DATABASE_URL", "postgres://u:secret@db/farm"), ("DEFAULT_ADMIN_PASSWORD", "hunter2")]);
        let rendered = format!("{:?}", AppConfig::from_lookup(lookup_from_map(&map)).unwrap());
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("hunter2"));
    }
}
