//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `DATABASE_URL` | unset: in-memory repository |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `FILE_STORAGE_PATH` | `/var/lib/madori/files` |
//! | `MAX_UPLOAD_BYTES` | `52428800` (50 MiB) |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `LOG_FORMAT` | `text` (`json` for structured output) |
//! | `LOG_FILE` | unset: stdout only |
//! | `LOG_ANSI` | auto-detected |
//!
//! Blank values count as unset.

use madori_core::{defaults, Error, Result};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub file_storage_path: String,
    pub max_upload_bytes: u64,
    pub allowed_origins: String,
    pub log_format: String,
    pub log_file: Option<String>,
    pub log_ansi: Option<bool>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            database_url: None,
            database_max_connections: defaults::DB_MAX_CONNECTIONS,
            file_storage_path: defaults::FILE_STORAGE_PATH.to_string(),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            log_format: "text".to_string(),
            log_file: None,
            log_ansi: None,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} is not a valid number: {}", key, raw))),
        None => Ok(default),
    }
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup.
    ///
    /// Blank values count as unset. Unparseable numbers are `Error::Config`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let base = Self::default();

        Ok(Self {
            host: get("HOST").unwrap_or(base.host),
            port: parse_number("PORT", get("PORT"), base.port)?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_number(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                base.database_max_connections,
            )?,
            file_storage_path: get("FILE_STORAGE_PATH").unwrap_or(base.file_storage_path),
            max_upload_bytes: parse_number(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                base.max_upload_bytes,
            )?,
            allowed_origins: get("ALLOWED_ORIGINS").unwrap_or(base.allowed_origins),
            log_format: get("LOG_FORMAT").unwrap_or(base.log_format),
            log_file: get("LOG_FILE"),
            log_ansi: get("LOG_ANSI").map(|v| v == "true" || v == "1"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
