//! Process configuration, read once from the environment at startup.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use quire_export::pdf::{ChromiumConfig, DEFAULT_LOAD_TIMEOUT};
use quire_storage::space::DEFAULT_ENDPOINT;
use thiserror::Error;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Largest request body a Lambda function URL accepts.
pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where published PDFs are stored.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Space { api_key: String, endpoint: String },
    S3 {
        bucket: String,
        public_base_url: Option<String>,
    },
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Space { endpoint, .. } => f
                .debug_struct("Space")
                .field("api_key", &"<redacted>")
                .field("endpoint", endpoint)
                .finish(),
            StorageBackend::S3 {
                bucket,
                public_base_url,
            } => f
                .debug_struct("S3")
                .field("bucket", bucket)
                .field("public_base_url", public_base_url)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub chrome_path: Option<PathBuf>,
    pub chrome_no_sandbox: bool,
    pub load_timeout: Duration,
    pub listen_addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match get("QUIRE_STORAGE").as_deref().unwrap_or("space") {
            "space" => StorageBackend::Space {
                api_key: get("QUIRE_SPACE_API_KEY")
                    .ok_or(ConfigError::Missing("QUIRE_SPACE_API_KEY"))?,
                endpoint: get("QUIRE_SPACE_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            },
            "s3" => StorageBackend::S3 {
                bucket: get("QUIRE_BUCKET").ok_or(ConfigError::Missing("QUIRE_BUCKET"))?,
                public_base_url: get("QUIRE_PUBLIC_BASE_URL"),
            },
            other => {
                return Err(ConfigError::Invalid {
                    var: "QUIRE_STORAGE",
                    value: other.to_string(),
                    reason: "expected `space` or `s3`".to_string(),
                });
            }
        };

        let chrome_no_sandbox = match get("QUIRE_CHROME_NO_SANDBOX") {
            Some(v) => parse_bool("QUIRE_CHROME_NO_SANDBOX", &v)?,
            None => false,
        };

        let load_timeout = match get("QUIRE_LOAD_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(invalid("QUIRE_LOAD_TIMEOUT_SECS", &v, "expected a positive integer")),
            },
            None => DEFAULT_LOAD_TIMEOUT,
        };

        let listen_addr = get("QUIRE_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| invalid("QUIRE_LISTEN_ADDR", &listen_addr, e))?;

        let max_body_bytes = match get("QUIRE_MAX_BODY_BYTES") {
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("QUIRE_MAX_BODY_BYTES", &v, "expected a positive integer")),
            },
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            storage,
            chrome_path: get("QUIRE_CHROME_PATH").map(PathBuf::from),
            chrome_no_sandbox,
            load_timeout,
            listen_addr,
            max_body_bytes,
        })
    }

    pub fn chromium(&self) -> ChromiumConfig {
        ChromiumConfig {
            executable: self.chrome_path.clone(),
            no_sandbox: self.chrome_no_sandbox,
            load_timeout: self.load_timeout,
            ..ChromiumConfig::default()
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected a boolean")),
    }
}

fn invalid(var: &'static str, value: &str, reason: impl fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
