//! Application configuration read from the environment

use base64::Engine;
use rand::RngCore;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::db::{DbConfig, Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "postgresql://postgres@localhost:5432/warbler";
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Settings for the Warbler server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection settings, from `DATABASE_URL`
    pub database: DbConfig,

    /// Key used to sign session cookies, from `SECRET_KEY`
    pub secret_key: String,

    /// Listen address, from `WARBLER_ADDR`
    pub addr: SocketAddr,

    /// Directory served under `/static`, from `WARBLER_STATIC_DIR`
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let database = DbConfig::from_connection_string(&database_url)?;

        let secret_key = match lookup("SECRET_KEY").filter(|key| !key.is_empty()) {
            Some(key) => key,
            None => {
                tracing::warn!("SECRET_KEY is not set, sessions will not survive a restart");
                generate_secret_key()
            }
        };

        let addr = lookup("WARBLER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Validation(format!("Invalid WARBLER_ADDR: {}", e)))?;

        let static_dir = lookup("WARBLER_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            database,
            secret_key,
            addr,
            static_dir,
        })
    }
}

fn generate_secret_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
