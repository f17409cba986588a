//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::{Result, SinkError};

/// Default upper bound on a request body (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Log filter applied when verbose logging is requested.
pub const VERBOSE_LOG_FILTER: &str = "telemetry_sink=debug,info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface to bind (all interfaces by default).
    #[serde(default = "default_host")]
    pub host: String,

    /// Upper bound on an ingest request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_body_bytes: default_max_body_bytes(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Log filter directive: verbose if either the CLI flag or `VERBOSE` asks
    /// for it, `RUST_LOG` otherwise.
    pub fn log_filter(&self, cli_verbose: bool) -> &str {
        if cli_verbose || self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            &self.rust_log
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.trim().parse().map_err(|source| SinkError::Address {
            host: self.host.clone(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
