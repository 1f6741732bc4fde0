//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export CLICK_SECRET="shared-secret-used-by-link-generators"
//! export LISTEN="0.0.0.0:3000"
//! export BEHIND_PROXY=true
//! ```
//!
//! ## Required Variables
//!
//! - `CLICK_SECRET` - Shared secret click links are signed with
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `EVENT_QUEUE_CAPACITY` - Outbound event buffer size (default: 10000)
//! - `EVENT_MAX_SIZE` - Largest serialized event accepted, in bytes (default: 102400)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` (default: `false`)

use anyhow::{Context, Result};
use std::env;

use crate::infrastructure::events::{DEFAULT_MAX_EVENT_SIZE, DEFAULT_QUEUE_CAPACITY};

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Shared secret for click link signatures (`CLICK_SECRET`). Must be non-empty.
    pub click_secret: String,
    pub event_queue_capacity: usize,
    pub event_max_size: usize,
    /// When true, the client IP is read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("click_secret", &mask_secret(&self.click_secret))
            .field("event_queue_capacity", &self.event_queue_capacity)
            .field("event_max_size", &self.event_max_size)
            .field("behind_proxy", &self.behind_proxy)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `CLICK_SECRET` is missing.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let click_secret = env::var("CLICK_SECRET").context("CLICK_SECRET must be set")?;

        let event_queue_capacity = env::var("EVENT_QUEUE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        let event_max_size = env::var("EVENT_MAX_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_EVENT_SIZE);

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            click_secret,
            event_queue_capacity,
            event_max_size,
            behind_proxy,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `click_secret` is empty
    /// - `event_queue_capacity` is outside `1..=1000000`
    /// - `event_max_size` is outside `1024..=1048576`
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    pub fn validate(&self) -> Result<()> {
        if self.click_secret.is_empty() {
            anyhow::bail!("CLICK_SECRET must not be empty");
        }

        if self.event_queue_capacity == 0 || self.event_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "EVENT_QUEUE_CAPACITY must be between 1 and 1000000, got {}",
                self.event_queue_capacity
            );
        }

        if !(1024..=1024 * 1024).contains(&self.event_max_size) {
            anyhow::bail!(
                "EVENT_MAX_SIZE must be between 1024 and 1048576, got {}",
                self.event_max_size
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Click secret: {}", mask_secret(&self.click_secret));
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Event queue capacity: {}", self.event_queue_capacity);
        tracing::info!("  Event max size: {} bytes", self.event_max_size);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
    }
}

/// Masks a secret for logging, keeping only its length.
fn mask_secret(secret: &str) -> String {
    format!("*** ({} bytes)", secret.len())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
