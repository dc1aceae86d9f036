//! Configuration module
//!
//! Client configuration read from the environment (and an optional `.env` file):
//! server location and credentials, the server-side scope that receives upload events,
//! chunk size and request timeout.

use std::env;
use std::str::FromStr;

use tracing::debug;

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS};

const DEFAULT_API_URL: &str = "http://localhost:4000";
const DEFAULT_EVENTS_TARGET: &str = "file-upload";

/// How the client authenticates against the event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: Bearer {token}`
    Bearer,
    /// `X-API-Key: {key}`
    ApiKey,
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bearer" => Ok(AuthMode::Bearer),
            "api-key" | "api_key" | "apikey" => Ok(AuthMode::ApiKey),
            _ => Err(anyhow::anyhow!("Invalid auth mode: {}", s)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub auth_mode: AuthMode,
    pub events_target: String,
    pub chunk_size: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            auth_mode: AuthMode::Bearer,
            events_target: DEFAULT_EVENTS_TARGET.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let auth_mode = match env::var("SHIFTLINK_AUTH") {
            Ok(value) => value.parse()?,
            Err(_) => AuthMode::Bearer,
        };

        let config = ClientConfig {
            api_url: env::var("SHIFTLINK_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: env::var("SHIFTLINK_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .ok(),
            auth_mode,
            events_target: env::var("SHIFTLINK_EVENTS_TARGET")
                .unwrap_or_else(|_| DEFAULT_EVENTS_TARGET.to_string()),
            chunk_size: env::var("SHIFTLINK_CHUNK_SIZE")
                .ok()
                .map(|s| {
                    s.parse()
                        .map_err(|_| anyhow::anyhow!("SHIFTLINK_CHUNK_SIZE must be a valid number"))
                })
                .transpose()?
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            request_timeout_secs: env::var("SHIFTLINK_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        config.validate()?;
        debug!(
            api_url = %config.api_url,
            events_target = %config.events_target,
            chunk_size = config.chunk_size,
            "Loaded client configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API URL must start with http:// or https://, got {}",
                self.api_url
            ));
        }
        if self.chunk_size == 0 {
            return Err(anyhow::anyhow!("Chunk size must be greater than 0"));
        }
        if self.events_target.trim().is_empty() {
            return Err(anyhow::anyhow!("Events target must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Request timeout must be greater than 0"));
        }
        Ok(())
    }
}
