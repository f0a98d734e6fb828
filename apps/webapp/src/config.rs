use anyhow::{ensure, Context, Result};

/// Front-end configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server endpoint prefix every REST resource path is resolved against.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_timeout = lookup("REQUEST_TIMEOUT_SECS").unwrap_or_else(|| "30".to_string());
        let request_timeout_secs = raw_timeout
            .trim()
            .parse::<u64>()
            .with_context(|| {
                format!("REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{raw_timeout}'")
            })?;
        ensure!(
            request_timeout_secs > 0,
            "REQUEST_TIMEOUT_SECS must be at least 1 second"
        );

        Ok(Config {
            api_base_url: lookup("API_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080/".to_string()),
            request_timeout_secs,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
