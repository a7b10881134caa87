//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the simulated API can start with
//! zero configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use talentflow_shared::constants::{
    DEFAULT_CANDIDATE_COUNT, DEFAULT_FAILURE_RATE, DEFAULT_HTTP_PORT, DEFAULT_LATENCY_MS,
};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address for the HTTP (axum) demo server.
    /// Env: `HTTP_ADDR`
    /// Default: `127.0.0.1:8080`
    pub http_addr: SocketAddr,

    /// Filesystem path of the SQLite database. When unset the store is
    /// in-memory and dies with the process.
    /// Env: `DB_PATH`
    /// Default: unset
    pub db_path: Option<PathBuf>,

    /// Artificial latency applied to every matched API call.
    /// Env: `LATENCY_MS`
    /// Default: `400`
    pub latency: Duration,

    /// Probability that a mutating call is answered with an injected 500.
    /// Env: `FAILURE_RATE` (0.0 ..= 1.0)
    /// Default: `0.08`
    pub failure_rate: f64,

    /// Whether to load the demo fixtures at startup.
    /// Env: `SEED_FIXTURES` (true/false)
    /// Default: `true`
    pub seed_fixtures: bool,

    /// How many candidates the fixture seeder creates.
    /// Env: `CANDIDATE_COUNT`
    /// Default: `1000`
    pub candidate_count: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            http_addr: ([127, 0, 0, 1], DEFAULT_HTTP_PORT).into(),
            db_path: None,
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            failure_rate: DEFAULT_FAILURE_RATE,
            seed_fixtures: true,
            candidate_count: DEFAULT_CANDIDATE_COUNT,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(path) = std::env::var("DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(val) = std::env::var("LATENCY_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                config.latency = Duration::from_millis(ms);
            } else {
                tracing::warn!(value = %val, "Invalid LATENCY_MS, using default");
            }
        }

        if let Ok(val) = std::env::var("FAILURE_RATE") {
            match val.parse::<f64>() {
                Ok(rate) if (0.0..=1.0).contains(&rate) => config.failure_rate = rate,
                _ => {
                    tracing::warn!(value = %val, "Invalid FAILURE_RATE, using default");
                }
            }
        }

        if let Ok(val) = std::env::var("SEED_FIXTURES") {
            config.seed_fixtures = val != "false" && val != "0";
        }

        if let Ok(val) = std::env::var("CANDIDATE_COUNT") {
            if let Ok(n) = val.parse::<u32>() {
                config.candidate_count = n;
            } else {
                tracing::warn!(value = %val, "Invalid CANDIDATE_COUNT, using default");
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 8080).into());
        assert_eq!(config.latency, Duration::from_millis(400));
        assert!((config.failure_rate - 0.08).abs() < f64::EPSILON);
        assert!(config.seed_fixtures);
        assert_eq!(config.candidate_count, 1000);
        assert!(config.db_path.is_none());
    }
}
