//! Configuration module for the suivi backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Shared password of the seeded demo accounts
    pub demo_password: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("SUIVI_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid SUIVI_BIND_ADDR format");

        let log_level = env::var("SUIVI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let demo_password =
            env::var("SUIVI_DEMO_PASSWORD").unwrap_or_else(|_| "demo".to_string());

        Self {
            bind_addr,
            log_level,
            demo_password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("SUIVI_BIND_ADDR");
        env::remove_var("SUIVI_LOG_LEVEL");
        env::remove_var("SUIVI_DEMO_PASSWORD");

        let config = Config::from_env();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.demo_password, "demo");
    }
}
