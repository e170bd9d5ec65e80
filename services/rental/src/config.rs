//! Service configuration from environment variables

use std::env;

/// Rental service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Fixed page size for list endpoints
    pub rows_per_page: u32,
    /// Session lifetime in minutes
    pub session_lifetime_minutes: u64,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - `ROWS_PER_PAGE`: page size for list endpoints (default: 2)
    /// - `SESSION_LIFETIME_MINUTES`: session TTL in minutes (default: 60)
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rows_per_page = env::var("ROWS_PER_PAGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2);

        let session_lifetime_minutes = env::var("SESSION_LIFETIME_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        AppConfig {
            bind_addr,
            rows_per_page,
            session_lifetime_minutes,
        }
    }

    /// Session TTL in seconds, as handed to the session store
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_lifetime_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ttl_seconds() {
        let config = AppConfig {
            bind_addr: "0.0.0.0:3000".to_string(),
            rows_per_page: 2,
            session_lifetime_minutes: 60,
        };
        assert_eq!(config.session_ttl_seconds(), 3600);
    }
}
