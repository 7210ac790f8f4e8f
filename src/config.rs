// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory; missing JWT
//! secrets fail startup outright.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS and email links
    pub client_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// `development` or `production`; production enables Secure cookies
    pub environment: String,

    // --- Token issuance ---
    /// Access token signing key (raw bytes)
    pub jwt_access_secret: Vec<u8>,
    /// Refresh token signing key (raw bytes)
    pub jwt_refresh_secret: Vec<u8>,
    /// Access token lifetime in minutes
    pub jwt_access_expire_minutes: u64,
    /// Refresh token lifetime in days
    pub jwt_refresh_expire_days: u64,

    // --- SMTP ---
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_from: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            client_url: env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),

            jwt_access_secret: env::var("JWT_ACCESS_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_ACCESS_SECRET"))?
                .into_bytes(),
            jwt_refresh_secret: env::var("JWT_REFRESH_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_REFRESH_SECRET"))?
                .into_bytes(),
            jwt_access_expire_minutes: env::var("JWT_ACCESS_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            jwt_refresh_expire_days: env::var("JWT_REFRESH_EXPIRE_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),

            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            smtp_from: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "noreply@fittrack.local".to_string()),
        })
    }

    /// Whether the app is running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            client_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            environment: "development".to_string(),
            jwt_access_secret: b"test_access_key_32_bytes_minimum".to_vec(),
            jwt_refresh_secret: b"test_refresh_key_32_bytes_minimm".to_vec(),
            jwt_access_expire_minutes: 15,
            jwt_refresh_expire_days: 7,
            smtp_host: "localhost".to_string(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_from: "noreply@fittrack.local".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_ACCESS_SECRET", "test_access_key_32_bytes_minimum");
        env::set_var("JWT_REFRESH_SECRET", "test_refresh_key_32_bytes_minimm");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_access_expire_minutes, 15);
        assert_eq!(config.jwt_refresh_expire_days, 7);
        assert!(!config.is_production());
        assert_ne!(config.jwt_access_secret, config.jwt_refresh_secret);
    }
}
