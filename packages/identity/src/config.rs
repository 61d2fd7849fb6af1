use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Identity core configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub textlocal_api_key: String,
    pub textlocal_sender: String,
    pub admin_token_ttl_hours: i64,
    pub phone_token_ttl_days: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "shopfront".to_string()),
            textlocal_api_key: env::var("TEXTLOCAL_API_KEY")
                .context("TEXTLOCAL_API_KEY must be set")?,
            textlocal_sender: env::var("TEXTLOCAL_SENDER")
                .unwrap_or_else(|_| "SHPFRT".to_string()),
            admin_token_ttl_hours: env::var("ADMIN_TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("ADMIN_TOKEN_TTL_HOURS must be a valid number")?,
            phone_token_ttl_days: env::var("PHONE_TOKEN_TTL_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("PHONE_TOKEN_TTL_DAYS must be a valid number")?,
        })
    }
}
