use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Provider environment, selects the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEnvironment {
    Sandbox,
    Production,
}

impl ProviderEnvironment {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "sandbox" => Ok(ProviderEnvironment::Sandbox),
            "production" => Ok(ProviderEnvironment::Production),
            other => anyhow::bail!("PROVIDER_ENV must be 'sandbox' or 'production', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub provider_env: ProviderEnvironment,
    pub provider_api_key: String,
    pub provider_platform_id: Option<String>,
    pub webhook_secret: String,
    pub admin_api_url: String,
    pub product_name: String,
    pub product_description: String,
    /// Default price in cents when the checkout request carries no amount.
    pub product_price: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        let config = Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            provider_env: ProviderEnvironment::parse(
                &env::var("PROVIDER_ENV").unwrap_or_else(|_| "sandbox".to_string()),
            )?,
            provider_api_key: env::var("PROVIDER_API_KEY")
                .context("PROVIDER_API_KEY is required")?,
            provider_platform_id: env::var("PROVIDER_PLATFORM_ID").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").context("WEBHOOK_SECRET is required")?,
            admin_api_url: env::var("ADMIN_API_URL").context("ADMIN_API_URL is required")?,
            product_name: env::var("PRODUCT_NAME").unwrap_or_else(|_| "Checkout Item".to_string()),
            product_description: env::var("PRODUCT_DESCRIPTION")
                .unwrap_or_else(|_| "Checkout Item".to_string()),
            product_price: env::var("PRODUCT_PRICE")
                .unwrap_or_else(|_| "29900".to_string())
                .parse()
                .context("PRODUCT_PRICE must be an integer amount in cents")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.webhook_secret.is_empty() {
            anyhow::bail!("WEBHOOK_SECRET must not be empty");
        }
        if self.product_price <= 0 {
            anyhow::bail!("PRODUCT_PRICE must be positive");
        }
        url::Url::parse(&self.admin_api_url).context("ADMIN_API_URL is not a valid URL")?;
        Ok(())
    }
}
