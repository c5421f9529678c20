use anyhow::{anyhow, Context, Result};
use dotenv::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: String,
    /// Public base url, used to build invite links.
    pub app_url: String,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8088".to_owned());
        let app_url = env::var("APP_URL").unwrap_or_else(|_| format!("http://{}", bind_address));
        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(value) => value
                .parse::<i64>()
                .with_context(|| format!("TOKEN_TTL_HOURS is not a number: {}", value))?,
            Err(_) => 24,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_address,
            app_url: app_url.trim_end_matches('/').to_owned(),
            token_ttl_hours,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: ":memory:".to_owned(),
            jwt_secret: "test-secret".to_owned(),
            bind_address: "127.0.0.1:0".to_owned(),
            app_url: "http://localhost:8088".to_owned(),
            token_ttl_hours: 1,
        }
    }
}
