use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    pub jwt_secret: String,
    pub jwt_cookie_name: String,
    pub jwt_ttl_days: i64,
    pub cookie_secure: bool,

    pub finnhub_api_key: String,
    pub starting_cash: f64,
}

pub fn load() -> Result<Settings, ConfigError> {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://finance.db?mode=rwc".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());
    let jwt_cookie_name = env::var("JWT_COOKIE_NAME").unwrap_or_else(|_| "session".to_string());

    let jwt_ttl_days = env::var("JWT_TTL_DAYS")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(7);

    let cookie_secure = env::var("COOKIE_SECURE")
        .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    // Required: quote lookups cannot work without it.
    let finnhub_api_key = match env::var("FINNHUB_API_KEY") {
        Ok(k) if !k.trim().is_empty() => k,
        _ => return Err(ConfigError::MissingVar("FINNHUB_API_KEY")),
    };

    let starting_cash = env::var("STARTING_CASH")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(10_000.0);

    Ok(Settings {
        database_url,
        host,
        port,
        jwt_secret,
        jwt_cookie_name,
        jwt_ttl_days,
        cookie_secure,
        finnhub_api_key,
        starting_cash,
    })
}
