use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// configuration pointed at the Derks storefront.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("SKOG_ENV", "development"))?;
    let log_level = or_default("SKOG_LOG_LEVEL", "info");

    let root_uri = or_default("SKOG_ROOT_URI", "http://derks.spar.nl");
    if !root_uri.starts_with("http://") && !root_uri.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "SKOG_ROOT_URI".to_string(),
            reason: format!("expected an http(s) URI, got \"{root_uri}\""),
        });
    }

    let feed_layout = or_default("SKOG_FEED_LAYOUT", "classic");
    let cache_dir = lookup("SKOG_CACHE_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let scraper_request_timeout_secs = parse_u64("SKOG_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("SKOG_USER_AGENT", "supermarx skog/1.0");
    let scraper_inter_request_delay_ms = parse_u64("SKOG_INTER_REQUEST_DELAY_MS", "250")?;
    let scraper_max_retries = parse_u32("SKOG_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_ms = parse_u64("SKOG_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        root_uri,
        feed_layout,
        cache_dir,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SKOG_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
