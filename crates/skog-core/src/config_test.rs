use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SKOG_ENV"));
}

#[test]
fn build_app_config_defaults_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.root_uri, "http://derks.spar.nl");
    assert_eq!(cfg.feed_layout, "classic");
    assert!(cfg.cache_dir.is_none());
    assert_eq!(cfg.scraper_request_timeout_secs, 30);
    assert_eq!(cfg.scraper_user_agent, "supermarx skog/1.0");
    assert_eq!(cfg.scraper_inter_request_delay_ms, 250);
    assert_eq!(cfg.scraper_max_retries, 3);
    assert_eq!(cfg.scraper_retry_backoff_base_ms, 1000);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("SKOG_ENV", "production");
    map.insert("SKOG_ROOT_URI", "https://example.spar.nl");
    map.insert("SKOG_FEED_LAYOUT", "badged");
    map.insert("SKOG_CACHE_DIR", "./cache");
    map.insert("SKOG_INTER_REQUEST_DELAY_MS", "1000");
    map.insert("SKOG_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.root_uri, "https://example.spar.nl");
    assert_eq!(cfg.feed_layout, "badged");
    assert_eq!(
        cfg.cache_dir.as_deref(),
        Some(std::path::Path::new("./cache"))
    );
    assert_eq!(cfg.scraper_inter_request_delay_ms, 1000);
    assert_eq!(cfg.scraper_max_retries, 0);
}

#[test]
fn build_app_config_empty_cache_dir_disables_cache() {
    let mut map = HashMap::new();
    map.insert("SKOG_CACHE_DIR", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.cache_dir.is_none());
}

#[test]
fn build_app_config_rejects_non_http_root() {
    let mut map = HashMap::new();
    map.insert("SKOG_ROOT_URI", "derks.spar.nl");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SKOG_ROOT_URI"),
        "expected InvalidEnvVar(SKOG_ROOT_URI), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("SKOG_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SKOG_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SKOG_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_max_retries() {
    let mut map = HashMap::new();
    map.insert("SKOG_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SKOG_MAX_RETRIES"),
        "expected InvalidEnvVar(SKOG_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_unknown_environment() {
    let mut map = HashMap::new();
    map.insert("SKOG_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SKOG_ENV"),
        "expected InvalidEnvVar(SKOG_ENV), got: {result:?}"
    );
}
