//! Runtime configuration read from the environment (and an optional `.env`).

use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE: &str = "dojo_documents.sqlite";
const DEFAULT_PREVIEW_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_JSON_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_path: String,
    /// Upper bound for sample-data lookups during a preview.
    pub preview_timeout: Duration,
    /// Render missing placeholder values as an empty marker element instead of nothing.
    pub mark_missing_placeholders: bool,
    pub json_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE.to_string(),
            preview_timeout: Duration::from_millis(DEFAULT_PREVIEW_TIMEOUT_MS),
            mark_missing_placeholders: false,
            json_limit_bytes: DEFAULT_JSON_LIMIT_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys use the defaults,
    /// unparseable ones log a warning and use the defaults too.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("DOJO_HOST").unwrap_or(defaults.host),
            port: parse_or("DOJO_PORT", &lookup, defaults.port),
            database_path: lookup("DOJO_DATABASE").unwrap_or(defaults.database_path),
            preview_timeout: Duration::from_millis(parse_or(
                "DOJO_PREVIEW_TIMEOUT_MS",
                &lookup,
                DEFAULT_PREVIEW_TIMEOUT_MS,
            )),
            mark_missing_placeholders: parse_or(
                "DOJO_MARK_MISSING_PLACEHOLDERS",
                &lookup,
                defaults.mark_missing_placeholders,
            ),
            json_limit_bytes: parse_or("DOJO_JSON_LIMIT_BYTES", &lookup, defaults.json_limit_bytes),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid value '{}' for {}, using default", raw, key);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, "dojo_documents.sqlite");
        assert_eq!(config.preview_timeout, Duration::from_millis(2_000));
        assert!(!config.mark_missing_placeholders);
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let vars: HashMap<&str, &str> = [
            ("DOJO_PORT", "9090"),
            ("DOJO_PREVIEW_TIMEOUT_MS", "not-a-number"),
            ("DOJO_MARK_MISSING_PLACEHOLDERS", "true"),
            ("DOJO_DATABASE", "/tmp/dojo.sqlite"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 9090);
        assert_eq!(config.preview_timeout, Duration::from_millis(2_000));
        assert!(config.mark_missing_placeholders);
        assert_eq!(config.database_path, "/tmp/dojo.sqlite");
    }
}
