use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; in-memory stores are used when absent
    pub database_url: Option<String>,
    pub port: u16,
    /// The single calendar year favorites may be scheduled in
    pub schedule_year: i32,
    pub request_timeout_secs: u64,
    pub database_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_url: var("DATABASE_URL"),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .trim()
                .parse()
                .context("PORT must be a valid number")?,
            schedule_year: match var("SCHEDULE_YEAR") {
                Some(year) => year
                    .trim()
                    .parse()
                    .context("SCHEDULE_YEAR must be a valid year")?,
                None => Utc::now().year(),
            },
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .trim()
                .parse()
                .context("REQUEST_TIMEOUT_SECS must be a valid number")?,
            database_max_connections: var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .trim()
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.schedule_year, Utc::now().year());
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.database_max_connections, 10);
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/puntos"),
            ("PORT", "9000"),
            ("SCHEDULE_YEAR", "2025"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/puntos")
        );
        assert_eq!(config.port, 9000);
        assert_eq!(config.schedule_year, 2025);
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_invalid_numbers_are_reported() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = config_from(&[("SCHEDULE_YEAR", "next")]).unwrap_err();
        assert!(err.to_string().contains("SCHEDULE_YEAR"));
    }
}
