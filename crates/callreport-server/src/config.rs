//! Server configuration
//!
//! Read from the process environment (after `.env` is loaded). Every value
//! except `DATABASE_URL` has a default.

use std::net::SocketAddr;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

use callreport::DEFAULT_TARGET_ZONE;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection pool sizing and timeouts
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    /// Connections kept open at steady state
    pub size: u32,
    /// Extra connections allowed under load, on top of `size`
    pub max_overflow: u32,
    /// How long a request waits for a free connection
    pub acquire_timeout: Duration,
    /// Upper bound on any single storage operation
    pub statement_timeout: Duration,
}

impl PoolConfig {
    pub fn max_connections(&self) -> u32 {
        self.size + self.max_overflow
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 10,
            max_overflow: 20,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Shared secret expected in `x-vapi-secret`; `None` disables the check
    pub webhook_secret: Option<String>,
    pub display_zone: Tz,
    pub pool: PoolConfig,
    /// Listing window applied when no date bound is given
    pub default_window_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let defaults = PoolConfig::default();

        Ok(Self {
            database_url,
            bind_addr: parse_or(get("BIND_ADDR"), "BIND_ADDR", ([0, 0, 0, 0], 8000).into())?,
            webhook_secret: get("WEBHOOK_SECRET"),
            display_zone: parse_or(
                get("DISPLAY_TIMEZONE"),
                "DISPLAY_TIMEZONE",
                DEFAULT_TARGET_ZONE,
            )?,
            pool: PoolConfig {
                size: parse_or(get("DB_POOL_SIZE"), "DB_POOL_SIZE", defaults.size)?,
                max_overflow: parse_or(
                    get("DB_MAX_OVERFLOW"),
                    "DB_MAX_OVERFLOW",
                    defaults.max_overflow,
                )?,
                acquire_timeout: parse_secs_or(
                    get("DB_ACQUIRE_TIMEOUT_SECS"),
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    defaults.acquire_timeout,
                )?,
                statement_timeout: parse_secs_or(
                    get("DB_STATEMENT_TIMEOUT_SECS"),
                    "DB_STATEMENT_TIMEOUT_SECS",
                    defaults.statement_timeout,
                )?,
            },
            default_window_days: parse_window_days(get("LIST_DEFAULT_WINDOW_DAYS"))?,
        })
    }
}

/// Longest listing window accepted, in days
pub const MAX_WINDOW_DAYS: i64 = 36_500;

fn parse_window_days(raw: Option<String>) -> Result<i64, ConfigError> {
    const KEY: &str = "LIST_DEFAULT_WINDOW_DAYS";

    let days: i64 = parse_or(raw, KEY, 30)?;
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(ConfigError::Invalid {
            key: KEY,
            value: days.to_string(),
            reason: format!("must be between 1 and {MAX_WINDOW_DAYS}"),
        });
    }
    Ok(days)
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_secs_or(
    raw: Option<String>,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs = parse_or(raw, key, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/calls")]))
                .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.webhook_secret, None);
        assert_eq!(config.display_zone, Tz::Australia__Sydney);
        assert_eq!(config.pool, PoolConfig::default());
        assert_eq!(config.pool.max_connections(), 30);
        assert_eq!(config.default_window_days, 30);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/calls"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("WEBHOOK_SECRET", "s3cret"),
            ("DISPLAY_TIMEZONE", "Europe/London"),
            ("DB_POOL_SIZE", "4"),
            ("DB_MAX_OVERFLOW", "2"),
            ("DB_STATEMENT_TIMEOUT_SECS", "3"),
            ("LIST_DEFAULT_WINDOW_DAYS", "7"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.display_zone, Tz::Europe__London);
        assert_eq!(config.pool.max_connections(), 6);
        assert_eq!(config.pool.statement_timeout, Duration::from_secs(3));
        assert_eq!(config.default_window_days, 7);
    }

    #[test]
    fn test_missing_database_url() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_blank_secret_disables_check() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/calls"),
            ("WEBHOOK_SECRET", "  "),
        ]))
        .unwrap();
        assert_eq!(config.webhook_secret, None);
    }

    #[test]
    fn test_window_days_out_of_range() {
        for value in ["0", "-7", "9223372036854775807"] {
            let result = AppConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://db/calls"),
                ("LIST_DEFAULT_WINDOW_DAYS", value),
            ]));
            assert!(
                matches!(
                    result,
                    Err(ConfigError::Invalid {
                        key: "LIST_DEFAULT_WINDOW_DAYS",
                        ..
                    })
                ),
                "{value}"
            );
        }

        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/calls"),
            ("LIST_DEFAULT_WINDOW_DAYS", "36500"),
        ]))
        .unwrap();
        assert_eq!(config.default_window_days, MAX_WINDOW_DAYS);
    }

    #[test]
    fn test_invalid_values() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/calls"),
            ("DISPLAY_TIMEZONE", "Mars/Olympus"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "DISPLAY_TIMEZONE",
                ..
            })
        ));

        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/calls"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "0"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "DB_ACQUIRE_TIMEOUT_SECS",
                ..
            })
        ));
    }
}
