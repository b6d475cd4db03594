use chrono::{DateTime, NaiveDate, Utc};

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let feed_url = require("REVMON_FEED_URL")?;
    let database_url = optional("DATABASE_URL");
    let arbiter_url = optional("REVMON_ARBITER_URL");

    let user_agent = or_default("REVMON_USER_AGENT", "revmon/0.1 (review-monitor)");

    let at_least_one = |var: &str| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: "must be at least 1".to_string(),
    };

    let request_timeout_secs = parse_u64("REVMON_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(at_least_one("REVMON_REQUEST_TIMEOUT_SECS"));
    }
    let call_timeout_secs = parse_u64("REVMON_CALL_TIMEOUT_SECS", "120")?;
    if call_timeout_secs == 0 {
        return Err(at_least_one("REVMON_CALL_TIMEOUT_SECS"));
    }
    let max_pages = parse_usize("REVMON_MAX_PAGES", "500")?;
    if max_pages == 0 {
        return Err(at_least_one("REVMON_MAX_PAGES"));
    }

    let db_max_connections = parse_u32("REVMON_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("REVMON_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("REVMON_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        feed_url,
        arbiter_url,
        user_agent,
        request_timeout_secs,
        call_timeout_secs,
        max_pages,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a `YYYY-MM-DD` start date into a UTC midnight cutoff.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDate`] if the value is not a calendar date.
pub fn parse_min_date(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ConfigError::InvalidDate {
            value: value.to_string(),
        }
    })?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
