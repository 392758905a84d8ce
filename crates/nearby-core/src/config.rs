use crate::app_config::{AppConfig, Environment};
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
/// Parsing and validation live here, decoupled from the process environment so
/// tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("NEARBY_ENV", "development"))?;

    let bind_addr = parse_addr("NEARBY_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("NEARBY_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("NEARBY_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("NEARBY_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("NEARBY_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let maps_api_key = lookup("NEARBY_MAPS_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let maps_base_url = or_default("NEARBY_MAPS_BASE_URL", "https://maps.googleapis.com");
    let geocode_timeout_secs = parse_u64("NEARBY_GEOCODE_TIMEOUT_SECS", "10")?;
    if geocode_timeout_secs == 0 {
        return Err(invalid(
            "NEARBY_GEOCODE_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let geocode_user_agent = or_default(
        "NEARBY_GEOCODE_USER_AGENT",
        "nearby/0.1 (business-discovery)",
    );
    let routing_enabled = parse_bool("NEARBY_ROUTING_ENABLED", "true")?;

    let search_utc_offset_minutes = parse_utc_offset(&or_default(
        "NEARBY_SEARCH_UTC_OFFSET_MINUTES",
        "0",
    ))?;

    let rate_limit_per_minute = parse_usize("NEARBY_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        maps_api_key,
        maps_base_url,
        geocode_timeout_secs,
        geocode_user_agent,
        routing_enabled,
        search_utc_offset_minutes,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Real-world offsets span UTC-12:00 to UTC+14:00.
fn parse_utc_offset(s: &str) -> Result<i32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "NEARBY_SEARCH_UTC_OFFSET_MINUTES".to_string(),
        reason,
    };
    let minutes = s.trim().parse::<i32>().map_err(|e| invalid(e.to_string()))?;
    if !(-720..=840).contains(&minutes) {
        return Err(invalid(format!("{minutes} is outside -720..=840")));
    }
    Ok(minutes)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
