use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, TemperatureUnit};

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
/// Parsing and validation are decoupled from the real environment so tests can
/// drive them from a plain `HashMap`.
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

    // Blank values count as unset for optional secrets.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("DREAMLOOP_ENV", "development"));
    let bind_addr = parse_addr("DREAMLOOP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("DREAMLOOP_LOG_LEVEL", "info");
    let cron_secret = optional("DREAMLOOP_CRON_SECRET");

    let db_max_connections = parse_u32("DREAMLOOP_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("DREAMLOOP_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DREAMLOOP_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let openrouter_api_key = optional("OPENROUTER_API_KEY");
    let openrouter_base_url = or_default("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1");
    let openrouter_model = or_default("OPENROUTER_MODEL", "openai/gpt-4o-mini");
    let weather_base_url = or_default("DREAMLOOP_WEATHER_BASE_URL", "https://api.open-meteo.com");
    let expo_push_url = or_default("EXPO_PUSH_URL", "https://exp.host/--/api/v2/push/send");
    let expo_access_token = optional("EXPO_ACCESS_TOKEN");
    let http_timeout_secs = parse_u64("DREAMLOOP_HTTP_TIMEOUT_SECS", "30")?;

    let daily_cron = or_default("DREAMLOOP_DAILY_CRON", "0 */15 * * * *");
    let daily_scheduler_enabled = parse_bool("DREAMLOOP_DAILY_SCHEDULER_ENABLED", "true")?;
    let daily_max_concurrent_users = or_default("DREAMLOOP_DAILY_MAX_CONCURRENT_USERS", "1")
        .parse::<usize>()
        .map_err(|e| invalid("DREAMLOOP_DAILY_MAX_CONCURRENT_USERS", e.to_string()))?;
    if daily_max_concurrent_users == 0 {
        return Err(invalid(
            "DREAMLOOP_DAILY_MAX_CONCURRENT_USERS",
            "must be at least 1".to_string(),
        ));
    }

    let temperature_unit = or_default("DREAMLOOP_TEMPERATURE_UNIT", "C")
        .parse::<TemperatureUnit>()
        .map_err(|e| invalid("DREAMLOOP_TEMPERATURE_UNIT", e.to_string()))?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        cron_secret,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        openrouter_api_key,
        openrouter_base_url,
        openrouter_model,
        weather_base_url,
        expo_push_url,
        expo_access_token,
        http_timeout_secs,
        daily_cron,
        daily_scheduler_enabled,
        daily_max_concurrent_users,
        temperature_unit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
