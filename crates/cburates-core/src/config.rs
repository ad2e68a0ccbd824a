use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
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
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable config
/// pointed at the production rate archive.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use chrono::NaiveDate;

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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_date = |var: &str, default: &str| -> Result<NaiveDate, ConfigError> {
        NaiveDate::parse_from_str(&or_default(var, default), "%Y-%m-%d")
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CBURATES_ENV", "development"));
    let bind_addr = parse_addr("CBURATES_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("CBURATES_LOG_LEVEL", "info");
    let output_path = PathBuf::from(or_default("CBURATES_OUTPUT_PATH", "usd_rates.csv"));
    let base_url = or_default(
        "CBURATES_BASE_URL",
        "https://cbu.uz/uz/arkhiv-kursov-valyut/json/",
    );

    let currency = or_default("CBURATES_CURRENCY", "USD").trim().to_uppercase();
    if currency.is_empty() || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            "CBURATES_CURRENCY",
            format!("expected an alphabetic currency code, got {currency:?}"),
        ));
    }

    let request_timeout_secs = parse_u64("CBURATES_REQUEST_TIMEOUT_SECS", "15")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "CBURATES_REQUEST_TIMEOUT_SECS",
            "timeout must be at least one second".to_string(),
        ));
    }

    let user_agent = or_default("CBURATES_USER_AGENT", "cburates/0.1 (rate-archive)");
    let default_start_date = parse_date("CBURATES_DEFAULT_START_DATE", "2018-12-01")?;
    let default_end_date = parse_date("CBURATES_DEFAULT_END_DATE", "2025-12-09")?;

    if default_end_date < default_start_date {
        return Err(invalid(
            "CBURATES_DEFAULT_END_DATE",
            format!("{default_end_date} is earlier than the default start {default_start_date}"),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        output_path,
        base_url,
        currency,
        request_timeout_secs,
        user_agent,
        default_start_date,
        default_end_date,
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
