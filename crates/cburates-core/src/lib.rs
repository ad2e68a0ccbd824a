//! Shared configuration and calendar types for the CBU rate collector.

pub mod app_config;
pub mod config;
pub mod days;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use days::{DayRange, Days};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("end_date must not be earlier than start_date")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
