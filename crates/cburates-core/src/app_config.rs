use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// CSV file that every run appends to.
    pub output_path: PathBuf,
    /// Archive root; the currency code and day fragment are appended to it.
    pub base_url: String,
    pub currency: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub default_start_date: NaiveDate,
    pub default_end_date: NaiveDate,
}
