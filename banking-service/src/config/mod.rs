use serde::Deserialize;
use service_core::error::AppError;
use service_core::middleware::auth::AuthConfig;

/// Path of the optional configuration file, relative to the working directory.
pub const CONFIG_FILE: &str = "banking-service/config/base.yaml";

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub payments: PaymentConfig,
    pub mock_data: MockDataConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PaymentConfig {
    /// Largest amount a single payment may carry.
    pub max_amount: f64,
    /// Give newly created payments a random lifecycle status instead of PENDING.
    pub randomize_status: bool,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            max_amount: 1_000_000.0,
            randomize_status: false,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct MockDataConfig {
    /// Seed for the mock data generator; unset means a fresh seed per process.
    pub seed: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,banking_service=debug".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        service_core::config::load(CONFIG_FILE)
    }
}
