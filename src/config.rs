use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_TAX_RATE: f64 = 0.08;
const DEFAULT_FREE_SHIPPING_THRESHOLD: f64 = 100.0;
const DEFAULT_STANDARD_SHIPPING_FEE: f64 = 9.99;
const DEFAULT_COUNTRY: &str = "United States";
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Sales tax rate applied to cart subtotals (as decimal, e.g., 0.08 for 8%)
    #[serde(default = "default_tax_rate")]
    #[validate(custom = "validate_tax_rate")]
    pub tax_rate: f64,

    /// Subtotal above which shipping is free (exclusive threshold)
    #[serde(default = "default_free_shipping_threshold")]
    #[validate(custom = "validate_non_negative_amount")]
    pub free_shipping_threshold: f64,

    /// Flat shipping fee charged below the free-shipping threshold
    #[serde(default = "default_standard_shipping_fee")]
    #[validate(custom = "validate_non_negative_amount")]
    pub standard_shipping_fee: f64,

    /// Country filled into a shipping address when the form leaves it blank
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Event channel capacity for async event processing
    #[serde(default = "default_event_channel_capacity")]
    #[validate(custom = "validate_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            tax_rate: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            standard_shipping_fee: default_standard_shipping_fee(),
            default_country: default_country(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

fn default_free_shipping_threshold() -> f64 {
    DEFAULT_FREE_SHIPPING_THRESHOLD
}

fn default_standard_shipping_fee() -> f64 {
    DEFAULT_STANDARD_SHIPPING_FEE
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_tax_rate(rate: f64) -> Result<(), ValidationError> {
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        let mut err = ValidationError::new("tax_rate");
        err.message = Some("tax_rate must be a finite value between 0.0 and 1.0".into());
        return Err(err);
    }
    Ok(())
}

fn validate_non_negative_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount < 0.0 {
        let mut err = ValidationError::new("non_negative_amount");
        err.message = Some("Monetary amounts must be finite and non-negative".into());
        return Err(err);
    }
    Ok(())
}

fn validate_event_channel_capacity(capacity: usize) -> Result<(), ValidationError> {
    if capacity == 0 {
        let mut err = ValidationError::new("event_channel_capacity");
        err.message = Some("event_channel_capacity must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("visionhub_commerce={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from_dir(Path::new(CONFIG_DIR))
}

/// Loads configuration from a specific directory instead of the default
/// `config/` next to the working directory.
pub fn load_config_from_dir(config_dir: &Path) -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let default_file = config_dir.join("default");
    let env_file = config_dir.join(&run_env);

    let config = Config::builder()
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("tax_rate", DEFAULT_TAX_RATE)?
        .set_default("free_shipping_threshold", DEFAULT_FREE_SHIPPING_THRESHOLD)?
        .set_default("standard_shipping_fee", DEFAULT_STANDARD_SHIPPING_FEE)?
        .set_default("default_country", DEFAULT_COUNTRY)?
        .set_default("event_channel_capacity", DEFAULT_EVENT_CHANNEL_CAPACITY as u64)?
        .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_file.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
