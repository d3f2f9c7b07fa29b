use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_data_dir() -> String {
    "./data".into()
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub stocks: Vec<StockConfig>,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Directory holding one `<SYMBOL>.json` bar series per watchlist entry.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct StockConfig {
    pub symbol: String,
    /// Company name for display; the symbol is used when absent.
    pub name: Option<String>,
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_log_format(config)?;
    validate_symbols(config)?;
    Ok(())
}

fn validate_log_format(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if !VALID_LOG_FORMATS.contains(&config.general.log_format.as_str()) {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "general.log_format \"{}\" is not valid (expected \"text\" or \"json\")",
                config.general.log_format
            ),
        }));
    }
    Ok(())
}

fn validate_symbols(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    let mut seen = std::collections::HashSet::new();
    for stock in &config.stocks {
        if stock.symbol.trim().is_empty() {
            return Err(Report::new(ConfigError::Validation {
                field: "stocks: symbol must not be empty".to_string(),
            }));
        }
        if !seen.insert(stock.symbol.as_str()) {
            return Err(Report::new(ConfigError::Validation {
                field: format!("stocks: duplicate symbol \"{}\"", stock.symbol),
            }));
        }
    }
    Ok(())
}
