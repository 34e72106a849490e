/// Configuration loading from TOML file
use std::path::Path;

use crate::analysis::momentum::MOMENTUM_LOOKBACK;
use crate::analysis::structure::STRUCTURE_LOOKBACK;
use crate::error::{BiasError, Result};
use crate::types::Config;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| BiasError::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| BiasError::ConfigError(format!("Failed to parse config: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.symbols.is_empty() {
        return Err(BiasError::ConfigError("symbols list is empty".to_string()));
    }

    if config.twelve_data_api_key.is_empty() {
        return Err(BiasError::ConfigError(
            "twelve_data_api_key is empty".to_string(),
        ));
    }

    if config.telegram_bot_token.is_empty() || config.telegram_chat_id.is_empty() {
        return Err(BiasError::ConfigError(
            "telegram credentials are incomplete".to_string(),
        ));
    }

    // Fetch sizes must cover what the analyzers require
    if config.daily_bar_count < STRUCTURE_LOOKBACK {
        return Err(BiasError::ConfigError(format!(
            "daily_bar_count must be >= {} for structure analysis",
            STRUCTURE_LOOKBACK
        )));
    }

    if config.h4_bar_count < STRUCTURE_LOOKBACK {
        return Err(BiasError::ConfigError(format!(
            "h4_bar_count must be >= {} for structure analysis",
            STRUCTURE_LOOKBACK
        )));
    }

    if config.h1_bar_count < MOMENTUM_LOOKBACK + 1 {
        return Err(BiasError::ConfigError(format!(
            "h1_bar_count must be >= {} for momentum scoring",
            MOMENTUM_LOOKBACK + 1
        )));
    }

    if config.analysis_interval_sec < 60 {
        return Err(BiasError::ConfigError(format!(
            "Invalid analysis_interval_sec: {}",
            config.analysis_interval_sec
        )));
    }

    if config.symbol_delay_sec == 0 {
        return Err(BiasError::ConfigError(
            "symbol_delay_sec must be >= 1".to_string(),
        ));
    }

    if !(1..=60).contains(&config.command_poll_timeout_sec) {
        return Err(BiasError::ConfigError(format!(
            "Invalid command_poll_timeout_sec: {}",
            config.command_poll_timeout_sec
        )));
    }

    if config.rate_limit_per_minute == 0 {
        return Err(BiasError::ConfigError(
            "rate_limit_per_minute must be >= 1".to_string(),
        ));
    }

    if config.http_timeout_sec == 0 {
        return Err(BiasError::ConfigError(
            "http_timeout_sec must be >= 1".to_string(),
        ));
    }

    if config.log_level.is_empty() {
        return Err(BiasError::ConfigError("log_level is empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            symbols: vec!["GBPUSD".to_string(), "EURUSD".to_string()],
            twelve_data_api_key: "key".to_string(),
            daily_bar_count: 40,
            h4_bar_count: 100,
            h1_bar_count: 200,
            rate_limit_per_minute: 8,
            http_timeout_sec: 30,
            telegram_bot_token: "token".to_string(),
            telegram_chat_id: "chat".to_string(),
            analysis_interval_sec: 14400,
            symbol_delay_sec: 8,
            command_poll_timeout_sec: 25,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_empty_symbols_rejected() {
        let mut config = base_config();
        config.symbols.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_undersized_daily_window_rejected() {
        let mut config = base_config();
        config.daily_bar_count = 30;
        assert!(validate_config(&config).is_err());
    }
}
