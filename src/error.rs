/// Centralized error types for the bias bot
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiasError {
    // Data Errors
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid bar data: {0}")]
    InvalidBarData(String),

    #[error("Deserialization failed: {0}")]
    DeserializationError(#[from] serde_json::Error),

    // Network Errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Notification Errors
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // File I/O Errors
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BiasError>;

impl BiasError {
    /// Check if the batch loop can continue past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BiasError::HttpError(_)
                | BiasError::DataUnavailable(_)
                | BiasError::DeliveryFailed(_)
        )
    }

    /// Get error code for logging/monitoring
    pub fn error_code(&self) -> &str {
        match self {
            BiasError::InsufficientData(_) => "DATA_001",
            BiasError::DataUnavailable(_) => "DATA_002",
            BiasError::InvalidBarData(_) => "DATA_003",
            BiasError::DeserializationError(_) => "DATA_004",
            BiasError::HttpError(_) => "NET_001",
            BiasError::DeliveryFailed(_) => "NOTIFY_001",
            BiasError::ConfigError(_) => "CFG_001",
            BiasError::FileError(_) => "FILE_001",
        }
    }
}
