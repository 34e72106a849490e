/// Core type definitions for the bias bot
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BiasError, Result};

/// OHLC bar data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Analysis timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Daily,
    FourHour,
    OneHour,
}

impl Timeframe {
    pub fn as_str(&self) -> &str {
        match self {
            Timeframe::Daily => "D1",
            Timeframe::FourHour => "H4",
            Timeframe::OneHour => "H1",
        }
    }

    /// Interval string expected by the market-data API
    pub fn api_interval(&self) -> &str {
        match self {
            Timeframe::Daily => "1day",
            Timeframe::FourHour => "4h",
            Timeframe::OneHour => "1h",
        }
    }
}

/// Read-only view over an aligned OHLC series, oldest bar first.
/// All four arrays are guaranteed equal length once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesWindow {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
}

impl SeriesWindow {
    pub fn new(open: Vec<f64>, high: Vec<f64>, low: Vec<f64>, close: Vec<f64>) -> Result<Self> {
        let n = open.len();
        if high.len() != n || low.len() != n || close.len() != n {
            return Err(BiasError::InvalidBarData(format!(
                "misaligned series: open={} high={} low={} close={}",
                open.len(),
                high.len(),
                low.len(),
                close.len()
            )));
        }
        Ok(SeriesWindow {
            open,
            high,
            low,
            close,
        })
    }

    pub fn from_bars(bars: &[Bar]) -> Self {
        SeriesWindow {
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn opens(&self) -> &[f64] {
        &self.open
    }

    pub fn highs(&self) -> &[f64] {
        &self.high
    }

    pub fn lows(&self) -> &[f64] {
        &self.low
    }

    pub fn closes(&self) -> &[f64] {
        &self.close
    }

    /// Close of the most recent bar
    pub fn last_close(&self) -> Option<f64> {
        self.close.last().copied()
    }
}

/// Configuration for the bias bot
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Instruments
    pub symbols: Vec<String>,

    // Market Data
    pub twelve_data_api_key: String,
    pub daily_bar_count: usize,
    pub h4_bar_count: usize,
    pub h1_bar_count: usize,
    pub rate_limit_per_minute: u32,
    pub http_timeout_sec: u64,

    // Notifications
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,

    // Scheduling
    pub analysis_interval_sec: u64,
    pub symbol_delay_sec: u64,
    pub command_poll_timeout_sec: u64,

    // Logging
    pub log_level: String,
}

impl Config {
    /// Configured fetch size for one timeframe
    pub fn bar_count(&self, timeframe: Timeframe) -> usize {
        match timeframe {
            Timeframe::Daily => self.daily_bar_count,
            Timeframe::FourHour => self.h4_bar_count,
            Timeframe::OneHour => self.h1_bar_count,
        }
    }
}
