/// TwelveData time-series REST client
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{BiasError, Result};
use crate::types::{Bar, Timeframe};
use crate::utils::RateLimiter;

const BASE_URL: &str = "https://api.twelvedata.com";

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    message: Option<String>,
    values: Option<Vec<CandleValue>>,
}

/// Candles arrive with every field as a string
#[derive(Debug, Deserialize)]
struct CandleValue {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
}

/// TwelveData REST client with a shared request budget
pub struct TwelveDataClient {
    client: Client,
    api_key: String,
    rate_limiter: RateLimiter,
}

impl TwelveDataClient {
    pub fn new(api_key: String, calls_per_minute: u32, timeout_sec: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to build HTTP client");

        TwelveDataClient {
            client,
            api_key,
            rate_limiter: RateLimiter::new(calls_per_minute, Duration::from_secs(60)),
        }
    }

    /// Fetch one timeframe of bars, oldest first. A response without candle
    /// values (bad symbol, quota hit) is DataUnavailable, not a transport
    /// error.
    pub async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        bar_count: usize,
    ) -> Result<Vec<Bar>> {
        self.rate_limiter.acquire().await;

        debug!(
            "Fetching {} {} bars for {}",
            bar_count,
            timeframe.as_str(),
            symbol
        );

        let response = self
            .client
            .get(format!("{}/time_series", BASE_URL))
            .query(&[
                ("symbol", symbol),
                ("interval", timeframe.api_interval()),
                ("outputsize", &bar_count.to_string()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?;

        let body: TimeSeriesResponse = response.json().await?;

        let values = match body.values {
            Some(values) if !values.is_empty() => values,
            _ => {
                let message = body
                    .message
                    .unwrap_or_else(|| "no values in response".to_string());
                warn!("{} {}: {}", symbol, timeframe.as_str(), message);
                return Err(BiasError::DataUnavailable(format!(
                    "{} {}: {}",
                    symbol,
                    timeframe.as_str(),
                    message
                )));
            }
        };

        let mut bars = Vec::with_capacity(values.len());
        for value in &values {
            bars.push(parse_candle(value)?);
        }

        // API returns newest first
        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

fn parse_candle(value: &CandleValue) -> Result<Bar> {
    Ok(Bar {
        timestamp: parse_datetime(&value.datetime)?,
        open: parse_price(&value.open, "open")?,
        high: parse_price(&value.high, "high")?,
        low: parse_price(&value.low, "low")?,
        close: parse_price(&value.close, "close")?,
    })
}

fn parse_price(raw: &str, field: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| BiasError::InvalidBarData(format!("bad {} value: {}", field, raw)))
}

/// Intraday candles carry a full timestamp, daily candles a bare date
fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| BiasError::InvalidBarData(format!("bad datetime: {}", raw)))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intraday_and_daily_datetimes() {
        let intraday = parse_datetime("2025-06-02 14:00:00").unwrap();
        assert_eq!(intraday.to_rfc3339(), "2025-06-02T14:00:00+00:00");

        let daily = parse_datetime("2025-06-02").unwrap();
        assert_eq!(daily.to_rfc3339(), "2025-06-02T00:00:00+00:00");

        assert!(parse_datetime("last tuesday").is_err());
    }

    #[test]
    fn test_parse_candle() {
        let value = CandleValue {
            datetime: "2025-06-02 14:00:00".to_string(),
            open: "1.08543".to_string(),
            high: "1.08611".to_string(),
            low: "1.08490".to_string(),
            close: "1.08577".to_string(),
        };

        let bar = parse_candle(&value).unwrap();
        assert_eq!(bar.open, 1.08543);
        assert_eq!(bar.close, 1.08577);
    }

    #[test]
    fn test_parse_candle_rejects_bad_numbers() {
        let value = CandleValue {
            datetime: "2025-06-02 14:00:00".to_string(),
            open: "n/a".to_string(),
            high: "1.08611".to_string(),
            low: "1.08490".to_string(),
            close: "1.08577".to_string(),
        };

        assert!(matches!(
            parse_candle(&value),
            Err(BiasError::InvalidBarData(_))
        ));
    }
}
