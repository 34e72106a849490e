/// Bot orchestration: per-symbol analysis pipeline and batch scheduling
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::analysis::{BiasAggregator, BiasResult};
use crate::data::TwelveDataClient;
use crate::error::{BiasError, Result};
use crate::notify::{self, TelegramNotifier};
use crate::types::{Bar, Config, SeriesWindow, Timeframe};

pub struct BiasBot {
    config: Arc<Config>,
    market: Arc<TwelveDataClient>,
    notifier: Arc<TelegramNotifier>,
    aggregator: BiasAggregator,
    last_run: RwLock<Option<DateTime<Utc>>>,
}

impl BiasBot {
    pub fn new(
        config: Arc<Config>,
        market: Arc<TwelveDataClient>,
        notifier: Arc<TelegramNotifier>,
    ) -> Self {
        BiasBot {
            config,
            market,
            notifier,
            aggregator: BiasAggregator::new(),
            last_run: RwLock::new(None),
        }
    }

    /// Fetch all three timeframes for one symbol. Any unavailable timeframe
    /// skips the symbol for this cycle; no partial bias is ever computed.
    async fn fetch_windows(
        &self,
        symbol: &str,
    ) -> Result<(SeriesWindow, SeriesWindow, SeriesWindow)> {
        let daily = self.fetch_one(symbol, Timeframe::Daily).await?;
        let h4 = self.fetch_one(symbol, Timeframe::FourHour).await?;
        let h1 = self.fetch_one(symbol, Timeframe::OneHour).await?;

        Ok((
            SeriesWindow::from_bars(&daily),
            SeriesWindow::from_bars(&h4),
            SeriesWindow::from_bars(&h1),
        ))
    }

    async fn fetch_one(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>> {
        self.market
            .fetch_series(symbol, timeframe, self.config.bar_count(timeframe))
            .await
    }

    /// Analyze one symbol and deliver the alert
    pub async fn analyze_symbol(&self, symbol: &str) -> Result<BiasResult> {
        info!("📊 Analyzing {}...", symbol);

        let (daily, h4, h1) = self.fetch_windows(symbol).await?;
        let current_price = h1
            .last_close()
            .ok_or_else(|| BiasError::DataUnavailable(format!("{}: empty 1h series", symbol)))?;

        let now = Utc::now();
        let result = self.aggregator.aggregate(&daily, &h4, &h1, now)?;

        // Delivery problems are reporting-path only; the result stands
        let alert = notify::format_bias_alert(symbol, &result, current_price, now);
        if let Err(e) = self.notifier.send_message(&alert).await {
            warn!("{}: alert delivery failed: {} ({})", symbol, e, e.error_code());
        }

        info!(
            "✅ {}: {} (Score: {:.1})",
            symbol,
            result.bias.as_str(),
            result.score
        );
        Ok(result)
    }

    /// Run one full analysis cycle over all configured symbols. Per-symbol
    /// failures are reported and never abort the batch.
    pub async fn run_analysis(&self) -> Vec<(String, BiasResult)> {
        info!(
            "🚀 Starting ICT analysis for {} symbols...",
            self.config.symbols.len()
        );

        let started_at = Utc::now();
        let banner = notify::format_run_started(&self.config.symbols, started_at);
        if let Err(e) = self.notifier.send_message(&banner).await {
            warn!("Run-started banner delivery failed: {}", e);
        }

        let mut results = Vec::new();
        for (idx, symbol) in self.config.symbols.iter().enumerate() {
            match self.analyze_symbol(symbol).await {
                Ok(result) => results.push((symbol.clone(), result)),
                Err(e) => {
                    error!("❌ {}: analysis failed: {} ({})", symbol, e, e.error_code());
                    let notice = notify::format_error_notice(symbol, &e);
                    if let Err(delivery) = self.notifier.send_message(&notice).await {
                        warn!("{}: error notice delivery failed: {}", symbol, delivery);
                    }
                }
            }

            // Upstream free-tier etiquette between symbols
            if idx + 1 < self.config.symbols.len() {
                tokio::time::sleep(Duration::from_secs(self.config.symbol_delay_sec)).await;
            }
        }

        *self.last_run.write().await = Some(Utc::now());

        let summary = notify::format_run_summary(&results);
        if let Err(e) = self.notifier.send_message(&summary).await {
            warn!("Summary delivery failed: {}", e);
        }

        info!(
            "✅ Cycle complete: {}/{} symbols analyzed",
            results.len(),
            self.config.symbols.len()
        );
        results
    }

    /// Dispatch one chat command
    pub async fn handle_command(&self, command: &str) -> Result<()> {
        match command.trim() {
            "/analyze" => {
                self.run_analysis().await;
                Ok(())
            }
            "/status" => {
                let last_run = *self.last_run.read().await;
                self.notifier
                    .send_message(&notify::format_status(&self.config.symbols, last_run))
                    .await
            }
            "/settings" => {
                self.notifier
                    .send_message(&notify::format_settings(&self.config))
                    .await
            }
            "/help" => self.notifier.send_message(&notify::format_help()).await,
            other => {
                warn!("Unknown command: {}", other);
                self.notifier.send_message(&notify::format_help()).await
            }
        }
    }

    pub async fn last_run_time(&self) -> Option<DateTime<Utc>> {
        *self.last_run.read().await
    }
}
