/// One-shot bias analysis without Telegram delivery
/// Usage: cargo run --release --bin analyze_once

use std::sync::Arc;

use ictbias::analysis::{BiasAggregator, BiasResult};
use ictbias::config::load_config;
use ictbias::data::TwelveDataClient;
use ictbias::types::{SeriesWindow, Timeframe};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();

    info!("📊 ICT Bias Analyzer");
    info!("====================");

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Arc::new(load_config(&config_path)?);
    info!("✅ Loaded {} symbols", config.symbols.len());

    let market = TwelveDataClient::new(
        config.twelve_data_api_key.clone(),
        config.rate_limit_per_minute,
        config.http_timeout_sec,
    );
    let aggregator = BiasAggregator::new();

    let mut results: Vec<(String, BiasResult)> = Vec::new();

    for (idx, symbol) in config.symbols.iter().enumerate() {
        info!("[{}/{}] Analyzing {}...", idx + 1, config.symbols.len(), symbol);

        let daily = match market
            .fetch_series(symbol, Timeframe::Daily, config.daily_bar_count)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                error!("   Daily fetch failed: {}", e);
                continue;
            }
        };
        let h4 = match market
            .fetch_series(symbol, Timeframe::FourHour, config.h4_bar_count)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                error!("   4h fetch failed: {}", e);
                continue;
            }
        };
        let h1 = match market
            .fetch_series(symbol, Timeframe::OneHour, config.h1_bar_count)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                error!("   1h fetch failed: {}", e);
                continue;
            }
        };

        let daily = SeriesWindow::from_bars(&daily);
        let h4 = SeriesWindow::from_bars(&h4);
        let h1 = SeriesWindow::from_bars(&h1);

        match aggregator.aggregate(&daily, &h4, &h1, chrono::Utc::now()) {
            Ok(result) => {
                info!(
                    "   {}: {} (Score: {:.1}, Session: {})",
                    symbol,
                    result.bias.as_str(),
                    result.score,
                    result.session.as_str()
                );
                for signal in &result.signals {
                    info!("   {}", signal);
                }
                results.push((symbol.clone(), result));
            }
            Err(e) => error!("   Aggregation failed: {}", e),
        }

        // Rate limiting
        if idx + 1 < config.symbols.len() {
            tokio::time::sleep(std::time::Duration::from_secs(config.symbol_delay_sec)).await;
        }
    }

    info!("💾 Saving results...");
    tokio::fs::create_dir_all("data").await.ok();

    let results_json = serde_json::to_string_pretty(&results)?;
    tokio::fs::write("data/bias_results.json", &results_json).await?;
    info!("✅ Saved to: data/bias_results.json");

    info!("📋 Summary:");
    for (symbol, result) in &results {
        info!("   • {}: {} ({:.1})", symbol, result.bias.as_str(), result.score);
    }

    Ok(())
}
