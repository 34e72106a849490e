/// Telegram message rendering for bias results
use chrono::{DateTime, Utc};

use crate::analysis::{Bias, BiasResult};
use crate::error::BiasError;
use crate::types::Config;

/// Emoji for a bias label
pub fn bias_emoji(bias: Bias) -> &'static str {
    match bias {
        Bias::Bullish => "🟢",
        Bias::Bearish => "🔴",
        Bias::Neutral => "🟡",
    }
}

/// Per-symbol alert with score breakdown and triggered signals
pub fn format_bias_alert(
    symbol: &str,
    result: &BiasResult,
    current_price: f64,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "<b>🎯 ICT BIAS ALERT - {symbol}</b>\n\n\
         {emoji} <b>BIAS: {bias}</b>\n\
         💰 <b>Price:</b> {price:.5}\n\
         📊 <b>Score:</b> {score:.1}\n\
         ⏰ <b>Session:</b> {session}\n\n\
         <b>📈 Analysis:</b>\n\
         {signals}\n\n\
         <b>🔍 Bias Breakdown:</b>\n\
         - Structure: {structure}\n\
         - Liquidity: {liquidity}\n\
         - Session: {session_score}\n\
         - Momentum: {momentum}\n\n\
         <i>Generated: {generated} UTC</i>",
        symbol = symbol,
        emoji = bias_emoji(result.bias),
        bias = result.bias.as_str(),
        price = current_price,
        score = result.score,
        session = result.session.as_str(),
        signals = result.signals.join("\n"),
        structure = result.factors.structure_score,
        liquidity = result.factors.liquidity_score,
        session_score = result.factors.session_score,
        momentum = result.factors.momentum_score,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Banner sent before a batch run starts
pub fn format_run_started(symbols: &[String], started_at: DateTime<Utc>) -> String {
    format!(
        "<b>🤖 ICT Bias Bot Started</b>\n\n\
         📅 <b>Date:</b> {date} UTC\n\
         📊 <b>Analyzing:</b> {symbols}\n\
         ⚡ <b>Method:</b> ICT 2022 Multi-Timeframe Analysis\n\n\
         <i>Fetching data and calculating bias...</i>",
        date = started_at.format("%Y-%m-%d %H:%M:%S"),
        symbols = symbols.join(", "),
    )
}

/// Batch summary, one line per analyzed symbol
pub fn format_run_summary(results: &[(String, BiasResult)]) -> String {
    let lines: Vec<String> = results
        .iter()
        .map(|(symbol, result)| {
            format!("• {}: {} ({:.1})", symbol, result.bias.as_str(), result.score)
        })
        .collect();

    format!(
        "<b>📋 ANALYSIS COMPLETE</b>\n\n\
         {lines}\n\n\
         <i>Next analysis in 4 hours or send /analyze</i>",
        lines = lines.join("\n"),
    )
}

/// Failure notice naming the instrument; the batch keeps running
pub fn format_error_notice(symbol: &str, error: &BiasError) -> String {
    format!("❌ Error analyzing {}: {}", symbol, error)
}

/// Reply to /status
pub fn format_status(symbols: &[String], last_run: Option<DateTime<Utc>>) -> String {
    let last_run_text = match last_run {
        Some(at) => format!("{} UTC", at.format("%Y-%m-%d %H:%M:%S")),
        None => "never".to_string(),
    };

    format!(
        "🤖 ICT Bot Status: Online\n\
         📊 Symbols: {symbols}\n\
         ⏰ Last Run: {last_run}",
        symbols = symbols.join(", "),
        last_run = last_run_text,
    )
}

/// Reply to /settings (credentials stay out of the chat)
pub fn format_settings(config: &Config) -> String {
    format!(
        "<b>⚙️ Current Settings</b>\n\n\
         📊 Symbols: {symbols}\n\
         ⏱ Analysis interval: {interval}s\n\
         🐢 Symbol delay: {delay}s\n\
         🕯 Bars: D1={daily} H4={h4} H1={h1}",
        symbols = config.symbols.join(", "),
        interval = config.analysis_interval_sec,
        delay = config.symbol_delay_sec,
        daily = config.daily_bar_count,
        h4 = config.h4_bar_count,
        h1 = config.h1_bar_count,
    )
}

/// Reply to /help
pub fn format_help() -> String {
    "<b>Available Commands</b>\n\n\
     /analyze - Run ICT Analysis Now\n\
     /status - Show Bot Status\n\
     /settings - View Current Settings\n\
     /help - Show Available Commands"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BiasFactors;
    use crate::session::Session;

    fn sample_result() -> BiasResult {
        BiasResult {
            bias: Bias::Bullish,
            score: 7.5,
            factors: BiasFactors {
                structure_score: 4,
                liquidity_score: 0,
                session_score: 1,
                momentum_score: 0,
            },
            signals: vec![
                "📈 D1: Bullish Market Structure".to_string(),
                "⏰ Active Session: LONDON_KILLZONE".to_string(),
            ],
            session: Session::LondonKillzone,
        }
    }

    #[test]
    fn test_alert_carries_label_score_and_signals() {
        let alert = format_bias_alert("GBPUSD", &sample_result(), 1.26543, Utc::now());

        assert!(alert.contains("GBPUSD"));
        assert!(alert.contains("BIAS: BULLISH"));
        assert!(alert.contains("Score:</b> 7.5"));
        assert!(alert.contains("LONDON_KILLZONE"));
        assert!(alert.contains("📈 D1: Bullish Market Structure"));
        assert!(alert.contains("⏰ Active Session: LONDON_KILLZONE"));
        assert!(alert.contains("- Structure: 4"));
    }

    #[test]
    fn test_summary_lists_each_symbol() {
        let results = vec![
            ("GBPUSD".to_string(), sample_result()),
            ("EURUSD".to_string(), sample_result()),
        ];

        let summary = format_run_summary(&results);
        assert!(summary.contains("• GBPUSD: BULLISH (7.5)"));
        assert!(summary.contains("• EURUSD: BULLISH (7.5)"));
    }

    #[test]
    fn test_status_before_first_run() {
        let status = format_status(&["GBPUSD".to_string()], None);
        assert!(status.contains("Last Run: never"));
    }
}
