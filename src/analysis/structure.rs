/// Market structure classification (break-of-structure detection)
use serde::{Deserialize, Serialize};

use crate::analysis::{highest, lowest};
use crate::error::{BiasError, Result};

/// Bars on each side of the recent/previous swing split
pub const SWING_WINDOW: usize = 20;
/// Minimum series length for the split
pub const STRUCTURE_LOOKBACK: usize = 2 * SWING_WINDOW;
/// Tolerance band around a broken extreme that still counts as confirmation (0.5%)
pub const BOS_CONFIRMATION_BAND: f64 = 0.005;

/// Trend direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub fn as_str(&self) -> &str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Neutral => "neutral",
        }
    }
}

/// Structure classification for one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureResult {
    pub trend: Trend,
    pub bos_detected: bool,
}

/// Classify market structure by comparing the last SWING_WINDOW bars against
/// the SWING_WINDOW bars immediately before them.
pub fn analyze_structure(highs: &[f64], lows: &[f64], closes: &[f64]) -> Result<StructureResult> {
    let n = closes.len();
    if highs.len() < STRUCTURE_LOOKBACK || lows.len() < STRUCTURE_LOOKBACK || n < STRUCTURE_LOOKBACK
    {
        return Err(BiasError::InsufficientData(format!(
            "structure analysis needs {} bars, got {}",
            STRUCTURE_LOOKBACK, n
        )));
    }

    let recent_high = highest(&highs[highs.len() - SWING_WINDOW..]);
    let recent_low = lowest(&lows[lows.len() - SWING_WINDOW..]);
    let prev_high = highest(&highs[highs.len() - STRUCTURE_LOOKBACK..highs.len() - SWING_WINDOW]);
    let prev_low = lowest(&lows[lows.len() - STRUCTURE_LOOKBACK..lows.len() - SWING_WINDOW]);
    let last_close = closes[n - 1];

    let mut trend = Trend::Neutral;
    let mut bos_detected = false;

    // Bullish BOS: new high, close holding within the confirmation band below it
    if recent_high > prev_high && last_close > recent_high * (1.0 - BOS_CONFIRMATION_BAND) {
        trend = Trend::Bullish;
        bos_detected = true;
    }

    // Bearish BOS is evaluated unconditionally; if both fire, bearish wins
    if recent_low < prev_low && last_close < recent_low * (1.0 + BOS_CONFIRMATION_BAND) {
        trend = Trend::Bearish;
        bos_detected = true;
    }

    Ok(StructureResult {
        trend,
        bos_detected,
    })
}
