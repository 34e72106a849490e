/// Composite bias scoring across daily, 4h and 1h timeframes
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::gaps::{detect_gaps, GapKind};
use crate::analysis::liquidity::locate_zones;
use crate::analysis::momentum::momentum_score;
use crate::analysis::structure::{analyze_structure, Trend};
use crate::error::{BiasError, Result};
use crate::session::{session_at, Session};
use crate::types::SeriesWindow;

/// Daily structure contribution in the comprehensive path
pub const DAILY_STRUCTURE_WEIGHT: i32 = 4;
/// Composite score needed for a directional label
pub const BIAS_THRESHOLD: f64 = 3.0;
/// Daily structure contribution in the structure-only path
pub const QUICK_DAILY_WEIGHT: i32 = 3;
/// 4h confirmation contribution in the structure-only path
pub const QUICK_H4_WEIGHT: i32 = 2;
/// Structure-only score needed for a directional label
pub const QUICK_BIAS_THRESHOLD: i32 = 3;

/// Directional lean for one instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl Bias {
    pub fn as_str(&self) -> &str {
        match self {
            Bias::Bullish => "BULLISH",
            Bias::Bearish => "BEARISH",
            Bias::Neutral => "NEUTRAL",
        }
    }

    fn from_score(score: f64) -> Self {
        if score >= BIAS_THRESHOLD {
            Bias::Bullish
        } else if score <= -BIAS_THRESHOLD {
            Bias::Bearish
        } else {
            Bias::Neutral
        }
    }
}

/// Per-source accumulators, reset for every analysis cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasFactors {
    pub structure_score: i32,
    pub liquidity_score: i32,
    pub session_score: i32,
    pub momentum_score: i32,
}

impl BiasFactors {
    pub fn total(&self) -> i32 {
        self.structure_score + self.liquidity_score + self.session_score + self.momentum_score
    }
}

/// Result of one comprehensive aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub bias: Bias,
    pub score: f64,
    pub factors: BiasFactors,
    pub signals: Vec<String>,
    pub session: Session,
}

/// Result of the narrower structure-only calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureBias {
    pub bias: Bias,
    pub score: i32,
    pub signals: Vec<String>,
}

/// Multi-timeframe bias aggregator
#[derive(Debug, Default)]
pub struct BiasAggregator;

impl BiasAggregator {
    pub fn new() -> Self {
        BiasAggregator
    }

    /// Comprehensive bias for one instrument. `now` is the single clock
    /// reading used for session classification, so identical inputs give
    /// identical results.
    pub fn aggregate(
        &self,
        daily: &SeriesWindow,
        h4: &SeriesWindow,
        h1: &SeriesWindow,
        now: DateTime<Utc>,
    ) -> Result<BiasResult> {
        let current_price = h1
            .last_close()
            .ok_or_else(|| BiasError::InsufficientData("empty 1h window".to_string()))?;

        let mut factors = BiasFactors::default();
        let mut signals = Vec::new();

        // 1. Market structure: daily drives the score, 4h is shown for
        // context but carries no factor here
        let daily_structure = analyze_structure(daily.highs(), daily.lows(), daily.closes())?;
        match daily_structure.trend {
            Trend::Bullish => {
                factors.structure_score += DAILY_STRUCTURE_WEIGHT;
                signals.push("📈 D1: Bullish Market Structure".to_string());
            }
            Trend::Bearish => {
                factors.structure_score -= DAILY_STRUCTURE_WEIGHT;
                signals.push("📉 D1: Bearish Market Structure".to_string());
            }
            Trend::Neutral => {}
        }

        let h4_structure = analyze_structure(h4.highs(), h4.lows(), h4.closes())?;
        match h4_structure.trend {
            Trend::Bullish => signals.push("📈 H4: Bullish Confirmation".to_string()),
            Trend::Bearish => signals.push("📉 H4: Bearish Confirmation".to_string()),
            Trend::Neutral => {}
        }

        // 2. Fair value gaps: balance of the retained 1h gaps, shown only
        let gaps = detect_gaps(h1.opens(), h1.highs(), h1.lows(), h1.closes());
        let bullish_gaps = gaps.iter().filter(|g| g.kind == GapKind::BullishFvg).count();
        let bearish_gaps = gaps.iter().filter(|g| g.kind == GapKind::BearishFvg).count();
        if bullish_gaps > bearish_gaps {
            signals.push(format!("🧱 H1: {} Bullish FVGs", bullish_gaps));
        } else if bearish_gaps > bullish_gaps {
            signals.push(format!("🧱 H1: {} Bearish FVGs", bearish_gaps));
        }

        // 3. Liquidity zones near price; resistance only counts from below,
        // support only from above
        for zone in locate_zones(h1) {
            if !zone.is_near(current_price) {
                continue;
            }
            if zone.kind.is_resistance() && current_price < zone.level {
                factors.liquidity_score -= 1;
                signals.push(format!("🔴 {} Resistance: {:.5}", zone.kind.as_str(), zone.level));
            } else if zone.kind.is_support() && current_price > zone.level {
                factors.liquidity_score += 1;
                signals.push(format!("🟢 {} Support: {:.5}", zone.kind.as_str(), zone.level));
            }
        }

        // 4. Session
        let session = session_at(now);
        factors.session_score += session.score_contribution();
        if session.is_killzone() {
            signals.push(format!("⏰ Active Session: {}", session.as_str()));
        }

        // 5. Momentum
        let momentum = momentum_score(h1.closes())?;
        factors.momentum_score += momentum;
        if momentum == -1 {
            signals.push("⚠️ Momentum: Overbought".to_string());
        } else if momentum == 1 {
            signals.push("🚀 Momentum: Oversold".to_string());
        }

        let score = factors.total() as f64 * session.weight();
        let bias = Bias::from_score(score);

        debug!(
            "Aggregated bias {} (score {:.1}, factors {:?})",
            bias.as_str(),
            score,
            factors
        );

        Ok(BiasResult {
            bias,
            score,
            factors,
            signals,
            session,
        })
    }

    /// Structure-only bias: daily and 4h structure plus the 1h gap balance,
    /// with no session weighting. The narrower sibling of `aggregate`.
    pub fn structure_bias(
        &self,
        daily: &SeriesWindow,
        h4: &SeriesWindow,
        h1: &SeriesWindow,
    ) -> Result<StructureBias> {
        let mut score = 0;
        let mut signals = Vec::new();

        let daily_structure = analyze_structure(daily.highs(), daily.lows(), daily.closes())?;
        match daily_structure.trend {
            Trend::Bullish => {
                score += QUICK_DAILY_WEIGHT;
                signals.push("D1: Bullish Structure".to_string());
            }
            Trend::Bearish => {
                score -= QUICK_DAILY_WEIGHT;
                signals.push("D1: Bearish Structure".to_string());
            }
            Trend::Neutral => {}
        }

        let h4_structure = analyze_structure(h4.highs(), h4.lows(), h4.closes())?;
        match h4_structure.trend {
            Trend::Bullish => {
                score += QUICK_H4_WEIGHT;
                signals.push("H4: Bullish Confirmation".to_string());
            }
            Trend::Bearish => {
                score -= QUICK_H4_WEIGHT;
                signals.push("H4: Bearish Confirmation".to_string());
            }
            Trend::Neutral => {}
        }

        let gaps = detect_gaps(h1.opens(), h1.highs(), h1.lows(), h1.closes());
        let bullish_gaps = gaps.iter().filter(|g| g.kind == GapKind::BullishFvg).count();
        let bearish_gaps = gaps.iter().filter(|g| g.kind == GapKind::BearishFvg).count();
        if bullish_gaps > bearish_gaps {
            score += 1;
            signals.push(format!("H1: {} Bullish FVGs", bullish_gaps));
        } else if bearish_gaps > bullish_gaps {
            score -= 1;
            signals.push(format!("H1: {} Bearish FVGs", bearish_gaps));
        }

        let bias = if score >= QUICK_BIAS_THRESHOLD {
            Bias::Bullish
        } else if score <= -QUICK_BIAS_THRESHOLD {
            Bias::Bearish
        } else {
            Bias::Neutral
        };

        Ok(StructureBias {
            bias,
            score,
            signals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::London;

    /// 40-bar daily window with a confirmed bullish break
    fn bullish_daily_window() -> SeriesWindow {
        let mut highs = vec![100.0; 20];
        highs.extend(vec![105.0; 19]);
        highs.push(110.0);
        let lows = vec![90.0; 40];
        let mut closes = vec![95.0; 39];
        closes.push(109.6);
        let opens = vec![95.0; 40];
        SeriesWindow::new(opens, highs, lows, closes).unwrap()
    }

    /// 40-bar flat window: no breaks either way
    fn neutral_window() -> SeriesWindow {
        SeriesWindow::new(
            vec![100.0; 40],
            vec![101.0; 40],
            vec![99.0; 40],
            vec![100.0; 40],
        )
        .unwrap()
    }

    /// 20-bar hourly window with balanced momentum, no gaps and too little
    /// history for liquidity levels
    fn quiet_hourly_window() -> SeriesWindow {
        let closes: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let opens = closes.clone();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        SeriesWindow::new(opens, highs, lows, closes).unwrap()
    }

    fn london_killzone_instant() -> DateTime<Utc> {
        London
            .with_ymd_and_hms(2025, 1, 15, 8, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn outside_killzone_instant() -> DateTime<Utc> {
        London
            .with_ymd_and_hms(2025, 1, 15, 22, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_bullish_structure_in_london_killzone() {
        let aggregator = BiasAggregator::new();
        let result = aggregator
            .aggregate(
                &bullish_daily_window(),
                &neutral_window(),
                &quiet_hourly_window(),
                london_killzone_instant(),
            )
            .unwrap();

        // structure +4, session +1, weighted by 1.5
        assert_eq!(result.factors.structure_score, 4);
        assert_eq!(result.factors.liquidity_score, 0);
        assert_eq!(result.factors.session_score, 1);
        assert_eq!(result.factors.momentum_score, 0);
        assert_eq!(result.score, 7.5);
        assert_eq!(result.bias, Bias::Bullish);
        assert_eq!(result.session, Session::LondonKillzone);
        assert_eq!(
            result.signals,
            vec![
                "📈 D1: Bullish Market Structure".to_string(),
                "⏰ Active Session: LONDON_KILLZONE".to_string(),
            ]
        );
    }

    #[test]
    fn test_neutral_inputs_outside_killzone() {
        let aggregator = BiasAggregator::new();
        let result = aggregator
            .aggregate(
                &neutral_window(),
                &neutral_window(),
                &quiet_hourly_window(),
                outside_killzone_instant(),
            )
            .unwrap();

        assert_eq!(result.factors.total(), 0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.bias, Bias::Neutral);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let aggregator = BiasAggregator::new();
        let daily = bullish_daily_window();
        let h4 = neutral_window();
        let h1 = quiet_hourly_window();
        let now = london_killzone_instant();

        let first = aggregator.aggregate(&daily, &h4, &h1, now).unwrap();
        let second = aggregator.aggregate(&daily, &h4, &h1, now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_daily_window_aborts_scoring() {
        let aggregator = BiasAggregator::new();
        let short = SeriesWindow::new(
            vec![100.0; 10],
            vec![101.0; 10],
            vec![99.0; 10],
            vec![100.0; 10],
        )
        .unwrap();

        let result = aggregator.aggregate(
            &short,
            &neutral_window(),
            &quiet_hourly_window(),
            london_killzone_instant(),
        );
        assert!(matches!(result, Err(BiasError::InsufficientData(_))));
    }

    #[test]
    fn test_structure_bias_bullish_alignment() {
        let aggregator = BiasAggregator::new();
        let result = aggregator
            .structure_bias(
                &bullish_daily_window(),
                &bullish_daily_window(),
                &quiet_hourly_window(),
            )
            .unwrap();

        // daily +3, 4h +2
        assert_eq!(result.score, 5);
        assert_eq!(result.bias, Bias::Bullish);
        assert_eq!(result.signals.len(), 2);
    }

    #[test]
    fn test_structure_bias_neutral_when_nothing_fires() {
        let aggregator = BiasAggregator::new();
        let result = aggregator
            .structure_bias(&neutral_window(), &neutral_window(), &quiet_hourly_window())
            .unwrap();

        assert_eq!(result.score, 0);
        assert_eq!(result.bias, Bias::Neutral);
        assert!(result.signals.is_empty());
    }
}
