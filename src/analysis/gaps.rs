/// Fair value gap (three-candle imbalance) detection
use serde::{Deserialize, Serialize};

/// Gaps older than the most recent MAX_TRACKED_GAPS are discarded
pub const MAX_TRACKED_GAPS: usize = 5;
/// A gap needs three candles
pub const MIN_GAP_BARS: usize = 3;

/// Gap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapKind {
    BullishFvg,
    BearishFvg,
}

impl GapKind {
    pub fn as_str(&self) -> &str {
        match self {
            GapKind::BullishFvg => "bullish_fvg",
            GapKind::BearishFvg => "bearish_fvg",
        }
    }
}

/// One detected gap; `index` is the position of the third candle in the
/// source window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
    pub kind: GapKind,
    pub top: f64,
    pub bottom: f64,
    pub index: usize,
}

/// Scan a window for three-candle imbalances. Returns at most
/// MAX_TRACKED_GAPS records, oldest first. Short input yields no gaps.
pub fn detect_gaps(opens: &[f64], highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<GapRecord> {
    let n = opens
        .len()
        .min(highs.len())
        .min(lows.len())
        .min(closes.len());

    let mut gaps = Vec::new();
    if n < MIN_GAP_BARS {
        return gaps;
    }

    for i in 2..n {
        // Bullish FVG: gap between candle[i-2].low and candle[i].high,
        // middle candle closed up
        if lows[i - 2] > highs[i] && closes[i - 1] > opens[i - 1] {
            gaps.push(GapRecord {
                kind: GapKind::BullishFvg,
                top: lows[i - 2],
                bottom: highs[i],
                index: i,
            });
        }

        // Bearish FVG: gap between candle[i-2].high and candle[i].low,
        // middle candle closed down
        if highs[i - 2] < lows[i] && closes[i - 1] < opens[i - 1] {
            gaps.push(GapRecord {
                kind: GapKind::BearishFvg,
                top: lows[i],
                bottom: highs[i - 2],
                index: i,
            });
        }
    }

    if gaps.len() > MAX_TRACKED_GAPS {
        gaps.drain(..gaps.len() - MAX_TRACKED_GAPS);
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_yields_no_gaps() {
        let gaps = detect_gaps(&[100.0, 101.0], &[101.0, 102.0], &[99.0, 100.0], &[100.5, 101.5]);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_gapless_uptrend_yields_no_gaps() {
        // Step-1 uptrend where each bar's range touches its neighbors
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let opens: Vec<f64> = closes.iter().map(|c| c - 0.5).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();

        let gaps = detect_gaps(&opens, &highs, &lows, &closes);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_bullish_gap_detected() {
        // Candle 0 trades entirely above candle 2, candle 1 closes up
        let opens = vec![111.0, 105.0, 96.0];
        let highs = vec![115.0, 109.0, 100.0];
        let lows = vec![110.0, 104.0, 95.0];
        let closes = vec![112.0, 108.0, 99.0];

        let gaps = detect_gaps(&opens, &highs, &lows, &closes);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].kind, GapKind::BullishFvg);
        assert_eq!(gaps[0].top, 110.0);
        assert_eq!(gaps[0].bottom, 100.0);
        assert_eq!(gaps[0].index, 2);
    }

    #[test]
    fn test_bearish_gap_detected() {
        // Candle 0 trades entirely below candle 2, candle 1 closes down
        let opens = vec![96.0, 108.0, 112.0];
        let highs = vec![100.0, 109.0, 115.0];
        let lows = vec![95.0, 104.0, 110.0];
        let closes = vec![99.0, 105.0, 112.0];

        let gaps = detect_gaps(&opens, &highs, &lows, &closes);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].kind, GapKind::BearishFvg);
        assert_eq!(gaps[0].top, 110.0);
        assert_eq!(gaps[0].bottom, 100.0);
        assert_eq!(gaps[0].index, 2);
    }

    #[test]
    fn test_gap_cap_keeps_latest_five() {
        // Collapsing market: every bar sits entirely below the bar two back,
        // every candle closes up, so every index from 2 on is a bullish gap
        let n = 30;
        let highs: Vec<f64> = (0..n).map(|j| 1000.0 - 10.0 * j as f64).collect();
        let lows: Vec<f64> = (0..n).map(|j| 995.0 - 10.0 * j as f64).collect();
        let opens: Vec<f64> = lows.iter().map(|l| l + 1.0).collect();
        let closes: Vec<f64> = highs.iter().map(|h| h - 1.0).collect();

        let gaps = detect_gaps(&opens, &highs, &lows, &closes);
        assert_eq!(gaps.len(), MAX_TRACKED_GAPS);
        let indices: Vec<usize> = gaps.iter().map(|g| g.index).collect();
        assert_eq!(indices, vec![25, 26, 27, 28, 29]);
        assert!(gaps.iter().all(|g| g.kind == GapKind::BullishFvg));
    }
}
