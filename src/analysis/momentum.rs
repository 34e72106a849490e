/// RSI-like momentum scoring over recent closes
use crate::error::{BiasError, Result};

/// Closes considered for the oscillator
pub const MOMENTUM_LOOKBACK: usize = 14;
/// Oscillator level above which momentum scores against the trend
pub const OVERBOUGHT: f64 = 70.0;
/// Oscillator level below which momentum scores with a reversal
pub const OVERSOLD: f64 = 30.0;
/// Contribution when the lookback has no down-closes at all
pub const MAX_BULLISH_SCORE: i32 = 2;

/// Score momentum from the last MOMENTUM_LOOKBACK closes (fewer are used
/// as-is when the series is shorter; a single close has no delta and is an
/// error).
pub fn momentum_score(closes: &[f64]) -> Result<i32> {
    if closes.len() < 2 {
        return Err(BiasError::InsufficientData(format!(
            "momentum needs at least 2 closes, got {}",
            closes.len()
        )));
    }

    let start = closes.len().saturating_sub(MOMENTUM_LOOKBACK);
    let recent = &closes[start..];
    let deltas: Vec<f64> = recent.windows(2).map(|w| w[1] - w[0]).collect();

    let gains: Vec<f64> = deltas.iter().copied().filter(|d| *d > 0.0).collect();
    let losses: Vec<f64> = deltas
        .iter()
        .copied()
        .filter(|d| *d < 0.0)
        .map(f64::abs)
        .collect();

    let avg_gain = if gains.is_empty() {
        0.0
    } else {
        gains.iter().sum::<f64>() / gains.len() as f64
    };
    let avg_loss = if losses.is_empty() {
        0.0
    } else {
        losses.iter().sum::<f64>() / losses.len() as f64
    };

    // No losses at all: maximally bullish, skip the ratio
    if avg_loss == 0.0 {
        return Ok(MAX_BULLISH_SCORE);
    }

    let rs = avg_gain / avg_loss;
    let oscillator = (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0);

    if oscillator > OVERBOUGHT {
        Ok(-1)
    } else if oscillator < OVERSOLD {
        Ok(1)
    } else {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_close_is_an_error() {
        assert!(matches!(
            momentum_score(&[100.0]),
            Err(BiasError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_all_gains_score_max_bullish() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(momentum_score(&closes).unwrap(), MAX_BULLISH_SCORE);
    }

    #[test]
    fn test_overbought_scores_minus_one() {
        // Twelve +3 deltas and one -1 delta: rs = 3, oscillator = 75
        let mut closes = vec![100.0];
        for i in 0..13 {
            let delta = if i == 6 { -1.0 } else { 3.0 };
            let prev = *closes.last().unwrap();
            closes.push(prev + delta);
        }
        assert_eq!(momentum_score(&closes).unwrap(), -1);
    }

    #[test]
    fn test_oversold_scores_plus_one() {
        // Twelve -3 deltas and one +1 delta: rs = 1/3, oscillator = 25
        let mut closes = vec![200.0];
        for i in 0..13 {
            let delta = if i == 6 { 1.0 } else { -3.0 };
            let prev = *closes.last().unwrap();
            closes.push(prev + delta);
        }
        assert_eq!(momentum_score(&closes).unwrap(), 1);
    }

    #[test]
    fn test_balanced_deltas_score_zero() {
        // Alternating +1/-1: oscillator = 50
        let closes: Vec<f64> = (0..14)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        assert_eq!(momentum_score(&closes).unwrap(), 0);
    }

    #[test]
    fn test_short_series_degrades_gracefully() {
        // Three closes, both deltas up
        assert_eq!(
            momentum_score(&[100.0, 101.0, 102.0]).unwrap(),
            MAX_BULLISH_SCORE
        );
    }
}
