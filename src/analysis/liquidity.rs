/// Prior-range liquidity reference levels (PDH/PDL, weekly extremes)
use serde::{Deserialize, Serialize};

use crate::analysis::{highest, lowest};
use crate::types::SeriesWindow;

/// Hourly bars making up one session day
pub const SESSION_BARS: usize = 24;
/// Hourly bars making up one trading week
pub const WEEK_BARS: usize = 168;
/// Relative distance under which a level counts as nearby (0.5%)
pub const PROXIMITY_PCT: f64 = 0.005;

/// Reference level kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    PrevDayHigh,
    PrevDayLow,
    WeeklyHigh,
    WeeklyLow,
}

impl ZoneKind {
    pub fn as_str(&self) -> &str {
        match self {
            ZoneKind::PrevDayHigh => "PDH",
            ZoneKind::PrevDayLow => "PDL",
            ZoneKind::WeeklyHigh => "Weekly_High",
            ZoneKind::WeeklyLow => "Weekly_Low",
        }
    }

    /// High-side levels act as resistance, low-side as support
    pub fn is_resistance(&self) -> bool {
        matches!(self, ZoneKind::PrevDayHigh | ZoneKind::WeeklyHigh)
    }

    pub fn is_support(&self) -> bool {
        !self.is_resistance()
    }
}

/// Expected reaction strength at a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneStrength {
    High,
    VeryHigh,
}

impl ZoneStrength {
    pub fn as_str(&self) -> &str {
        match self {
            ZoneStrength::High => "high",
            ZoneStrength::VeryHigh => "very_high",
        }
    }
}

/// One liquidity reference level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityZone {
    pub kind: ZoneKind,
    pub level: f64,
    pub strength: ZoneStrength,
}

impl LiquidityZone {
    /// Whether the level sits within PROXIMITY_PCT of the given price
    pub fn is_near(&self, price: f64) -> bool {
        (self.level - price).abs() / price < PROXIMITY_PCT
    }
}

/// Derive previous-session and weekly range levels from an hourly window.
/// Both levels of a pair are always emitted once the window is long enough;
/// proximity filtering is left to the caller.
pub fn locate_zones(window: &SeriesWindow) -> Vec<LiquidityZone> {
    let mut zones = Vec::new();
    let n = window.len();

    // Previous session range: the 24 bars before the current day
    if n > SESSION_BARS {
        let start = n.saturating_sub(2 * SESSION_BARS);
        let end = n - SESSION_BARS;
        zones.push(LiquidityZone {
            kind: ZoneKind::PrevDayHigh,
            level: highest(&window.highs()[start..end]),
            strength: ZoneStrength::High,
        });
        zones.push(LiquidityZone {
            kind: ZoneKind::PrevDayLow,
            level: lowest(&window.lows()[start..end]),
            strength: ZoneStrength::High,
        });
    }

    // Weekly range: the last 168 bars
    if n > WEEK_BARS {
        zones.push(LiquidityZone {
            kind: ZoneKind::WeeklyHigh,
            level: highest(&window.highs()[n - WEEK_BARS..]),
            strength: ZoneStrength::VeryHigh,
        });
        zones.push(LiquidityZone {
            kind: ZoneKind::WeeklyLow,
            level: lowest(&window.lows()[n - WEEK_BARS..]),
            strength: ZoneStrength::VeryHigh,
        });
    }

    zones
}
