/// Killzone session classification on the London clock
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Europe::London;
use serde::{Deserialize, Serialize};

/// Trading session window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    LondonKillzone,
    NyKillzone,
    OutsideKillzone,
}

impl Session {
    pub fn as_str(&self) -> &str {
        match self {
            Session::LondonKillzone => "LONDON_KILLZONE",
            Session::NyKillzone => "NY_KILLZONE",
            Session::OutsideKillzone => "OUTSIDE_KILLZONE",
        }
    }

    pub fn is_killzone(&self) -> bool {
        matches!(self, Session::LondonKillzone | Session::NyKillzone)
    }

    /// Multiplier applied to the whole composite score
    pub fn weight(&self) -> f64 {
        match self {
            Session::LondonKillzone => 1.5,
            Session::NyKillzone => 1.3,
            Session::OutsideKillzone => 0.7,
        }
    }

    /// Additive contribution to the session factor
    pub fn score_contribution(&self) -> i32 {
        match self {
            Session::LondonKillzone | Session::NyKillzone => 1,
            Session::OutsideKillzone => 0,
        }
    }
}

/// Classify an instant against the killzone windows. Both windows are
/// expressed in London civil time, the NY killzone included.
pub fn session_at(now: DateTime<Utc>) -> Session {
    let london_time = now.with_timezone(&London).time();

    let london_open = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    let london_close = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    let ny_open = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let ny_close = NaiveTime::from_hms_opt(15, 0, 0).unwrap();

    if london_time >= london_open && london_time <= london_close {
        Session::LondonKillzone
    } else if london_time >= ny_open && london_time <= ny_close {
        Session::NyKillzone
    } else {
        Session::OutsideKillzone
    }
}

/// Classify the present wall-clock instant
pub fn current_session() -> Session {
    session_at(Utc::now())
}
