use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar for an equity.
///
/// A price series is an ascending slice of bars with unique dates. The
/// analysis core treats the series as read-only and never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// All numeric fields finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn signal_display() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(Signal::Sell.to_string(), "SELL");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }

    #[test]
    fn signal_serde_round_trip() {
        let json = serde_json::to_string(&Signal::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");
        let parsed: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Signal::Buy);
    }

    #[test]
    fn bar_serde_round_trip() {
        let original = bar(123.45);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn bar_validity() {
        assert!(bar(100.0).is_valid());

        let mut negative = bar(100.0);
        negative.low = -1.0;
        assert!(!negative.is_valid());

        let mut nan = bar(100.0);
        nan.volume = f64::NAN;
        assert!(!nan.is_valid());
    }
}
