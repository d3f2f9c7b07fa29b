use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::ma::Ema;
use crate::indicator::{Indicator, closes};
use crate::model::Bar;

/// One aligned MACD observation. `histogram` is always exactly
/// `macd - signal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<Self, Report<IndicatorError>> {
        if fast_period == 0 || slow_period == 0 || signal_period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "all periods must be > 0".into(),
            });
        }
        if fast_period >= slow_period {
            bail!(IndicatorError::InvalidParameter {
                name: "fast_period must be < slow_period".into(),
            });
        }
        Ok(Self {
            fast_period,
            slow_period,
            signal_period,
        })
    }

    /// MACD line, signal line and histogram, aligned from the first bar at
    /// which all three are defined.
    pub fn calculate_lines(
        &self,
        bars: &[Bar],
    ) -> Result<Vec<MacdPoint>, Report<IndicatorError>> {
        let prices = closes(bars);
        if prices.len() < self.required_bars() {
            bail!(IndicatorError::InsufficientData {
                required: self.required_bars(),
                available: prices.len(),
            });
        }

        let fast_ema = Ema::new(self.fast_period)?.compute(&prices)?;
        let slow_ema = Ema::new(self.slow_period)?.compute(&prices)?;

        // The slow EMA starts (slow - fast) observations later.
        let offset = self.slow_period - self.fast_period;
        let macd_line: Vec<f64> = fast_ema[offset..]
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = Ema::new(self.signal_period)?.compute(&macd_line)?;
        let signal_offset = self.signal_period - 1;

        let points = macd_line[signal_offset..]
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdPoint {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect();

        Ok(points)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "macd"
    }

    fn required_bars(&self) -> usize {
        self.slow_period + self.signal_period
    }

    /// MACD line values only.
    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>, Report<IndicatorError>> {
        Ok(self
            .calculate_lines(bars)?
            .into_iter()
            .map(|p| p.macd)
            .collect())
    }
}
