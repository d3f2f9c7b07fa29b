use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, closes};
use crate::model::Bar;

/// RSI (Relative Strength Index) over a rolling arithmetic mean of gains and
/// losses.
///
/// Zero-loss convention: a window with positive average gain and zero average
/// loss saturates to 100; a completely flat window (both averages zero) is
/// reported as the neutral 50.
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        "rsi"
    }

    fn required_bars(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>, Report<IndicatorError>> {
        let prices = closes(bars);
        if prices.len() < self.required_bars() {
            bail!(IndicatorError::InsufficientData {
                required: self.required_bars(),
                available: prices.len(),
            });
        }

        let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

        let values = deltas
            .windows(self.period)
            .map(|window| {
                let avg_gain =
                    window.iter().map(|&d| d.max(0.0)).sum::<f64>() / self.period as f64;
                let avg_loss =
                    window.iter().map(|&d| (-d).max(0.0)).sum::<f64>() / self.period as f64;
                rsi_value(avg_gain, avg_loss)
            })
            .collect();

        Ok(values)
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
