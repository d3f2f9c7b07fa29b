use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, closes};
use crate::model::Bar;

/// Simple Moving Average over closing prices.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    /// Rolling mean over a raw value slice. Also used for volume baselines
    /// and the stochastic %D line.
    pub fn compute(&self, values: &[f64]) -> Result<Vec<f64>, Report<IndicatorError>> {
        if values.len() < self.period {
            bail!(IndicatorError::InsufficientData {
                required: self.period,
                available: values.len(),
            });
        }
        Ok(values
            .windows(self.period)
            .map(|w| w.iter().sum::<f64>() / self.period as f64)
            .collect())
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "sma"
    }

    fn required_bars(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>, Report<IndicatorError>> {
        self.compute(&closes(bars))
    }
}

/// Exponential Moving Average, `k = 2/(period+1)`, seeded with the SMA of
/// the first `period` values.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    pub fn compute(&self, values: &[f64]) -> Result<Vec<f64>, Report<IndicatorError>> {
        if values.len() < self.period {
            bail!(IndicatorError::InsufficientData {
                required: self.period,
                available: values.len(),
            });
        }

        let k = 2.0 / (self.period as f64 + 1.0);
        let seed: f64 = values[..self.period].iter().sum::<f64>() / self.period as f64;
        let mut ema = seed;
        let mut results = vec![ema];

        for &value in &values[self.period..] {
            ema = value * k + ema * (1.0 - k);
            results.push(ema);
        }

        Ok(results)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        "ema"
    }

    fn required_bars(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>, Report<IndicatorError>> {
        self.compute(&closes(bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::testutil::bars_from_closes;

    #[test]
    fn sma_period_zero_invalid() {
        assert!(Sma::new(0).is_err());
    }

    #[test]
    fn sma_insufficient_data() {
        let sma = Sma::new(5).unwrap();
        assert!(sma.calculate(&bars_from_closes(&[1.0; 4])).is_err());
    }

    #[test]
    fn sma_known_values() {
        let sma = Sma::new(3).unwrap();
        let values = sma.calculate(&bars_from_closes(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert!((values[0] - 2.0).abs() < 1e-9);
        assert!((values[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn sma_flat_series() {
        let sma = Sma::new(4).unwrap();
        for v in sma.calculate(&bars_from_closes(&[10.0; 7])).unwrap() {
            assert!((v - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ema_period_zero_invalid() {
        assert!(Ema::new(0).is_err());
    }

    #[test]
    fn ema_insufficient_data() {
        let ema = Ema::new(5).unwrap();
        assert!(ema.calculate(&bars_from_closes(&[1.0; 4])).is_err());
    }

    #[test]
    fn ema_seed_is_sma_of_first_period() {
        let ema = Ema::new(3).unwrap();
        let values = ema.calculate(&bars_from_closes(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert!((values[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ema_flat_series_stays_flat() {
        let ema = Ema::new(3).unwrap();
        for v in ema.calculate(&bars_from_closes(&[10.0; 8])).unwrap() {
            assert!((v - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ema_tracks_recent_values_more_than_sma() {
        // After a jump, EMA sits above the SMA of the same window because it
        // weights the latest value at k = 0.5.
        let closes = [10.0, 10.0, 10.0, 20.0];
        let ema = Ema::new(3).unwrap().calculate(&bars_from_closes(&closes)).unwrap();
        let sma = Sma::new(3).unwrap().calculate(&bars_from_closes(&closes)).unwrap();
        assert!(ema.last().unwrap() > sma.last().unwrap());
    }
}
