use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::Indicator;
use crate::indicator::ma::Sma;
use crate::model::Bar;

/// Stochastic oscillator: %K places the latest close inside the window's
/// high-low range, %D smooths %K with a short SMA.
///
/// A flat window (highest high == lowest low) yields the neutral 50 rather
/// than a division by zero.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Result<Self, Report<IndicatorError>> {
        if k_period == 0 || d_period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "both periods must be > 0".into(),
            });
        }
        Ok(Self { k_period, d_period })
    }

    /// (%K, %D) series. %K starts once `k_period` bars are available; %D is
    /// empty until `d_period` %K observations exist.
    pub fn calculate_kd(
        &self,
        bars: &[Bar],
    ) -> Result<(Vec<f64>, Vec<f64>), Report<IndicatorError>> {
        if bars.len() < self.k_period {
            bail!(IndicatorError::InsufficientData {
                required: self.k_period,
                available: bars.len(),
            });
        }

        let k: Vec<f64> = bars
            .windows(self.k_period)
            .map(|window| {
                let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
                let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
                let range = highest - lowest;
                let close = window[self.k_period - 1].close;
                if range == 0.0 {
                    50.0
                } else {
                    100.0 * (close - lowest) / range
                }
            })
            .collect();

        let d = if k.len() >= self.d_period {
            Sma::new(self.d_period)?.compute(&k)?
        } else {
            Vec::new()
        };

        Ok((k, d))
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        "stochastic"
    }

    fn required_bars(&self) -> usize {
        self.k_period
    }

    /// %K values only.
    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>, Report<IndicatorError>> {
        Ok(self.calculate_kd(bars)?.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::testutil::{bars_from_closes, bars_from_hlc};

    #[test]
    fn period_zero_invalid() {
        assert!(Stochastic::new(0, 3).is_err());
        assert!(Stochastic::new(14, 0).is_err());
    }

    #[test]
    fn insufficient_data() {
        let stoch = Stochastic::new(14, 3).unwrap();
        assert!(stoch.calculate(&bars_from_closes(&[1.0; 13])).is_err());
    }

    #[test]
    fn flat_window_is_neutral() {
        let stoch = Stochastic::new(3, 2).unwrap();
        let (k, d) = stoch.calculate_kd(&bars_from_closes(&[10.0; 6])).unwrap();
        for v in k.iter().chain(d.iter()) {
            assert!((v - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn close_at_window_high_is_100() {
        let stoch = Stochastic::new(3, 2).unwrap();
        let bars = bars_from_hlc(&[(10.0, 8.0, 9.0), (11.0, 9.0, 10.0), (12.0, 10.0, 12.0)]);
        let (k, _) = stoch.calculate_kd(&bars).unwrap();
        assert!((k[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn close_at_window_low_is_0() {
        let stoch = Stochastic::new(3, 2).unwrap();
        let bars = bars_from_hlc(&[(12.0, 10.0, 11.0), (11.0, 9.0, 10.0), (10.0, 8.0, 8.0)]);
        let (k, _) = stoch.calculate_kd(&bars).unwrap();
        assert!((k[0] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn midpoint_close_is_50() {
        let stoch = Stochastic::new(2, 2).unwrap();
        let bars = bars_from_hlc(&[(10.0, 6.0, 7.0), (10.0, 6.0, 8.0)]);
        let (k, _) = stoch.calculate_kd(&bars).unwrap();
        assert!((k[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn d_is_sma_of_k() {
        let stoch = Stochastic::new(2, 2).unwrap();
        let bars = bars_from_hlc(&[
            (10.0, 8.0, 9.0),
            (11.0, 9.0, 10.5),
            (12.0, 10.0, 10.2),
            (13.0, 11.0, 12.8),
        ]);
        let (k, d) = stoch.calculate_kd(&bars).unwrap();
        assert_eq!(d.len(), k.len() - 1);
        for (i, v) in d.iter().enumerate() {
            assert!((v - (k[i] + k[i + 1]) / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn d_empty_when_too_few_k_values() {
        let stoch = Stochastic::new(3, 3).unwrap();
        let (k, d) = stoch.calculate_kd(&bars_from_closes(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(k.len(), 2);
        assert!(d.is_empty());
    }
}
