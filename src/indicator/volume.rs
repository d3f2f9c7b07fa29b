use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, volumes};
use crate::model::Bar;

/// Rolling mean of traded volume, the baseline against which a session's
/// volume counts as a spike.
pub struct VolumeSma {
    period: usize,
}

impl VolumeSma {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }
}

impl Indicator for VolumeSma {
    fn name(&self) -> &str {
        "volume_sma"
    }

    fn required_bars(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>, Report<IndicatorError>> {
        let vols = volumes(bars);
        if vols.len() < self.period {
            bail!(IndicatorError::InsufficientData {
                required: self.period,
                available: vols.len(),
            });
        }
        Ok(vols
            .windows(self.period)
            .map(|w| w.iter().sum::<f64>() / self.period as f64)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars_with_volumes(vols: &[f64]) -> Vec<Bar> {
        vols.iter()
            .enumerate()
            .map(|(i, &v)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume: v,
            })
            .collect()
    }

    #[test]
    fn period_zero_invalid() {
        assert!(VolumeSma::new(0).is_err());
    }

    #[test]
    fn insufficient_data() {
        let vma = VolumeSma::new(5).unwrap();
        assert!(vma.calculate(&bars_with_volumes(&[1.0; 4])).is_err());
    }

    #[test]
    fn known_values() {
        let vma = VolumeSma::new(3).unwrap();
        let values = vma.calculate(&bars_with_volumes(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert!((values[0] - 2.0).abs() < 1e-9);
        assert!((values[1] - 3.0).abs() < 1e-9);
    }
}
