pub mod bollinger;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod stochastic;
pub mod volume;

use error_stack::Report;

use crate::error::IndicatorError;
use crate::model::Bar;

/// A technical indicator computed over a daily bar series.
///
/// Bars must be in ascending date order (oldest first). `calculate` returns
/// the indicator's primary output line; indicators with several output lines
/// (MACD, Bollinger, stochastic) expose the full shape through their own
/// inherent methods.
pub trait Indicator: Send {
    /// Short identifier, e.g. "rsi", "sma".
    #[allow(dead_code)]
    fn name(&self) -> &str;

    /// Minimum number of bars needed to produce at least one output value.
    fn required_bars(&self) -> usize;

    fn calculate(&self, bars: &[Bar]) -> Result<Vec<f64>, Report<IndicatorError>>;
}

pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub fn volumes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}
