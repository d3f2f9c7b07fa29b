use serde::Serialize;

use crate::model::Bar;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Headline figures for one stock, independent of the signal engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceMetrics {
    pub current_price: f64,
    pub daily_change: f64,
    pub daily_change_pct: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub avg_volume: f64,
    pub current_volume: f64,
    /// Annualized volatility in percent: sample standard deviation of daily
    /// returns scaled by sqrt(252). 0.0 when fewer than two returns exist.
    pub volatility_pct: f64,
    pub total_return_pct: f64,
}

/// Basic financial metrics over a bar series; `None` for an empty series.
pub fn basic_metrics(bars: &[Bar]) -> Option<PriceMetrics> {
    let last = bars.last()?;
    let current_price = last.close;

    let (daily_change, daily_change_pct) = match bars.len().checked_sub(2).map(|i| &bars[i]) {
        Some(previous) => {
            let change = current_price - previous.close;
            let pct = if previous.close != 0.0 {
                change / previous.close * 100.0
            } else {
                0.0
            };
            (change, pct)
        }
        None => (0.0, 0.0),
    };

    let high_52w = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let low_52w = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let avg_volume = bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64;

    let returns: Vec<f64> = bars
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .filter(|r| r.is_finite())
        .collect();
    let volatility_pct = sample_std_dev(&returns)
        .map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
        .unwrap_or(0.0);

    let first_close = bars[0].close;
    let total_return_pct = if first_close != 0.0 {
        (current_price / first_close - 1.0) * 100.0
    } else {
        0.0
    };

    Some(PriceMetrics {
        current_price,
        daily_change,
        daily_change_pct,
        high_52w,
        low_52w,
        avg_volume,
        current_volume: last.volume,
        volatility_pct,
        total_return_pct,
    })
}

/// Sample standard deviation (n − 1 denominator); `None` for fewer than two
/// observations.
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
