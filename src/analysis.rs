use serde::Serialize;

use crate::indicator::Indicator;
use crate::indicator::bollinger::BollingerBands;
use crate::indicator::ma::Sma;
use crate::indicator::macd::Macd;
use crate::indicator::rsi::Rsi;
use crate::indicator::stochastic::Stochastic;
use crate::indicator::volume::VolumeSma;
use crate::model::Bar;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const SMA_SHORT: usize = 20;
pub const SMA_MEDIUM: usize = 50;
pub const SMA_LONG: usize = 200;
pub const STOCH_K_PERIOD: usize = 14;
pub const STOCH_D_PERIOD: usize = 3;
pub const VOLUME_PERIOD: usize = 20;

/// Neutral midpoint for the bounded oscillators (RSI, stochastic).
pub const NEUTRAL_OSCILLATOR: f64 = 50.0;
/// Placeholder price when a series carries no usable close at all.
pub const FALLBACK_PRICE: f64 = 100.0;
/// Placeholder volume when a series carries no usable volume at all.
pub const FALLBACK_VOLUME: f64 = 1_000_000.0;

/// Latest value of every indicator for one price series.
///
/// Every field is always a finite number. Where the series is too short for
/// an indicator, or its arithmetic degenerates, the field holds that
/// indicator's neutral default instead:
///
/// - `rsi`, `stoch_k`, `stoch_d` — 50.0
/// - `macd`, `macd_signal`, `macd_histogram` — 0.0
/// - `sma_*`, `bb_*` — the latest close
/// - `volume_sma` — the latest volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub sma_20: f64,
    pub sma_50: f64,
    pub sma_200: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub current_price: f64,
    pub volume_sma: f64,
    pub current_volume: f64,
}

/// Derive the full indicator snapshot from a bar series.
///
/// Total function: indicators are computed independently and any individual
/// failure falls back to that indicator's neutral default, so the result is
/// usable for any input, including an empty series.
pub fn compute_indicators(bars: &[Bar]) -> IndicatorSet {
    let current_price = bars
        .last()
        .map(|b| b.close)
        .filter(|v| v.is_finite())
        .unwrap_or(FALLBACK_PRICE);
    let current_volume = bars
        .last()
        .map(|b| b.volume)
        .filter(|v| v.is_finite())
        .unwrap_or(FALLBACK_VOLUME);

    let rsi = latest_or(Rsi::new(RSI_PERIOD).ok(), bars, NEUTRAL_OSCILLATOR);

    let (macd, macd_signal, macd_histogram) = Macd::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
        .ok()
        .and_then(|m| m.calculate_lines(bars).ok())
        .and_then(|points| points.last().copied())
        .filter(|p| p.macd.is_finite() && p.signal.is_finite() && p.histogram.is_finite())
        .map(|p| (p.macd, p.signal, p.histogram))
        .unwrap_or((0.0, 0.0, 0.0));

    let sma_20 = latest_or(Sma::new(SMA_SHORT).ok(), bars, current_price);
    let sma_50 = latest_or(Sma::new(SMA_MEDIUM).ok(), bars, current_price);
    let sma_200 = latest_or(Sma::new(SMA_LONG).ok(), bars, current_price);

    let (bb_upper, bb_middle, bb_lower) = BollingerBands::new(BOLLINGER_PERIOD, BOLLINGER_STD_DEV)
        .ok()
        .and_then(|bb| bb.calculate_bands(bars).ok())
        .and_then(|bands| bands.last().copied())
        .filter(|b| b.upper.is_finite() && b.middle.is_finite() && b.lower.is_finite())
        .map(|b| (b.upper, b.middle, b.lower))
        .unwrap_or((current_price, current_price, current_price));

    let (stoch_k, stoch_d) = Stochastic::new(STOCH_K_PERIOD, STOCH_D_PERIOD)
        .ok()
        .and_then(|s| s.calculate_kd(bars).ok())
        .map(|(k, d)| {
            (
                last_finite_or(&k, NEUTRAL_OSCILLATOR),
                last_finite_or(&d, NEUTRAL_OSCILLATOR),
            )
        })
        .unwrap_or((NEUTRAL_OSCILLATOR, NEUTRAL_OSCILLATOR));

    let volume_sma = latest_or(VolumeSma::new(VOLUME_PERIOD).ok(), bars, current_volume);

    IndicatorSet {
        rsi,
        macd,
        macd_signal,
        macd_histogram,
        sma_20,
        sma_50,
        sma_200,
        bb_upper,
        bb_middle,
        bb_lower,
        stoch_k,
        stoch_d,
        current_price,
        volume_sma,
        current_volume,
    }
}

/// Latest value of an indicator's primary line, or `default` when the
/// indicator cannot be built, cannot be computed, or produced a non-finite
/// value.
fn latest_or<I: Indicator>(indicator: Option<I>, bars: &[Bar], default: f64) -> f64 {
    indicator
        .and_then(|ind| ind.calculate(bars).ok())
        .map(|values| last_finite_or(&values, default))
        .unwrap_or(default)
}

fn last_finite_or(values: &[f64], default: f64) -> f64 {
    values
        .last()
        .copied()
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::testutil::bars_from_closes;

    fn all_fields(set: &IndicatorSet) -> [f64; 15] {
        [
            set.rsi,
            set.macd,
            set.macd_signal,
            set.macd_histogram,
            set.sma_20,
            set.sma_50,
            set.sma_200,
            set.bb_upper,
            set.bb_middle,
            set.bb_lower,
            set.stoch_k,
            set.stoch_d,
            set.current_price,
            set.volume_sma,
            set.current_volume,
        ]
    }

    #[test]
    fn every_field_finite_for_any_length() {
        for len in [0usize, 1, 2, 5, 13, 14, 19, 20, 26, 35, 50, 199, 250] {
            let closes: Vec<f64> = (0..len).map(|i| 100.0 + (i % 7) as f64).collect();
            let set = compute_indicators(&bars_from_closes(&closes));
            for (i, v) in all_fields(&set).iter().enumerate() {
                assert!(v.is_finite(), "field {i} not finite at len {len}");
            }
        }
    }

    #[test]
    fn empty_series_uses_placeholders() {
        let set = compute_indicators(&[]);
        assert_eq!(set.current_price, FALLBACK_PRICE);
        assert_eq!(set.current_volume, FALLBACK_VOLUME);
        assert_eq!(set.rsi, NEUTRAL_OSCILLATOR);
        assert_eq!(set.macd, 0.0);
        assert_eq!(set.macd_signal, 0.0);
        assert_eq!(set.macd_histogram, 0.0);
        assert_eq!(set.sma_20, FALLBACK_PRICE);
        assert_eq!(set.bb_middle, FALLBACK_PRICE);
        assert_eq!(set.stoch_k, NEUTRAL_OSCILLATOR);
        assert_eq!(set.volume_sma, FALLBACK_VOLUME);
    }

    #[test]
    fn single_bar_defaults_to_its_own_close() {
        let set = compute_indicators(&bars_from_closes(&[250.0]));
        assert_eq!(set.current_price, 250.0);
        assert_eq!(set.sma_20, 250.0);
        assert_eq!(set.sma_50, 250.0);
        assert_eq!(set.sma_200, 250.0);
        assert_eq!(set.bb_upper, 250.0);
        assert_eq!(set.bb_lower, 250.0);
        assert_eq!(set.rsi, NEUTRAL_OSCILLATOR);
        assert_eq!(set.volume_sma, 1000.0);
    }

    #[test]
    fn short_series_fills_long_windows_with_latest_close() {
        // 60 bars: SMA 20/50 real, SMA 200 defaulted
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let set = compute_indicators(&bars_from_closes(&closes));
        assert_eq!(set.sma_200, set.current_price);
        assert!((set.sma_20 - (closes[40..].iter().sum::<f64>() / 20.0)).abs() < 1e-9);
        assert!(set.sma_20 > set.sma_50);
    }

    #[test]
    fn rising_series_saturates_oscillators() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let set = compute_indicators(&bars_from_closes(&closes));
        assert!((set.rsi - 100.0).abs() < 1e-9);
        assert!(set.macd > 0.0);
        assert!(set.stoch_k > 99.0);
        assert!(set.current_price > set.sma_20);
        assert!(set.sma_20 > set.sma_50);
        assert!(set.sma_50 > set.sma_200);
    }

    #[test]
    fn histogram_identity_holds_in_snapshot() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64).sin() * 5.0 + i as f64 * 0.3)
            .collect();
        let set = compute_indicators(&bars_from_closes(&closes));
        assert_eq!(set.macd_histogram, set.macd - set.macd_signal);
    }

    #[test]
    fn flat_series_is_fully_neutral() {
        let set = compute_indicators(&bars_from_closes(&[42.0; 250]));
        assert_eq!(set.rsi, NEUTRAL_OSCILLATOR);
        assert_eq!(set.stoch_k, NEUTRAL_OSCILLATOR);
        assert_eq!(set.stoch_d, NEUTRAL_OSCILLATOR);
        assert!(set.macd.abs() < 1e-9);
        assert_eq!(set.bb_upper, 42.0);
        assert_eq!(set.bb_lower, 42.0);
    }

    #[test]
    fn snapshot_is_deterministic() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + ((i * 7) % 13) as f64).collect();
        let bars = bars_from_closes(&closes);
        assert_eq!(compute_indicators(&bars), compute_indicators(&bars));
    }
}
