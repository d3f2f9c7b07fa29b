use serde::Serialize;

use crate::analysis::{IndicatorSet, compute_indicators};
use crate::model::{Bar, Signal};

pub const HOLD_CONFIDENCE: u8 = 50;
pub const MAX_CONFIDENCE: u8 = 90;
const MAX_REASONS: usize = 4;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const VOLUME_SPIKE_RATIO: f64 = 1.5;
const MOMENTUM_WINDOW: usize = 5;
const MOMENTUM_THRESHOLD: f64 = 0.01;

/// A scored verdict for one stock. Immutable once returned; built fresh on
/// every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub signal: Signal,
    pub confidence: u8,
    pub buy_score: f64,
    pub sell_score: f64,
    pub reasons: Vec<String>,
    pub indicators: IndicatorSet,
}

impl Recommendation {
    /// Degraded fallback for callers whose own fallible steps (e.g. loading
    /// a symbol's data file) failed before scoring could run.
    pub fn unavailable() -> Self {
        Self {
            signal: Signal::Hold,
            confidence: HOLD_CONFIDENCE,
            buy_score: 0.0,
            sell_score: 0.0,
            reasons: vec!["Analysis not available - Please try again".to_string()],
            indicators: compute_indicators(&[]),
        }
    }
}

/// Inputs visible to a scoring rule: the indicator snapshot, the raw series
/// (for rules that look at recent bars directly), and the totals accumulated
/// by the rules evaluated before it.
pub struct RuleContext<'a> {
    pub indicators: &'a IndicatorSet,
    pub bars: &'a [Bar],
    pub buy_score: f64,
    pub sell_score: f64,
}

#[derive(Debug, Default)]
pub struct Contribution {
    pub buy: f64,
    pub sell: f64,
    pub reason: Option<String>,
}

/// One step of the scoring sequence. Rules are pure; the evaluation order
/// is fixed and significant (the volume rule reads the running totals).
pub trait ScoringRule: Send + Sync {
    #[allow(dead_code)]
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Contribution;
}

fn rule_sequence() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(RsiRule),
        Box::new(TrendRule),
        Box::new(MacdMomentumRule),
        Box::new(VolumeConfirmationRule),
        Box::new(RecentMomentumRule),
    ]
}

struct RsiRule;

impl ScoringRule for RsiRule {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Contribution {
        let rsi = ctx.indicators.rsi;
        if rsi < RSI_OVERSOLD {
            return Contribution {
                buy: 2.0,
                reason: Some(format!(
                    "Stock is oversold (RSI: {rsi:.1}) - Good buying opportunity"
                )),
                ..Default::default()
            };
        }
        if rsi > RSI_OVERBOUGHT {
            return Contribution {
                sell: 2.0,
                reason: Some(format!(
                    "Stock is overbought (RSI: {rsi:.1}) - Consider selling"
                )),
                ..Default::default()
            };
        }
        Contribution {
            reason: Some(format!("Stock momentum is neutral (RSI: {rsi:.1})")),
            ..Default::default()
        }
    }
}

struct TrendRule;

impl ScoringRule for TrendRule {
    fn name(&self) -> &'static str {
        "trend"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Contribution {
        let ind = ctx.indicators;
        if ind.current_price > ind.sma_20 && ind.sma_20 > ind.sma_50 {
            return Contribution {
                buy: 1.0,
                reason: Some(
                    "Stock price is above short and medium-term averages - Upward trend"
                        .to_string(),
                ),
                ..Default::default()
            };
        }
        if ind.current_price < ind.sma_20 && ind.sma_20 < ind.sma_50 {
            return Contribution {
                sell: 1.0,
                reason: Some(
                    "Stock price is below short and medium-term averages - Downward trend"
                        .to_string(),
                ),
                ..Default::default()
            };
        }
        Contribution::default()
    }
}

struct MacdMomentumRule;

impl ScoringRule for MacdMomentumRule {
    fn name(&self) -> &'static str {
        "macd"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Contribution {
        let ind = ctx.indicators;
        if ind.macd > ind.macd_signal && ind.macd > 0.0 {
            return Contribution {
                buy: 1.0,
                reason: Some("Technical momentum is positive - Good for buying".to_string()),
                ..Default::default()
            };
        }
        if ind.macd < ind.macd_signal && ind.macd < 0.0 {
            return Contribution {
                sell: 1.0,
                reason: Some("Technical momentum is negative - Consider selling".to_string()),
                ..Default::default()
            };
        }
        Contribution::default()
    }
}

/// Adds weight to whichever side already leads, but only on a volume spike.
/// An exact tie between the running totals contributes nothing.
struct VolumeConfirmationRule;

impl ScoringRule for VolumeConfirmationRule {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Contribution {
        let ind = ctx.indicators;
        if ind.current_volume <= ind.volume_sma * VOLUME_SPIKE_RATIO {
            return Contribution::default();
        }
        if ctx.buy_score > ctx.sell_score {
            return Contribution {
                buy: 0.5,
                reason: Some("High trading volume supports the buying signal".to_string()),
                ..Default::default()
            };
        }
        if ctx.sell_score > ctx.buy_score {
            return Contribution {
                sell: 0.5,
                reason: Some("High trading volume supports the selling signal".to_string()),
                ..Default::default()
            };
        }
        Contribution::default()
    }
}

struct RecentMomentumRule;

impl ScoringRule for RecentMomentumRule {
    fn name(&self) -> &'static str {
        "recent_momentum"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Contribution {
        let Some(trend) = mean_recent_return(ctx.bars) else {
            return Contribution::default();
        };
        if trend > MOMENTUM_THRESHOLD {
            return Contribution {
                buy: 0.5,
                reason: Some("Recent price movement shows positive momentum".to_string()),
                ..Default::default()
            };
        }
        if trend < -MOMENTUM_THRESHOLD {
            return Contribution {
                sell: 0.5,
                reason: Some("Recent price movement shows negative momentum".to_string()),
                ..Default::default()
            };
        }
        Contribution::default()
    }
}

/// Mean day-over-day return over the last `MOMENTUM_WINDOW` closes. `None`
/// when the series is shorter than the window or no return is computable
/// (zero-to-zero closes are skipped).
fn mean_recent_return(bars: &[Bar]) -> Option<f64> {
    if bars.len() < MOMENTUM_WINDOW {
        return None;
    }
    let recent = &bars[bars.len() - MOMENTUM_WINDOW..];
    let returns: Vec<f64> = recent
        .windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .filter(|r| !r.is_nan())
        .collect();
    if returns.is_empty() {
        return None;
    }
    Some(returns.iter().sum::<f64>() / returns.len() as f64)
}

/// Score one stock: compute the indicator snapshot, run the rule sequence,
/// decide. Total function; every input yields a valid recommendation.
pub fn recommend(bars: &[Bar]) -> Recommendation {
    let indicators = compute_indicators(bars);
    score(&indicators, bars)
}

fn score(indicators: &IndicatorSet, bars: &[Bar]) -> Recommendation {
    let mut buy_score = 0.0;
    let mut sell_score = 0.0;
    let mut reasons = Vec::new();

    for rule in rule_sequence() {
        let contribution = rule.evaluate(&RuleContext {
            indicators,
            bars,
            buy_score,
            sell_score,
        });
        buy_score += contribution.buy;
        sell_score += contribution.sell;
        if let Some(reason) = contribution.reason {
            reasons.push(reason);
        }
    }

    let strength = (buy_score - sell_score).abs();
    let (signal, confidence) = if buy_score > sell_score && strength >= 1.0 {
        (Signal::Buy, confidence_for(strength))
    } else if sell_score > buy_score && strength >= 1.0 {
        (Signal::Sell, confidence_for(strength))
    } else {
        reasons.push("Mixed signals suggest waiting for better opportunity".to_string());
        (Signal::Hold, HOLD_CONFIDENCE)
    };
    reasons.truncate(MAX_REASONS);

    Recommendation {
        signal,
        confidence,
        buy_score,
        sell_score,
        reasons,
        indicators: *indicators,
    }
}

fn confidence_for(strength: f64) -> u8 {
    let confidence = 60.0 + strength * 10.0;
    confidence.min(f64::from(MAX_CONFIDENCE)) as u8
}

/// Plain-language reading of a recommendation for a non-technical investor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub title: String,
    pub simple: String,
    pub what_it_means: String,
    pub action: String,
}

/// Fixed lookup keyed by signal, parameterized only by confidence.
pub fn explain(recommendation: &Recommendation) -> Explanation {
    let confidence = recommendation.confidence;
    match recommendation.signal {
        Signal::Buy => Explanation {
            title: "BUY - Good Time to Invest".to_string(),
            simple: format!(
                "Our analysis suggests this stock is likely to go up. Confidence: {confidence}%"
            ),
            what_it_means: "The stock appears undervalued or in an upward trend.".to_string(),
            action: "Consider buying if you believe in the company long-term.".to_string(),
        },
        Signal::Sell => Explanation {
            title: "SELL - Consider Taking Profits".to_string(),
            simple: format!(
                "Our analysis suggests this stock might go down. Confidence: {confidence}%"
            ),
            what_it_means: "The stock appears overvalued or in a downward trend.".to_string(),
            action: "Consider selling if you own this stock to protect gains.".to_string(),
        },
        Signal::Hold => Explanation {
            title: "HOLD - Wait and Watch".to_string(),
            simple: format!(
                "Mixed signals - neither strong buy nor sell. Confidence: {confidence}%"
            ),
            what_it_means: "The stock is in a neutral zone with unclear direction.".to_string(),
            action: "If you own it, keep it. If not, wait for clearer signals.".to_string(),
        },
    }
}
