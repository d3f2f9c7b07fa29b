use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::model::{Bar, Signal};
use crate::recommend::{Recommendation, recommend};

pub const STRONG_BUY_CONFIDENCE: u8 = 70;
pub const MODERATE_BUY_CONFIDENCE: u8 = 55;
const TOP_REASONS: usize = 2;

/// One stock's entry in a portfolio bucket: the signal, its confidence and
/// the two strongest reasons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPick {
    pub symbol: String,
    pub signal: Signal,
    pub confidence: u8,
    pub current_price: f64,
    pub reasons: Vec<String>,
}

/// Batch verdict over a watchlist, bucketed by signal and confidence. Every
/// bucket is sorted descending by confidence; ties keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSuggestions {
    pub strong_buys: Vec<StockPick>,
    pub moderate_buys: Vec<StockPick>,
    pub holds: Vec<StockPick>,
    pub sells: Vec<StockPick>,
    pub analysis_summary: String,
}

impl PortfolioSuggestions {
    /// Degraded result for callers whose batch assembly failed before any
    /// symbol could be scored. Buckets are present and empty, never absent.
    pub fn unavailable() -> Self {
        Self {
            strong_buys: Vec::new(),
            moderate_buys: Vec::new(),
            holds: Vec::new(),
            sells: Vec::new(),
            analysis_summary: "Analysis temporarily unavailable".to_string(),
        }
    }
}

/// Score every symbol and bucket the results.
///
/// Symbols are independent, so scoring fans out over rayon; the bucket
/// assembly afterwards runs in map order, which keeps the output
/// deterministic regardless of completion order. A symbol with an empty or
/// degenerate series still yields its (HOLD) recommendation; one symbol can
/// never abort the batch.
pub fn suggest_portfolio(stocks: &BTreeMap<String, Vec<Bar>>) -> PortfolioSuggestions {
    let recommendations: Vec<(String, Recommendation)> = stocks
        .par_iter()
        .map(|(symbol, bars)| (symbol.clone(), recommend(bars)))
        .collect();
    bucket(recommendations)
}

fn bucket(recommendations: Vec<(String, Recommendation)>) -> PortfolioSuggestions {
    let mut strong_buys = Vec::new();
    let mut moderate_buys = Vec::new();
    let mut holds = Vec::new();
    let mut sells = Vec::new();

    for (symbol, recommendation) in recommendations {
        let pick = StockPick {
            symbol,
            signal: recommendation.signal,
            confidence: recommendation.confidence,
            current_price: recommendation.indicators.current_price,
            reasons: recommendation
                .reasons
                .into_iter()
                .take(TOP_REASONS)
                .collect(),
        };

        match pick.signal {
            Signal::Buy if pick.confidence >= STRONG_BUY_CONFIDENCE => strong_buys.push(pick),
            Signal::Buy if pick.confidence >= MODERATE_BUY_CONFIDENCE => {
                moderate_buys.push(pick);
            }
            Signal::Sell => sells.push(pick),
            _ => holds.push(pick),
        }
    }

    for picks in [&mut strong_buys, &mut moderate_buys, &mut holds, &mut sells] {
        picks.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    }

    let analysis_summary = summary_line(
        strong_buys.len() + moderate_buys.len(),
        sells.len(),
    );

    PortfolioSuggestions {
        strong_buys,
        moderate_buys,
        holds,
        sells,
        analysis_summary,
    }
}

fn summary_line(buy_count: usize, sell_count: usize) -> String {
    let sentiment = if buy_count > sell_count {
        "Positive - More buying opportunities"
    } else if sell_count > buy_count {
        "Cautious - More selling signals"
    } else {
        "Mixed - Balanced signals"
    };
    format!("Market Sentiment: {sentiment}")
}
