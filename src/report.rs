use std::fmt::Write;

use crate::metrics::PriceMetrics;
use crate::portfolio::{PortfolioSuggestions, StockPick};
use crate::recommend::{Explanation, Recommendation};

/// One-stock analysis block: verdict line, key indicator readings, reasons.
pub fn render_recommendation(symbol: &str, name: &str, rec: &Recommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{symbol} ({name}): {} ({}% confidence)",
        rec.signal, rec.confidence
    );
    let ind = &rec.indicators;
    let _ = writeln!(
        out,
        "  price {:.2} | RSI {:.1} | MACD {:.2} | SMA20 {:.2} | SMA50 {:.2}",
        ind.current_price, ind.rsi, ind.macd, ind.sma_20, ind.sma_50
    );
    for reason in &rec.reasons {
        let _ = writeln!(out, "  - {reason}");
    }
    out
}

pub fn render_explanation(explanation: &Explanation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", explanation.title);
    let _ = writeln!(out, "  {}", explanation.simple);
    let _ = writeln!(out, "  What it means: {}", explanation.what_it_means);
    let _ = writeln!(out, "  Action: {}", explanation.action);
    out
}

pub fn render_metrics(metrics: &PriceMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  day {:+.2} ({:+.2}%) | 52w range {:.2}-{:.2}",
        metrics.daily_change, metrics.daily_change_pct, metrics.low_52w, metrics.high_52w
    );
    let _ = writeln!(
        out,
        "  volatility {:.1}% | total return {:+.1}% | avg volume {:.0}",
        metrics.volatility_pct, metrics.total_return_pct, metrics.avg_volume
    );
    out
}

pub fn render_portfolio(suggestions: &PortfolioSuggestions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", suggestions.analysis_summary);
    render_bucket(&mut out, "Strong buys", &suggestions.strong_buys);
    render_bucket(&mut out, "Moderate buys", &suggestions.moderate_buys);
    render_bucket(&mut out, "Sells", &suggestions.sells);
    render_bucket(&mut out, "Holds", &suggestions.holds);
    out
}

fn render_bucket(out: &mut String, title: &str, picks: &[StockPick]) {
    let _ = writeln!(out, "{title}:");
    if picks.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for pick in picks {
        let _ = writeln!(
            out,
            "  {} {} {}% @ {:.2}",
            pick.symbol, pick.signal, pick.confidence, pick.current_price
        );
        for reason in &pick.reasons {
            let _ = writeln!(out, "    - {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::testutil::bars_from_closes;
    use crate::metrics::basic_metrics;
    use crate::recommend::{explain, recommend};

    #[test]
    fn recommendation_block_carries_verdict_and_reasons() {
        let bars = bars_from_closes(&[100.0; 30]);
        let rec = recommend(&bars);
        let text = render_recommendation("TCS", "Tata Consultancy", &rec);
        assert!(text.contains("TCS (Tata Consultancy): HOLD (50% confidence)"));
        assert!(text.contains("RSI 50.0"));
        assert!(text.contains("- "));
    }

    #[test]
    fn explanation_block_lists_all_parts() {
        let rec = recommend(&bars_from_closes(&[100.0; 10]));
        let text = render_explanation(&explain(&rec));
        assert!(text.contains("HOLD - Wait and Watch"));
        assert!(text.contains("What it means:"));
        assert!(text.contains("Action:"));
    }

    #[test]
    fn metrics_block_shows_range_and_volatility() {
        let metrics = basic_metrics(&bars_from_closes(&[100.0, 110.0])).unwrap();
        let text = render_metrics(&metrics);
        assert!(text.contains("52w range"));
        assert!(text.contains("volatility"));
    }

    #[test]
    fn portfolio_block_prints_summary_and_empty_buckets() {
        let suggestions = crate::portfolio::suggest_portfolio(&Default::default());
        let text = render_portfolio(&suggestions);
        assert!(text.contains("Market Sentiment:"));
        assert!(text.contains("Strong buys:"));
        assert!(text.contains("(none)"));
    }
}
