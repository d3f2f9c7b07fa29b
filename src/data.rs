use std::path::Path;

use error_stack::{Report, ResultExt, bail};
use tracing::warn;

use crate::error::DataError;
use crate::model::Bar;

/// Load a daily bar series from a JSON file holding an array of
/// `{date, open, high, low, close, volume}` rows.
///
/// The result satisfies the series contract the analysis core assumes:
/// ascending unique dates, all fields finite and non-negative.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, Report<DataError>> {
    let content = std::fs::read_to_string(path)
        .change_context(DataError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let raw: Vec<Bar> = serde_json::from_str(&content).change_context(DataError::Parse {
        reason: "expected a JSON array of OHLCV bars".into(),
    })?;

    let bars = clean(raw);
    if bars.is_empty() {
        bail!(DataError::Empty);
    }
    Ok(bars)
}

/// Normalize a raw series: drop rows with non-finite or negative fields,
/// sort ascending by date, collapse duplicate dates keeping the last
/// occurrence.
pub fn clean(raw: Vec<Bar>) -> Vec<Bar> {
    let before = raw.len();
    let mut bars: Vec<Bar> = raw.into_iter().filter(Bar::is_valid).collect();
    if bars.len() < before {
        warn!(
            dropped = before - bars.len(),
            "dropped bars with non-finite or negative fields"
        );
    }

    // Stable sort keeps file order within a date, so the last row for a
    // date survives the collapse below.
    bars.sort_by_key(|b| b.date);

    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(previous) if previous.date == bar.date => *previous = bar,
            _ => deduped.push(bar),
        }
    }
    deduped
}
