//! Rule-based technical analysis for Indian equities: indicator snapshots,
//! BUY/SELL/HOLD recommendations with confidence and reasons, and
//! portfolio-level suggestion buckets.
//!
//! The analysis core (`analysis`, `recommend`, `portfolio`, `metrics`) is
//! pure and total: it never errors, never does I/O and keeps no state
//! between calls. `config` and `data` carry the thin file-based edges used
//! by the CLI.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod model;
pub mod portfolio;
pub mod recommend;
pub mod report;

pub use analysis::{IndicatorSet, compute_indicators};
pub use metrics::{PriceMetrics, basic_metrics};
pub use model::{Bar, Signal};
pub use portfolio::{PortfolioSuggestions, StockPick, suggest_portfolio};
pub use recommend::{Explanation, Recommendation, explain, recommend};
