use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stock_advisor::config::{self, AppConfig, StockConfig};
use stock_advisor::model::Bar;
use stock_advisor::{basic_metrics, data, explain, recommend, report, suggest_portfolio};

#[derive(Debug, Display, Error)]
enum AppError {
    #[display("configuration error")]
    Config,
    #[display("data error")]
    Data,
    #[display("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },
    #[display("output serialization error")]
    Serialize,
}

#[derive(Parser)]
#[command(name = "stock-advisor", about = "Technical analysis advisor for Indian equities")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    /// Analyze one watchlist symbol in detail instead of the whole portfolio
    #[arg(short, long)]
    symbol: Option<String>,
    /// Emit JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let config = config::load(Path::new(&cli.config)).change_context(AppError::Config)?;

    init_tracing(&config);

    if config.stocks.is_empty() {
        warn!("watchlist is empty; nothing to analyze");
        return Ok(());
    }

    match &cli.symbol {
        Some(symbol) => analyze_single(&config, symbol, cli.json),
        None => analyze_portfolio(&config, cli.json),
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.general.log_level);
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

fn analyze_single(
    config: &AppConfig,
    symbol: &str,
    json: bool,
) -> Result<(), Report<AppError>> {
    let stock = config
        .stocks
        .iter()
        .find(|s| s.symbol == symbol)
        .ok_or_else(|| {
            Report::new(AppError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
        })?;

    let bars = data::load_bars(&series_path(config, stock))
        .change_context(AppError::Data)
        .attach_with(|| format!("symbol: {symbol}"))?;

    info!(symbol, bars = bars.len(), "scoring symbol");

    let recommendation = recommend(&bars);
    let explanation = explain(&recommendation);
    let metrics = basic_metrics(&bars);

    if json {
        let payload = serde_json::json!({
            "symbol": symbol,
            "recommendation": recommendation,
            "explanation": explanation,
            "metrics": metrics,
        });
        let rendered =
            serde_json::to_string_pretty(&payload).change_context(AppError::Serialize)?;
        println!("{rendered}");
        return Ok(());
    }

    let name = stock.name.as_deref().unwrap_or(symbol);
    print!("{}", report::render_recommendation(symbol, name, &recommendation));
    if let Some(metrics) = metrics {
        print!("{}", report::render_metrics(&metrics));
    }
    print!("{}", report::render_explanation(&explanation));
    Ok(())
}

fn analyze_portfolio(config: &AppConfig, json: bool) -> Result<(), Report<AppError>> {
    let mut stocks: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
    for stock in &config.stocks {
        let bars = match data::load_bars(&series_path(config, stock)) {
            Ok(bars) => bars,
            Err(e) => {
                // An unreadable series degrades this symbol to a neutral
                // hold; the rest of the watchlist is still scored.
                warn!(symbol = %stock.symbol, error = ?e, "failed to load series");
                Vec::new()
            }
        };
        stocks.insert(stock.symbol.clone(), bars);
    }

    info!(symbols = stocks.len(), "scoring watchlist");
    let suggestions = suggest_portfolio(&stocks);

    if json {
        let rendered =
            serde_json::to_string_pretty(&suggestions).change_context(AppError::Serialize)?;
        println!("{rendered}");
        return Ok(());
    }

    print!("{}", report::render_portfolio(&suggestions));
    Ok(())
}

fn series_path(config: &AppConfig, stock: &StockConfig) -> PathBuf {
    Path::new(&config.general.data_dir).join(format!("{}.json", stock.symbol))
}
