//! Shelf Signals CLI - Replenishment forecasts and sales trends from CSV.
//!
//! # Usage
//!
//! ```bash
//! # Forecast stockouts and refill quantities
//! shelf-signals forecast --stock stock.csv --sales sales.csv
//!
//! # Pin "today" so the output is reproducible
//! shelf-signals forecast --stock stock.csv --sales sales.csv --today 2024-01-08
//!
//! # Top 5 products of the last 7 days versus the 7 before
//! shelf-signals trends --sales sales.csv --top-n 5 --period-days 7
//!
//! # Per-customer feature table for an external clustering tool
//! shelf-signals features --sales sales.csv
//! ```
//!
//! # Commands
//!
//! - `forecast` - Replenishment forecast per stocked product
//! - `trends` - Ranked period-over-period trend list
//! - `features` - Customer features for segmentation
//!
//! Results are written to stdout as JSON; logs go to stderr. Defaults come
//! from `SIGNALS_*` environment variables (see `shelf_signals::config`) and
//! are overridden by flags.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shelf-signals")]
#[command(author, version, about = "Shelf Signals CLI tools")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast stockouts and suggested refills
    Forecast {
        /// Stock snapshot CSV (`product_id,product_name,current_stock`)
        #[arg(long)]
        stock: PathBuf,

        /// Sales CSV
        #[arg(long)]
        sales: PathBuf,

        /// Date stockouts are projected from (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// End of the velocity window for every product (default: each
        /// product's latest sale)
        #[arg(long)]
        reference_date: Option<NaiveDate>,

        /// Length of the trailing velocity window in days
        #[arg(long)]
        window_days: Option<u32>,
    },
    /// Rank products by recent sales and classify their trend
    Trends {
        /// Sales CSV
        #[arg(long)]
        sales: PathBuf,

        /// Number of products to return
        #[arg(long)]
        top_n: Option<usize>,

        /// Length of each comparison window in days
        #[arg(long)]
        period_days: Option<u32>,
    },
    /// Print per-customer features for segmentation
    Features {
        /// Sales CSV with `customer_id`, `unit_price` and `total_price`
        #[arg(long)]
        sales: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.json_logs);

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = shelf_signals::SignalsConfig::from_env()?;

    match cli.command {
        Commands::Forecast {
            stock,
            sales,
            today,
            reference_date,
            window_days,
        } => commands::forecast::run(
            &config,
            &commands::forecast::ForecastArgs {
                stock,
                sales,
                today,
                reference_date,
                window_days,
            },
        ),
        Commands::Trends {
            sales,
            top_n,
            period_days,
        } => commands::trends::run(&config, &sales, top_n, period_days),
        Commands::Features { sales } => commands::features::run(&sales),
    }
}
