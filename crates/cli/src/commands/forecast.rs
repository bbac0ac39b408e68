//! Replenishment forecast command.

use std::path::PathBuf;

use chrono::NaiveDate;
use shelf_signals::SignalsConfig;
use shelf_signals::clock::FixedClock;
use shelf_signals::forecast::{ReplenishmentForecaster, VelocityReference};
use shelf_signals::loader::{load_sales_file, load_stock_file};
use tracing::info;

use super::{CommandError, write_json};

/// Flags for `shelf-signals forecast`.
pub struct ForecastArgs {
    pub stock: PathBuf,
    pub sales: PathBuf,
    pub today: Option<NaiveDate>,
    pub reference_date: Option<NaiveDate>,
    pub window_days: Option<u32>,
}

/// Load both tables, forecast and print the results.
///
/// # Errors
///
/// Returns an error if either table cannot be loaded or the output cannot
/// be written.
pub fn run(config: &SignalsConfig, args: &ForecastArgs) -> Result<(), CommandError> {
    let mut forecast_config = config.forecast;
    if let Some(days) = args.window_days {
        if days == 0 {
            return Err(CommandError::InvalidArgument(
                "--window-days",
                "must be greater than zero".to_string(),
            ));
        }
        forecast_config.velocity_window_days = days;
    }
    if let Some(date) = args.reference_date {
        forecast_config.reference = VelocityReference::Fixed(date);
    }

    let stock = load_stock_file(&args.stock)?;
    let sales = load_sales_file(&args.sales)?;
    info!(stock = stock.len(), sales = sales.len(), "Loaded input tables");

    let forecaster = ReplenishmentForecaster::new(forecast_config);
    let settings = forecaster.config();
    info!(
        window_days = settings.velocity_window_days,
        refill_cover_days = settings.refill_cover_days,
        reference = ?settings.reference,
        "Forecasting replenishment"
    );
    let results = match args.today.or(config.today) {
        Some(today) => forecaster
            .with_clock(FixedClock(today))
            .forecast(&stock, &sales),
        None => forecaster.forecast(&stock, &sales),
    };

    write_json(&results)
}
